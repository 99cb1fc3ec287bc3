// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use slowko::app_config::{Config, LogLevel};
use slowko::{NewTranslation, TranslationId, TranslationService};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add an English translation of a Polish word
    Create {
        /// Polish word
        word: String,

        /// English translation
        english: String,

        /// Example sentence (repeat for several, order is kept)
        #[arg(short, long = "example")]
        examples: Vec<String>,
    },

    /// Show one translation
    Get {
        /// Translation id
        id: String,
    },

    /// Show every translation
    List,

    /// Replace the English text of a translation
    Update {
        /// Translation id
        id: String,

        /// New English text
        english: String,
    },

    /// Delete a translation (and its word, if no other translation uses it)
    Remove {
        /// Translation id
        id: String,
    },

    /// Print row counts for the dictionary
    Stats,

    /// Generate shell completions for slowko
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// slowko - Polish-English dictionary
///
/// Stores Polish words with their English translations and example
/// sentences in a local SQLite database.
#[derive(Parser, Debug)]
#[command(name = "slowko")]
#[command(version)]
#[command(about = "Polish-English dictionary backed by SQLite")]
#[command(long_about = "slowko stores Polish words, English translations and example sentences.

EXAMPLES:
    slowko create pisać write -e \"On lubi pisać listy.\"
    slowko list
    slowko update 1 \"to write\"
    slowko remove 1
    slowko --database ./dict.db stats

CONFIGURATION:
    Configuration is stored in slowko.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "slowko.json")]
    config_path: PathBuf,

    /// Database file, overriding the configuration
    #[arg(short, long, env = "SLOWKO_DATABASE")]
    database: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Start permissive; the configured level is applied once it is known.
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "slowko", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;

    if let Some(log_level) = cli.log_level.clone() {
        config.log_level = log_level.into();
    }
    if let Some(database) = cli.database.clone() {
        config.database.path = Some(database);
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());
    debug!("Using configuration: {:?}", config);

    let service = TranslationService::open(&config)?;
    run_command(&service, cli.command)
}

fn run_command(service: &TranslationService, command: Commands) -> Result<()> {
    match command {
        Commands::Create {
            word,
            english,
            examples,
        } => {
            let input = NewTranslation {
                word,
                english_text: english,
                examples,
            };
            print_json(&service.create(&input)?)
        }
        Commands::Get { id } => {
            let id: TranslationId = id.parse()?;
            print_json(&service.get(id)?)
        }
        Commands::List => print_json(&service.list()?),
        Commands::Update { id, english } => {
            let id: TranslationId = id.parse()?;
            print_json(&service.update(id, &english)?)
        }
        Commands::Remove { id } => {
            let id: TranslationId = id.parse()?;
            print_json(&service.remove(id)?)
        }
        Commands::Stats => {
            println!("{}", service.database().stats()?);
            Ok(())
        }
        Commands::Completions { .. } => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

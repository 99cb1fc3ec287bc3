/*!
 * End-to-end tests for dictionary workflows
 */

use slowko::{Database, TranslationService};

use crate::common::{create, file_service, memory_service, word_rows};

#[test]
fn test_threeDistinctPairs_shouldAllBeListedWithExamples() {
    let service = memory_service();

    let pairs: [(&str, &str, &[&str]); 3] = [
        ("pisać", "write", &["On lubi pisać listy."]),
        ("czytać", "read", &["Czytam książkę.", "Ona czyta gazetę."]),
        (
            "mówić",
            "speak",
            &["Mówię po polsku.", "Mów wolniej.", "Kto mówi?"],
        ),
    ];

    for (word, english, examples) in pairs {
        create(&service, word, english, examples);
    }

    let listed = service.list().expect("Failed to list translations");
    assert_eq!(listed.len(), 3);

    for (record, (word, english, examples)) in listed.iter().zip(pairs) {
        assert_eq!(record.word.text, word);
        assert_eq!(record.english_text, english);
        assert_eq!(record.sentences(), examples.to_vec());
    }
}

#[test]
fn test_list_shouldBeOrderedById() {
    let service = memory_service();
    let a = create(&service, "a", "a", &[]);
    let b = create(&service, "b", "b", &[]);
    let c = create(&service, "c", "c", &[]);

    service.remove(b.id).unwrap();
    let d = create(&service, "d", "d", &[]);

    let ids: Vec<_> = service.list().unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![a.id, c.id, d.id]);
}

#[test]
fn test_fullLifecycle_shouldLeaveStoreEmpty() {
    let service = memory_service();

    let castle = create(&service, "zamek", "castle", &["Zamek jest stary."]);
    let lock = create(&service, "zamek", "lock", &["Zamek się zepsuł."]);
    let updated = service.update(lock.id, "padlock").unwrap();
    assert_eq!(updated.english_text, "padlock");

    service.remove(castle.id).unwrap();
    service.remove(lock.id).unwrap();

    let stats = service.database().stats().unwrap();
    assert_eq!(stats.word_count, 0);
    assert_eq!(stats.translation_count, 0);
    assert_eq!(stats.example_count, 0);
}

#[test]
fn test_removedWord_shouldBeRecreatedWithNewId() {
    let service = memory_service();
    let first = create(&service, "kot", "cat", &[]);
    service.remove(first.id).unwrap();

    let second = create(&service, "kot", "cat", &[]);

    assert_eq!(word_rows(&service, "kot"), 1);
    assert!(second.word.id > first.word.id);
    assert!(second.id > first.id);
}

#[test]
fn test_fileDatabase_shouldPersistAcrossReopen() {
    let (_dir, path, service) = file_service().unwrap();
    let created = create(&service, "pisać", "write", &["On lubi pisać listy."]);
    drop(service);

    let reopened = TranslationService::new(
        Database::open(&path, slowko::database::DEFAULT_BUSY_TIMEOUT).unwrap(),
    );
    let fetched = reopened.get(created.id).unwrap();

    assert_eq!(fetched, created);
}

#[test]
fn test_fileDatabase_shouldCascadeAfterReopen() {
    let (_dir, path, service) = file_service().unwrap();
    let created = create(&service, "pisać", "write", &["Jeden.", "Dwa."]);
    drop(service);

    let reopened = TranslationService::new(
        Database::open(&path, slowko::database::DEFAULT_BUSY_TIMEOUT).unwrap(),
    );
    reopened.remove(created.id).unwrap();

    let stats = reopened.database().stats().unwrap();
    assert_eq!(stats.example_count, 0);
    assert_eq!(stats.word_count, 0);
}

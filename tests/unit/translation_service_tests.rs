/*!
 * Tests for the dictionary operations
 */

use slowko::database::repository;
use slowko::errors::StoreContext;
use slowko::{DictionaryError, NewTranslation, TranslationId};

use crate::common::{create, example_rows, memory_service, new_translation, word_rows};

#[test]
fn test_create_thenGet_shouldRoundTrip() {
    let service = memory_service();

    let created = create(&service, "pisać", "write", &["On lubi pisać listy."]);
    let fetched = service.get(created.id).expect("Failed to get translation");

    assert_eq!(fetched.word.text, "pisać");
    assert_eq!(fetched.english_text, "write");
    assert_eq!(fetched.sentences(), vec!["On lubi pisać listy."]);
    assert_eq!(fetched, created);
}

#[test]
fn test_create_withoutExamples_shouldStoreEmptyList() {
    let service = memory_service();

    let created = create(&service, "dom", "house", &[]);

    assert!(created.examples.is_empty());
    assert!(service.get(created.id).unwrap().examples.is_empty());
}

#[test]
fn test_create_shouldPreserveExampleOrder() {
    let service = memory_service();
    let sentences = ["Trzeci.", "Pierwszy.", "Drugi."];

    let created = create(&service, "zdanie", "sentence", &sentences);

    assert_eq!(service.get(created.id).unwrap().sentences(), sentences.to_vec());
}

#[test]
fn test_create_sameWordTwice_shouldShareOneWordRow() {
    let service = memory_service();

    let first = create(&service, "zamek", "castle", &[]);
    let second = create(&service, "zamek", "lock", &[]);

    assert_eq!(first.word.id, second.word.id);
    assert_eq!(word_rows(&service, "zamek"), 1);
}

#[test]
fn test_create_duplicatePair_shouldFailWithDuplicateError() {
    let service = memory_service();
    create(&service, "pisać", "write", &[]);

    let err = service
        .create(&NewTranslation::new("pisać", "write"))
        .unwrap_err();

    match err {
        DictionaryError::DuplicateTranslation { word, english } => {
            assert_eq!(word, "pisać");
            assert_eq!(english, "write");
        }
        other => panic!("expected duplicate error, got {other:?}"),
    }
    assert_eq!(service.list().unwrap().len(), 1);
}

#[test]
fn test_create_duplicateOfNewWord_shouldNotLeaveExtraWord() {
    let service = memory_service();
    create(&service, "pisać", "write", &[]);

    let _ = service.create(&new_translation("pisać", "write", &["x"]));

    assert_eq!(word_rows(&service, "pisać"), 1);
}

#[test]
fn test_create_sameEnglishForDifferentWords_shouldSucceed() {
    let service = memory_service();

    create(&service, "zamek", "lock", &[]);
    create(&service, "kłódka", "lock", &[]);

    assert_eq!(service.list().unwrap().len(), 2);
}

#[test]
fn test_create_withEmptyEnglish_shouldBeValidationError() {
    let service = memory_service();

    let err = service.create(&NewTranslation::new("pisać", "")).unwrap_err();

    assert!(err.is_validation());
    assert_eq!(word_rows(&service, "pisać"), 0);
}

#[test]
fn test_remove_lastTranslation_shouldDeleteWord() {
    let service = memory_service();
    let created = create(&service, "pisać", "write", &[]);

    assert!(service.remove(created.id).unwrap());

    assert_eq!(word_rows(&service, "pisać"), 0);
}

#[test]
fn test_remove_withSiblingTranslation_shouldKeepWord() {
    let service = memory_service();
    let castle = create(&service, "zamek", "castle", &[]);
    let lock = create(&service, "zamek", "lock", &[]);

    service.remove(castle.id).unwrap();
    assert_eq!(word_rows(&service, "zamek"), 1);
    assert_eq!(service.get(lock.id).unwrap().word.text, "zamek");

    service.remove(lock.id).unwrap();
    assert_eq!(word_rows(&service, "zamek"), 0);
}

#[test]
fn test_remove_shouldCascadeToExamples() {
    let service = memory_service();
    let created = create(&service, "pisać", "write", &["Jeden.", "Dwa."]);
    assert_eq!(example_rows(&service, created.id.get()), 2);

    service.remove(created.id).unwrap();

    assert_eq!(example_rows(&service, created.id.get()), 0);
}

#[test]
fn test_remove_twice_shouldFailWithNotFound() {
    let service = memory_service();
    let created = create(&service, "pisać", "write", &[]);
    service.remove(created.id).unwrap();

    let err = service.remove(created.id).unwrap_err();

    assert!(err.is_not_found());
}

#[test]
fn test_orphanCleanup_repeatedForDeletedWord_shouldNotFail() {
    let service = memory_service();
    let created = create(&service, "pisać", "write", &[]);
    let word_id = created.word.id;
    service.remove(created.id).unwrap();

    let deleted = service
        .database()
        .transaction(|tx| {
            let first = repository::delete_word_if_orphaned(tx, word_id)?;
            let second = repository::delete_word_if_orphaned(tx, word_id)?;
            Ok((first, second))
        })
        .expect("Repeated cleanup should not fail");

    assert_eq!(deleted, (false, false));
}

#[test]
fn test_remove_whenWordCleanupFails_shouldRollBackWholeRemoval() {
    let service = memory_service();
    let created = create(&service, "pisać", "write", &["On lubi pisać listy."]);
    service
        .database()
        .execute(|conn| {
            conn.execute_batch(
                "CREATE TRIGGER block_word_delete BEFORE DELETE ON words
                 BEGIN SELECT RAISE(ABORT, 'blocked'); END;",
            )
            .step("install trigger")
        })
        .unwrap();

    let err = service.remove(created.id).unwrap_err();

    assert!(
        matches!(err, DictionaryError::Store { step: "delete orphaned word", .. }),
        "got {:?}",
        err
    );
    let kept = service.get(created.id).expect("Translation should survive the rollback");
    assert_eq!(kept.sentences(), vec!["On lubi pisać listy."]);
    assert_eq!(example_rows(&service, created.id.get()), 1);
    assert_eq!(word_rows(&service, "pisać"), 1);
}

#[test]
fn test_update_missingIdWithBlankText_shouldFailWithNotFound() {
    let service = memory_service();

    let err = service.update(TranslationId::new(404), "").unwrap_err();

    assert!(err.is_not_found(), "got {:?}", err);
}

#[test]
fn test_missingId_shouldFailWithNotFoundForEveryOperation() {
    let service = memory_service();
    let missing = TranslationId::new(404);

    assert!(service.get(missing).unwrap_err().is_not_found());
    assert!(service.update(missing, "anything").unwrap_err().is_not_found());
    assert!(service.remove(missing).unwrap_err().is_not_found());
}

#[test]
fn test_update_twice_shouldKeepLastValue() {
    let service = memory_service();
    let created = create(&service, "biec", "run", &[]);

    service.update(created.id, "sprint").unwrap();
    service.update(created.id, "jog").unwrap();

    assert_eq!(service.get(created.id).unwrap().english_text, "jog");
}

#[test]
fn test_update_shouldRefreshUpdatedAtOnly() {
    let service = memory_service();
    let created = create(&service, "biec", "run", &[]);

    let updated = service.update(created.id, "sprint").unwrap();

    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
}

#[test]
fn test_update_toSiblingText_shouldFailWithDuplicateError() {
    let service = memory_service();
    create(&service, "zamek", "castle", &[]);
    let lock = create(&service, "zamek", "lock", &[]);

    let err = service.update(lock.id, "castle").unwrap_err();

    assert!(err.is_duplicate());
    assert_eq!(service.get(lock.id).unwrap().english_text, "lock");
}

#[test]
fn test_list_onEmptyStore_shouldReturnNothing() {
    let service = memory_service();
    assert!(service.list().unwrap().is_empty());
}

/*!
 * Tests for saving looked-up words through a reading session
 */

use std::sync::Arc;
use anyhow::Result;

use wordbridge::dictionary::{DictionaryStore, SqliteDictionary};
use wordbridge::errors::DictionaryError;
use wordbridge::providers::mock::MockTranslator;
use wordbridge::session::{LookupSource, ReaderSession, SessionSettings, WordLookup};

use crate::common::{self, CAT_PAGE, line_fragment, x_of_char};

fn session_with_dictionary(translator: &MockTranslator, dictionary: Arc<SqliteDictionary>) -> ReaderSession {
    common::init_logging();
    let session = ReaderSession::new(SessionSettings::default(), Arc::new(translator.clone()))
        .with_dictionary(dictionary);
    session.load_page(vec![line_fragment(CAT_PAGE)]);
    session
}

#[tokio::test]
async fn test_saveWord_shouldMarkLaterLookupsAsSaved() -> Result<()> {
    let dictionary = Arc::new(SqliteDictionary::new_in_memory()?);
    let translator = MockTranslator::working().with_response("cat", "кот");
    let session = session_with_dictionary(&translator, dictionary.clone());

    let lookup = session.on_click(x_of_char(5), 15.0).await?.unwrap();
    assert_eq!(lookup.saved, Some(false));

    let entry = session.save_word(&lookup, Some(CAT_PAGE)).await?;
    assert_eq!(entry.word, "cat");
    assert_eq!(entry.translation, "кот");
    assert_eq!(entry.context, CAT_PAGE);

    let again = session.on_click(x_of_char(5), 15.0).await?.unwrap();
    assert_eq!(again.source, LookupSource::Cache);
    assert_eq!(again.saved, Some(true));
    assert!(dictionary.has_entry("cat").await?);
    Ok(())
}

#[tokio::test]
async fn test_saveWord_withoutDictionary_shouldFail() {
    let session = common::session_with_page(&MockTranslator::working(), CAT_PAGE);
    let lookup = WordLookup::new("cat", "кот", LookupSource::Translator);

    let lookup_result = session.on_click(x_of_char(5), 15.0).await.unwrap().unwrap();
    assert_eq!(lookup_result.saved, None);

    let result = session.save_word(&lookup, None).await;
    assert!(matches!(result, Err(DictionaryError::Storage(_))));
}

#[tokio::test]
async fn test_saveWord_emptyTranslation_shouldBeRejected() -> Result<()> {
    let dictionary = Arc::new(SqliteDictionary::new_in_memory()?);
    let session = session_with_dictionary(&MockTranslator::working(), dictionary.clone());

    let lookup = WordLookup::new("cat", "   ", LookupSource::Translator);
    let result = session.save_word(&lookup, None).await;

    assert!(matches!(result, Err(DictionaryError::InvalidEntry(_))));
    assert!(dictionary.list_entries().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_dictionaryFile_shouldPersistAcrossSessions() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("data").join("dictionary.db");
    let translator = MockTranslator::working().with_response("sat", "сидел");

    {
        let session = session_with_dictionary(&translator, Arc::new(SqliteDictionary::open(&path)?));
        let lookup = session.on_click(x_of_char(9), 15.0).await?.unwrap();
        session.save_word(&lookup, None).await?;
    }

    let reopened = Arc::new(SqliteDictionary::open(&path)?);
    let entries = reopened.list_entries().await?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].word, "sat");
    assert_eq!(entries[0].translation, "сидел");
    assert_eq!(entries[0].context, "");

    let session = session_with_dictionary(&translator, reopened.clone());
    let lookup = session.on_click(x_of_char(9), 15.0).await?.unwrap();
    assert_eq!(lookup.saved, Some(true));

    assert!(reopened.remove_entry(entries[0].id).await?);
    let lookup = session.on_click(x_of_char(9), 15.0).await?.unwrap();
    assert_eq!(lookup.saved, Some(false));
    Ok(())
}

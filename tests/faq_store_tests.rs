// Tests for the FAQ store: loading, sample-file creation, and
// degradation on malformed input.

use anyhow::Result;
use interavoice::store::FaqStore;
use tempfile::TempDir;

#[test]
fn test_load_existing_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("faqs.json");

    std::fs::write(
        &path,
        r#"[{"question": "What is this?", "answer": "A test store."}]"#,
    )?;

    let store = FaqStore::load(&path)?;

    assert_eq!(store.len(), 1);
    assert_eq!(store.entries()[0].question, "What is this?");
    assert_eq!(store.entries()[0].answer, "A test store.");

    Ok(())
}

#[test]
fn test_missing_file_creates_sample() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("data").join("faqs.json");

    let store = FaqStore::load(&path)?;

    // The sample is both returned and persisted
    assert!(!store.is_empty());
    assert!(path.exists());

    let reloaded = FaqStore::load(&path)?;
    assert_eq!(reloaded.len(), store.len());

    Ok(())
}

#[test]
fn test_malformed_file_degrades_to_empty_store() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("faqs.json");

    std::fs::write(&path, "this is not json")?;

    let store = FaqStore::load(&path)?;

    assert!(store.is_empty());

    Ok(())
}

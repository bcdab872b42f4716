//! Integration tests for read/write round-trip operations.
//!
//! These tests verify that data written with JsonlWriter can be correctly
//! read back with JsonlReader, ensuring consistency across the full I/O cycle.

use rstest::rstest;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use storygraph_jsonl::{JsonlReader, JsonlWriter, read_jsonl};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct StoryRow {
    id: String,
    title: String,
    done: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct DetailedRow {
    id: String,
    estimate: f64,
    criteria: Vec<String>,
    audit: Option<Audit>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Audit {
    changed_by: String,
    revision: u32,
}

fn story_row(id: &str, title: &str) -> StoryRow {
    StoryRow {
        id: id.to_string(),
        title: title.to_string(),
        done: false,
    }
}

/// Helper to perform write-then-read roundtrip for any serializable type
async fn roundtrip<T>(original: &T) -> T
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let buffer = Cursor::new(Vec::new());
    let mut writer = JsonlWriter::new(buffer);
    writer.write(original).await.unwrap();
    writer.flush().await.unwrap();

    let data = writer.into_inner().into_inner().into_inner();
    let mut reader = JsonlReader::new(Cursor::new(data));
    reader.next_record().await.unwrap().unwrap()
}

#[rstest]
#[case::simple(story_row("proj-a3f8", "Checkout page"))]
#[case::special_chars(story_row("proj-a3f8", "Line1\nLine2\tTabbed\"Quoted\"\\Backslash"))]
#[case::unicode(story_row("proj-a3f8", "Hello, \u{4e16}\u{754c}! \u{1F600} \u{00e9}\u{00e8}"))]
#[case::empty_title(story_row("proj-a3f8", ""))]
#[case::large_title(story_row("proj-a3f8", &"x".repeat(100_000)))]
#[tokio::test]
async fn roundtrip_story_row(#[case] original: StoryRow) {
    let read_back = roundtrip(&original).await;
    assert_eq!(original, read_back);
}

#[rstest]
#[case::with_audit(DetailedRow {
    id: "proj-a3f8.1".to_string(),
    estimate: 12.5,
    criteria: vec!["loads".to_string(), "saves".to_string(), "renders".to_string()],
    audit: Some(Audit { changed_by: "alice".to_string(), revision: 3 }),
})]
#[case::null_optional(DetailedRow {
    id: "proj-ffff".to_string(),
    estimate: 0.0,
    criteria: vec![],
    audit: None,
})]
#[tokio::test]
async fn roundtrip_detailed_row(#[case] original: DetailedRow) {
    let read_back = roundtrip(&original).await;
    assert_eq!(original, read_back);
}

#[tokio::test]
async fn roundtrip_single_record_verifies_eof() {
    let original = story_row("proj-a3f8", "Checkout page");

    let buffer = Cursor::new(Vec::new());
    let mut writer = JsonlWriter::new(buffer);
    writer.write(&original).await.unwrap();
    writer.flush().await.unwrap();

    let data = writer.into_inner().into_inner().into_inner();
    let mut reader = JsonlReader::new(Cursor::new(data));

    let read_back: StoryRow = reader.next_record().await.unwrap().unwrap();
    assert_eq!(original, read_back);

    let eof: Option<StoryRow> = reader.next_record().await.unwrap();
    assert!(eof.is_none());
}

#[tokio::test]
async fn roundtrip_multiple_records() {
    let records = vec![
        story_row("proj-0001", "First"),
        story_row("proj-0002", "Second"),
        story_row("proj-0003", "Third"),
    ];

    let buffer = Cursor::new(Vec::new());
    let mut writer = JsonlWriter::new(buffer);
    writer.write_all(records.iter()).await.unwrap();
    writer.flush().await.unwrap();

    let data = writer.into_inner().into_inner().into_inner();
    let mut reader = JsonlReader::new(Cursor::new(data));

    let read_records: Vec<StoryRow> = reader.read_all().await.unwrap();
    assert_eq!(records, read_records);
}

#[tokio::test]
async fn roundtrip_large_batch() {
    let records: Vec<StoryRow> = (0..1000)
        .map(|i| StoryRow {
            id: format!("proj-{i:04x}"),
            title: format!("Story {i}"),
            done: i % 2 == 0,
        })
        .collect();

    let buffer = Cursor::new(Vec::new());
    let mut writer = JsonlWriter::new(buffer);
    writer.write_all(records.iter()).await.unwrap();
    writer.flush().await.unwrap();

    let data = writer.into_inner().into_inner().into_inner();
    let mut reader = JsonlReader::new(Cursor::new(data));

    let read_records: Vec<StoryRow> = reader.read_all().await.unwrap();
    assert_eq!(records.len(), read_records.len());
    assert_eq!(records, read_records);
}

#[tokio::test]
async fn roundtrip_preserves_line_numbers() {
    let records = [
        story_row("proj-0001", "First"),
        story_row("proj-0002", "Second"),
        story_row("proj-0003", "Third"),
    ];

    let buffer = Cursor::new(Vec::new());
    let mut writer = JsonlWriter::new(buffer);
    writer.write_all(records.iter()).await.unwrap();
    writer.flush().await.unwrap();

    let data = writer.into_inner().into_inner().into_inner();
    let mut reader = JsonlReader::new(Cursor::new(data));

    assert_eq!(reader.line_number(), 0);

    let _: StoryRow = reader.next_record().await.unwrap().unwrap();
    assert_eq!(reader.line_number(), 1);

    let _: StoryRow = reader.next_record().await.unwrap().unwrap();
    assert_eq!(reader.line_number(), 2);

    let _: StoryRow = reader.next_record().await.unwrap().unwrap();
    assert_eq!(reader.line_number(), 3);
}

#[tokio::test]
async fn roundtrip_mixed_types_as_json_value() {
    use serde_json::Value;

    let buffer = Cursor::new(Vec::new());
    let mut writer = JsonlWriter::new(buffer);

    writer.write(&42i32).await.unwrap();
    writer.write(&"hello").await.unwrap();
    writer.write(&vec![1, 2, 3]).await.unwrap();
    writer
        .write(&story_row("proj-a3f8", "Checkout page"))
        .await
        .unwrap();
    writer.flush().await.unwrap();

    let data = writer.into_inner().into_inner().into_inner();
    let mut reader = JsonlReader::new(Cursor::new(data));

    let v1: Value = reader.next_record().await.unwrap().unwrap();
    assert_eq!(v1, serde_json::json!(42));

    let v2: Value = reader.next_record().await.unwrap().unwrap();
    assert_eq!(v2, serde_json::json!("hello"));

    let v3: Value = reader.next_record().await.unwrap().unwrap();
    assert_eq!(v3, serde_json::json!([1, 2, 3]));

    let v4: Value = reader.next_record().await.unwrap().unwrap();
    assert_eq!(
        v4,
        serde_json::json!({"id": "proj-a3f8", "title": "Checkout page", "done": false})
    );
}

#[tokio::test]
async fn reader_skips_interleaved_blank_lines() {
    let raw = "{\"id\":\"proj-0001\",\"title\":\"First\",\"done\":false}\n\n   \n{\"id\":\"proj-0002\",\"title\":\"Second\",\"done\":true}\n\n";
    let mut reader = JsonlReader::new(Cursor::new(raw.as_bytes().to_vec()));

    let records: Vec<StoryRow> = reader.read_all().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].id, "proj-0002");
}

#[tokio::test]
async fn reader_reports_line_and_continues_after_bad_line() {
    let raw = "{\"id\":\"proj-0001\",\"title\":\"First\",\"done\":false}\nnot json\n{\"id\":\"proj-0003\",\"title\":\"Third\",\"done\":true}\n";
    let mut reader = JsonlReader::new(Cursor::new(raw.as_bytes().to_vec()));

    let first: StoryRow = reader.next_record().await.unwrap().unwrap();
    assert_eq!(first.id, "proj-0001");

    let err = reader.next_record::<StoryRow>().await.unwrap_err();
    assert_eq!(err.line(), Some(2));

    // The reader stays usable, so a caller can skip the bad line
    let third: StoryRow = reader.next_record().await.unwrap().unwrap();
    assert_eq!(third.id, "proj-0003");
}

// ============================================================================
// Atomic write integration tests
// ============================================================================

mod atomic_write_integration {
    use super::*;
    use storygraph_jsonl::{write_jsonl_atomic, write_jsonl_atomic_iter};
    use tempfile::tempdir;

    /// Verify atomic write creates valid JSONL that can be read back
    #[tokio::test]
    async fn atomic_write_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stories.jsonl");

        let records = vec![
            story_row("proj-0001", "First"),
            story_row("proj-0002", "Second"),
            story_row("proj-0003", "Third"),
        ];

        write_jsonl_atomic(&path, &records).await.unwrap();

        let read_records: Vec<StoryRow> = read_jsonl(&path).await.unwrap();
        assert_eq!(records, read_records);
    }

    /// Verify atomic write with nested optional fields
    #[tokio::test]
    async fn atomic_write_detailed_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("details.jsonl");

        let records = vec![
            DetailedRow {
                id: "proj-a3f8.1".to_string(),
                estimate: 12.5,
                criteria: vec!["loads".to_string(), "saves".to_string()],
                audit: Some(Audit {
                    changed_by: "alice".to_string(),
                    revision: 1,
                }),
            },
            DetailedRow {
                id: "proj-ffff".to_string(),
                estimate: 0.0,
                criteria: vec![],
                audit: None,
            },
        ];

        write_jsonl_atomic(&path, &records).await.unwrap();

        let read_records: Vec<DetailedRow> = read_jsonl(&path).await.unwrap();
        assert_eq!(records, read_records);
    }

    /// Verify that atomic write replaces existing file atomically
    #[tokio::test]
    async fn atomic_write_replaces_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("replace.jsonl");

        let initial_records = vec![story_row("proj-0001", "Initial")];
        write_jsonl_atomic(&path, &initial_records).await.unwrap();

        let new_records = vec![
            story_row("proj-0100", "Replaced"),
            story_row("proj-0200", "Also New"),
        ];
        write_jsonl_atomic(&path, &new_records).await.unwrap();

        let read_records: Vec<StoryRow> = read_jsonl(&path).await.unwrap();
        assert_eq!(new_records, read_records);
    }

    /// Verify atomic write with large dataset maintains integrity
    #[tokio::test]
    async fn atomic_write_large_dataset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("large.jsonl");

        let records: Vec<StoryRow> = (0..5000)
            .map(|i| StoryRow {
                id: format!("proj-{i:04x}"),
                title: format!("Story {i}"),
                done: i % 2 == 0,
            })
            .collect();

        write_jsonl_atomic(&path, &records).await.unwrap();

        let read_records: Vec<StoryRow> = read_jsonl(&path).await.unwrap();
        assert_eq!(records.len(), read_records.len());
        assert_eq!(records, read_records);
    }

    /// Verify atomic write with iterator works correctly
    #[tokio::test]
    async fn atomic_write_iter_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("iter.jsonl");

        // Use iterator directly without collecting
        let records_iter = (0..100).map(|i| StoryRow {
            id: format!("proj-{i:04x}"),
            title: format!("Iter {i}"),
            done: true,
        });

        write_jsonl_atomic_iter(&path, records_iter).await.unwrap();

        let read_records: Vec<StoryRow> = read_jsonl(&path).await.unwrap();
        assert_eq!(read_records.len(), 100);
        for (i, record) in read_records.iter().enumerate() {
            assert_eq!(record.title, format!("Iter {i}"));
        }
    }

    /// Verify temp file is not left behind after successful write
    #[tokio::test]
    async fn atomic_write_cleans_up_temp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cleanup.jsonl");
        let temp_path = dir.path().join("cleanup.jsonl.tmp");

        let records = vec![story_row("proj-0001", "Test")];
        write_jsonl_atomic(&path, &records).await.unwrap();

        assert!(path.exists(), "Target file should exist");
        assert!(
            !temp_path.exists(),
            "Temp file should not exist after success"
        );
    }

    /// Verify original file is preserved when the write target is invalid
    #[tokio::test]
    async fn atomic_write_preserves_original_on_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preserve.jsonl");

        let initial_records = vec![story_row("proj-002a", "Original")];
        write_jsonl_atomic(&path, &initial_records).await.unwrap();

        // Writing into a directory that does not exist must fail
        let invalid_path = dir.path().join("missing_dir").join("file.jsonl");
        let new_records = vec![story_row("proj-03e7", "ShouldNotExist")];

        let result = write_jsonl_atomic(&invalid_path, &new_records).await;
        assert!(result.is_err(), "Writing to invalid path should fail");

        let read_records: Vec<StoryRow> = read_jsonl(&path).await.unwrap();
        assert_eq!(initial_records, read_records);
    }

    /// Verify atomic write handles serialization failures correctly
    #[tokio::test]
    async fn atomic_write_fails_on_serialization_error() {
        // Custom type that always fails to serialize
        #[derive(Debug)]
        struct FailingRecord;

        impl Serialize for FailingRecord {
            fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                Err(serde::ser::Error::custom(
                    "intentional serialization failure",
                ))
            }
        }

        let dir = tempdir().unwrap();
        let path = dir.path().join("serialize_error.jsonl");

        let initial_records = vec![story_row("proj-012c", "Valid")];
        write_jsonl_atomic(&path, &initial_records).await.unwrap();

        let result = write_jsonl_atomic(&path, &[FailingRecord, FailingRecord]).await;
        assert!(
            result.is_err(),
            "Writing records with serialization errors should fail"
        );

        let err_msg = result.unwrap_err().to_string();
        assert!(
            err_msg.contains("intentional"),
            "Error should carry the serialization failure: {}",
            err_msg
        );

        // Original content untouched, temp file cleaned up
        let read_records: Vec<StoryRow> = read_jsonl(&path).await.unwrap();
        assert_eq!(initial_records, read_records);
        assert!(
            !dir.path().join("serialize_error.jsonl.tmp").exists(),
            "Temp file should be cleaned up after serialization failure"
        );
    }

    /// Verify unicode is preserved through atomic write
    #[tokio::test]
    async fn atomic_write_unicode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("unicode.jsonl");

        let records = vec![story_row(
            "proj-a3f8",
            "Hello, \u{4e16}\u{754c}! \u{1F600}",
        )];
        write_jsonl_atomic(&path, &records).await.unwrap();

        let read_records: Vec<StoryRow> = read_jsonl(&path).await.unwrap();
        assert_eq!(records, read_records);
    }
}

// ============================================================================
// read_jsonl convenience function tests
// ============================================================================

mod read_jsonl_integration {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn read_jsonl_loads_whole_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("whole.jsonl");
        tokio::fs::write(
            &path,
            "{\"id\":\"proj-0001\",\"title\":\"One\",\"done\":false}\n{\"id\":\"proj-0002\",\"title\":\"Two\",\"done\":true}\n",
        )
        .await
        .unwrap();

        let records: Vec<StoryRow> = read_jsonl(&path).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[1].done);
    }

    #[tokio::test]
    async fn read_jsonl_fails_on_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("does_not_exist.jsonl");

        let result: storygraph_jsonl::Result<Vec<StoryRow>> = read_jsonl(&path).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn read_jsonl_fails_on_first_bad_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        tokio::fs::write(
            &path,
            "{\"id\":\"proj-0001\",\"title\":\"One\",\"done\":false}\n{broken\n",
        )
        .await
        .unwrap();

        let result: storygraph_jsonl::Result<Vec<StoryRow>> = read_jsonl(&path).await;
        let err = result.unwrap_err();
        assert_eq!(err.line(), Some(2));
    }
}

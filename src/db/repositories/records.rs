use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use log::{debug, warn};
use rusqlite::{params, Row};

use crate::{
    db::{
        helpers::{format_timestamp, parse_timestamp},
        models::{EmotionRecord, ListedRecord},
        Database,
    },
    locale::{format_relative, Locale},
};

/// Raw column values; the timestamp is parsed separately so one bad row
/// does not poison the whole listing.
struct RawRecord {
    id: i64,
    label: String,
    timestamp: String,
    comment: String,
}

fn row_to_raw(row: &Row) -> rusqlite::Result<RawRecord> {
    Ok(RawRecord {
        id: row.get("id")?,
        label: row.get::<_, Option<String>>("text")?.unwrap_or_default(),
        timestamp: row.get::<_, Option<String>>("timestamp")?.unwrap_or_default(),
        // Databases created directly at v2 by older builds have no default here.
        comment: row.get::<_, Option<String>>("comments")?.unwrap_or_default(),
    })
}

fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

impl Database {
    /// Store a new tap with the current local time.
    pub async fn insert_record(&self, label: &str, comment: &str) -> Result<()> {
        self.insert_record_at(label, comment, now_local()).await
    }

    pub async fn insert_record_at(
        &self,
        label: &str,
        comment: &str,
        timestamp: NaiveDateTime,
    ) -> Result<()> {
        let label = label.to_string();
        let comment = comment.to_string();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO Records (text, comments, timestamp) VALUES (?1, ?2, ?3)",
                params![label, comment, format_timestamp(&timestamp)],
            )
            .with_context(|| "failed to insert record")?;
            Ok(())
        })
        .await
    }

    pub async fn delete_record(&self, record_id: i64) -> Result<()> {
        self.execute(move |conn| {
            let rows_affected = conn
                .execute("DELETE FROM Records WHERE id = ?1", params![record_id])
                .with_context(|| "failed to delete record")?;
            if rows_affected == 0 {
                debug!("delete ignored: record {record_id} does not exist");
            }
            Ok(())
        })
        .await
    }

    pub async fn update_comment(&self, record_id: i64, comment: &str) -> Result<()> {
        let comment = comment.to_string();
        self.execute(move |conn| {
            let rows_affected = conn
                .execute(
                    "UPDATE Records SET comments = ?1 WHERE id = ?2",
                    params![comment, record_id],
                )
                .with_context(|| "failed to update record comment")?;
            if rows_affected == 0 {
                debug!("comment update ignored: record {record_id} does not exist");
            }
            Ok(())
        })
        .await
    }

    /// Number of records whose label is exactly `label`.
    pub async fn count_label(&self, label: &str) -> Result<i64> {
        let label = label.to_string();
        self.execute(move |conn| {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM Records WHERE text = ?1",
                    params![label],
                    |row| row.get(0),
                )
                .with_context(|| "failed to count records")?;
            Ok(count)
        })
        .await
    }

    /// Counts for several labels in one trip to the worker, in input order.
    pub async fn count_labels(&self, labels: Vec<String>) -> Result<Vec<(String, i64)>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare("SELECT COUNT(*) FROM Records WHERE text = ?1")?;
            let mut counts = Vec::with_capacity(labels.len());
            for label in labels {
                let count: i64 = stmt
                    .query_row(params![label], |row| row.get(0))
                    .with_context(|| format!("failed to count records for '{label}'"))?;
                counts.push((label, count));
            }
            Ok(counts)
        })
        .await
    }

    /// Every record, newest first, with elapsed time rendered against the
    /// current clock.
    pub async fn list_records(&self, locale: Locale) -> Result<Vec<ListedRecord>> {
        self.list_records_at(now_local(), locale).await
    }

    pub async fn list_records_at(
        &self,
        now: NaiveDateTime,
        locale: Locale,
    ) -> Result<Vec<ListedRecord>> {
        let raw_records = self
            .execute(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, text, timestamp, comments
                     FROM Records
                     ORDER BY timestamp DESC, id DESC",
                )?;

                let mut rows = stmt.query([])?;
                let mut records = Vec::new();
                while let Some(row) = rows.next()? {
                    records.push(row_to_raw(row)?);
                }
                Ok(records)
            })
            .await?;

        let mut listed = Vec::with_capacity(raw_records.len());
        for raw in raw_records {
            let timestamp = match parse_timestamp(&raw.timestamp) {
                Ok(timestamp) => timestamp,
                Err(err) => {
                    warn!("skipping record {}: {err:#}", raw.id);
                    continue;
                }
            };

            listed.push(ListedRecord {
                relative_time: format_relative(timestamp, now, locale),
                record: EmotionRecord {
                    id: raw.id,
                    label: raw.label,
                    timestamp,
                    comment: raw.comment,
                },
            });
        }

        Ok(listed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::*;

    fn open() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Database::new(dir.path().join("moodtracker.sqlite3")).expect("db");
        (dir, db)
    }

    fn base_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .and_then(|d| d.and_hms_opt(9, 30, 0))
            .expect("valid datetime")
    }

    #[tokio::test]
    async fn inserted_record_heads_the_list_with_empty_comment() {
        let (_dir, db) = open();
        db.insert_record_at("Orgullo", "", base_time() - Duration::hours(1))
            .await
            .expect("older");
        db.insert_record("Miedo", "").await.expect("insert");

        let records = db.list_records(Locale::Es).await.expect("list");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].record.label, "Miedo");
        assert_eq!(records[0].record.comment, "");
        assert_eq!(records[1].record.label, "Orgullo");
    }

    #[tokio::test]
    async fn same_second_inserts_list_latest_first() {
        let (_dir, db) = open();
        let at = base_time();
        db.insert_record_at("Culpa", "", at).await.expect("first");
        db.insert_record_at("Rechazo", "", at).await.expect("second");

        let records = db.list_records_at(at, Locale::En).await.expect("list");
        let labels: Vec<_> = records.iter().map(|r| r.record.label.as_str()).collect();
        assert_eq!(labels, ["Rechazo", "Culpa"]);
    }

    #[tokio::test]
    async fn counts_only_exact_label_matches() {
        let (_dir, db) = open();
        for _ in 0..3 {
            db.insert_record("Miedo", "").await.expect("insert");
        }
        for label in ["Culpa", "miedo", "Miedo ", "Salvador"] {
            db.insert_record(label, "").await.expect("insert other");
        }

        assert_eq!(db.count_label("Miedo").await.expect("count"), 3);
        assert_eq!(db.count_label("Abandono").await.expect("count"), 0);

        let counts = db
            .count_labels(vec!["Salvador".into(), "Miedo".into(), "Víctima".into()])
            .await
            .expect("counts");
        assert_eq!(
            counts,
            vec![
                ("Salvador".to_string(), 1),
                ("Miedo".to_string(), 3),
                ("Víctima".to_string(), 0),
            ]
        );
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_record() {
        let (_dir, db) = open();
        let at = base_time();
        db.insert_record_at("Miedo", "a", at).await.expect("1");
        db.insert_record_at("Culpa", "b", at + Duration::seconds(1))
            .await
            .expect("2");
        db.insert_record_at("Rechazo", "c", at + Duration::seconds(2))
            .await
            .expect("3");

        let before = db.list_records_at(at, Locale::Es).await.expect("before");
        let target = before
            .iter()
            .find(|r| r.record.label == "Culpa")
            .map(|r| r.id())
            .expect("culpa row");

        db.delete_record(target).await.expect("delete");
        let after = db.list_records_at(at, Locale::Es).await.expect("after");

        let expected: Vec<_> = before.into_iter().filter(|r| r.id() != target).collect();
        assert_eq!(after, expected);
    }

    #[tokio::test]
    async fn missing_ids_are_ignored() {
        let (_dir, db) = open();
        db.insert_record_at("Miedo", "keep", base_time())
            .await
            .expect("insert");
        let before = db.list_records_at(base_time(), Locale::Es).await.expect("before");

        db.delete_record(9_999).await.expect("delete missing");
        db.update_comment(9_999, "nope").await.expect("update missing");

        let after = db.list_records_at(base_time(), Locale::Es).await.expect("after");
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let (_dir, db) = open();
        db.insert_record("Miedo", "").await.expect("first");
        let first = db.list_records(Locale::Es).await.expect("list")[0].id();
        db.delete_record(first).await.expect("delete");

        db.insert_record("Miedo", "").await.expect("second");
        let second = db.list_records(Locale::Es).await.expect("list")[0].id();
        assert!(second > first);
    }

    #[tokio::test]
    async fn round_trips_label_and_comment() {
        let (_dir, db) = open();
        db.insert_record("Miedo", "abc").await.expect("insert");

        let records = db.list_records(Locale::Es).await.expect("list");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].record.label, "Miedo");
        assert_eq!(records[0].record.comment, "abc");
        assert!(!records[0].relative_time.is_empty());
    }

    #[tokio::test]
    async fn quotes_are_stored_verbatim() {
        let (_dir, db) = open();
        let label = "O'Brien\"); DROP TABLE Records; --";
        db.insert_record(label, "it's 'quoted'").await.expect("insert");

        let records = db.list_records(Locale::En).await.expect("list");
        assert_eq!(records[0].record.label, label);
        assert_eq!(records[0].record.comment, "it's 'quoted'");
        assert_eq!(db.count_label(label).await.expect("count"), 1);

        db.update_comment(records[0].id(), "a'b").await.expect("update");
        let records = db.list_records(Locale::En).await.expect("list");
        assert_eq!(records[0].record.comment, "a'b");
    }

    #[tokio::test]
    async fn relative_time_is_computed_at_read_time() {
        let (_dir, db) = open();
        let at = base_time();
        db.insert_record_at("Culpa", "", at).await.expect("insert");

        let first = db
            .list_records_at(at + Duration::minutes(3), Locale::En)
            .await
            .expect("list");
        let later = db
            .list_records_at(at + Duration::hours(2), Locale::En)
            .await
            .expect("list");

        assert_eq!(first[0].relative_time, "3 minutes ago");
        assert_eq!(later[0].relative_time, "2 hours ago");
    }

    #[tokio::test]
    async fn malformed_timestamps_are_skipped() {
        let (_dir, db) = open();
        db.insert_record_at("Miedo", "", base_time()).await.expect("good");
        db.execute(|conn| {
            conn.execute(
                "INSERT INTO Records (text, timestamp, comments) VALUES ('Culpa', '10/01/2024 9:30', '')",
                [],
            )?;
            conn.execute(
                "INSERT INTO Records (text, timestamp, comments) VALUES ('Rechazo', NULL, NULL)",
                [],
            )?;
            Ok(())
        })
        .await
        .expect("bad rows");

        let records = db.list_records_at(base_time(), Locale::Es).await.expect("list");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].record.label, "Miedo");
        // Skipped rows still count: counting never parses timestamps.
        assert_eq!(db.count_label("Culpa").await.expect("count"), 1);
    }

    #[tokio::test]
    async fn null_comments_read_as_empty() {
        let (_dir, db) = open();
        db.execute(|conn| {
            conn.execute(
                "INSERT INTO Records (text, timestamp, comments) VALUES ('Salvador', '2024-01-10 09:00:00', NULL)",
                [],
            )?;
            Ok(())
        })
        .await
        .expect("raw insert");

        let records = db.list_records_at(base_time(), Locale::Es).await.expect("list");
        assert_eq!(records[0].record.comment, "");
        assert_eq!(records[0].relative_time, "hace 30 minutos");
    }
}

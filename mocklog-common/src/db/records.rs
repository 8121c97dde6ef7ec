//! Append-only record store
//!
//! Records are never updated or deleted. Reads return insertion order.

use crate::record::{Difficulty, Record, Remark, YesNo};
use crate::{Error, Result};
use chrono::NaiveDate;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

type RecordRow = (
    i64,
    Option<String>,
    i64,
    String,
    String,
    Option<String>,
    String,
    String,
);

const SELECT_RECORDS: &str = "SELECT test_no, date, q_no, chapter, attempted, correct, difficulty, remarks FROM records";

/// Append one validated record
pub async fn append_record(pool: &SqlitePool, record: &Record) -> Result<()> {
    let mut tx = pool.begin().await?;
    insert(&mut tx, record).await?;
    tx.commit().await?;

    debug!(test_no = record.test_no, q_no = record.q_no, chapter = %record.chapter, "Appended record");
    Ok(())
}

/// Append a batch atomically: either every record is stored or none
pub async fn append_records(pool: &SqlitePool, records: &[Record]) -> Result<()> {
    let mut tx = pool.begin().await?;
    for record in records {
        insert(&mut tx, record).await?;
    }
    tx.commit().await?;

    debug!(count = records.len(), "Appended record batch");
    Ok(())
}

async fn insert(tx: &mut Transaction<'_, Sqlite>, record: &Record) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO records (test_no, date, q_no, chapter, attempted, correct, difficulty, remarks)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.test_no)
    .bind(record.date.map(|d| d.format("%Y-%m-%d").to_string()))
    .bind(record.q_no)
    .bind(record.chapter.as_str())
    .bind(record.attempted.as_str())
    .bind(record.correct.map(|c| c.as_str()))
    .bind(record.difficulty.as_str())
    .bind(record.remarks.as_str())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Every stored record in insertion order
pub async fn load_all_records(pool: &SqlitePool) -> Result<Vec<Record>> {
    let rows: Vec<RecordRow> = sqlx::query_as(&format!("{} ORDER BY id", SELECT_RECORDS))
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(row_to_record).collect()
}

/// Records belonging to one test, in insertion order
pub async fn load_records_for_test(pool: &SqlitePool, test_no: i64) -> Result<Vec<Record>> {
    let rows: Vec<RecordRow> =
        sqlx::query_as(&format!("{} WHERE test_no = ? ORDER BY id", SELECT_RECORDS))
            .bind(test_no)
            .fetch_all(pool)
            .await?;

    rows.into_iter().map(row_to_record).collect()
}

pub async fn count_records(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM records")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

fn row_to_record(row: RecordRow) -> Result<Record> {
    let (test_no, date, q_no, chapter, attempted, correct, difficulty, remarks) = row;

    let date = match date {
        Some(text) => Some(
            NaiveDate::parse_from_str(&text, "%Y-%m-%d")
                .map_err(|e| Error::Internal(format!("Stored date {:?} is invalid: {}", text, e)))?,
        ),
        None => None,
    };

    let correct = match correct {
        Some(text) => Some(stored_label(YesNo::parse_label(&text), "correct", &text)?),
        None => None,
    };

    Ok(Record {
        test_no,
        date,
        q_no,
        chapter,
        attempted: stored_label(YesNo::parse_label(&attempted), "attempted", &attempted)?,
        correct,
        difficulty: stored_label(Difficulty::parse_label(&difficulty), "difficulty", &difficulty)?,
        remarks: stored_label(Remark::parse_label(&remarks), "remarks", &remarks)?,
    })
}

fn stored_label<T>(parsed: Option<T>, column: &str, raw: &str) -> Result<T> {
    parsed.ok_or_else(|| Error::Internal(format!("Stored {} value {:?} is invalid", column, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory_database;

    fn sample(test_no: i64, q_no: i64, chapter: &str) -> Record {
        Record {
            test_no,
            date: NaiveDate::from_ymd_opt(2024, 6, 1),
            q_no,
            chapter: chapter.to_string(),
            attempted: YesNo::Yes,
            correct: Some(YesNo::Yes),
            difficulty: Difficulty::Easy,
            remarks: Remark::Analytical,
        }
    }

    #[tokio::test]
    async fn test_append_and_load_round_trip() {
        let pool = init_memory_database().await.unwrap();

        let mut unknown = sample(2, 5, "Average");
        unknown.date = None;
        unknown.attempted = YesNo::No;
        unknown.correct = None;
        unknown.remarks = Remark::Skipped;

        append_record(&pool, &sample(1, 1, "Algebra")).await.unwrap();
        append_record(&pool, &unknown).await.unwrap();

        let records = load_all_records(&pool).await.unwrap();
        assert_eq!(records, vec![sample(1, 1, "Algebra"), unknown]);
    }

    #[tokio::test]
    async fn test_load_records_for_test_filters() {
        let pool = init_memory_database().await.unwrap();
        append_records(
            &pool,
            &[sample(1, 1, "Algebra"), sample(2, 1, "Geometry"), sample(1, 2, "Average")],
        )
        .await
        .unwrap();

        let records = load_records_for_test(&pool, 1).await.unwrap();
        let chapters: Vec<&str> = records.iter().map(|r| r.chapter.as_str()).collect();
        assert_eq!(chapters, vec!["Algebra", "Average"]);
        assert_eq!(count_records(&pool).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_failed_batch_writes_nothing() {
        let pool = init_memory_database().await.unwrap();
        // q_no 30 violates the table CHECK constraint
        let result = append_records(&pool, &[sample(1, 1, "Algebra"), sample(1, 30, "Algebra")]).await;

        assert!(matches!(result, Err(Error::Database(_))));
        assert_eq!(count_records(&pool).await.unwrap(), 0);
    }
}

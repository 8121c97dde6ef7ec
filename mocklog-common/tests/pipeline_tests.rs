//! End-to-end tests: import → store → statistics → export

use mocklog_common::db::{init_memory_database, load_all_records};
use mocklog_common::export::records_to_csv;
use mocklog_common::import::{import_file, prepare_import};
use mocklog_common::stats::compute;
use mocklog_common::{ChapterKeywordTable, ColumnAliasTable, Error};

const MIXED_IMPORT: &str = "\
Test Number,DATE,Q#,Topic,Attempted,Is Correct,Level,Comment,Source
1,2024-03-01,1,algebra,Yes,Yes,Easy,Analytical,book
1,2024-03-01,2,Co-ordinate geometry,Yes,No,Hard,Silly mistake,book
1,03/01/2024,3,circles,No,,Medium,Skipped,book
2,not-a-date,1,compound interest,Yes,Yes,Medium,Analytical,mock
2,2024-03-08,2,boats and streams,No,No,Hard,Skipped,mock
2,2024-03-08,3,Algebra basics,Yes,Yes,Easy,Analytical,mock
2,2024-03-08,4,Percent problems,Yes,No,Medium,Silly mistake,mock
";

/// Ten Algebra questions: 6 attempted (4 right, 2 wrong), 4 unattempted with
/// one of those remarked Skipped
const ALGEBRA_SCENARIO: &str = "\
Test No.,Date,Q No.,Chapter,Attempted,Correct,Difficulty,Remarks
1,2024-01-01,1,Algebra,Yes,Yes,Easy,Analytical
1,2024-01-01,2,Algebra,Yes,Yes,Easy,Analytical
1,2024-01-01,3,Algebra,Yes,Yes,Medium,Analytical
1,2024-01-01,4,Algebra,Yes,Yes,Medium,Analytical
1,2024-01-01,5,Algebra,Yes,No,Hard,Silly mistake
1,2024-01-01,6,Algebra,Yes,No,Hard,Analytical
1,2024-01-01,7,Algebra,No,,Hard,Skipped
1,2024-01-01,8,Algebra,No,,Hard,Analytical
1,2024-01-01,9,Algebra,No,,Medium,Analytical
1,2024-01-01,10,Algebra,No,,Easy,Silly mistake
";

#[tokio::test]
async fn test_topic_share_sums_to_one_hundred() {
    let pool = init_memory_database().await.unwrap();
    let chapters = ChapterKeywordTable::builtin();
    let aliases = ColumnAliasTable::builtin();

    let summary = import_file(&pool, "mixed.csv", MIXED_IMPORT.as_bytes(), &chapters, &aliases)
        .await
        .unwrap();
    assert_eq!(summary.rows_imported, 7);
    assert_eq!(summary.unknown_dates, 1);

    let records = load_all_records(&pool).await.unwrap();
    let stats = compute(&records);

    let names: Vec<&str> = stats.iter().map(|s| s.chapter.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Algebra",
            "Co-ordinate Geometry",
            "Geometry(Circles)",
            "SI/CI",
            "Boats&Streams",
            "Percentages,Profit &Loss",
        ]
    );

    let total: f64 = stats.iter().map(|s| s.topic_pct).sum();
    assert!((total - 100.0).abs() < 0.05, "topic share sums to {}", total);
}

#[tokio::test]
async fn test_algebra_scenario_metrics() {
    let pool = init_memory_database().await.unwrap();
    import_file(
        &pool,
        "algebra.csv",
        ALGEBRA_SCENARIO.as_bytes(),
        &ChapterKeywordTable::builtin(),
        &ColumnAliasTable::builtin(),
    )
    .await
    .unwrap();

    let stats = compute(&load_all_records(&pool).await.unwrap());
    assert_eq!(stats.len(), 1);

    let algebra = &stats[0];
    assert_eq!(algebra.chapter, "Algebra");
    assert_eq!(algebra.total_questions, 10);
    assert_eq!(algebra.attempted, 6);
    assert_eq!(algebra.correct, 4);
    assert_eq!(algebra.incorrect, 2);
    assert_eq!(algebra.unattempted, 4);
    assert_eq!(algebra.accuracy_pct, 66.67);
    assert_eq!(algebra.score, -2);
    assert_eq!(algebra.score_pct, -10.0);
    assert_eq!(algebra.unattempted_rate_pct, 40.0);
    assert_eq!(algebra.skipped_pct, 25.0);
    assert_eq!(algebra.topic_pct, 100.0);
}

#[tokio::test]
async fn test_unattempted_marked_incorrect_counts_twice() {
    let pool = init_memory_database().await.unwrap();
    let csv = "\
Test No.,Date,Q No.,Chapter,Attempted,Correct,Difficulty,Remarks
1,2024-01-01,1,Average,No,No,Easy,Skipped
";
    import_file(
        &pool,
        "quirk.csv",
        csv.as_bytes(),
        &ChapterKeywordTable::builtin(),
        &ColumnAliasTable::builtin(),
    )
    .await
    .unwrap();

    let stats = compute(&load_all_records(&pool).await.unwrap());
    assert_eq!(stats[0].unattempted, 1);
    assert_eq!(stats[0].incorrect, 1);
}

#[tokio::test]
async fn test_rejected_import_writes_nothing() {
    let pool = init_memory_database().await.unwrap();
    let csv = "\
Test No.,Date,Q No.,Chapter,Attempted,Correct,Difficulty,Remarks
1,2024-01-01,1,Algebra,Yes,Yes,Easy,Analytical
1,2024-01-01,2,Underwater basket weaving,Yes,Yes,Easy,Analytical
";
    let result = import_file(
        &pool,
        "bad.csv",
        csv.as_bytes(),
        &ChapterKeywordTable::builtin(),
        &ColumnAliasTable::builtin(),
    )
    .await;

    assert!(matches!(result, Err(Error::InvalidRows(_))));
    assert!(load_all_records(&pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_export_reimports_identically() {
    let pool = init_memory_database().await.unwrap();
    let chapters = ChapterKeywordTable::builtin();
    let aliases = ColumnAliasTable::builtin();
    import_file(&pool, "mixed.csv", MIXED_IMPORT.as_bytes(), &chapters, &aliases)
        .await
        .unwrap();

    let original = load_all_records(&pool).await.unwrap();
    let exported = records_to_csv(&original).unwrap();

    let batch = prepare_import("export.csv", &exported, &chapters, &aliases).unwrap();
    assert_eq!(batch.records, original);
}

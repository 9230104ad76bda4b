use sentiment_bootstrap::seed::{SEED_SCORES, SEED_TEXT};
use sentiment_bootstrap::{BootstrapError, Initializer, SeedOutcome, Step, COMPLETION_MESSAGE};
use sentiment_db::MemoryConnection;
use sentiment_kernel::index::analysis_indexes;
use sentiment_kernel::settings::SeedPolicy;
use sentiment_kernel::{AnalysisFilter, AnalysisRecord, CollectionState, Connection, Scores};
use time::{Duration, OffsetDateTime};

const DATABASE: &str = "sentiment_analysis";
const COLLECTION: &str = "analyses";

fn initializer() -> Initializer {
    Initializer::new(DATABASE, COLLECTION)
}

fn at(secs: i64) -> OffsetDateTime {
    OffsetDateTime::UNIX_EPOCH + Duration::seconds(1_744_243_200 + secs)
}

#[tokio::test]
async fn fresh_database_ends_with_one_collection_two_indexes_and_the_seed() {
    let conn = MemoryConnection::new();
    let mut out = Vec::new();

    let report = initializer().run_at(&conn, &mut out, at(0)).await.unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), format!("{COMPLETION_MESSAGE}\n"));
    assert_eq!(report.collection_state, CollectionState::Created);
    assert_eq!(report.indexes, vec!["timestamp_-1", "scores.compound_1"]);
    assert!(matches!(report.seed, SeedOutcome::Inserted { .. }));

    let db = conn.database(DATABASE);
    assert_eq!(db.collection_names().await.unwrap(), vec![COLLECTION]);
    let indexes = db.index_names(COLLECTION).await.unwrap();
    for spec in analysis_indexes() {
        assert!(indexes.contains(&spec.name()));
    }

    let seeds = db
        .find_analyses(COLLECTION, &AnalysisFilter::with_text(SEED_TEXT))
        .await
        .unwrap();
    assert_eq!(seeds.len(), 1);
    assert_eq!(seeds[0].record.scores, SEED_SCORES);
    assert_eq!(seeds[0].record.color, "green");
    assert_eq!(seeds[0].record.timestamp, at(0));
}

#[tokio::test]
async fn second_run_keeps_indexes_and_adds_a_second_seed() {
    let conn = MemoryConnection::new();
    let init = initializer();

    init.run_at(&conn, &mut Vec::new(), at(0)).await.unwrap();
    let second = init.run_at(&conn, &mut Vec::new(), at(5)).await.unwrap();

    assert_eq!(second.collection_state, CollectionState::AlreadyExisted);

    let db = conn.database(DATABASE);
    assert_eq!(
        db.index_names(COLLECTION).await.unwrap(),
        vec!["_id_", "timestamp_-1", "scores.compound_1"]
    );

    let seeds = db
        .find_analyses(COLLECTION, &AnalysisFilter::with_text(SEED_TEXT))
        .await
        .unwrap();
    assert_eq!(seeds.len(), 2);
    assert_eq!(seeds[0].record.scores, seeds[1].record.scores);
    assert_eq!(seeds[0].record.interpretation, seeds[1].record.interpretation);
    assert_ne!(seeds[0].record.timestamp, seeds[1].record.timestamp);
    assert_ne!(seeds[0].id, seeds[1].id);
}

#[tokio::test]
async fn unreachable_server_fails_before_any_write() {
    let conn = MemoryConnection::new();
    conn.set_reachable(false);
    let mut out = Vec::new();

    let err = initializer()
        .run_at(&conn, &mut out, at(0))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BootstrapError::Store {
            step: Step::SelectDatabase,
            ..
        }
    ));
    assert_eq!(err.code(), "connectivity_error");
    assert!(out.is_empty());

    conn.set_reachable(true);
    let db = conn.database(DATABASE);
    assert!(db.collection_names().await.unwrap().is_empty());
    assert!(db.index_names(COLLECTION).await.unwrap().is_empty());
}

#[tokio::test]
async fn existing_collection_and_indexes_are_tolerated() {
    let conn = MemoryConnection::new();
    let db = conn.database(DATABASE);
    db.ensure_collection(COLLECTION).await.unwrap();
    for spec in analysis_indexes() {
        db.ensure_index(COLLECTION, &spec).await.unwrap();
    }
    let mut out = Vec::new();

    let report = initializer().run_at(&conn, &mut out, at(0)).await.unwrap();

    assert_eq!(report.collection_state, CollectionState::AlreadyExisted);
    assert!(String::from_utf8(out).unwrap().contains(COMPLETION_MESSAGE));
}

#[tokio::test]
async fn rejected_writes_surface_as_persistence_errors_without_completion() {
    let conn = MemoryConnection::new();
    conn.set_writable(false);
    let mut out = Vec::new();

    let err = initializer()
        .run_at(&conn, &mut out, at(0))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BootstrapError::Store {
            step: Step::EnsureCollection,
            ..
        }
    ));
    assert_eq!(err.exit_code(), 74);
    assert!(out.is_empty());
}

#[tokio::test]
async fn if_missing_policy_inserts_only_once() {
    let conn = MemoryConnection::new();
    let init = initializer().with_seed_policy(SeedPolicy::IfMissing);

    let first = init.run_at(&conn, &mut Vec::new(), at(0)).await.unwrap();
    let second = init.run_at(&conn, &mut Vec::new(), at(5)).await.unwrap();

    let SeedOutcome::Inserted { id } = first.seed else {
        panic!("first run must insert the seed");
    };
    assert_eq!(second.seed, SeedOutcome::AlreadyPresent { id });

    let seeds = conn
        .database(DATABASE)
        .find_analyses(COLLECTION, &AnalysisFilter::with_text(SEED_TEXT))
        .await
        .unwrap();
    assert_eq!(seeds.len(), 1);
}

#[tokio::test]
async fn if_missing_policy_ignores_user_analyses_of_the_seed_sentence() {
    let conn = MemoryConnection::new();
    let db = conn.database(DATABASE);
    db.ensure_collection(COLLECTION).await.unwrap();
    let user_id = db
        .insert_analysis(
            COLLECTION,
            &AnalysisRecord::classified(SEED_TEXT, Scores::new(0.5, 0.0, 0.5, 0.4), at(0)),
        )
        .await
        .unwrap();

    let report = initializer()
        .with_seed_policy(SeedPolicy::IfMissing)
        .run_at(&conn, &mut Vec::new(), at(5))
        .await
        .unwrap();

    let SeedOutcome::Inserted { id } = report.seed else {
        panic!("a differently scored record must not stand in for the seed");
    };
    assert_ne!(id, user_id);

    let same_text = db
        .find_analyses(COLLECTION, &AnalysisFilter::with_text(SEED_TEXT))
        .await
        .unwrap();
    assert_eq!(same_text.len(), 2);
    assert_eq!(same_text[0].record.scores, SEED_SCORES);
    assert_eq!(same_text[1].record.color, "blue");
}

#[tokio::test]
async fn never_policy_prepares_schema_without_seed() {
    let conn = MemoryConnection::new();
    let mut out = Vec::new();

    let report = initializer()
        .with_seed_policy(SeedPolicy::Never)
        .run_at(&conn, &mut out, at(0))
        .await
        .unwrap();

    assert_eq!(report.seed, SeedOutcome::Disabled);
    assert_eq!(report.indexes.len(), 2);
    assert!(conn
        .database(DATABASE)
        .find_analyses(COLLECTION, &AnalysisFilter::default())
        .await
        .unwrap()
        .is_empty());
    assert!(!out.is_empty());
}

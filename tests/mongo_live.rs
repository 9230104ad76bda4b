//! Runs against a real deployment: `SENTIMENT_TEST_MONGODB_URI=mongodb://... cargo test -- --ignored`

use sentiment_bootstrap::seed::SEED_TEXT;
use sentiment_bootstrap::{Initializer, SeedOutcome};
use sentiment_kernel::settings::DatabaseSettings;
use sentiment_kernel::{AnalysisRepository, CollectionState};

#[tokio::test]
#[ignore = "needs a running MongoDB"]
async fn bootstrap_against_live_mongodb_is_rerunnable() {
    let Ok(uri) = std::env::var("SENTIMENT_TEST_MONGODB_URI") else {
        eprintln!("SENTIMENT_TEST_MONGODB_URI not set; skipping");
        return;
    };
    let database = format!(
        "sentiment_bootstrap_test_{}",
        time::OffsetDateTime::now_utc().unix_timestamp_nanos()
    );
    let settings = DatabaseSettings {
        uri,
        name: database.clone(),
        server_selection_timeout_ms: 5_000,
        ..DatabaseSettings::default()
    };
    let conn = sentiment_db::connect(&settings).await.unwrap();
    let init = Initializer::new(&database, "analyses");

    let first = init.run(conn.as_ref(), &mut Vec::new()).await.unwrap();
    let second = init.run(conn.as_ref(), &mut Vec::new()).await.unwrap();

    assert_eq!(first.collection_state, CollectionState::Created);
    // Either state is a success; what matters is that the collection is there.
    assert!(matches!(
        second.collection_state,
        CollectionState::AlreadyExisted | CollectionState::Created
    ));
    assert!(matches!(second.seed, SeedOutcome::Inserted { .. }));

    let db = conn.database(&database);
    assert!(db.collection_names().await.unwrap().contains(&"analyses".to_string()));
    let indexes = db.index_names("analyses").await.unwrap();
    assert!(indexes.contains(&"timestamp_-1".to_string()));
    assert!(indexes.contains(&"scores.compound_1".to_string()));

    let repository = AnalysisRepository::new(db, "analyses");
    let seeds = repository.analyses_with_text(SEED_TEXT).await.unwrap();
    assert_eq!(seeds.len(), 2);
    assert_ne!(seeds[0].record.timestamp, seeds[1].record.timestamp);
}

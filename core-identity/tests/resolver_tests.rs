//! End-to-end resolution against in-memory catalogs.

use async_trait::async_trait;
use core_identity::{
    ArtistResolver, CatalogClient, IdentityError, RawRecord, ResolutionPath, Result, Strategy,
    StrategyStatus, MAX_RANKED_RESULTS,
};
use mockall::mock;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

mock! {
    pub Catalog {}

    #[async_trait::async_trait]
    impl CatalogClient for Catalog {
        async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawRecord>>;
    }
}

/// Answers from a query → records table, empty for anything else.
#[derive(Default)]
struct ScriptedCatalog {
    responses: HashMap<String, Vec<RawRecord>>,
    calls: Mutex<Vec<(String, usize)>>,
}

impl ScriptedCatalog {
    fn with(mut self, query: &str, records: Vec<RawRecord>) -> Self {
        self.responses.insert(query.to_string(), records);
        self
    }

    fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogClient for ScriptedCatalog {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawRecord>> {
        self.calls.lock().unwrap().push((query.to_string(), limit));
        Ok(self.responses.get(query).cloned().unwrap_or_default())
    }
}

fn artist(id: &str, name: &str, kind: &str, score: u32, begin: Option<&str>) -> RawRecord {
    let mut value = json!({ "id": id, "name": name, "type": kind, "score": score });
    if let Some(begin) = begin {
        value["life-span"] = json!({ "begin": begin });
    }
    RawRecord::from(value)
}

#[tokio::test]
async fn test_exact_match_ranks_first() {
    let radiohead = artist("rh", "Radiohead", "Group", 100, Some("1985"));
    let catalog = Arc::new(
        ScriptedCatalog::default()
            .with("\"Radiohead\"", vec![radiohead.clone()])
            .with("artist:\"Radiohead\"", vec![radiohead.clone()])
            .with("Radiohead", vec![radiohead]),
    );
    let resolver = ArtistResolver::new(catalog.clone());

    let resolution = resolver.resolve_detailed("Radiohead").await;

    assert_eq!(resolution.path, ResolutionPath::Strategies);
    assert_eq!(resolution.candidates.len(), 1);
    let best = resolution.best().unwrap();
    assert_eq!(best.external_id.as_deref(), Some("rh"));
    assert_eq!(best.catalog_score, 120);
    assert_eq!(best.relevance_score, Some(105));
    assert_eq!(best.formed_year, Some(1985));

    assert_eq!(
        catalog.calls(),
        vec![
            ("\"Radiohead\"".to_string(), 5),
            ("artist:\"Radiohead\"".to_string(), 5),
            ("Radiohead".to_string(), 8),
        ]
    );
}

#[tokio::test]
async fn test_field_scoped_retries_unquoted() {
    let catalog = Arc::new(ScriptedCatalog::default().with(
        "artist:Godspeed You",
        vec![artist("gy", "Godspeed You! Black Emperor", "Group", 90, None)],
    ));
    let resolver = ArtistResolver::new(catalog.clone());

    let resolution = resolver.resolve_detailed("Godspeed You").await;

    let queries: Vec<String> = catalog.calls().into_iter().map(|(q, _)| q).collect();
    assert_eq!(
        queries,
        vec![
            "\"Godspeed You\"",
            "artist:\"Godspeed You\"",
            "artist:Godspeed You",
            "Godspeed You",
        ]
    );
    assert_eq!(resolution.candidates[0].catalog_score, 100);
    assert_eq!(
        resolution.strategies[1].status,
        StrategyStatus::Collected { count: 1 }
    );
}

#[tokio::test]
async fn test_later_strategies_gated_by_collected_count() {
    let mut catalog = MockCatalog::new();
    catalog
        .expect_search()
        .times(1)
        .returning(|_, limit| {
            assert_eq!(limit, 5);
            Ok((0..5)
                .map(|i| artist(&format!("bh-{i}"), "Beach House", "Group", 100 - i, None))
                .collect())
        });

    let resolution = ArtistResolver::new(Arc::new(catalog))
        .resolve_detailed("Beach House")
        .await;

    let statuses: Vec<(Strategy, StrategyStatus)> = resolution
        .strategies
        .into_iter()
        .map(|report| (report.strategy, report.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            (Strategy::Exact, StrategyStatus::Collected { count: 5 }),
            (Strategy::FieldScoped, StrategyStatus::Skipped),
            (Strategy::Basic, StrategyStatus::Skipped),
        ]
    );
    assert_eq!(resolution.candidates.len(), 5);
}

#[tokio::test]
async fn test_running_count_includes_duplicates() {
    // 2 from Exact + the same 2 from FieldScoped = 4 collected, so Basic is skipped
    let records = vec![
        artist("a", "Low", "Group", 100, None),
        artist("b", "Low Roar", "Group", 60, None),
    ];
    let catalog = Arc::new(
        ScriptedCatalog::default()
            .with("\"Low\"", records.clone())
            .with("artist:\"Low\"", records)
            .with("Low", vec![artist("c", "Lowlands", "Group", 50, None)]),
    );

    let resolution = ArtistResolver::new(catalog.clone()).resolve_detailed("Low").await;

    assert_eq!(catalog.calls().len(), 2);
    assert_eq!(resolution.strategies[2].status, StrategyStatus::Skipped);
    let ids: Vec<&str> = resolution
        .candidates
        .iter()
        .filter_map(|c| c.external_id.as_deref())
        .collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn test_relaxed_threshold_keeps_weak_single_match() {
    let query = "alpha beta gamma delta epsilon";
    let catalog = Arc::new(
        ScriptedCatalog::default().with(query, vec![artist("bo", "beta omega", "", 30, None)]),
    );

    let candidates = ArtistResolver::new(catalog).resolve(query).await;

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].relevance_score, Some(12));
}

#[tokio::test]
async fn test_irrelevant_pool_keeps_top_three_by_catalog_score() {
    let catalog = Arc::new(ScriptedCatalog::default().with(
        "\"Radiohead\"",
        vec![
            artist("ma", "Massive Attack", "Group", 90, None),
            artist("tr", "Tricky", "Person", 70, None),
            artist("ph", "Portishead", "Group", 80, None),
            artist("bu", "Burial", "Person", 60, None),
        ],
    ));

    let candidates = ArtistResolver::new(catalog).resolve("Radiohead").await;

    let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Massive Attack", "Portishead", "Tricky"]);
    assert!(candidates.iter().all(|c| c.relevance_score == Some(0)));
}

#[tokio::test]
async fn test_catalog_score_breaks_relevance_tie() {
    let catalog = Arc::new(ScriptedCatalog::default().with(
        "\"Nirvana\"",
        vec![
            artist("uk", "Nirvana", "Group", 60, Some("1965")),
            artist("us", "Nirvana", "Group", 100, Some("1987")),
        ],
    ));

    let candidates = ArtistResolver::new(catalog).resolve("Nirvana").await;

    let ids: Vec<&str> = candidates
        .iter()
        .filter_map(|c| c.external_id.as_deref())
        .collect();
    assert_eq!(ids, vec!["us", "uk"]);
    assert_eq!(candidates[0].relevance_score, candidates[1].relevance_score);
}

#[tokio::test]
async fn test_output_is_bounded_and_unique() {
    let flood: Vec<RawRecord> = (0..25)
        .map(|i| artist(&format!("s-{}", i % 20), "Sun", "Person", 50 + i, None))
        .collect();
    let catalog = Arc::new(ScriptedCatalog::default().with("\"Sun\"", flood));

    let candidates = ArtistResolver::new(catalog).resolve("Sun").await;

    assert_eq!(candidates.len(), MAX_RANKED_RESULTS);
    let ids: HashSet<&str> = candidates
        .iter()
        .filter_map(|c| c.external_id.as_deref())
        .collect();
    assert_eq!(ids.len(), candidates.len());
}

#[tokio::test]
async fn test_fallback_used_when_strategies_collect_nothing() {
    let mut catalog = MockCatalog::new();
    catalog
        .expect_search()
        .withf(|_, limit| *limit != 10)
        .times(4)
        .returning(|_, _| Err(IdentityError::CatalogUnavailable("flaky".to_string())));
    catalog
        .expect_search()
        .withf(|query, limit| query.starts_with("Aphex") && *limit == 10)
        .times(1)
        .returning(|_, _| {
            Ok(vec![
                artist("at-2", "AFX", "Person", 40, None),
                artist("at-1", "Aphex Twin", "Person", 100, None),
            ])
        });

    let resolution = ArtistResolver::new(Arc::new(catalog))
        .resolve_detailed("Aphex Twin")
        .await;

    assert_eq!(resolution.path, ResolutionPath::FallbackSearch);
    let names: Vec<&str> = resolution.candidates.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Aphex Twin", "AFX"]);
    assert_eq!(resolution.candidates[0].catalog_score, 100);
    assert!(resolution
        .strategies
        .iter()
        .all(|report| matches!(report.status, StrategyStatus::Failed { .. })));
}

#[tokio::test]
async fn test_failing_catalog_yields_empty() {
    let mut catalog = MockCatalog::new();
    catalog
        .expect_search()
        .times(5)
        .returning(|_, _| Err(IdentityError::CatalogUnavailable("down".to_string())));

    let resolution = ArtistResolver::new(Arc::new(catalog))
        .resolve_detailed("Boards of Canada")
        .await;

    assert!(resolution.is_empty());
    assert_eq!(resolution.path, ResolutionPath::Empty);
}

#[tokio::test]
async fn test_unusual_names_never_fail() {
    let catalog = Arc::new(ScriptedCatalog::default());
    let resolver = ArtistResolver::new(catalog.clone());

    for name in ["Sigur Rós", "坂本龍一", "\"quoted\\\"", "AC/DC", "!!!", ""] {
        assert!(resolver.resolve(name).await.is_empty());
    }

    assert!(catalog
        .calls()
        .iter()
        .any(|(query, _)| query == "\"\\\"quoted\\\\\\\"\""));
}

#[tokio::test]
async fn test_repeated_resolution_is_identical() {
    let catalog = Arc::new(
        ScriptedCatalog::default()
            .with(
                "\"The National\"",
                vec![
                    artist("tn", "The National", "Group", 100, Some("1999")),
                    artist("nt", "National Health", "Group", 55, Some("1975")),
                ],
            )
            .with("The National", vec![artist("tn", "The National", "Group", 100, None)]),
    );
    let resolver = ArtistResolver::new(catalog);

    let first = serde_json::to_value(resolver.resolve_detailed("The National").await).unwrap();
    let second = serde_json::to_value(resolver.resolve_detailed("The National").await).unwrap();

    assert_eq!(first, second);
}

struct SlowExactCatalog;

#[async_trait]
impl CatalogClient for SlowExactCatalog {
    async fn search(&self, query: &str, _limit: usize) -> Result<Vec<RawRecord>> {
        if query.starts_with('"') {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        Ok(vec![artist("sl", "Slowdive", "Group", 100, Some("1989"))])
    }
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_strategy_is_skipped_over() {
    let resolver =
        ArtistResolver::new(Arc::new(SlowExactCatalog)).with_call_timeout(Duration::from_secs(5));

    let resolution = resolver.resolve_detailed("Slowdive").await;

    assert!(matches!(
        resolution.strategies[0].status,
        StrategyStatus::Failed { .. }
    ));
    assert_eq!(resolution.candidates.len(), 1);
    assert_eq!(resolution.candidates[0].catalog_score, 110);
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_mid_call_returns_promptly() {
    let token = CancellationToken::new();
    let resolver = ArtistResolver::new(Arc::new(SlowExactCatalog)).with_cancellation(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        token.cancel();
    });

    let start = tokio::time::Instant::now();
    let resolution = resolver.resolve_detailed("Slowdive").await;
    canceller.await.unwrap();

    assert!(start.elapsed() < Duration::from_secs(60));
    assert!(resolution.is_empty());
    assert_eq!(
        resolution.strategies[0].status,
        StrategyStatus::Failed {
            reason: "Catalog call cancelled".to_string()
        }
    );
}

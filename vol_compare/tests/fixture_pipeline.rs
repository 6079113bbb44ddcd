use std::io::Write;

use approx::assert_relative_eq;
use async_trait::async_trait;
use chrono::NaiveDate;
use market_data_ingestor::{
    models::{bar::BarSeries, request_params::BarsRequestParams},
    providers::{DataProvider, ProviderError, ValidationSnafu, fixture::FixtureProvider},
};
use tempfile::NamedTempFile;
use vol_compare::{
    acquisition::{AcquisitionError, NoDataReason, build_provider},
    analysis::{RunSummary, SymbolError, run},
    config::load_config_str,
    output::PlotData,
};
use volatility_engine::{EngineError, VolatilityKind};

const FIXTURE: &str = r#"{
    "ALT": [
        {"timestamp": "2024-01-31T00:00:00Z", "close": 100.0},
        {"timestamp": "2024-02-29T00:00:00Z", "close": 110.0},
        {"timestamp": "2024-03-31T00:00:00Z", "close": 99.0},
        {"timestamp": "2024-04-30T00:00:00Z", "close": 108.9},
        {"timestamp": "2024-05-31T00:00:00Z", "close": 98.01}
    ],
    "GROW": [
        {"timestamp": "2024-01-31T00:00:00Z", "close": 100.0},
        {"timestamp": "2024-02-29T00:00:00Z", "close": 110.0},
        {"timestamp": "2024-03-31T00:00:00Z", "close": 121.0}
    ],
    "DUP": [
        {"timestamp": "2024-01-31T00:00:00Z", "close": 10.0},
        {"timestamp": "2024-01-31T00:00:00Z", "close": 11.0},
        {"timestamp": "2024-02-29T00:00:00Z", "close": 12.0}
    ]
}"#;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn fixture_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(FIXTURE.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn monthly_run_over_fixture() {
    let file = fixture_file();
    let cfg = load_config_str(&format!(
        r#"
        symbols = ["alt", "grow", "dup", "missing"]
        start = "2024-01-01"
        frequency = "1mo"
        convention = "simple"

        [provider]
        kind = "fixture"
        path = {:?}
        "#,
        file.path().display().to_string()
    ))
    .unwrap();
    let settings = cfg.resolve(today()).unwrap();
    let provider = build_provider(&settings.provider).unwrap();

    let results = run(provider.as_ref(), &settings).await;
    assert_eq!(results.len(), 4);

    // ALT: returns +0.1, -0.1, +0.1, -0.1
    let alt = results[0].outcome.as_ref().unwrap();
    assert_eq!(alt.observations, 4);
    assert_relative_eq!(alt.total.mean_return, 0.0, epsilon = 1e-9);
    let down = alt.downside.as_ref().unwrap();
    assert_eq!(down.mean_return, alt.total.mean_return);
    assert_relative_eq!(down.volatility, 0.0, epsilon = 1e-9);

    // GROW: two identical +10% steps
    let grow = results[1].outcome.as_ref().unwrap();
    assert_relative_eq!(grow.total.mean_return, 1.2, epsilon = 1e-9);
    assert_eq!(
        grow.downside,
        Err(EngineError::InsufficientTailData {
            kind: VolatilityKind::Downside,
            observations: 0
        })
    );

    assert!(matches!(
        results[2].outcome,
        Err(SymbolError::Engine(EngineError::MalformedInput(_)))
    ));
    assert_eq!(
        results[3].outcome,
        Err(SymbolError::NoData(AcquisitionError::NoData {
            symbol: "MISSING".into(),
            reason: NoDataReason::NotReturned,
        }))
    );

    assert_eq!(
        RunSummary::from_results(&results),
        RunSummary {
            complete: 1,
            partial: 1,
            failed: 2
        }
    );

    let data = PlotData::from_results(settings.frequency, settings.convention, &results);
    assert_eq!(data.records.len(), 3 + 2);
    assert_eq!(data.skipped.len(), 1 + 2);
}

struct DownProvider;

#[async_trait]
impl DataProvider for DownProvider {
    fn name(&self) -> &'static str {
        "down"
    }

    async fn fetch_bars(&self, _params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError> {
        ValidationSnafu {
            message: "simulated outage",
        }
        .fail()
    }
}

#[tokio::test]
async fn provider_failure_is_no_data_for_every_symbol() {
    let settings = load_config_str(
        r#"
        symbols = ["A", "B"]
        frequency = "daily"
        "#,
    )
    .unwrap()
    .resolve(today())
    .unwrap();

    let results = run(&DownProvider, &settings).await;
    assert_eq!(results.len(), 2);
    for r in &results {
        match &r.outcome {
            Err(SymbolError::NoData(AcquisitionError::NoData {
                reason: NoDataReason::ProviderFailed(message),
                ..
            })) => assert!(message.contains("simulated outage")),
            other => panic!("expected provider failure for {}, got {other:?}", r.symbol),
        }
    }
}

#[tokio::test]
async fn fixture_provider_can_be_used_directly() {
    let provider = FixtureProvider::from_json_str(FIXTURE).unwrap();
    let mut symbols: Vec<&str> = provider.symbols().collect();
    symbols.sort();
    assert_eq!(symbols, vec!["ALT", "DUP", "GROW"]);
}

use approx::{assert_relative_eq, relative_eq};
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use volatility_engine::{
    EngineError, PriceSeries, ReturnConvention, ScaleConfig, VolatilityEngine, VolatilityKind,
    resolve_scale,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
}

fn series(prices: &[f64]) -> PriceSeries {
    PriceSeries::from_closes(
        "SYM",
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| (t0() + Duration::days(i as i64), *p)),
    )
    .unwrap()
}

fn engine(convention: ReturnConvention, timescale: f64) -> VolatilityEngine {
    VolatilityEngine::new(convention, ScaleConfig::from_timescale(timescale).unwrap())
}

#[test]
fn constant_prices_have_zero_total_and_undefined_tails() {
    for convention in [ReturnConvention::Log, ReturnConvention::Simple] {
        let report = engine(convention, 252.0)
            .analyze(&series(&[42.0; 10]))
            .unwrap();

        assert_eq!(report.total.mean_return, 0.0);
        assert_eq!(report.total.volatility, 0.0);
        assert_eq!(
            report.downside,
            Err(EngineError::InsufficientTailData {
                kind: VolatilityKind::Downside,
                observations: 0,
            })
        );
        assert_eq!(
            report.upside,
            Err(EngineError::InsufficientTailData {
                kind: VolatilityKind::Upside,
                observations: 0,
            })
        );
    }
}

#[test]
fn exactly_one_negative_return_fails_downside() {
    let e = engine(ReturnConvention::Simple, 12.0);
    let returns = e.returns(&series(&[10.0, 11.0, 12.0, 11.5, 13.0])).unwrap();
    match e.downside(&returns) {
        Err(EngineError::InsufficientTailData { kind, observations }) => {
            assert_eq!(kind, VolatilityKind::Downside);
            assert_eq!(observations, 1);
        }
        other => panic!("expected InsufficientTailData, got {other:?}"),
    }
}

#[test]
fn geometric_growth_matches_closed_form_log() {
    let report = engine(ReturnConvention::Log, 252.0)
        .analyze(&series(&[100.0, 110.0, 121.0]))
        .unwrap();

    let expected_mean = 252.0 * 1.1f64.ln();
    assert_relative_eq!(report.total.mean_return, expected_mean, epsilon = 1e-12);
    assert_eq!(report.total.volatility, 0.0);

    let up = report.upside.unwrap();
    assert_relative_eq!(up.mean_return, expected_mean, epsilon = 1e-12);
    assert_eq!(up.volatility, 0.0);

    assert!(matches!(
        report.downside,
        Err(EngineError::InsufficientTailData {
            observations: 0,
            ..
        })
    ));
}

#[test]
fn geometric_growth_matches_closed_form_simple() {
    let report = engine(ReturnConvention::Simple, 252.0)
        .analyze(&series(&[100.0, 110.0, 121.0]))
        .unwrap();

    assert_relative_eq!(report.total.mean_return, 25.2, epsilon = 1e-9);
    assert_relative_eq!(report.total.volatility, 0.0, epsilon = 1e-12);

    let up = report.upside.unwrap();
    assert_eq!(up.mean_return, report.total.mean_return);
    assert_relative_eq!(up.volatility, 0.0, epsilon = 1e-12);
    assert!(matches!(
        report.downside,
        Err(EngineError::InsufficientTailData {
            observations: 0,
            ..
        })
    ));
}

#[test]
fn upside_deviation_matches_closed_form_simple() {
    // returns +0.1, +0.2, -0.1
    let report = engine(ReturnConvention::Simple, 252.0)
        .analyze(&series(&[100.0, 110.0, 132.0, 118.8]))
        .unwrap();

    let up = report.upside.unwrap();
    assert_relative_eq!(up.mean_return, 0.2 / 3.0 * 252.0, epsilon = 1e-9);
    assert_relative_eq!(up.volatility, 0.1 / 2f64.sqrt() * 252f64.sqrt(), epsilon = 1e-9);
    assert!(up.volatility > 0.0);

    assert_eq!(
        report.downside,
        Err(EngineError::InsufficientTailData {
            kind: VolatilityKind::Downside,
            observations: 1,
        })
    );
}

#[test]
fn alternating_series_matches_closed_form() {
    // two returns a, b: sample deviation is |a - b| / sqrt(2)
    let prices = [100.0, 110.0, 99.0];

    let simple = engine(ReturnConvention::Simple, 252.0)
        .analyze(&series(&prices))
        .unwrap();
    assert_relative_eq!(simple.total.mean_return, 0.0, epsilon = 1e-12);
    assert_relative_eq!(
        simple.total.volatility,
        0.2 / 2f64.sqrt() * 252f64.sqrt(),
        epsilon = 1e-9
    );

    let log = engine(ReturnConvention::Log, 252.0)
        .analyze(&series(&prices))
        .unwrap();
    let (a, b) = (1.1f64.ln(), 0.9f64.ln());
    assert_relative_eq!(log.total.mean_return, (a + b) / 2.0 * 252.0, epsilon = 1e-9);
    assert_relative_eq!(
        log.total.volatility,
        (a - b).abs() / 2f64.sqrt() * 252f64.sqrt(),
        epsilon = 1e-9
    );
}

#[test]
fn unknown_frequency_never_defaults() {
    assert!(matches!(
        resolve_scale("fortnightly"),
        Err(EngineError::InvalidConfiguration { .. })
    ));
}

fn prices_strategy() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(1.0f64..1_000.0, 3..64)
}

proptest! {
    #[test]
    fn return_series_is_one_shorter(prices in prices_strategy()) {
        let s = series(&prices);
        for convention in [ReturnConvention::Log, ReturnConvention::Simple] {
            let returns = engine(convention, 252.0).returns(&s).unwrap();
            prop_assert_eq!(returns.len(), prices.len() - 1);
            prop_assert!(returns.downside().len() + returns.upside().len() <= returns.len());
        }
    }

    #[test]
    fn mean_is_linear_and_volatility_scales_by_sqrt(
        prices in prices_strategy(),
        timescale in 1.0f64..365.0,
        k in 0.1f64..50.0,
    ) {
        let s = series(&prices);
        let base = engine(ReturnConvention::Log, timescale).analyze(&s).unwrap();
        let scaled = engine(ReturnConvention::Log, timescale * k).analyze(&s).unwrap();

        prop_assert!(relative_eq!(
            scaled.total.mean_return,
            base.total.mean_return * k,
            epsilon = 1e-12,
            max_relative = 1e-9
        ));
        prop_assert!(relative_eq!(
            scaled.total.volatility,
            base.total.volatility * k.sqrt(),
            epsilon = 1e-12,
            max_relative = 1e-9
        ));
        prop_assert_eq!(scaled.downside.is_ok(), base.downside.is_ok());
        prop_assert_eq!(scaled.upside.is_ok(), base.upside.is_ok());
    }

    #[test]
    fn repeated_analysis_is_bit_identical(prices in prices_strategy()) {
        let s = series(&prices);
        let e = engine(ReturnConvention::Simple, 50.0);
        let first = e.analyze(&s).unwrap();
        let second = e.analyze(&s).unwrap();

        for (a, b) in first.statistics().into_iter().zip(second.statistics()) {
            match (a, b) {
                (Ok(a), Ok(b)) => {
                    prop_assert_eq!(a.mean_return.to_bits(), b.mean_return.to_bits());
                    prop_assert_eq!(a.volatility.to_bits(), b.volatility.to_bits());
                }
                (Err(a), Err(b)) => prop_assert_eq!(a, b),
                _ => prop_assert!(false, "outcome changed between calls"),
            }
        }
    }
}

use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use tandem_boost::BoostConfig;
use tandem_calendar::{Holiday, HolidayCalendar, SplitBoundary, day_of_week, shift_days};
use tandem_decompose::DecompositionSpec;
use tandem_hybrid::{
    ClipPolicy, HybridConfig, HybridError, HybridForecaster, Stage2Features, backtest,
    extract_residuals,
};
use tandem_series::{FeatureField, FeatureFrame, FeatureSchema, Observation, Series};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn holidays() -> HolidayCalendar {
    let entries = (2020..=2023)
        .map(|y| Holiday::new("christmas", NaiveDate::from_ymd_opt(y, 12, 25).unwrap()))
        .collect();
    HolidayCalendar::new(entries).unwrap()
}

/// Demand with a hinge in temperature that a linear regressor cannot fit.
fn synthetic(n: i64, seed: u64) -> Series {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 1.0).unwrap();
    let cal = holidays();
    let schema = FeatureSchema::new(vec![FeatureField::continuous("temp")]).unwrap();
    let obs = (0..n)
        .map(|i| {
            let date = shift_days(start(), i).unwrap();
            let t = i as f64;
            let temp = 15.0
                + 10.0 * (2.0 * std::f64::consts::PI * (t - 100.0) / 365.25).sin()
                + 2.0 * noise.sample(&mut rng);
            let weekly = if day_of_week(date) >= 5 { -6.0 } else { 1.5 };
            let holiday = if cal.is_holiday(date) { 30.0 } else { 0.0 };
            let cooling = 4.0 * (temp - 20.0).max(0.0);
            let heating = 3.0 * (8.0 - temp).max(0.0);
            let y = 150.0 + 0.02 * t + weekly + holiday + cooling + heating
                + noise.sample(&mut rng);
            Observation::new(date, y, vec![temp])
        })
        .collect();
    Series::new(schema, obs).unwrap()
}

fn config() -> HybridConfig {
    HybridConfig::new()
        .with_decomposition(DecompositionSpec::new().with_regressors(["temp"]))
        .with_stage2_features(Stage2Features::new().with_regressors(["temp"]))
        .with_boost(BoostConfig::new().with_n_trees(300).with_seed(7))
}

#[test]
fn hybrid_beats_stage1_on_held_out_days() {
    let series = synthetic(1090, 3);
    let cutoff = shift_days(start(), 1000).unwrap();
    let result = backtest(&series, &holidays(), &SplitBoundary::new(cutoff), &config()).unwrap();

    assert_eq!(result.records.len(), 90);
    assert_eq!(result.summary.n, 90);
    assert_eq!(result.records[0].date, cutoff);
    assert!(result.records.iter().all(|r| r.actual.is_some()));
    assert!(
        result.summary.rmse_b <= result.summary.rmse_a,
        "hybrid {} vs stage 1 {}",
        result.summary.rmse_b,
        result.summary.rmse_a
    );
    assert!(result.stage2.rounds_used >= 1);
    assert!(result.stage2.rounds_used <= 300);
    assert_eq!(result.stage2.n_fit + result.stage2.n_holdout, 1000);
}

#[test]
fn stage1_plus_residual_recovers_actuals() {
    let train = synthetic(800, 5);
    let stage1 = DecompositionSpec::new()
        .with_regressors(["temp"])
        .fit(&train, &holidays())
        .unwrap();
    let pred = stage1.predict_in_sample(&train).unwrap();
    let residuals = extract_residuals(&train, &pred).unwrap();
    for ((p, r), y) in pred.values().iter().zip(residuals.values()).zip(train.targets()) {
        assert_abs_diff_eq!(p + r, *y, epsilon = 1e-9);
    }
}

#[test]
fn records_add_up() {
    let series = synthetic(900, 11);
    let fit = HybridForecaster::new(config()).fit(&series, &holidays()).unwrap();
    let records = fit.forecast_series(&series).unwrap();
    assert_eq!(records.len(), series.len());
    for (r, y) in records.iter().zip(series.targets()) {
        assert_abs_diff_eq!(r.hybrid, r.stage1 + r.stage2, epsilon = 1e-9);
        assert_eq!(r.actual, Some(*y));
    }
}

#[test]
fn forecast_future_frame_without_actuals() {
    let series = synthetic(800, 13);
    let fit = HybridForecaster::new(config().with_clip(ClipPolicy::AtZero))
        .fit(&series, &holidays())
        .unwrap();
    let schema = FeatureSchema::new(vec![FeatureField::continuous("temp")]).unwrap();
    let dates: Vec<NaiveDate> = (800..830).map(|i| shift_days(start(), i).unwrap()).collect();
    let rows = (0..30).map(|i| vec![10.0 + i as f64 * 0.5]).collect();
    let frame = FeatureFrame::new(schema, dates.clone(), rows).unwrap();

    let records = fit.forecast(&frame).unwrap();
    assert_eq!(records.len(), 30);
    assert!(records.iter().all(|r| r.actual.is_none() && r.hybrid >= 0.0));
    assert_eq!(records.iter().map(|r| r.date).collect::<Vec<_>>(), dates);
}

#[test]
fn forecast_is_deterministic() {
    let series = synthetic(800, 17);
    let a = HybridForecaster::new(config()).fit(&series, &holidays()).unwrap();
    let b = HybridForecaster::new(config()).fit(&series, &holidays()).unwrap();
    assert_eq!(
        a.forecast_series(&series).unwrap(),
        b.forecast_series(&series).unwrap()
    );
}

#[test]
fn missing_stage2_regressor() {
    let series = synthetic(800, 19);
    let config = config().with_stage2_features(Stage2Features::new().with_regressors(["wind"]));
    let err = HybridForecaster::new(config).fit(&series, &holidays()).unwrap_err();
    assert_eq!(
        err,
        HybridError::MissingFeature {
            name: "wind".to_string()
        }
    );
}

#[test]
fn short_history_fails_in_stage1() {
    let series = synthetic(20, 23);
    let err = HybridForecaster::new(config()).fit(&series, &holidays()).unwrap_err();
    assert!(matches!(err, HybridError::Stage1(_)));
}

#[test]
fn cutoff_outside_series_fails() {
    let series = synthetic(800, 29);
    let boundary = SplitBoundary::new(start());
    assert!(matches!(
        backtest(&series, &holidays(), &boundary, &config()),
        Err(HybridError::Series(_))
    ));
}

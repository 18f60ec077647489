use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use tandem_calendar::{Holiday, HolidayCalendar, day_of_week, shift_days};
use tandem_decompose::{DecomposeError, DecompositionSpec};
use tandem_series::{FeatureField, FeatureFrame, FeatureSchema, Observation, Series};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn holidays() -> HolidayCalendar {
    let entries = (2020..=2024)
        .map(|y| Holiday::new("christmas", NaiveDate::from_ymd_opt(y, 12, 25).unwrap()))
        .collect();
    HolidayCalendar::new(entries).unwrap()
}

/// Trend + yearly + weekly + holiday spike + temperature effect + noise.
fn synthetic(n: i64, seed: u64) -> Series {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 2.0).unwrap();
    let cal = holidays();
    let schema = FeatureSchema::new(vec![FeatureField::continuous("temp")]).unwrap();
    let obs = (0..n)
        .map(|i| {
            let date = shift_days(start(), i).unwrap();
            let t = i as f64;
            let yearly = 10.0 * (2.0 * std::f64::consts::PI * t / 365.25).sin();
            let weekly = if day_of_week(date) >= 5 { -8.0 } else { 2.0 };
            let holiday = if cal.is_holiday(date) { 40.0 } else { 0.0 };
            let temp = 15.0 + 8.0 * (2.0 * std::f64::consts::PI * (t + 40.0) / 365.25).cos()
                + noise.sample(&mut rng);
            let y = 200.0 + 0.05 * t + yearly + weekly + holiday + 1.5 * (temp - 15.0)
                + noise.sample(&mut rng);
            Observation::new(date, y, vec![temp])
        })
        .collect();
    Series::new(schema, obs).unwrap()
}

fn rmse(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    (a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f64>() / n).sqrt()
}

#[test]
fn in_sample_prediction_matches_training_dates() {
    let train = synthetic(800, 1);
    let fit = DecompositionSpec::new()
        .with_regressors(["temp"])
        .fit(&train, &holidays())
        .unwrap();
    let pred = fit.predict_in_sample(&train).unwrap();
    assert_eq!(pred.len(), train.len());
    assert_eq!(pred.dates(), train.dates());
    assert!(rmse(pred.values(), train.targets()) < 5.0);
}

#[test]
fn components_sum_to_prediction() {
    let series = synthetic(900, 2);
    let fit = DecompositionSpec::new()
        .with_regressors(["temp"])
        .fit(&series, &holidays())
        .unwrap();
    let pred = fit.predict(series.frame()).unwrap();
    let parts = fit.components(series.frame()).unwrap();
    for (total, p) in parts.total().iter().zip(pred.values()) {
        assert_abs_diff_eq!(*total, *p, epsilon = 1e-8);
    }
    assert!(parts.yearly.iter().any(|v| v.abs() > 1.0));
    assert!(parts.weekly.iter().any(|v| v.abs() > 1.0));
}

#[test]
fn holiday_date_includes_holiday_effect() {
    let series = synthetic(1000, 3);
    let fit = DecompositionSpec::new()
        .with_regressors(["temp"])
        .fit(&series, &holidays())
        .unwrap();
    let parts = fit.components(series.frame()).unwrap();

    let xmas = NaiveDate::from_ymd_opt(2021, 12, 25).unwrap();
    let idx = series.dates().iter().position(|d| *d == xmas).unwrap();
    assert!(parts.holidays[idx] > 20.0);
    assert_eq!(parts.holidays[idx - 1], 0.0);
    assert_eq!(parts.holidays[idx + 1], 0.0);

    let effects = fit.holiday_effects();
    assert_eq!(effects.len(), 1);
    assert_eq!(effects[0].0.name, "christmas");
}

#[test]
fn future_holiday_is_offset_in_predict() {
    let series = synthetic(1000, 3);
    assert_eq!(*series.dates().last().unwrap(), NaiveDate::from_ymd_opt(2022, 9, 26).unwrap());
    let fit = DecompositionSpec::new()
        .with_regressors(["temp"])
        .fit(&series, &holidays())
        .unwrap();

    // Saturday 24th and Sunday 25th share the weekly effect.
    let future = FeatureFrame::from_columns(
        series.schema().clone(),
        vec![
            NaiveDate::from_ymd_opt(2022, 12, 24).unwrap(),
            NaiveDate::from_ymd_opt(2022, 12, 25).unwrap(),
        ],
        vec![vec![15.0, 15.0]],
    )
    .unwrap();
    let parts = fit.components(&future).unwrap();
    assert_eq!(parts.holidays[0], 0.0);
    assert!(parts.holidays[1] > 20.0, "holiday {}", parts.holidays[1]);

    let pred = fit.predict(&future).unwrap();
    let jump = pred.values()[1] - pred.values()[0];
    assert_abs_diff_eq!(jump, parts.holidays[1], epsilon = 2.0);
}

#[test]
fn regressor_effect_is_recovered() {
    let series = synthetic(1000, 4);
    let fit = DecompositionSpec::new()
        .with_regressors(["temp"])
        .fit(&series, &holidays())
        .unwrap();
    assert_eq!(fit.regressors(), vec!["temp"]);

    // Raising temperature by 1 degree everywhere should raise the forecast by ~1.5.
    let temp = series.frame().column("temp").unwrap();
    let base = FeatureFrame::from_columns(
        series.schema().clone(),
        series.dates().to_vec(),
        vec![temp.to_vec()],
    )
    .unwrap();
    let warmer = FeatureFrame::from_columns(
        series.schema().clone(),
        series.dates().to_vec(),
        vec![temp.iter().map(|t| t + 1.0).collect()],
    )
    .unwrap();
    let a = fit.predict(&base).unwrap();
    let b = fit.predict(&warmer).unwrap();
    let lift = b.values()[0] - a.values()[0];
    assert!((lift - 1.5).abs() < 0.3, "lift {lift}");
}

#[test]
fn out_of_sample_dates_follow_frame() {
    let series = synthetic(1000, 5);
    let (train, eval) = series
        .split(&tandem_calendar::SplitBoundary::new(shift_days(start(), 910).unwrap()))
        .unwrap();
    let fit = DecompositionSpec::new()
        .with_regressors(["temp"])
        .fit(&train, &holidays())
        .unwrap();
    let pred = fit.predict(eval.frame()).unwrap();
    assert_eq!(pred.dates(), eval.dates());
    assert!(rmse(pred.values(), eval.targets()) < 10.0);
}

#[test]
fn single_observation_is_invalid() {
    let schema = FeatureSchema::empty();
    let series = Series::new(schema, vec![Observation::new(start(), 1.0, vec![])]).unwrap();
    let err = DecompositionSpec::new()
        .fit(&series, &HolidayCalendar::empty())
        .unwrap_err();
    assert!(matches!(err, DecomposeError::InvalidInput { .. }));
}

#[test]
fn history_shorter_than_two_years_is_invalid() {
    let series = synthetic(400, 6);
    let err = DecompositionSpec::new()
        .fit(&series, &holidays())
        .unwrap_err();
    assert!(matches!(err, DecomposeError::InvalidInput { .. }));

    // Weekly-only needs just two weeks.
    let fit = DecompositionSpec::new()
        .with_yearly(false)
        .fit(&series, &holidays())
        .unwrap();
    assert_eq!(fit.predict_in_sample(&series).unwrap().len(), 400);
}

#[test]
fn thirteen_days_fail_weekly_fourteen_pass() {
    let schema = FeatureSchema::empty();
    let make = |n: i64| {
        let obs = (0..n)
            .map(|i| Observation::new(shift_days(start(), i).unwrap(), 10.0 + i as f64, vec![]))
            .collect();
        Series::new(schema.clone(), obs).unwrap()
    };
    let spec = DecompositionSpec::new().with_yearly(false);
    assert!(matches!(
        spec.fit(&make(13), &HolidayCalendar::empty()),
        Err(DecomposeError::InvalidInput { .. })
    ));
    assert!(spec.fit(&make(14), &HolidayCalendar::empty()).is_ok());
}

#[test]
fn unknown_regressor_is_missing_feature() {
    let series = synthetic(800, 7);
    let err = DecompositionSpec::new()
        .with_regressors(["humidity"])
        .fit(&series, &holidays())
        .unwrap_err();
    assert_eq!(
        err,
        DecomposeError::MissingFeature {
            name: "humidity".to_string()
        }
    );
}

#[test]
fn predict_requires_fitted_regressors() {
    let series = synthetic(800, 8);
    let fit = DecompositionSpec::new()
        .with_regressors(["temp"])
        .fit(&series, &holidays())
        .unwrap();
    let bare = FeatureFrame::from_columns(
        FeatureSchema::empty(),
        series.dates().to_vec(),
        Vec::new(),
    )
    .unwrap();
    assert!(matches!(
        fit.predict(&bare),
        Err(DecomposeError::MissingFeature { .. })
    ));
}

#[test]
fn fit_is_deterministic() {
    let series = synthetic(800, 9);
    let spec = DecompositionSpec::new().with_regressors(["temp"]);
    let a = spec.fit(&series, &holidays()).unwrap();
    let b = spec.fit(&series, &holidays()).unwrap();
    assert_eq!(a.coefficients(), b.coefficients());
}

mod common;

use std::sync::Arc;

use approx::assert_relative_eq;
use common::*;
use epi_forecast::models::{Forecaster, LinearModel, ModelMetadata, ModelSet, Postprocess};
use epi_forecast::predictors::{predict_auxiliary, predict_direct, predict_iterative};
use epi_forecast::{Feature, ForecastError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;

fn random_linear(rng: &mut StdRng, input_len: usize, output_width: usize, postprocess: Postprocess) -> LinearModel {
    let weights = (0..output_width)
        .map(|_| (0..input_len).map(|_| rng.gen_range(-1.0..1.0)).collect())
        .collect();
    let bias = (0..output_width).map(|_| rng.gen_range(-1.0..1.0)).collect();
    LinearModel::new(
        ModelMetadata::new("random", input_len, output_width).with_postprocess(postprocess),
        weights,
        bias,
    )
    .unwrap()
}

#[test]
fn test_direct_uses_most_recent_window() {
    let model = last_value_linear(3, 4);
    let history = [0.1, 0.2, 0.3, 0.4, 0.5];

    let forecast = predict_direct(&model, &history).unwrap();
    assert_eq!(forecast, vec![0.5; 4]);
}

#[rstest]
#[case(1.0)]
#[case(1000.0)]
#[case(0.01)]
fn test_scaling_round_trip_is_identity(#[case] scale: f64) {
    let model = LinearModel::selector(
        ModelMetadata::new("scaled", 5, 2).with_postprocess(Postprocess::scaled(scale)),
        4,
    )
    .unwrap();
    let history = [0.01, 0.02, 0.03, 0.04, 0.123];

    for value in predict_direct(&model, &history).unwrap() {
        assert_relative_eq!(value, 0.123, epsilon = 1e-12);
    }
}

#[test]
fn test_scale_is_applied_to_model_inputs() {
    let metadata = ModelMetadata::new("sum", 2, 1).with_postprocess(Postprocess::scaled(1000.0));
    // y = x0 + x1 + 10 in scaled units
    let model = LinearModel::new(metadata, vec![vec![1.0, 1.0]], vec![10.0]).unwrap();

    let forecast = predict_direct(&model, &[0.2, 0.3]).unwrap();
    assert_relative_eq!(forecast[0], 0.51, epsilon = 1e-12);
}

#[test]
fn test_negative_outputs_are_clipped() {
    let model = constant(3, 5, -0.4);
    let forecast = predict_direct(model.as_ref(), &[0.1, 0.2, 0.3]).unwrap();
    assert_eq!(forecast, vec![0.0; 5]);
}

#[test]
fn test_outputs_never_negative_for_random_models() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let model = random_linear(&mut rng, 6, 3, Postprocess::scaled(1000.0));
        let history: Vec<f64> = (0..6).map(|_| rng.gen_range(0.0..1.0)).collect();

        assert!(predict_direct(&model, &history)
            .unwrap()
            .iter()
            .all(|v| *v >= 0.0));
        assert!(predict_iterative(&model, &history, 8)
            .unwrap()
            .iter()
            .all(|v| *v >= 0.0));
    }
}

#[test]
fn test_direct_rejects_short_history() {
    let model = last_value_linear(50, 1);
    let err = predict_direct(&model, &[0.1; 49]).unwrap_err();
    assert!(matches!(
        err,
        ForecastError::InsufficientHistoryError {
            required: 50,
            available: 49
        }
    ));
}

#[test]
fn test_iterative_zero_horizon_is_empty() {
    let model = last_value_linear(3, 1);
    assert!(predict_iterative(&model, &[0.1, 0.2, 0.3], 0).unwrap().is_empty());
}

#[test]
fn test_iterative_single_step_matches_direct() {
    let mut rng = StdRng::seed_from_u64(42);
    let model = random_linear(&mut rng, 4, 3, Postprocess::default());
    let seed = [0.4, 0.3, 0.2, 0.25];

    let direct = predict_direct(&model, &seed).unwrap();
    let iterative = predict_iterative(&model, &seed, 1).unwrap();
    assert_eq!(iterative, vec![direct[0]]);
}

#[test]
fn test_iterative_feeds_predictions_back() {
    let seed: Vec<f64> = (0..50).map(|i| i as f64 / 100.0).collect();
    let model = last_value_linear(50, 1);

    let forecast = predict_iterative(&model, &seed, 5).unwrap();
    assert_eq!(forecast, vec![0.49; 5]);
}

#[test]
fn test_iterative_rollout_uses_growing_timeline() {
    // y = mean of the two most recent values, so each step depends on the last
    let model = LinearModel::new(ModelMetadata::new("mean2", 2, 1), vec![vec![0.5, 0.5]], vec![0.0]).unwrap();

    let forecast = predict_iterative(&model, &[0.0, 0.8], 3).unwrap();
    assert_relative_eq!(forecast[0], 0.4);
    assert_relative_eq!(forecast[1], 0.6);
    assert_relative_eq!(forecast[2], 0.5);
}

#[test]
fn test_iterative_horizon_beyond_output_width() {
    let model = last_value_linear(10, 2);
    let seed = [0.3; 10];
    assert_eq!(predict_iterative(&model, &seed, 30).unwrap().len(), 30);
}

#[test]
fn test_iterative_oversized_horizon_runs_step_by_step() {
    #[derive(Debug)]
    struct FailsFirstStep(ModelMetadata);

    impl Forecaster for FailsFirstStep {
        fn metadata(&self) -> &ModelMetadata {
            &self.0
        }

        fn infer(&self, _window: &[f64]) -> Result<Vec<f64>, ForecastError> {
            Err(ForecastError::ModelError("inference failed".to_string()))
        }
    }

    let model = FailsFirstStep(ModelMetadata::new("failing", 3, 1));
    for horizon in [usize::MAX, usize::MAX - 1, 1 << 40] {
        let result = predict_iterative(&model, &[0.1, 0.2, 0.3], horizon);
        assert!(matches!(result, Err(ForecastError::ModelError(_))));
    }
}

#[test]
fn test_iterative_rejects_short_seed() {
    let model = last_value_linear(5, 1);
    assert!(matches!(
        predict_iterative(&model, &[0.1; 4], 3),
        Err(ForecastError::InsufficientHistoryError { required: 5, .. })
    ));
}

#[test]
fn test_auxiliary_rounds_and_clips_counts() {
    let series = testville();
    let cases = LinearModel::new(
        ModelMetadata::new("cases", 2, 3).with_postprocess(Postprocess::counts()),
        vec![vec![0.0, 1.0], vec![0.0, 0.5], vec![0.0, -1.0]],
        vec![0.4, 0.0, 0.0],
    )
    .unwrap();
    let models = ModelSet::new()
        .with_model(Feature::Cases, Arc::new(cases))
        .with_model(Feature::Tests, constant(7, 2, 99.6));

    let forecast = predict_auxiliary(&models, &series, None);

    // last Cases value is 69
    assert_eq!(forecast.counts[&Feature::Cases], vec![69, 35, 0]);
    assert_eq!(forecast.counts[&Feature::Tests], vec![100, 100]);
    assert!(!forecast.counts.contains_key(&Feature::Deaths));
    assert!(forecast.is_complete());
}

#[test]
fn test_auxiliary_ignores_model_scale() {
    let series = testville();
    let cases = LinearModel::new(
        ModelMetadata::new("cases", 1, 1).with_postprocess(Postprocess::scaled(1000.0)),
        vec![vec![1.0]],
        vec![10.0],
    )
    .unwrap();
    let models = ModelSet::new().with_model(Feature::Cases, Arc::new(cases));

    let forecast = predict_auxiliary(&models, &series, None);

    // 69 + 10 on raw counts; a scaled call would give (69000 + 10) / 1000
    assert_eq!(forecast.counts[&Feature::Cases], vec![79]);
}

#[test]
fn test_auxiliary_degrades_per_feature() {
    let series = testville();
    let mut models = ModelSet::new().with_model(Feature::Deaths, constant(5, 7, 2.0));
    models.load_feature(Feature::Cases, std::path::Path::new("/nonexistent/cases.json"));
    models.insert(Feature::Tests, constant(500, 7, 1.0));

    let forecast = predict_auxiliary(&models, &series, Some(7));

    assert_eq!(forecast.counts.len(), 1);
    assert_eq!(forecast.counts[&Feature::Deaths], vec![2; 7]);
    assert!(forecast.failures[&Feature::Cases].contains("Model load error"));
    assert!(forecast.failures[&Feature::Tests].contains("Insufficient history"));
}

#[test]
fn test_auxiliary_horizon_longer_than_output_fails() {
    let series = testville();
    let models = ModelSet::new().with_model(Feature::Cases, constant(5, 3, 1.0));

    let short = predict_auxiliary(&models, &series, Some(2));
    assert_eq!(short.counts[&Feature::Cases], vec![1, 1]);

    let long = predict_auxiliary(&models, &series, Some(4));
    assert!(long.failures.contains_key(&Feature::Cases));
}

#[test]
fn test_model_output_width_is_checked() {
    #[derive(Debug)]
    struct Liar(ModelMetadata);

    impl Forecaster for Liar {
        fn metadata(&self) -> &ModelMetadata {
            &self.0
        }

        fn infer(&self, _window: &[f64]) -> Result<Vec<f64>, ForecastError> {
            Ok(vec![1.0; self.0.output_width + 1])
        }
    }

    let model = Liar(ModelMetadata::new("liar", 1, 2));
    assert!(matches!(
        predict_direct(&model, &[0.5]),
        Err(ForecastError::ModelError(_))
    ));
}

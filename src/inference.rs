//! Prediction assembly: features -> scaler -> both models -> display blocks.
//!
//! A model that failed to load contributes no block; the request still
//! succeeds with whatever the other model produced. Both models were fitted
//! on scaled features, so without a scaler neither block is produced.

use chrono::Utc;
use rand::Rng;
use tracing::debug;

use crate::config::defaults::ANOMALY_FEATURE_COUNT;
use crate::config::RiskConfig;
use crate::features;
use crate::models::{IsolationForest, LstmModel, ModelBundle, ModelError};
use crate::types::{
    AnomalyAssessment, AnomalyLabel, BarIndicator, FailureAssessment, FeatureVector, Prediction,
    RiskLevel, SensorInput,
};

const RED: &str = "red";
const GREEN: &str = "green";
const ORANGE: &str = "orange";
const BLUE: &str = "blue";

/// Band a failure probability. Both thresholds are exclusive.
pub fn classify_risk(probability: f64, risk: &RiskConfig) -> RiskLevel {
    if probability > risk.high {
        RiskLevel::High
    } else if probability > risk.moderate {
        RiskLevel::Moderate
    } else {
        RiskLevel::Normal
    }
}

/// Build the failure block shown in the left column.
pub fn assess_failure(probability: f64, risk: &RiskConfig) -> FailureAssessment {
    let level = classify_risk(probability, risk);
    let color = if probability > risk.moderate { RED } else { GREEN };
    FailureAssessment {
        probability,
        display: format!("{:.2}%", probability * 100.0),
        risk_level: level,
        message: level.message().to_string(),
        banner: level.banner().to_string(),
        bar: BarIndicator {
            label: "Risk".to_string(),
            value: probability,
            color: color.to_string(),
            x_max: Some(1.0),
        },
    }
}

/// Build the anomaly block shown in the right column.
pub fn assess_anomaly(score: f64) -> AnomalyAssessment {
    let label = AnomalyLabel::from_score(score);
    let color = match label {
        AnomalyLabel::Anomalous => ORANGE,
        AnomalyLabel::Normal => BLUE,
    };
    AnomalyAssessment {
        score,
        display: format!("{score:.2}"),
        label,
        message: label.message().to_string(),
        banner: label.banner().to_string(),
        bar: BarIndicator {
            label: "Anomaly".to_string(),
            value: score.abs(),
            color: color.to_string(),
            x_max: None,
        },
    }
}

/// Apply the loaded scaler. `None` when no scaler is loaded.
pub fn scale(bundle: &ModelBundle, raw: &FeatureVector) -> Result<Option<FeatureVector>, ModelError> {
    let Some(scaler) = &bundle.scaler else {
        return Ok(None);
    };
    let scaled = scaler.transform(raw.as_slice())?;
    let mut out = [0.0; crate::config::defaults::FEATURE_COUNT];
    out.copy_from_slice(&scaled);
    Ok(Some(FeatureVector(out)))
}

/// Failure probability from a one-timestep window.
pub fn failure_probability(model: &LstmModel, features: &FeatureVector) -> Result<f64, ModelError> {
    model.predict_probability(features.as_slice())
}

/// Anomaly score over the leading five features.
pub fn anomaly_score(forest: &IsolationForest, features: &FeatureVector) -> Result<f64, ModelError> {
    forest.decision_function(features.head(ANOMALY_FEATURE_COUNT))
}

/// Run one full prediction for the given slider readings.
pub fn predict<R: Rng + ?Sized>(
    bundle: &ModelBundle,
    input: &SensorInput,
    risk: &RiskConfig,
    rng: &mut R,
) -> Result<Prediction, ModelError> {
    let raw = features::assemble(input, rng);
    let scaled = scale(bundle, &raw)?;

    let failure = bundle
        .lstm
        .as_ref()
        .zip(scaled.as_ref())
        .map(|(m, x)| failure_probability(m, x))
        .transpose()?
        .map(|p| assess_failure(p, risk));

    let anomaly = bundle
        .forest
        .as_ref()
        .zip(scaled.as_ref())
        .map(|(f, x)| anomaly_score(f, x))
        .transpose()?
        .map(assess_anomaly);

    debug!(
        vibration = input.vibration,
        temperature = input.temperature,
        probability = ?failure.as_ref().map(|f| f.probability),
        anomaly_score = ?anomaly.as_ref().map(|a| a.score),
        "Prediction computed"
    );

    Ok(Prediction {
        input: *input,
        raw_features: raw,
        scaled_features: scaled,
        failure,
        anomaly,
        load_errors: bundle.load_errors(),
        timestamp: Utc::now(),
    })
}

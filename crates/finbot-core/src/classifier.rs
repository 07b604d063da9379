use std::path::Path;

use serde::Deserialize;

use crate::{domain::Decision, errors::Error, Result};

/// Port for the pre-trained loan approval classifier.
///
/// The model is assumed always available once loaded; a load failure is fatal
/// at startup, so `predict` itself has no failure path.
pub trait LoanClassifier: Send + Sync {
    fn predict(&self, income: f64, loan_amount: f64, credit_score: f64) -> Decision;
}

/// Logistic regression over (income, loan_amount, credit_score).
///
/// Weights are exported to JSON from the offline training run. `means` and
/// `scales` hold the training-set standardization; when absent, features are
/// used raw.
#[derive(Clone, Debug, Deserialize)]
pub struct LogisticModel {
    pub weights: [f64; 3],
    pub bias: f64,
    #[serde(default)]
    pub means: Option<[f64; 3]>,
    #[serde(default)]
    pub scales: Option<[f64; 3]>,
}

impl LogisticModel {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read model file {}: {e}", path.display()))
        })?;
        let model: LogisticModel = serde_json::from_str(&raw)?;

        if let Some(scales) = &model.scales {
            if scales.iter().any(|s| *s == 0.0) {
                return Err(Error::Config("model scale of 0 would divide by zero".to_string()));
            }
        }

        Ok(model)
    }

    fn score(&self, income: f64, loan_amount: f64, credit_score: f64) -> f64 {
        let mut x = [income, loan_amount, credit_score];

        if let (Some(means), Some(scales)) = (&self.means, &self.scales) {
            for i in 0..3 {
                x[i] = (x[i] - means[i]) / scales[i];
            }
        }

        let z = self.bias + x.iter().zip(self.weights.iter()).map(|(a, b)| a * b).sum::<f64>();
        1.0 / (1.0 + (-z).exp())
    }
}

impl LoanClassifier for LogisticModel {
    fn predict(&self, income: f64, loan_amount: f64, credit_score: f64) -> Decision {
        if self.score(income, loan_amount, credit_score) >= 0.5 {
            Decision::Approve
        } else {
            Decision::Deny
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LogisticModel {
        // Favors income and credit score, penalizes loan size.
        LogisticModel {
            weights: [1.2, -1.5, 0.8],
            bias: 0.1,
            means: Some([60_000.0, 150_000.0, 680.0]),
            scales: Some([25_000.0, 90_000.0, 70.0]),
        }
    }

    #[test]
    fn strong_applicant_is_approved() {
        let d = model().predict(95_000.0, 60_000.0, 780.0);
        assert_eq!(d, Decision::Approve);
    }

    #[test]
    fn weak_applicant_is_denied() {
        let d = model().predict(25_000.0, 300_000.0, 550.0);
        assert_eq!(d, Decision::Deny);
    }

    #[test]
    fn raw_features_used_when_standardization_absent() {
        let m = LogisticModel {
            weights: [0.0, 0.0, 1.0],
            bias: -700.0,
            means: None,
            scales: None,
        };
        assert_eq!(m.predict(0.0, 0.0, 701.0), Decision::Approve);
        assert_eq!(m.predict(0.0, 0.0, 699.0), Decision::Deny);
    }

    #[test]
    fn load_rejects_zero_scale() {
        let dir = std::env::temp_dir().join(format!("finbot-model-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("model.json");
        std::fs::write(
            &path,
            r#"{"weights":[1.0,1.0,1.0],"bias":0.0,"means":[0.0,0.0,0.0],"scales":[1.0,0.0,1.0]}"#,
        )
        .unwrap();

        assert!(LogisticModel::load(&path).is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_parses_minimal_model() {
        let dir = std::env::temp_dir().join(format!("finbot-model-min-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("model.json");
        std::fs::write(&path, r#"{"weights":[0.4,-0.2,0.1],"bias":0.05}"#).unwrap();

        let m = LogisticModel::load(&path).unwrap();
        assert!(m.means.is_none());
        assert_eq!(m.bias, 0.05);
        let _ = std::fs::remove_dir_all(&dir);
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Textual judgment returned by the classification service (e.g. "Malicious", "Benign").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Verdict(String);

impl Verdict {
    pub fn new(verdict: impl Into<String>) -> Self {
        Self(verdict.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the service flagged the file as malicious.
    pub fn is_malicious(&self) -> bool {
        self.0.trim().eq_ignore_ascii_case("malicious")
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a completed analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub verdict: Verdict,
    /// Probability-like score in [0, 1].
    pub confidence: f64,
}

impl AnalysisResult {
    /// Build a result, rejecting confidences that are not finite or fall outside [0, 1].
    pub fn new(verdict: impl Into<String>, confidence: f64) -> anyhow::Result<Self> {
        anyhow::ensure!(
            confidence.is_finite() && (0.0..=1.0).contains(&confidence),
            "confidence must be within [0, 1], got {}",
            confidence
        );

        Ok(Self {
            verdict: Verdict::new(verdict),
            confidence,
        })
    }

    pub fn formatted_confidence(&self) -> String {
        format_confidence(self.confidence)
    }
}

/// Render a confidence in [0, 1] as a percentage with two decimals ("87.00%").
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.2}%", confidence * 100.0)
}

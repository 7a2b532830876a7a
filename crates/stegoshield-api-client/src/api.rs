//! Domain methods for the classification API client.

use crate::ApiClient;
use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use stegoshield_core::{AnalysisResult, SelectedFile};

/// Multipart field the classification endpoint reads the upload from.
pub const FILE_FIELD: &str = "file";

/// Predict API response. Matches the backend's `{ "result", "confidence" }` JSON shape.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PredictResponse {
    pub result: String,
    pub confidence: f64,
}

impl TryFrom<PredictResponse> for AnalysisResult {
    type Error = anyhow::Error;

    fn try_from(response: PredictResponse) -> Result<Self> {
        AnalysisResult::new(response.result, response.confidence)
            .context("Classification response is malformed")
    }
}

/// Build the upload part, carrying the declared content type when it parses as a MIME type.
fn file_part(file_name: &str, content_type: Option<&str>, data: &Bytes) -> Part {
    let build = || Part::bytes(data.to_vec()).file_name(file_name.to_string());

    match content_type {
        Some(content_type) => build().mime_str(content_type).unwrap_or_else(|err| {
            tracing::debug!(
                content_type = %content_type,
                error = %err,
                "Declared content type is not a valid MIME type; sending part without it"
            );
            build()
        }),
        None => build(),
    }
}

impl ApiClient {
    /// Submit raw bytes to the classification endpoint.
    pub async fn predict_bytes(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> Result<AnalysisResult> {
        let form = Form::new().part(FILE_FIELD, file_part(file_name, content_type, &data));

        tracing::debug!(
            file_name = %file_name,
            size = data.len(),
            "Submitting file for classification"
        );

        let response: PredictResponse = self.post_multipart(self.predict_path(), form).await?;
        let result = AnalysisResult::try_from(response)?;

        tracing::debug!(
            verdict = %result.verdict,
            confidence = result.confidence,
            "Classification completed"
        );

        Ok(result)
    }

    /// Read a selected file and submit it to the classification endpoint.
    pub async fn predict(&self, file: &SelectedFile) -> Result<AnalysisResult> {
        let data = file
            .read()
            .await
            .with_context(|| format!("Failed to read file: {}", file.name()))?;

        self.predict_bytes(file.name(), file.content_type(), data)
            .await
    }

    /// Liveness probe: GET on the predict route returns a plain-text banner.
    pub async fn ping(&self) -> Result<String> {
        let banner = self.get_text(self.predict_path()).await?;
        Ok(banner.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_response_maps_onto_result() {
        let response: PredictResponse =
            serde_json::from_str(r#"{"result":"Malicious","confidence":0.87}"#).unwrap();
        let result = AnalysisResult::try_from(response).unwrap();
        assert_eq!(result.verdict.as_str(), "Malicious");
        assert_eq!(result.confidence, 0.87);
    }

    #[test]
    fn predict_response_requires_both_fields() {
        assert!(serde_json::from_str::<PredictResponse>(r#"{"result":"Benign"}"#).is_err());
        assert!(serde_json::from_str::<PredictResponse>(r#"{"confidence":0.2}"#).is_err());
        assert!(
            serde_json::from_str::<PredictResponse>(r#"{"result":1,"confidence":0.2}"#).is_err()
        );
    }

    #[test]
    fn out_of_range_confidence_is_malformed() {
        let response = PredictResponse {
            result: "Benign".to_string(),
            confidence: 87.0,
        };
        let err = AnalysisResult::try_from(response).unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }
}

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use stegoshield_core::{AnalysisResult, ClientConfig, MediaCategory, SelectedFile};

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Apply CLI flag values on top of the env-loaded config, then validate.
pub fn apply_overrides(
    mut config: ClientConfig,
    api_url: Option<&str>,
    timeout_secs: Option<u64>,
) -> anyhow::Result<ClientConfig> {
    if let Some(url) = api_url {
        config.api_url = url.trim().trim_end_matches('/').to_string();
    }
    if let Some(timeout) = timeout_secs {
        config.timeout_secs = timeout;
    }
    config.validate()?;
    Ok(config)
}

/// Declared content type for a local file: the explicit override if given,
/// otherwise a guess from the file extension (what a browser would report).
pub fn declared_content_type(path: &Path, content_type: Option<&str>) -> Option<String> {
    match content_type {
        Some(ct) => Some(ct.trim().to_string()),
        None => mime_guess::from_path(path).first().map(|m| m.to_string()),
    }
}

/// Build a selection for a local file, failing early if the path is not a regular file.
pub fn select_local_file(path: &Path, content_type: Option<&str>) -> anyhow::Result<SelectedFile> {
    anyhow::ensure!(path.is_file(), "File not found: {}", path.display());
    Ok(SelectedFile::from_path(
        path,
        declared_content_type(path, content_type),
    ))
}

/// Printable outcome of an `analyze` run.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub file_name: String,
    pub content_type: Option<String>,
    pub media_category: MediaCategory,
    pub verdict: String,
    pub malicious: bool,
    pub confidence: f64,
    pub confidence_display: String,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisReport {
    pub fn new(file: &SelectedFile, result: &AnalysisResult) -> Self {
        Self {
            file_name: file.name().to_string(),
            content_type: file.content_type().map(str::to_string),
            media_category: file.media_category(),
            verdict: result.verdict.to_string(),
            malicious: result.verdict.is_malicious(),
            confidence: result.confidence,
            confidence_display: result.formatted_confidence(),
            analyzed_at: Utc::now(),
        }
    }

    /// Human-readable lines, flagging malicious verdicts.
    pub fn render_text(&self) -> String {
        let marker = if self.malicious { "[!]" } else { "[ok]" };
        format!(
            "Prediction: {} {}\nConfidence: {}",
            marker, self.verdict, self.confidence_display
        )
    }
}

/// Initialize tracing for the CLI. Set STEGOSHIELD_LOG_FORMAT=json for JSON lines.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = std::env::var("STEGOSHIELD_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

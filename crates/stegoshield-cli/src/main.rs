//! StegoShield CLI: submit a media file for malicious-payload classification.
//!
//! Set STEGOSHIELD_API_URL (or API_URL) to point at the classification service.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use stegoshield_api_client::ApiClient;
use stegoshield_cli::{apply_overrides, init_tracing, select_local_file, truncate_string, AnalysisReport};
use stegoshield_core::{ClientConfig, ErrorMetadata, ACCEPTED_CONTENT_TYPES};
use stegoshield_workflow::UploadWorkflow;

#[derive(Parser)]
#[command(name = "stegoshield", about = "StegoShield media analysis CLI")]
struct Cli {
    /// Base URL of the classification service (overrides STEGOSHIELD_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Request timeout in seconds (overrides STEGOSHIELD_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the media category detected for a file
    Detect {
        /// Path to the file
        file: PathBuf,
        /// Declared content type (guessed from the extension if omitted)
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Render the local preview (data URI) for a file
    Preview {
        /// Path to the file
        file: PathBuf,
        /// Declared content type (guessed from the extension if omitted)
        #[arg(long)]
        content_type: Option<String>,
        /// Write the data URI to this path instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print a shortened URI
        #[arg(long)]
        summary: bool,
    },
    /// Submit a file to the classification service
    Analyze {
        /// Path to the file
        file: PathBuf,
        /// Declared content type (guessed from the extension if omitted)
        #[arg(long)]
        content_type: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that the classification service is reachable
    Ping,
}

#[derive(Serialize)]
struct DetectOutput {
    file_name: String,
    content_type: Option<String>,
    media_category: String,
    previewable: bool,
    accepted: &'static str,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn client_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    apply_overrides(ClientConfig::from_env()?, cli.api_url.as_deref(), cli.timeout_secs)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = client_config(&cli).context(
        "Invalid configuration. Check STEGOSHIELD_API_URL, STEGOSHIELD_PREDICT_PATH and STEGOSHIELD_TIMEOUT_SECS",
    )?;
    let client = Arc::new(ApiClient::new(&config).context("Failed to create API client")?);

    match cli.command {
        Commands::Detect { file, content_type } => {
            let selected = select_local_file(&file, content_type.as_deref())?;
            let category = selected.media_category();
            print_json(&DetectOutput {
                file_name: selected.name().to_string(),
                content_type: selected.content_type().map(str::to_string),
                media_category: category.to_string(),
                previewable: category.is_previewable(),
                accepted: ACCEPTED_CONTENT_TYPES,
            })?;
        }
        Commands::Preview {
            file,
            content_type,
            output,
            summary,
        } => {
            let selected = select_local_file(&file, content_type.as_deref())?;
            let workflow = UploadWorkflow::new(client);
            workflow.select(selected).await.preview_applied().await;

            let snapshot = workflow.snapshot();
            let Some(uri) = snapshot.preview_handle.as_uri() else {
                tracing::warn!(
                    file = %file.display(),
                    media_category = %snapshot.media_category,
                    "No preview available"
                );
                return Ok(());
            };

            match output {
                Some(path) => {
                    tokio::fs::write(&path, uri)
                        .await
                        .with_context(|| format!("Failed to write preview: {}", path.display()))?;
                    tracing::info!(path = %path.display(), size = uri.len(), "Preview written");
                }
                None if summary => println!("{}", truncate_string(uri, 80)),
                None => println!("{}", uri),
            }
        }
        Commands::Analyze {
            file,
            content_type,
            json,
        } => {
            let selected = select_local_file(&file, content_type.as_deref())?;
            let workflow = UploadWorkflow::new(client);
            // The preview is never shown here, so skip reading and encoding it.
            workflow.select(selected.clone()).await.cancel_preview();

            match workflow.analyze().await {
                Ok(result) => {
                    let report = AnalysisReport::new(&selected, &result);
                    if json {
                        print_json(&report)?;
                    } else {
                        println!("{}", report.render_text());
                    }
                }
                Err(err) => {
                    tracing::error!(
                        error_code = err.error_code(),
                        recoverable = err.is_recoverable(),
                        error = %err,
                        "Analysis failed"
                    );
                    return Err(anyhow::anyhow!("{}: {}", err.client_message(), err));
                }
            }
        }
        Commands::Ping => {
            let banner = client.ping().await.with_context(|| {
                format!("Classification service unreachable at {}", config.predict_url())
            })?;
            println!("{}", banner);
        }
    }

    Ok(())
}

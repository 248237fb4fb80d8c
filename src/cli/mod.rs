// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::acl::{KneeAngles, RiskScores};
use crate::api::start_server;
use crate::config::{ModelConfig, ServerConfig};
use crate::pipeline::{AclAnalyzer, DetectionResult, ImageInput};
use crate::vision::{ensure_model, DetectorStatus, PoseModelManager};

/// ACL injury risk node
#[derive(Parser, Debug)]
#[command(name = "acl-risk-node")]
#[command(version)]
#[command(about = "Knee angle and ACL injury risk estimation from images", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Server settings used when no subcommand is given
    #[command(flatten)]
    pub serve: ServerConfig,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API (default)
    Serve(ServerConfig),

    /// Score a single image file and print the result as JSON
    Analyze(AnalyzeArgs),

    /// Download the pose model if it is not cached yet
    DownloadModel(ModelConfig),
}

/// Arguments for the analyze command
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Image file to analyze
    pub image: PathBuf,

    /// Write the annotated JPEG here
    #[arg(long)]
    pub annotated_out: Option<PathBuf>,

    /// Upper bound on processing, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    #[command(flatten)]
    pub model: ModelConfig,
}

/// What `analyze` prints
#[derive(Debug, Serialize)]
struct AnalyzeReport {
    image: PathBuf,
    landmarks_detected: bool,
    knee_angles: KneeAngles,
    acl_risk: RiskScores,
    processing_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotated_image: Option<PathBuf>,
}

impl AnalyzeReport {
    fn new(image: PathBuf, result: &DetectionResult, annotated_image: Option<PathBuf>) -> Self {
        Self {
            image,
            landmarks_detected: result.landmarks_detected,
            knee_angles: result.angles,
            acl_risk: result.scores,
            processing_time_ms: result.processing_time_ms,
            annotated_image,
        }
    }
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Commands::Serve(cli.serve)) {
        Commands::Serve(config) => start_server(config).await,
        Commands::Analyze(args) => analyze(args).await,
        Commands::DownloadModel(config) => download_model(config).await,
    }
}

async fn analyze(args: AnalyzeArgs) -> Result<()> {
    let bytes = tokio::fs::read(&args.image)
        .await
        .with_context(|| format!("Failed to read {}", args.image.display()))?;

    let models = PoseModelManager::load(&args.model).await;
    let detector = models.detector().ok_or_else(|| match models.status() {
        DetectorStatus::Unavailable { error } => anyhow!("Pose detector not available: {}", error),
        DetectorStatus::Ready { .. } => anyhow!("Pose detector not available"),
    })?;
    let analyzer = AclAnalyzer::new(detector, Duration::from_secs(args.timeout_secs));

    let result = analyzer.analyze(ImageInput::Bytes(bytes)).await?;

    if let Some(out) = &args.annotated_out {
        tokio::fs::write(out, &result.annotated_jpeg)
            .await
            .with_context(|| format!("Failed to write {}", out.display()))?;
        info!("Annotated image written to {}", out.display());
    }

    let report = AnalyzeReport::new(args.image, &result, args.annotated_out);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn download_model(config: ModelConfig) -> Result<()> {
    let path = ensure_model(&config)
        .await
        .with_context(|| format!("Failed to fetch pose model from {}", config.model_url))?;
    println!("{}", path.display());
    Ok(())
}

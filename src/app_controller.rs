use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::caption_processor::CaptionCollection;
use crate::file_utils::{FileManager, QC_REPORT_SUFFIX};
use crate::placement::SurfaceSize;
use crate::qc::{PlacementValidator, QcReport};
use crate::render_plan::{RenderPlan, RenderPlanner};

// @module: Application controller for caption QC and render planning

/// File the folder summary is appended to
const QC_LOG_FILE_NAME: &str = "capgrid.qc.log";

/// Order events are kept in after loading a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventOrder {
    AsAuthored,
    ByStart,
}

/// Outcome counts of a QC run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QcSummary {
    /// Documents that were loaded and checked
    pub checked: usize,
    /// Checked documents without failures
    pub passed: usize,
    /// Checked documents with at least one failure
    pub failed: usize,
    /// Documents that could not be loaded
    pub errors: usize,
}

impl QcSummary {
    fn record(&mut self, report: &QcReport) {
        self.checked += 1;
        if report.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check a caption document, or every document under a directory
    pub async fn run_qc(&self, input_path: PathBuf) -> Result<QcSummary> {
        if input_path.is_file() {
            let mut summary = QcSummary::default();
            let report = self.run_qc_file(&input_path).await?;
            summary.record(&report);
            Ok(summary)
        } else if input_path.is_dir() {
            self.run_qc_folder(input_path).await
        } else {
            Err(anyhow!("Input path does not exist: {:?}", input_path))
        }
    }

    /// Check one document and write its report next to it
    pub async fn run_qc_file(&self, input_file: &Path) -> Result<QcReport> {
        // File order, so event indices match the document and ordering issues are reported
        let collection = Self::load_collection(input_file, EventOrder::AsAuthored).await?;

        let validator = PlacementValidator::with_config(self.config.qc.clone());
        let report = validator.validate_collection(&collection.document, &collection.events);

        for entry in report.flagged_entries() {
            for issue in &entry.issues {
                if issue.is_warning() {
                    debug!("Event {}: {}", entry.index, issue);
                } else {
                    warn!("Event {}: {}", entry.index, issue);
                }
            }
        }
        for issue in &report.document_issues {
            warn!("{}", issue);
        }

        let output_dir = input_file.parent().unwrap_or(Path::new("."));
        let report_path = FileManager::generate_output_path(input_file, output_dir, QC_REPORT_SUFFIX, "json");
        let report_json = serde_json::to_string_pretty(&report).context("Failed to serialize QC report")?;
        tokio::fs::write(&report_path, report_json)
            .await
            .with_context(|| format!("Failed to write QC report: {:?}", report_path))?;

        info!(
            "{}: {} events, {} issues ({} warnings) -> {:?}",
            input_file.display(),
            collection.events.len(),
            report.total_issues,
            report.warning_count,
            report_path
        );

        Ok(report)
    }

    /// Check every caption document under a directory
    pub async fn run_qc_folder(&self, input_dir: PathBuf) -> Result<QcSummary> {
        let start_time = Instant::now();

        if !input_dir.exists() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let documents = FileManager::find_caption_documents(&input_dir)?;
        if documents.is_empty() {
            return Err(anyhow!("No caption documents found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(documents.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("=> "));

        let mut summary = QcSummary::default();

        for document in &documents {
            let file_name = document
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Checking: {}", file_name));

            match self.run_qc_file(document).await {
                Ok(report) => summary.record(&report),
                Err(e) => {
                    error!("Error checking file {}: {:#}", file_name, e);
                    summary.errors += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder check complete");

        let summary_message = format!(
            "Caption QC completed: {} checked, {} passed, {} failed, {} errors - Duration: {}",
            summary.checked,
            summary.passed,
            summary.failed,
            summary.errors,
            Self::format_duration(start_time.elapsed())
        );
        info!("{}", summary_message);

        let log_file_path = input_dir.join(QC_LOG_FILE_NAME);
        if let Err(e) = FileManager::append_to_log_file(&log_file_path, &summary_message) {
            warn!("Failed to write folder summary to {:?}: {}", log_file_path, e);
        }

        Ok(summary)
    }

    /// Render plan for a document at a playback time
    pub async fn plan(&self, input_file: &Path, time: f64, surface: Option<SurfaceSize>) -> Result<RenderPlan> {
        let collection = Self::load_collection(input_file, EventOrder::ByStart).await?;
        let surface = surface.unwrap_or_else(|| self.config.placement.surface());

        let mut planner = RenderPlanner::from_config(&self.config.placement);
        Ok(planner.evaluate(&collection.events, &collection.document, time, surface))
    }

    async fn load_collection(input_file: &Path, order: EventOrder) -> Result<CaptionCollection> {
        let content = tokio::fs::read_to_string(input_file)
            .await
            .with_context(|| format!("Failed to read caption document: {:?}", input_file))?;

        let parsed = match order {
            EventOrder::AsAuthored => CaptionCollection::parse_json_str_in_file_order(&content),
            EventOrder::ByStart => CaptionCollection::parse_json_str(&content),
        };
        let mut collection = parsed.with_context(|| format!("Invalid caption document: {:?}", input_file))?;
        collection.source_file = input_file.to_path_buf();

        Ok(collection)
    }

    /// Format a duration as `1h 02m 03s`, `2m 03s` or `3.2s`
    pub fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;

        if hours > 0 {
            format!("{}h {:02}m {:02}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {:02}s", minutes, seconds)
        } else {
            format!("{:.1}s", duration.as_secs_f64())
        }
    }
}

/*!
 * Integration tests for the controller QC and planning workflow
 */

use anyhow::Result;
use capgrid::app_config::Config;
use capgrid::app_controller::Controller;
use capgrid::placement::SurfaceSize;
use capgrid::qc::{DocumentIssue, QcReport};
use std::time::Duration;

use crate::common;

/// Test checking a clean document writes a passing report next to it
#[tokio::test]
async fn test_runQc_withCleanFile_shouldWriteReport() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_document(temp_dir.path(), "show.json")?;
    let controller = Controller::new_for_test()?;

    let summary = controller.run_qc(input).await?;

    assert_eq!((summary.checked, summary.passed, summary.failed), (1, 1, 0));
    assert!(summary.all_passed());

    let report_path = temp_dir.path().join("show.qc.json");
    let report: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(report_path)?)?;
    assert_eq!(report["passed"], true);
    assert_eq!(report["entry_results"].as_array().map(Vec::len), Some(4));
    Ok(())
}

/// Test a failing document is counted and its issues reported
#[tokio::test]
async fn test_runQcFile_withFailingDocument_shouldReportIssues() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_failing_document(temp_dir.path(), "bad.json")?;
    let controller = Controller::new_for_test()?;

    let report: QcReport = controller.run_qc_file(&input).await?;

    assert!(!report.passed);
    assert_eq!(report.failed_entries().len(), 2);

    let summary = controller.run_qc(input).await?;
    assert_eq!((summary.checked, summary.failed), (1, 1));
    assert!(!summary.all_passed());
    Ok(())
}

/// Test QC sees events in file order, so ordering problems are reported
#[tokio::test]
async fn test_runQcFile_withUnsortedDocument_shouldReportOrderInFileIndices() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        temp_dir.path(),
        "unsorted.json",
        r#"{"events": [
            {"start": 5.0, "end": 6.0, "lines": ["later"]},
            {"start": 1.0, "end": 0.5, "lines": ["earlier but inverted"]}
        ]}"#,
    )?;
    let controller = Controller::new_for_test()?;

    let report = controller.run_qc_file(&input).await?;

    assert_eq!(report.document_issues, vec![DocumentIssue::UnsortedEvents { index: 1 }]);
    assert!(report.entry_results[0].passed);
    assert_eq!(report.failed_entries().len(), 1);
    assert_eq!(report.failed_entries()[0].index, 1);
    Ok(())
}

/// Test a folder run checks every document and appends a summary log
#[tokio::test]
async fn test_runQc_withFolder_shouldSummarizeAndLog() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    common::create_test_document(temp_dir.path(), "good.json")?;
    common::create_failing_document(temp_dir.path(), "bad.json")?;
    common::create_test_file(temp_dir.path(), "broken.json", "{ not json")?;
    let controller = Controller::new_for_test()?;

    let summary = controller.run_qc(temp_dir.path().to_path_buf()).await?;

    assert_eq!(summary.checked, 2);
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.errors, 1);

    let log = std::fs::read_to_string(temp_dir.path().join("capgrid.qc.log"))?;
    assert!(log.contains("2 checked, 1 passed, 1 failed, 1 errors"));

    // Reports from the first run are not picked up as documents
    let second = controller.run_qc(temp_dir.path().to_path_buf()).await?;
    assert_eq!(second.checked, 2);
    Ok(())
}

/// Test missing inputs and empty folders are errors
#[tokio::test]
async fn test_runQc_withMissingOrEmptyInput_shouldFail() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::new_for_test()?;

    assert!(controller.run_qc(temp_dir.path().join("nope.json")).await.is_err());
    assert!(controller.run_qc(temp_dir.path().to_path_buf()).await.is_err());
    Ok(())
}

/// Test planning from a document on disk
#[tokio::test]
async fn test_plan_withDocument_shouldUseConfiguredSurface() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_document(temp_dir.path(), "show.json")?;

    let mut config = Config::default();
    config.placement.aspect_constrained = false;
    let controller = Controller::with_config(config)?;

    let plan = controller.plan(&input, 2.0, None).await?;
    assert_eq!(plan.lines.len(), 2);
    assert_eq!((plan.lines[0].row, plan.lines[1].row), (14, 15));
    assert!((plan.lines[0].origin_x - 192.0).abs() < 1e-6);

    let small = controller.plan(&input, 2.0, Some(SurfaceSize::new(640, 480))).await?;
    assert!((small.lines[0].origin_x - 64.0).abs() < 1e-6);

    assert!(controller.plan(&temp_dir.path().join("missing.json"), 2.0, None).await.is_err());
    Ok(())
}

/// Test an invalid configuration is rejected up front
#[test]
fn test_withConfig_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.timecode.default_fps = -1.0;

    assert!(Controller::with_config(config).is_err());
}

/// Test duration formatting
#[test]
fn test_formatDuration_shouldPickUnits() {
    assert_eq!(Controller::format_duration(Duration::from_millis(3200)), "3.2s");
    assert_eq!(Controller::format_duration(Duration::from_secs(123)), "2m 03s");
    assert_eq!(Controller::format_duration(Duration::from_secs(3723)), "1h 02m 03s");
}

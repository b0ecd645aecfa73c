/*!
 * Tests for caption QC
 */

use capgrid::caption_processor::{CaptionEvent, Document, Placement};
use capgrid::qc::{DocumentIssue, PlacementValidator, PlacementValidatorConfig, QcIssue};

use crate::common::{event, placed_event};

/// Test a clean document passes without issues
#[test]
fn test_validateCollection_withCleanDocument_shouldPass() {
    let validator = PlacementValidator::new();
    let events = vec![event(1.0, 2.0, "Hello"), placed_event(3.0, 4.0, "World", 12, 4)];

    let report = validator.validate_collection(&Document::default(), &events);

    assert!(report.passed);
    assert_eq!(report.total_issues, 0);
    assert_eq!(report.entry_results.len(), 2);
}

/// Test events with three rows are flagged
#[test]
fn test_validateEvent_withThreeLines_shouldFlagTooManyLines() {
    let validator = PlacementValidator::new();
    let three = CaptionEvent::new(0.0, 1.0, vec!["a".into(), "b".into(), "c".into()]);

    let result = validator.validate_event(7, &three);

    assert_eq!(result.index, 7);
    assert!(!result.passed);
    assert_eq!(result.issues, vec![QcIssue::TooManyLines { lines: 3, max: 2 }]);
}

/// Test lines with only style tokens count as empty
#[test]
fn test_validateEvent_withTokenOnlyText_shouldFlagEmptyText() {
    let validator = PlacementValidator::new();

    let result = validator.validate_event(0, &event(0.0, 1.0, "{I}  {Wh}"));

    assert!(result.issues.contains(&QcIssue::EmptyText));
}

/// Test overflow accounts for inferred indentation
#[test]
fn test_validateEvent_withIndentedLongLine_shouldFlagOverflow() {
    let validator = PlacementValidator::new();
    let text = format!("{}{}", " ".repeat(10), "x".repeat(25));

    let result = validator.validate_event(0, &event(0.0, 1.0, &text));

    assert_eq!(
        result.issues,
        vec![QcIssue::LineOverflow { line: 0, cells: 25, available: 22 }]
    );
}

/// Test overflow checks can be turned off
#[test]
fn test_customConfig_shouldBeRespected() {
    let config = PlacementValidatorConfig {
        max_lines: 3,
        check_line_overflow: false,
        ..Default::default()
    };
    let validator = PlacementValidator::with_config(config);
    let event = CaptionEvent::new(0.0, 1.0, vec!["x".repeat(40), "b".into(), "c".into()]);

    let result = validator.validate_event(0, &event);

    assert!(result.passed);
}

/// Test clamps are warnings and do not fail the document
#[test]
fn test_validateCollection_withClamp_shouldCountWarning() {
    let validator = PlacementValidator::new();
    let events = vec![placed_event(0.0, 1.0, "Hi", 0, 0)];

    let report = validator.validate_collection(&Document::default(), &events);

    assert!(report.passed);
    assert_eq!(report.warning_count, 1);
    assert!(matches!(
        report.entry_results[0].issues[0],
        QcIssue::DomainClamp { clamped: Placement { row: 1, col: 0 }, .. }
    ));
}

/// Test indentation past the last column shows up as a clamp warning
#[test]
fn test_validateEvent_withIndentPastGrid_shouldReportClamp() {
    let validator = PlacementValidator::new();
    let text = format!("{}H", " ".repeat(35));
    let event = CaptionEvent::new(0.0, 1.0, vec![text]);

    let result = validator.validate_event(0, &event);

    assert!(result.passed);
    assert!(matches!(
        result.issues.as_slice(),
        [QcIssue::DomainClamp { line: 0, clamped: Placement { row: 15, col: 31 }, .. }]
    ));
}

/// Test document issues for start labels
#[test]
fn test_validateDocument_withStartLabels_shouldReportProblems() {
    let validator = PlacementValidator::new();

    let good = Document::new(29.97, true).with_start_timecode("01:00:00;00");
    assert!(validator.validate_document(&good, &[]).is_empty());

    let dropped = Document::new(59.94, true).with_start_timecode("00:03:00;03");
    assert_eq!(
        validator.validate_document(&dropped, &[]),
        vec![DocumentIssue::IllegalDropFrame { label: "00:03:00;03".to_string() }]
    );

    let bad = Document::new(25.0, false).with_start_timecode("00:00:00:30");
    assert!(matches!(
        validator.validate_document(&bad, &[])[0],
        DocumentIssue::StartOffsetUnparseable { .. }
    ));
}

/// Test issue messages are readable
#[test]
fn test_issueDisplay_shouldDescribeProblem() {
    let issue = QcIssue::LineOverflow { line: 1, cells: 40, available: 32 };

    assert_eq!(
        issue.to_string(),
        "Line 1 needs 40 cells but only 32 columns are available"
    );
    assert!(!issue.is_warning());
}

/*!
 * Tests for timecode conversion
 */

use capgrid::caption_processor::Document;
use capgrid::errors::{CaptionWarning, TimecodeError};
use capgrid::timecode::{
    display_label_to_media, generic_to_seconds, media_to_display_label, seconds_to_generic,
    seconds_to_smpte, smpte_to_seconds, start_offset_seconds, FrameRate, GenericSeparator, SmpteCodec,
    MAX_FRAME_COUNT,
};

/// Test NDF formatting at integer rates
#[test]
fn test_secondsToSmpte_withNonDropFrame_shouldCountFramesStraight() {
    assert_eq!(seconds_to_smpte(0.0, 25.0, false), "00:00:00:00");
    assert_eq!(seconds_to_smpte(1.5, 24.0, false), "00:00:01:12");
    assert_eq!(seconds_to_smpte(3661.0, 30.0, false), "01:01:01:00");
    assert_eq!(seconds_to_smpte(-5.0, 30.0, false), "00:00:00:00");
}

/// Test DF formatting uses ';' and skips frame numbers
#[test]
fn test_secondsToSmpte_withDropFrame_shouldUseSemicolonAndSkip() {
    // Frame 1800 is the first frame of minute one
    let seconds = 1800.0 * 1001.0 / 30000.0;
    assert_eq!(seconds_to_smpte(seconds, 29.97, true), "00:01:00;02");

    // Frame 17982 is the first frame of minute ten
    let seconds = 17982.0 * 1001.0 / 30000.0;
    assert_eq!(seconds_to_smpte(seconds, 29.97, true), "00:10:00;00");
}

/// Test the frame immediately following minute boundaries
#[test]
fn test_frameAfterBoundary_shouldMatchDropFrameRules() {
    let codec = SmpteCodec::new(FrameRate::from_fps(29.97).unwrap(), true);

    let (frames, _) = codec.label_to_frames("00:00:59;29").unwrap();
    assert_eq!(codec.frames_to_label(frames + 1), "00:01:00;02");

    let (frames, _) = codec.label_to_frames("00:09:59;29").unwrap();
    assert_eq!(codec.frames_to_label(frames + 1), "00:10:00;00");

    let (frames, _) = codec.label_to_frames("01:00:59;29").unwrap();
    assert_eq!(codec.frames_to_label(frames + 1), "01:01:00;02");
}

/// Test one hour of DF labels is 107892 frames
#[test]
fn test_labelToFrames_atOneHourDropFrame_shouldAccountForDroppedNumbers() {
    let codec = SmpteCodec::new(FrameRate::from_fps(29.97).unwrap(), true);

    let (frames, warnings) = codec.label_to_frames("01:00:00;00").unwrap();

    assert_eq!(frames, 107_892);
    assert!(warnings.is_empty());
}

/// Test huge elapsed times are capped instead of overflowing the frame math
#[test]
fn test_secondsToSmpte_withHugeSeconds_shouldCapMonotonically() {
    let codec = SmpteCodec::new(FrameRate::from_fps(29.97).unwrap(), true);
    let hours = |label: &str| label.split(':').next().and_then(|h| h.parse::<u64>().ok());

    assert_eq!(codec.seconds_to_frames(1e20), MAX_FRAME_COUNT);
    assert_eq!(codec.seconds_to_frames(f64::MAX), MAX_FRAME_COUNT);

    let capped = seconds_to_smpte(1e20, 29.97, true);
    assert_eq!(seconds_to_smpte(1e30, 29.97, true), capped);
    assert_eq!(codec.frames_to_label(u64::MAX), capped);
    assert!(hours(&capped) > hours(&seconds_to_smpte(1e12, 29.97, true)));

    let ndf = seconds_to_smpte(1e20, 59.94, false);
    assert!(ndf.contains(':'));
}

/// Test parse errors for malformed labels
#[test]
fn test_smpteToSeconds_withMalformedLabels_shouldFail() {
    assert!(matches!(
        smpte_to_seconds("1:00:00:00", 30.0, false),
        Err(TimecodeError::MalformedSmpte(_))
    ));
    assert!(matches!(
        smpte_to_seconds("00:00:00.00", 30.0, false),
        Err(TimecodeError::MalformedSmpte(_))
    ));
    assert!(matches!(
        smpte_to_seconds("00:61:00:00", 30.0, false),
        Err(TimecodeError::FieldOutOfRange { field: "minutes", .. })
    ));
    assert!(matches!(
        smpte_to_seconds("00:00:00:25", 25.0, false),
        Err(TimecodeError::FrameOutOfRange { frame: 25, nominal_fps: 25, .. })
    ));
    assert!(matches!(
        smpte_to_seconds("00:00:00:00", 0.0, false),
        Err(TimecodeError::InvalidFrameRate(_))
    ));
}

/// Test that parsing a dropped DF label warns instead of failing
#[test]
fn test_parseChecked_withDroppedLabel_shouldReportWarning() {
    let codec = SmpteCodec::new(FrameRate::from_fps(29.97).unwrap(), true);

    let parsed = codec.parse_checked("00:02:00;01").unwrap();

    assert_eq!(
        parsed.warnings,
        vec![CaptionWarning::IllegalDropFrame {
            label: "00:02:00;01".to_string()
        }]
    );
}

/// Test generic labels with both separators
#[test]
fn test_genericToSeconds_withFractions_shouldRightPad() {
    assert_eq!(generic_to_seconds("00:00:01.5").unwrap(), 1.5);
    assert_eq!(generic_to_seconds("00:00:01,05").unwrap(), 1.05);
    assert_eq!(generic_to_seconds("1:02:03").unwrap(), 3723.0);
    assert!(generic_to_seconds("00:00:01.5000").is_err());
    assert!(generic_to_seconds("").is_err());
}

/// Test generic formatting
#[test]
fn test_secondsToGeneric_shouldUseMilliseconds() {
    assert_eq!(seconds_to_generic(3723.25, GenericSeparator::Dot), "01:02:03.250");
    assert_eq!(seconds_to_generic(1.0006, GenericSeparator::Comma), "00:00:01,001");
    assert_eq!(generic_to_seconds(&seconds_to_generic(59.999, GenericSeparator::Dot)).unwrap(), 59.999);
}

/// Test the document start offset is applied only for display
#[test]
fn test_startOffset_shouldShiftDisplayLabels() {
    let document = Document::new(30.0, false).with_start_timecode("01:00:00:00");

    assert_eq!(start_offset_seconds(&document).unwrap(), 3600.0);
    assert_eq!(media_to_display_label(2.0, &document).unwrap(), "01:00:02:00");
    assert_eq!(display_label_to_media("01:00:02:00", &document).unwrap(), 2.0);
    assert_eq!(display_label_to_media("00:59:00:00", &document).unwrap(), 0.0);
}

/// Test a missing or blank start label means no offset
#[test]
fn test_startOffset_withoutLabel_shouldBeZero() {
    assert_eq!(start_offset_seconds(&Document::default()).unwrap(), 0.0);

    let blank = Document::new(25.0, false).with_start_timecode("  ");
    assert_eq!(start_offset_seconds(&blank).unwrap(), 0.0);

    let broken = Document::new(25.0, false).with_start_timecode("soon");
    assert!(start_offset_seconds(&broken).is_err());
}

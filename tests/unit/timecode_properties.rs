/*!
 * Property tests for timecode conversion
 */

use proptest::prelude::*;

use capgrid::timecode::{seconds_to_smpte, smpte_to_seconds, FrameRate, SmpteCodec};

fn frame_rates() -> impl Strategy<Value = f64> {
    prop::sample::select(vec![23.976, 24.0, 25.0, 29.97, 30.0, 59.94])
}

proptest! {
    /// Formatting then parsing lands within one frame of the input
    #[test]
    fn test_smpteRoundTrip_shouldStayWithinOneFrame(
        t in 0.0f64..3600.0,
        fps in frame_rates(),
        drop_frame in any::<bool>(),
    ) {
        let label = seconds_to_smpte(t, fps, drop_frame);
        let back = smpte_to_seconds(&label, fps, drop_frame).unwrap();

        prop_assert!((back - t).abs() <= 1.0 / fps, "{} -> {} -> {}", t, label, back);
    }

    /// Later times never produce earlier labels
    #[test]
    fn test_secondsToSmpte_shouldBeMonotonic(
        a in 0.0f64..3600.0,
        b in 0.0f64..3600.0,
        fps in frame_rates(),
        drop_frame in any::<bool>(),
    ) {
        let (early, late) = if a <= b { (a, b) } else { (b, a) };
        let codec = SmpteCodec::new(FrameRate::from_fps(fps).unwrap(), drop_frame);

        let early_frames = codec.parse_checked(&codec.format(early)).unwrap().frames;
        let late_frames = codec.parse_checked(&codec.format(late)).unwrap().frames;

        prop_assert!(early_frames <= late_frames);
    }

    /// Labels never carry a frame number at or above the nominal rate
    #[test]
    fn test_framesToLabel_shouldKeepFrameFieldInRange(
        frames in 0u64..500_000,
        fps in frame_rates(),
        drop_frame in any::<bool>(),
    ) {
        let rate = FrameRate::from_fps(fps).unwrap();
        let codec = SmpteCodec::new(rate, drop_frame);

        let label = codec.frames_to_label(frames);
        let ff: u32 = label[9..].parse().unwrap();

        prop_assert!(ff < rate.nominal());
        prop_assert_eq!(codec.label_to_frames(&label).unwrap().0, frames);
    }
}

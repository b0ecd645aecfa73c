/*!
 * Conversion between media time and timecode labels.
 *
 * - `smpte`: SMPTE `HH:MM:SS:FF` / `HH:MM:SS;FF` labels, NDF and DF
 * - `generic`: millisecond `HH:MM:SS.mmm` / `HH:MM:SS,mmm` labels
 * - `offset`: mapping media time zero onto a document start timecode
 */

use log::warn;

use crate::errors::TimecodeError;

pub mod generic;
pub mod offset;
pub mod smpte;

pub use self::generic::{generic_to_seconds, seconds_to_generic, GenericSeparator};
pub use self::offset::{display_label_to_media, media_to_display_label, start_offset_seconds};
pub use self::smpte::{seconds_to_smpte, smpte_to_seconds, ParsedTimecode, SmpteCodec, MAX_FRAME_COUNT};

/// Frame rate used when a document does not carry a usable one
pub const DEFAULT_FPS: f64 = 30.0;

/// NTSC nominal rates and their exact rational values
const NTSC_RATES: [(f64, f64); 3] = [
    (23.976, 24000.0 / 1001.0),
    (29.97, 30000.0 / 1001.0),
    (59.94, 60000.0 / 1001.0),
];

/// Distance within which a declared rate is treated as an NTSC rate
const NTSC_SNAP_TOLERANCE: f64 = 0.01;

/// A positive, finite frame rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRate {
    fps: f64,
}

impl FrameRate {
    /// Build a frame rate, snapping 23.976/29.97/59.94 to 24000/1001, 30000/1001, 60000/1001
    pub fn from_fps(fps: f64) -> Result<Self, TimecodeError> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(TimecodeError::InvalidFrameRate(fps));
        }

        let snapped = NTSC_RATES
            .iter()
            .find(|(nominal, exact)| {
                (fps - nominal).abs() < NTSC_SNAP_TOLERANCE || (fps - exact).abs() < NTSC_SNAP_TOLERANCE
            })
            .map(|&(_, exact)| exact)
            .unwrap_or(fps);

        Ok(FrameRate { fps: snapped })
    }

    /// Like `from_fps`, falling back to 30 fps for unusable input
    pub fn from_fps_or_default(fps: f64) -> Self {
        Self::from_fps(fps).unwrap_or_else(|_| {
            warn!("Unusable frame rate {}, falling back to {} fps", fps, DEFAULT_FPS);
            FrameRate { fps: DEFAULT_FPS }
        })
    }

    pub fn as_f64(&self) -> f64 {
        self.fps
    }

    /// Frame rate rounded to the label's frames-per-second count
    pub fn nominal(&self) -> u32 {
        (self.fps.round() as u32).max(1)
    }

    pub fn frame_duration(&self) -> f64 {
        1.0 / self.fps
    }

    /// True for 29.97 and 59.94 only
    pub fn is_drop_frame_eligible(&self) -> bool {
        let nominal = self.nominal();
        (nominal == 30 || nominal == 60)
            && (self.fps - f64::from(nominal) * 1000.0 / 1001.0).abs() < 1e-6
    }

    /// Frame numbers skipped at each non-exempt minute: 2 at 29.97, 4 at 59.94
    pub fn dropped_per_minute(&self) -> u32 {
        if self.is_drop_frame_eligible() {
            2 * self.nominal() / 30
        } else {
            0
        }
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        FrameRate { fps: DEFAULT_FPS }
    }
}

impl std::fmt::Display for FrameRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} fps", self.fps)
    }
}

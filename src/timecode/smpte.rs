/*!
 * SMPTE timecode labels.
 *
 * Non-drop-frame labels count frames straight through at the rounded frame
 * rate. Drop-frame labels (29.97 and 59.94 only) skip frame numbers `;00`
 * and `;01` (`;00`..`;03` at 59.94) at the start of every minute that is not
 * a multiple of ten, so the label stays close to wall-clock time.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::caption_processor::Document;
use crate::errors::{CaptionWarning, TimecodeError};
use crate::timecode::FrameRate;

/// `HH:MM:SS:FF` or `HH:MM:SS;FF`
static SMPTE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2})([:;])(\d{2})$").expect("Invalid SMPTE regex")
});

/// Largest frame index formatted; drop-frame compensation of it still fits in a `u64`
pub const MAX_FRAME_COUNT: u64 = u64::MAX / 2;

/// Result of a checked parse
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTimecode {
    /// Elapsed seconds represented by the label
    pub seconds: f64,
    /// Frame index represented by the label
    pub frames: u64,
    /// Warnings raised while parsing
    pub warnings: Vec<CaptionWarning>,
}

/// Label fields before any frame math
struct LabelFields {
    hours: u64,
    minutes: u64,
    seconds: u64,
    frames: u64,
}

/// Converts between seconds, frame indices and SMPTE labels for one frame rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmpteCodec {
    rate: FrameRate,
    drop_frame: bool,
    strict: bool,
}

impl SmpteCodec {
    /// Create a codec; drop-frame falls back to NDF math at rates other than 29.97/59.94
    pub fn new(rate: FrameRate, drop_frame: bool) -> Self {
        let eligible = rate.is_drop_frame_eligible();
        if drop_frame && !eligible {
            warn!("Drop-frame requested at {}, using non-drop-frame numbering", rate);
        }

        Self {
            rate,
            drop_frame: drop_frame && eligible,
            strict: false,
        }
    }

    /// Codec for a document's frame rate and drop-frame flag
    pub fn for_document(document: &Document) -> Self {
        Self::new(document.frame_rate(), document.drop_frame)
    }

    /// Reject dropped frame numbers instead of flagging them
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn rate(&self) -> FrameRate {
        self.rate
    }

    /// Whether drop-frame numbering is actually in effect
    pub fn is_drop_frame(&self) -> bool {
        self.drop_frame
    }

    /// Nearest frame index for an elapsed time; negative or non-finite input maps to 0
    pub fn seconds_to_frames(&self, seconds: f64) -> u64 {
        if !seconds.is_finite() || seconds <= 0.0 {
            if seconds < 0.0 || seconds.is_nan() {
                debug!("Clamping elapsed time {} to zero", seconds);
            }
            return 0;
        }

        let frames = (seconds * self.rate.as_f64()).round();
        if frames >= MAX_FRAME_COUNT as f64 {
            warn!("Elapsed time {} is beyond the largest timecode, capping", seconds);
            return MAX_FRAME_COUNT;
        }
        frames as u64
    }

    pub fn frames_to_seconds(&self, frames: u64) -> f64 {
        frames as f64 / self.rate.as_f64()
    }

    /// Format a frame index as a label
    pub fn frames_to_label(&self, frames: u64) -> String {
        let frames = frames.min(MAX_FRAME_COUNT);
        let nominal = u64::from(self.rate.nominal());

        let (counted, separator) = if self.drop_frame {
            (self.compensate_dropped_frames(frames), ';')
        } else {
            (frames, ':')
        };

        let ff = counted % nominal;
        let total_seconds = counted / nominal;
        let ss = total_seconds % 60;
        let mm = (total_seconds / 60) % 60;
        let hh = total_seconds / 3600;

        format!("{:02}:{:02}:{:02}{}{:02}", hh, mm, ss, separator, ff)
    }

    /// Add back the frame numbers that drop-frame counting skipped up to `frames`
    fn compensate_dropped_frames(&self, frames: u64) -> u64 {
        let nominal = u64::from(self.rate.nominal());
        let dropped = u64::from(self.rate.dropped_per_minute());
        let frames_per_minute = nominal * 60 - dropped;
        let frames_per_ten_minutes = nominal * 600 - 9 * dropped;

        let ten_minute_blocks = frames / frames_per_ten_minutes;
        let remainder = frames % frames_per_ten_minutes;

        let mut counted = frames.saturating_add((9 * dropped).saturating_mul(ten_minute_blocks));
        if remainder > dropped {
            counted = counted.saturating_add(dropped * ((remainder - dropped) / frames_per_minute));
        }
        counted
    }

    /// Parse a label into a frame index, collecting warnings
    pub fn label_to_frames(&self, label: &str) -> Result<(u64, Vec<CaptionWarning>), TimecodeError> {
        let fields = self.parse_fields(label)?;
        let nominal = u64::from(self.rate.nominal());
        let mut warnings = Vec::new();

        let total_minutes = fields.hours * 60 + fields.minutes;
        let mut frames =
            (fields.hours * 3600 + fields.minutes * 60 + fields.seconds) * nominal + fields.frames;

        if self.drop_frame {
            let dropped = u64::from(self.rate.dropped_per_minute());

            if fields.seconds == 0 && fields.minutes % 10 != 0 && fields.frames < dropped {
                if self.strict {
                    return Err(TimecodeError::DroppedFrameLabel(label.to_string()));
                }
                warn!("Accepting drop-frame label {} that names a dropped frame number", label);
                warnings.push(CaptionWarning::IllegalDropFrame {
                    label: label.to_string(),
                });
            }

            frames = frames.saturating_sub(dropped * (total_minutes - total_minutes / 10));
        }

        Ok((frames, warnings))
    }

    fn parse_fields(&self, label: &str) -> Result<LabelFields, TimecodeError> {
        let trimmed = label.trim();
        let captures = SMPTE_REGEX
            .captures(trimmed)
            .ok_or_else(|| TimecodeError::MalformedSmpte(label.to_string()))?;

        let field = |index: usize| -> Result<u32, TimecodeError> {
            captures[index]
                .parse::<u32>()
                .map_err(|_| TimecodeError::MalformedSmpte(label.to_string()))
        };

        let hours = field(1)?;
        let minutes = field(2)?;
        let seconds = field(3)?;
        let frames = field(5)?;

        if minutes >= 60 {
            return Err(TimecodeError::FieldOutOfRange {
                label: label.to_string(),
                field: "minutes",
                value: minutes,
            });
        }
        if seconds >= 60 {
            return Err(TimecodeError::FieldOutOfRange {
                label: label.to_string(),
                field: "seconds",
                value: seconds,
            });
        }

        let nominal = self.rate.nominal();
        if frames >= nominal {
            return Err(TimecodeError::FrameOutOfRange {
                label: label.to_string(),
                frame: frames,
                nominal_fps: nominal,
            });
        }

        let separator_is_drop = &captures[4] == ";";
        if separator_is_drop != self.drop_frame {
            debug!(
                "Label {} uses '{}' but codec is {}",
                label,
                &captures[4],
                if self.drop_frame { "drop-frame" } else { "non-drop-frame" }
            );
        }

        Ok(LabelFields {
            hours: u64::from(hours),
            minutes: u64::from(minutes),
            seconds: u64::from(seconds),
            frames: u64::from(frames),
        })
    }

    /// Format elapsed seconds as a label
    pub fn format(&self, seconds: f64) -> String {
        self.frames_to_label(self.seconds_to_frames(seconds))
    }

    /// Parse a label into elapsed seconds
    pub fn parse(&self, label: &str) -> Result<f64, TimecodeError> {
        self.parse_checked(label).map(|parsed| parsed.seconds)
    }

    /// Parse a label, keeping the frame index and any warnings
    pub fn parse_checked(&self, label: &str) -> Result<ParsedTimecode, TimecodeError> {
        let (frames, warnings) = self.label_to_frames(label)?;
        Ok(ParsedTimecode {
            seconds: self.frames_to_seconds(frames),
            frames,
            warnings,
        })
    }
}

/// Format elapsed seconds as `HH:MM:SS:FF` (NDF) or `HH:MM:SS;FF` (DF)
pub fn seconds_to_smpte(seconds: f64, fps: f64, drop_frame: bool) -> String {
    SmpteCodec::new(FrameRate::from_fps_or_default(fps), drop_frame).format(seconds)
}

/// Parse an SMPTE label into elapsed seconds
pub fn smpte_to_seconds(label: &str, fps: f64, drop_frame: bool) -> Result<f64, TimecodeError> {
    let rate = FrameRate::from_fps(fps)?;
    SmpteCodec::new(rate, drop_frame).parse(label)
}

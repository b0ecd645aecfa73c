/*!
 * Active cue lookup for a playback time.
 *
 * Events must be sorted by start. Lookup is a binary search for the last
 * event starting at or before the query, with half a frame of slack for
 * frame quantization. When several events qualify the later one wins.
 */

use crate::caption_processor::{CaptionEvent, Document};
use crate::timecode::FrameRate;

/// Finds the event on screen at a given time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueLocator {
    epsilon: f64,
}

impl CueLocator {
    /// Slack of half a frame at `fps`
    pub fn new(fps: f64) -> Self {
        Self {
            epsilon: FrameRate::from_fps_or_default(fps).frame_duration() / 2.0,
        }
    }

    pub fn for_document(document: &Document) -> Self {
        Self {
            epsilon: document.frame_duration() / 2.0,
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Greatest index whose start is at or before `t`, or None before the first event
    pub fn locate(&self, events: &[CaptionEvent], t: f64) -> Option<usize> {
        if !t.is_finite() {
            return None;
        }

        let limit = t + self.epsilon;
        events.partition_point(|event| event.start <= limit).checked_sub(1)
    }

    /// Like `locate`, but None when the located event has already ended
    pub fn locate_active(&self, events: &[CaptionEvent], t: f64) -> Option<usize> {
        self.locate(events, t).filter(|&index| t < events[index].end)
    }
}

/// Index of the event on screen at `t`
pub fn locate(events: &[CaptionEvent], t: f64, fps: f64) -> Option<usize> {
    CueLocator::new(fps).locate(events, t)
}

/*!
 * Start-timecode offset handling.
 *
 * A document may assign an arbitrary SMPTE label (commonly `01:00:00;00`) to
 * media time zero. The offset only applies to values entering or leaving a
 * timecode display or export; stored event times stay in media time.
 */

use log::warn;

use crate::caption_processor::Document;
use crate::errors::TimecodeError;
use crate::timecode::SmpteCodec;

/// Seconds represented by the document's start label, or 0 when it has none
pub fn start_offset_seconds(document: &Document) -> Result<f64, TimecodeError> {
    match document.start_timecode_label.as_deref().map(str::trim) {
        Some(label) if !label.is_empty() => SmpteCodec::for_document(document).parse(label),
        _ => Ok(0.0),
    }
}

/// Label shown to the user for a media time
pub fn media_to_display_label(media_seconds: f64, document: &Document) -> Result<String, TimecodeError> {
    let offset = start_offset_seconds(document)?;
    Ok(SmpteCodec::for_document(document).format(media_seconds + offset))
}

/// Media time for a label typed by the user; labels before the start offset map to 0
pub fn display_label_to_media(label: &str, document: &Document) -> Result<f64, TimecodeError> {
    let offset = start_offset_seconds(document)?;
    let displayed = SmpteCodec::for_document(document).parse(label)?;

    let media = displayed - offset;
    if media < 0.0 {
        warn!(
            "Timecode {} is before the document start offset, using media time 0",
            label
        );
        return Ok(0.0);
    }

    Ok(media)
}

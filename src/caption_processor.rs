use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};

use crate::placement::{GRID_ROWS, MAX_COL, MAX_ROW, MIN_COL, MIN_ROW};
use crate::timecode::FrameRate;

// @module: Caption events, document metadata and the JSON interchange shape

// @struct: Row/column address on the 15x32 caption grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    // @field: Grid row, 1..=15 when legal
    pub row: i32,

    // @field: Grid column, 0..=31 when legal
    pub col: i32,
}

impl Placement {
    pub fn new(row: i32, col: i32) -> Self {
        Placement { row, col }
    }

    /// Clamp the placement into the legal grid domain
    pub fn clamped(self) -> Self {
        Placement {
            row: self.row.clamp(MIN_ROW, MAX_ROW),
            col: self.col.clamp(MIN_COL, MAX_COL),
        }
    }

    /// Whether the placement already lies inside the grid
    pub fn is_in_domain(&self) -> bool {
        (MIN_ROW..=MAX_ROW).contains(&self.row) && (MIN_COL..=MAX_COL).contains(&self.col)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(row {}, col {})", self.row, self.col)
    }
}

/// Shapes that placement data has been stored in by older documents
#[derive(Deserialize)]
#[serde(untagged)]
enum LegacyPlacements {
    List(Vec<Option<Placement>>),
    Single(Placement),
    Sparse(BTreeMap<String, Option<Placement>>),
}

impl LegacyPlacements {
    fn normalize(self) -> Vec<Option<Placement>> {
        match self {
            LegacyPlacements::List(list) => list,
            LegacyPlacements::Single(placement) => vec![Some(placement)],
            LegacyPlacements::Sparse(map) => {
                let mut indexed = Vec::new();
                for (key, placement) in map {
                    match key.trim().parse::<usize>() {
                        Ok(index) if index < GRID_ROWS => indexed.push((index, placement)),
                        Ok(index) => warn!(
                            "Ignoring placement for line {}, captions have at most {} lines",
                            index, GRID_ROWS
                        ),
                        Err(_) => warn!("Ignoring placement with non-numeric line key '{}'", key),
                    }
                }

                // Indices are below GRID_ROWS, so the length is bounded
                let len = indexed.iter().map(|(index, _)| index + 1).max().unwrap_or(0);
                let mut normalized = vec![None; len];
                for (index, placement) in indexed {
                    normalized[index] = placement;
                }
                normalized
            }
        }
    }
}

fn deserialize_legacy_placements<'de, D>(deserializer: D) -> Result<Option<Vec<Option<Placement>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<LegacyPlacements> = Option::deserialize(deserializer)?;
    Ok(raw.map(LegacyPlacements::normalize))
}

// @struct: One timed caption unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionEvent {
    // @field: Start time in seconds
    pub start: f64,

    // @field: End time in seconds
    pub end: f64,

    // @field: Wrapped text lines, top to bottom as authored
    pub lines: Vec<String>,

    // @field: Optional placement per line; None means "compute a default"
    #[serde(
        default,
        deserialize_with = "deserialize_legacy_placements",
        skip_serializing_if = "Option::is_none"
    )]
    pub placement: Option<Vec<Option<Placement>>>,
}

impl CaptionEvent {
    /// Creates an event without validation
    pub fn new(start: f64, end: f64, lines: Vec<String>) -> Self {
        CaptionEvent {
            start,
            end,
            lines,
            placement: None,
        }
    }

    // @creates: Validated caption event
    // @validates: Time range and non-empty text
    pub fn new_validated(start: f64, end: f64, lines: Vec<String>) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(anyhow!("Non-finite event time: start {} end {}", start, end));
        }

        if end <= start {
            return Err(anyhow!(
                "Invalid time range: end time {} <= start time {}",
                end, start
            ));
        }

        if lines.is_empty() || lines.iter().all(|line| line.trim().is_empty()) {
            return Err(anyhow!("Empty caption text for event starting at {}", start));
        }

        Ok(CaptionEvent::new(start, end, lines))
    }

    /// Attach explicit placements, one per line
    pub fn with_placement(mut self, placements: Vec<Option<Placement>>) -> Self {
        self.placement = Some(placements);
        self
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Explicit placement for a line, if the event carries one
    pub fn placement_for(&self, line: usize) -> Option<Placement> {
        self.placement
            .as_ref()
            .and_then(|placements| placements.get(line).copied().flatten())
    }

    pub fn first_line(&self) -> Option<&str> {
        self.lines.first().map(|line| line.as_str())
    }
}

// @struct: Document-level timing metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    // @field: Nominal frame rate, e.g. 23.976, 25, 29.97, 30
    #[serde(default = "default_fps")]
    pub fps: f64,

    // @field: Whether labels use drop-frame numbering
    #[serde(default, alias = "dropFrame")]
    pub drop_frame: bool,

    // @field: SMPTE label assigned to media time zero
    #[serde(default, alias = "startTimecodeLabel", skip_serializing_if = "Option::is_none")]
    pub start_timecode_label: Option<String>,
}

impl Document {
    pub fn new(fps: f64, drop_frame: bool) -> Self {
        Document {
            fps,
            drop_frame,
            start_timecode_label: None,
        }
    }

    pub fn with_start_timecode(mut self, label: &str) -> Self {
        self.start_timecode_label = Some(label.to_string());
        self
    }

    /// Frame rate with NTSC rates snapped to their exact values; 30 fps when unusable
    pub fn frame_rate(&self) -> FrameRate {
        FrameRate::from_fps_or_default(self.fps)
    }

    pub fn frame_duration(&self) -> f64 {
        self.frame_rate().frame_duration()
    }

    /// Drop-frame math only applies at 29.97 and 59.94
    pub fn uses_drop_frame(&self) -> bool {
        self.drop_frame && self.frame_rate().is_drop_frame_eligible()
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::new(default_fps(), false)
    }
}

fn default_fps() -> f64 {
    29.97
}

/// Caption events plus document metadata, as exchanged with import/export tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionCollection {
    /// Source filename
    #[serde(skip)]
    pub source_file: PathBuf,

    /// Timing metadata
    #[serde(flatten)]
    pub document: Document,

    /// Caption events, sorted by start
    #[serde(default)]
    pub events: Vec<CaptionEvent>,
}

impl CaptionCollection {
    /// Create an empty collection
    pub fn new(source_file: PathBuf, document: Document) -> Self {
        CaptionCollection {
            source_file,
            document,
            events: Vec::new(),
        }
    }

    /// Parse the JSON interchange shape, keeping events in file order
    pub fn parse_json_str_in_file_order(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse caption document JSON")
    }

    /// Parse the JSON interchange shape, with events sorted by start time
    pub fn parse_json_str(content: &str) -> Result<Self> {
        let mut collection = Self::parse_json_str_in_file_order(content)?;

        if !collection.is_sorted() {
            debug!("Caption events were not sorted by start time, sorting");
            collection.sort_events();
        }

        Ok(collection)
    }

    /// Load a collection from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read caption document: {}", path.display()))?;

        let mut collection = Self::parse_json_str(&content)
            .with_context(|| format!("Invalid caption document: {}", path.display()))?;
        collection.source_file = path.to_path_buf();

        debug!("Loaded {} caption events from {:?}", collection.events.len(), path);
        Ok(collection)
    }

    /// Serialize to pretty JSON, with placements in the normalized list shape
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize caption document")
    }

    /// Write the collection to a JSON file
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        fs::write(path, self.to_json_string()?)
            .with_context(|| format!("Failed to write caption document: {}", path.display()))
    }

    /// Stable sort by start time
    pub fn sort_events(&mut self) {
        self.events.sort_by(|a, b| a.start.total_cmp(&b.start));
    }

    pub fn is_sorted(&self) -> bool {
        self.events.windows(2).all(|pair| pair[0].start <= pair[1].start)
    }
}

/*!
 * Mid-row style tokens.
 *
 * Caption text may carry inline tokens such as `{I}`, `{IU}`, `{Wh}`,
 * `{YU}` that stand for CEA-608 mid-row codes. A decoder treats each code as
 * a character: it changes the running style and occupies one blank cell.
 * The tokenizer reproduces that so line lengths match what goes to air.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::placement::{GRID_COLUMNS, MAX_COL, MIN_COL};

/// Color and italic tokens, each with an optional `U` (underline) suffix
static STYLE_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(Wh|Gr|Bl|Cy|R|Y|Ma|I)(U?)\}").expect("Invalid style token regex")
});

/// Foreground colors available to mid-row codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CaptionColor {
    #[default]
    White,
    Green,
    Blue,
    Cyan,
    Red,
    Yellow,
    Magenta,
}

impl CaptionColor {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "Wh" => Some(Self::White),
            "Gr" => Some(Self::Green),
            "Bl" => Some(Self::Blue),
            "Cy" => Some(Self::Cyan),
            "R" => Some(Self::Red),
            "Y" => Some(Self::Yellow),
            "Ma" => Some(Self::Magenta),
            _ => None,
        }
    }

    /// Token code used in caption text
    pub fn code(self) -> &'static str {
        match self {
            Self::White => "Wh",
            Self::Green => "Gr",
            Self::Blue => "Bl",
            Self::Cyan => "Cy",
            Self::Red => "R",
            Self::Yellow => "Y",
            Self::Magenta => "Ma",
        }
    }
}

/// Style carried by a display cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct CellStyle {
    pub color: CaptionColor,
    pub italic: bool,
    pub underline: bool,
}

/// One character position on a caption line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayCell {
    pub character: char,
    pub style: CellStyle,
}

impl DisplayCell {
    pub fn is_blank(&self) -> bool {
        self.character == ' '
    }
}

/// A parsed mid-row token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StyleToken {
    Color { color: CaptionColor, underline: bool },
    Italic { underline: bool },
}

impl StyleToken {
    fn parse(code: &str, underline: bool) -> Option<Self> {
        if code == "I" {
            return Some(StyleToken::Italic { underline });
        }
        CaptionColor::from_code(code).map(|color| StyleToken::Color { color, underline })
    }

    /// Color codes cancel italics; the italic code keeps the current color
    fn apply(self, style: CellStyle) -> CellStyle {
        match self {
            StyleToken::Color { color, underline } => CellStyle {
                color,
                italic: false,
                underline,
            },
            StyleToken::Italic { underline } => CellStyle {
                color: style.color,
                italic: true,
                underline,
            },
        }
    }
}

/// Expands caption text with mid-row tokens into display cells
pub struct MidRowTokenizer;

impl MidRowTokenizer {
    /// Every cell the text produces, tokens included, without clamping
    pub fn tokenize_unclamped(text: &str) -> Vec<DisplayCell> {
        let mut cells = Vec::with_capacity(text.len());
        let mut style = CellStyle::default();
        let mut cursor = 0;

        for captures in STYLE_TOKEN_REGEX.captures_iter(text) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            Self::push_literal(&mut cells, &text[cursor..whole.start()], style);
            cursor = whole.end();

            let underline = !captures[2].is_empty();
            match StyleToken::parse(&captures[1], underline) {
                Some(token) => {
                    style = token.apply(style);
                    cells.push(DisplayCell { character: ' ', style });
                }
                None => Self::push_literal(&mut cells, whole.as_str(), style),
            }
        }

        Self::push_literal(&mut cells, &text[cursor..], style);
        cells
    }

    fn push_literal(cells: &mut Vec<DisplayCell>, literal: &str, style: CellStyle) {
        cells.extend(literal.chars().map(|character| DisplayCell { character, style }));
    }

    /// Cells for a line starting at `start_column`: clamped to the columns left
    /// on the row, then stripped of trailing blanks
    pub fn tokenize_line(text: &str, start_column: i32) -> Vec<DisplayCell> {
        let mut cells = Self::tokenize_unclamped(text);
        cells.truncate(Self::available_columns(start_column));

        while cells.last().is_some_and(DisplayCell::is_blank) {
            cells.pop();
        }
        cells
    }

    /// Columns remaining on a row from a (clamped) start column
    pub fn available_columns(start_column: i32) -> usize {
        let column = start_column.clamp(MIN_COL, MAX_COL) as usize;
        GRID_COLUMNS - column
    }

    /// Width of the text once tokens are expanded
    pub fn cell_count(text: &str) -> usize {
        Self::tokenize_unclamped(text).len()
    }

    /// Text with all recognised tokens removed
    pub fn strip_tokens(text: &str) -> String {
        STYLE_TOKEN_REGEX.replace_all(text, "").into_owned()
    }
}

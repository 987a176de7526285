// Sprite sheet slicing: row specifications into positioned slices

use log::{debug, warn};
use std::str::FromStr;

/// Literal flag marking a segment as blank padding
pub const WHITESPACE_TAG: &str = "whitespace";

/// Errors produced while parsing a row specification
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SliceError {
    #[error("segment `{0}` is missing its WIDTHxHEIGHT size")]
    MissingSize(String),

    #[error("segment `{segment}` has an invalid {field}")]
    InvalidNumber {
        segment: String,
        field: &'static str,
    },

    #[error("row does not fit in sheet coordinates")]
    Overflow,
}

/// A run of identically sized slices, e.g. `4:32x48` or `1:32x48:whitespace`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub count: u32,
    pub width: u32,
    pub height: u32,
    pub whitespace: bool,
}

impl FromStr for Segment {
    type Err = SliceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segment = s.trim();
        let mut parts = segment.split(':');

        let count = parts.next().unwrap_or_default();
        let size = parts
            .next()
            .ok_or_else(|| SliceError::MissingSize(segment.to_string()))?;
        let flag = parts.next().unwrap_or_default();

        let (width, height) = size
            .split_once('x')
            .ok_or_else(|| SliceError::MissingSize(segment.to_string()))?;

        Ok(Self {
            count: parse_positive(count, segment, "count")?,
            width: parse_positive(width, segment, "width")?,
            height: parse_positive(height, segment, "height")?,
            whitespace: flag.trim() == WHITESPACE_TAG,
        })
    }
}

fn parse_positive(text: &str, segment: &str, field: &'static str) -> Result<u32, SliceError> {
    match text.trim().parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(SliceError::InvalidNumber {
            segment: segment.to_string(),
            field,
        }),
    }
}

/// Parse one row specification into its segments
///
/// The row is all-or-nothing: one malformed segment rejects the whole row.
pub fn parse_row(row: &str) -> Result<Vec<Segment>, SliceError> {
    row.split(',').map(str::parse).collect()
}

/// One rectangular region of the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    /// Top-left corner in sheet pixels
    pub x: u32,
    pub y: u32,

    pub width: u32,
    pub height: u32,

    /// Blank padding that never becomes a frame
    pub whitespace: bool,

    /// Sequential identifier, present on every non-whitespace slice
    pub frame_number: Option<u32>,
}

impl Slice {
    /// Whether this slice is a numbered frame
    pub fn is_frame(&self) -> bool {
        self.frame_number.is_some()
    }
}

/// A row that was skipped during slicing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// 1-based line in the row specification
    pub line: usize,
    pub error: SliceError,
}

/// The ordered slices of one sheet plus the numbered frame subsequence
#[derive(Debug, Clone, Default)]
pub struct SliceSheet {
    slices: Vec<Slice>,
    frames: Vec<Slice>,
    rejected_rows: Vec<RejectedRow>,
}

impl SliceSheet {
    /// Slice a sheet from its row specifications
    ///
    /// Rows are laid out top to bottom; each row advances the cursor by the
    /// height of its first segment only.
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sheet = Self::default();
        let mut next_frame = 1;
        let mut y: u32 = 0;

        for (index, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();
            if row.trim().is_empty() {
                continue;
            }

            let line = index + 1;
            let result = parse_row(row).and_then(|segments| {
                Self::layout_row(&segments, y, next_frame).map(|laid| (segments, laid))
            });

            match result {
                Ok((segments, (slices, advance))) => {
                    for slice in &slices {
                        if slice.is_frame() {
                            sheet.frames.push(*slice);
                            next_frame += 1;
                        }
                    }
                    sheet.slices.extend(slices);
                    y = advance;
                    debug!("Row {}: {} segment(s)", line, segments.len());
                }
                Err(error) => {
                    warn!("Skipping row {} `{}`: {}", line, row.trim(), error);
                    sheet.rejected_rows.push(RejectedRow { line, error });
                }
            }
        }

        sheet
    }

    /// Lay out one row's slices; returns them and the next row's y
    fn layout_row(
        segments: &[Segment],
        y: u32,
        first_frame: u32,
    ) -> Result<(Vec<Slice>, u32), SliceError> {
        let mut slices = Vec::new();
        let mut x: u32 = 0;
        let mut frame_number = first_frame;

        for segment in segments {
            for _ in 0..segment.count {
                let frame = if segment.whitespace {
                    None
                } else {
                    let number = frame_number;
                    frame_number = frame_number.checked_add(1).ok_or(SliceError::Overflow)?;
                    Some(number)
                };

                slices.push(Slice {
                    x,
                    y,
                    width: segment.width,
                    height: segment.height,
                    whitespace: segment.whitespace,
                    frame_number: frame,
                });

                x = x.checked_add(segment.width).ok_or(SliceError::Overflow)?;
            }
        }

        let row_height = segments.first().map_or(0, |s| s.height);
        let next_y = y.checked_add(row_height).ok_or(SliceError::Overflow)?;

        Ok((slices, next_y))
    }

    /// All slices in production order
    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    /// Numbered frames in production order
    pub fn frames(&self) -> &[Slice] {
        &self.frames
    }

    /// Rows skipped because they failed to parse
    pub fn rejected_rows(&self) -> &[RejectedRow] {
        &self.rejected_rows
    }

    /// Smallest frame width and height, used as the sprite anchor
    pub fn min_frame_size(&self) -> Option<(u32, u32)> {
        let width = self.frames.iter().map(|f| f.width).min()?;
        let height = self.frames.iter().map(|f| f.height).min()?;
        Some((width, height))
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

// Action range parser: `1-4,7:side_walk` lines into animation clips

use super::animation::{ActionTag, AnimationClip, ClipSet, Direction, Motion, UnsupportedAction};
use crate::engine::assets::{Slice, SliceSheet};
use crate::game::config::FrameDelays;
use log::{debug, warn};
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Why an action line produced no clip
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionParseError {
    #[error("line `{0}` has no `:action` part")]
    MissingAction(String),

    #[error(transparent)]
    Unsupported(#[from] UnsupportedAction),

    #[error("`{0}` selects no frames")]
    NoFrames(String),
}

/// Parse the ranges part of a line
///
/// Tokens are single frame numbers or inclusive ascending `a-b` spans.
/// Descending spans and unparseable tokens are dropped.
pub fn parse_ranges(text: &str) -> Vec<RangeInclusive<u32>> {
    let mut ranges = Vec::new();

    for token in text.split(',').map(str::trim) {
        let range = match token.split_once('-') {
            Some((start, rest)) => {
                // `1-2-3` reads as `1-2`
                let end = rest.split('-').next().unwrap_or_default();
                match (start.trim().parse::<u32>(), end.trim().parse::<u32>()) {
                    (Ok(start), Ok(end)) if start <= end => Some(start..=end),
                    _ => None,
                }
            }
            None => token.parse::<u32>().ok().map(|n| n..=n),
        };

        match range {
            Some(range) => ranges.push(range),
            None => debug!("Ignoring frame token `{}`", token),
        }
    }

    ranges
}

/// One parsed `<ranges>:<action>` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLine {
    pub ranges: Vec<RangeInclusive<u32>>,
    pub tag: ActionTag,
}

impl ActionLine {
    /// Whether the line asks for frame `number`
    pub fn requests(&self, number: u32) -> bool {
        self.ranges.iter().any(|range| range.contains(&number))
    }

    /// Requested frames in sheet order, regardless of how ranges were written
    pub fn select(&self, sheet: &SliceSheet) -> Vec<Slice> {
        sheet
            .frames()
            .iter()
            .filter(|frame| frame.frame_number.is_some_and(|n| self.requests(n)))
            .copied()
            .collect()
    }
}

impl FromStr for ActionLine {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':').map(str::trim);
        let ranges = parts.next().unwrap_or_default();
        let action = parts
            .next()
            .ok_or_else(|| ActionParseError::MissingAction(s.trim().to_string()))?;

        Ok(Self {
            tag: action.parse()?,
            ranges: parse_ranges(ranges),
        })
    }
}

/// Build the clip described by one line
pub fn build_clip(
    line: &str,
    sheet: &SliceSheet,
    delays: &FrameDelays,
) -> Result<AnimationClip, ActionParseError> {
    let parsed: ActionLine = line.parse()?;
    let frames = parsed.select(sheet);
    if frames.is_empty() {
        return Err(ActionParseError::NoFrames(line.trim().to_string()));
    }

    let delay = delays.for_motion(parsed.tag.motion);
    Ok(AnimationClip::new(parsed.tag, frames, delay))
}

/// Parse a whole action specification into a fresh clip set
///
/// Invalid lines are skipped; a repeated tag replaces the earlier clip.
pub fn parse_actions(text: &str, sheet: &SliceSheet, delays: &FrameDelays) -> ClipSet {
    let mut clips = ClipSet::new();

    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        match build_clip(line, sheet, delays) {
            Ok(clip) => {
                debug!("Clip {} with {} frame(s)", clip.tag, clip.frame_count());
                clips.insert(clip);
            }
            Err(err) => warn!("Skipping action line: {}", err),
        }
    }

    clips
}

/// Clip used when rows are given without actions: every frame as `side_idle`
pub fn idle_over_all_frames(sheet: &SliceSheet, delays: &FrameDelays) -> Option<AnimationClip> {
    if sheet.frames().is_empty() {
        return None;
    }

    Some(AnimationClip::new(
        ActionTag::new(Direction::Side, Motion::Idle),
        sheet.frames().to_vec(),
        delays.idle,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(clip: &AnimationClip) -> Vec<u32> {
        clip.frames.iter().filter_map(|f| f.frame_number).collect()
    }

    fn sample_sheet() -> SliceSheet {
        SliceSheet::from_rows(["2:16x16,1:16x16:whitespace", "1:16x16"])
    }

    fn delays() -> FrameDelays {
        FrameDelays {
            walk: 100,
            idle: 200,
            attack: 50,
        }
    }

    #[test]
    fn test_parse_ranges() {
        assert_eq!(parse_ranges("1"), vec![1..=1]);
        assert_eq!(parse_ranges("1-3, 7"), vec![1..=3, 7..=7]);
        assert_eq!(parse_ranges("5-2,4"), vec![4..=4]);
        assert_eq!(parse_ranges("a,2-b, ,3"), vec![3..=3]);
        assert_eq!(parse_ranges("1-2-3"), vec![1..=2]);
    }

    #[test]
    fn test_sheet_order_not_input_order() {
        let clip = build_clip("3,1-2:side_walk", &sample_sheet(), &delays()).unwrap();
        assert_eq!(clip.tag.to_string(), "side_walk");
        assert_eq!(numbers(&clip), vec![1, 2, 3]);
        assert_eq!(clip.frame_delay_ms, 100);
        assert!(clip.looping);
    }

    #[test]
    fn test_duplicates_tolerated() {
        let clip = build_clip("1,1,1-2:up_idle", &sample_sheet(), &delays()).unwrap();
        assert_eq!(numbers(&clip), vec![1, 2]);
        assert_eq!(clip.frame_delay_ms, 200);
    }

    #[test]
    fn test_attack_clip_is_one_shot() {
        let clip = build_clip("2-3:down_attack", &sample_sheet(), &delays()).unwrap();
        assert!(!clip.looping);
        assert_eq!(clip.frame_delay_ms, 50);
    }

    #[test]
    fn test_line_errors() {
        let sheet = sample_sheet();
        assert!(matches!(
            build_clip("1-2", &sheet, &delays()),
            Err(ActionParseError::MissingAction(_))
        ));
        assert!(matches!(
            build_clip("1-2:jump", &sheet, &delays()),
            Err(ActionParseError::Unsupported(_))
        ));
        assert!(matches!(
            build_clip("9-12:side_walk", &sheet, &delays()),
            Err(ActionParseError::NoFrames(_))
        ));
        assert!(matches!(
            build_clip("3-1:side_walk", &sheet, &delays()),
            Err(ActionParseError::NoFrames(_))
        ));
    }

    #[test]
    fn test_huge_range_does_not_expand() {
        let clip = build_clip("2-4000000000:side_idle", &sample_sheet(), &delays()).unwrap();
        assert_eq!(numbers(&clip), vec![2, 3]);
    }

    #[test]
    fn test_parse_actions_skips_bad_lines() {
        let text = "1-2:side_walk\n\n  3:up_walk  \n1:fly\n7:down_idle\n";
        let clips = parse_actions(text, &sample_sheet(), &delays());

        assert_eq!(clips.len(), 2);
        let tags: Vec<String> = clips.iter().map(|c| c.tag.to_string()).collect();
        assert_eq!(tags, vec!["side_walk", "up_walk"]);
    }

    #[test]
    fn test_later_line_replaces_clip() {
        let clips = parse_actions("1:side_idle\n2-3:side_idle", &sample_sheet(), &delays());
        assert_eq!(clips.len(), 1);
        assert_eq!(numbers(clips.first().unwrap()), vec![2, 3]);
    }

    #[test]
    fn test_idle_over_all_frames() {
        let clip = idle_over_all_frames(&sample_sheet(), &delays()).unwrap();
        assert_eq!(clip.tag.to_string(), "side_idle");
        assert_eq!(numbers(&clip), vec![1, 2, 3]);
        assert_eq!(clip.frame_delay_ms, 200);

        let empty = SliceSheet::from_rows(Vec::<&str>::new());
        assert!(idle_over_all_frames(&empty, &delays()).is_none());
    }
}

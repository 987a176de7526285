// Directional animation clips

use crate::engine::assets::Slice;
use std::fmt;
use std::str::FromStr;

/// Facing axis of a clip; `Side` is mirrored for left/right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Side,
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Side => "side",
            Self::Down => "down",
        }
    }
}

/// What the entity is doing in a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Walk,
    Idle,
    Attack,
}

impl Motion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Idle => "idle",
            Self::Attack => "attack",
        }
    }
}

/// One of the nine supported action tags, e.g. `side_walk`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionTag {
    pub direction: Direction,
    pub motion: Motion,
}

impl ActionTag {
    pub const fn new(direction: Direction, motion: Motion) -> Self {
        Self { direction, motion }
    }

    /// Every supported tag
    pub const ALL: [ActionTag; 9] = [
        Self::new(Direction::Up, Motion::Walk),
        Self::new(Direction::Side, Motion::Walk),
        Self::new(Direction::Down, Motion::Walk),
        Self::new(Direction::Up, Motion::Idle),
        Self::new(Direction::Side, Motion::Idle),
        Self::new(Direction::Down, Motion::Idle),
        Self::new(Direction::Up, Motion::Attack),
        Self::new(Direction::Side, Motion::Attack),
        Self::new(Direction::Down, Motion::Attack),
    ];

    /// Attack clips play once; everything else loops
    pub fn loops(&self) -> bool {
        self.motion != Motion::Attack
    }

    /// The `side_*` substitute for a missing `up_*`/`down_*` clip
    pub fn fallback(&self) -> Option<ActionTag> {
        match self.direction {
            Direction::Side => None,
            Direction::Up | Direction::Down => Some(Self::new(Direction::Side, self.motion)),
        }
    }
}

impl fmt::Display for ActionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.direction.as_str(), self.motion.as_str())
    }
}

/// Tag text that is not one of the nine supported actions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported action `{0}`")]
pub struct UnsupportedAction(pub String);

impl FromStr for ActionTag {
    type Err = UnsupportedAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (direction, motion) = s
            .split_once('_')
            .ok_or_else(|| UnsupportedAction(s.to_string()))?;

        let direction = match direction {
            "up" => Direction::Up,
            "side" => Direction::Side,
            "down" => Direction::Down,
            _ => return Err(UnsupportedAction(s.to_string())),
        };
        let motion = match motion {
            "walk" => Motion::Walk,
            "idle" => Motion::Idle,
            "attack" => Motion::Attack,
            _ => return Err(UnsupportedAction(s.to_string())),
        };

        Ok(Self::new(direction, motion))
    }
}

/// A named, ordered run of sheet frames
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub tag: ActionTag,
    /// Frames in sheet order
    pub frames: Vec<Slice>,
    pub looping: bool,
    /// Display time of each frame
    pub frame_delay_ms: u32,
}

impl AnimationClip {
    /// Create a clip; looping is derived from the tag
    pub fn new(tag: ActionTag, frames: Vec<Slice>, frame_delay_ms: u32) -> Self {
        Self {
            tag,
            frames,
            looping: tag.loops(),
            frame_delay_ms: frame_delay_ms.max(1),
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// All clips of a session, keyed by tag, in definition order
#[derive(Debug, Clone, Default)]
pub struct ClipSet {
    clips: Vec<AnimationClip>,
}

impl ClipSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clip, replacing an existing clip with the same tag in place
    pub fn insert(&mut self, clip: AnimationClip) {
        match self.clips.iter_mut().find(|c| c.tag == clip.tag) {
            Some(existing) => *existing = clip,
            None => self.clips.push(clip),
        }
    }

    pub fn get(&self, tag: ActionTag) -> Option<&AnimationClip> {
        self.clips.iter().find(|c| c.tag == tag)
    }

    pub fn contains(&self, tag: ActionTag) -> bool {
        self.get(tag).is_some()
    }

    /// Clips in definition order
    pub fn iter(&self) -> impl Iterator<Item = &AnimationClip> {
        self.clips.iter()
    }

    pub fn first(&self) -> Option<&AnimationClip> {
        self.clips.first()
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(number: u32) -> Slice {
        Slice {
            x: (number - 1) * 16,
            y: 0,
            width: 16,
            height: 16,
            whitespace: false,
            frame_number: Some(number),
        }
    }

    #[test]
    fn test_tag_round_trip_names() {
        for tag in ActionTag::ALL {
            let parsed: ActionTag = tag.to_string().parse().unwrap();
            assert_eq!(parsed, tag);
        }
        assert_eq!(
            ActionTag::new(Direction::Down, Motion::Attack).to_string(),
            "down_attack"
        );
    }

    #[test]
    fn test_unsupported_tags() {
        for text in ["jump", "left_walk", "side_run", "side_walk_fast", "", "_"] {
            assert!(text.parse::<ActionTag>().is_err(), "{text} should be rejected");
        }
    }

    #[test]
    fn test_only_attacks_are_one_shot() {
        for tag in ActionTag::ALL {
            assert_eq!(tag.loops(), tag.motion != Motion::Attack);
        }
    }

    #[test]
    fn test_fallback_chain() {
        let up_walk = ActionTag::new(Direction::Up, Motion::Walk);
        let down_idle = ActionTag::new(Direction::Down, Motion::Idle);
        let side_idle = ActionTag::new(Direction::Side, Motion::Idle);

        assert_eq!(
            up_walk.fallback(),
            Some(ActionTag::new(Direction::Side, Motion::Walk))
        );
        assert_eq!(down_idle.fallback(), Some(side_idle));
        assert_eq!(side_idle.fallback(), None);
    }

    #[test]
    fn test_clip_looping_from_tag() {
        let attack = AnimationClip::new(
            ActionTag::new(Direction::Side, Motion::Attack),
            vec![frame(1), frame(2)],
            100,
        );
        assert!(!attack.looping);
        assert_eq!(attack.frame_count(), 2);

        let idle = AnimationClip::new(ActionTag::new(Direction::Up, Motion::Idle), vec![frame(1)], 250);
        assert!(idle.looping);
    }

    #[test]
    fn test_clip_set_replaces_in_place() {
        let side_walk = ActionTag::new(Direction::Side, Motion::Walk);
        let up_idle = ActionTag::new(Direction::Up, Motion::Idle);

        let mut clips = ClipSet::new();
        clips.insert(AnimationClip::new(side_walk, vec![frame(1)], 100));
        clips.insert(AnimationClip::new(up_idle, vec![frame(2)], 100));
        clips.insert(AnimationClip::new(side_walk, vec![frame(3)], 100));

        assert_eq!(clips.len(), 2);
        assert_eq!(clips.first().map(|c| c.tag), Some(side_walk));
        assert_eq!(clips.get(side_walk).unwrap().frames, vec![frame(3)]);
        assert!(clips.contains(up_idle));
    }
}

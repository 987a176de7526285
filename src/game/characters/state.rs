// Animation state machine
//
// Selects which clip plays from movement keys, the aim pointer and the
// attacking flag, and advances it through time. Clips are borrowed from the
// session's `ClipSet` on every call; the machine only remembers the tag.

use super::animation::{ActionTag, AnimationClip, ClipSet, Direction, Motion};
use crate::engine::assets::Slice;
use glam::{IVec2, Vec2};
use log::trace;

/// Start-up clip preference, before falling back to the first defined clip
const START_PREFERENCE: [ActionTag; 3] = [
    ActionTag::new(Direction::Side, Motion::Idle),
    ActionTag::new(Direction::Down, Motion::Idle),
    ActionTag::new(Direction::Up, Motion::Idle),
];

/// Playback state mutated once per tick
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    /// Tag of the clip being played, if any clip exists
    pub current: Option<ActionTag>,
    pub frame_index: usize,
    pub elapsed_ms: f32,
    pub facing_left: bool,
    /// Direction latched by the last movement, used while idle
    pub last_direction: Direction,
    pub last_facing_left: bool,
    pub attacking: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current: None,
            frame_index: 0,
            elapsed_ms: 0.0,
            facing_left: false,
            last_direction: Direction::Side,
            last_facing_left: false,
            attacking: false,
        }
    }
}

/// State machine that picks and advances the visible clip
#[derive(Debug, Default)]
pub struct AnimationStateMachine {
    state: PlaybackState,
}

impl AnimationStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the playback state
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Forget everything, leaving nothing to play
    pub fn reset(&mut self) {
        self.state = PlaybackState::default();
    }

    /// Choose the start-up clip from a freshly parsed clip set
    ///
    /// Returns false when there is nothing to play.
    pub fn start(&mut self, clips: &ClipSet) -> bool {
        self.reset();

        let initial = START_PREFERENCE
            .iter()
            .copied()
            .find(|tag| clips.contains(*tag))
            .or_else(|| clips.first().map(|clip| clip.tag));

        match initial {
            Some(tag) => {
                self.state.current = Some(tag);
                self.state.last_direction = tag.direction;
                true
            }
            None => false,
        }
    }

    /// Whether a clip is selected
    pub fn is_playing(&self) -> bool {
        self.state.current.is_some()
    }

    pub fn facing_left(&self) -> bool {
        self.state.facing_left
    }

    pub fn last_direction(&self) -> Direction {
        self.state.last_direction
    }

    pub fn frame_index(&self) -> usize {
        self.state.frame_index
    }

    /// The clip being played
    pub fn current_clip<'a>(&self, clips: &'a ClipSet) -> Option<&'a AnimationClip> {
        self.state.current.and_then(|tag| clips.get(tag))
    }

    /// The frame to draw this tick
    pub fn current_frame(&self, clips: &ClipSet) -> Option<Slice> {
        self.current_clip(clips)
            .and_then(|clip| clip.frames.get(self.state.frame_index))
            .copied()
    }

    /// Movement tag wanted for `axes`; latches direction while moving
    fn desired_movement(&mut self, axes: IVec2) -> (ActionTag, bool) {
        let moving = axes != IVec2::ZERO;
        let mut direction = self.state.last_direction;
        let mut facing_left = self.state.last_facing_left;

        if moving {
            // Horizontal wins when both axes are held
            if axes.x != 0 {
                direction = Direction::Side;
                facing_left = axes.x < 0;
            } else {
                direction = if axes.y < 0 {
                    Direction::Up
                } else {
                    Direction::Down
                };
                facing_left = false;
            }
            self.state.last_direction = direction;
            self.state.last_facing_left = facing_left;
        }

        let motion = if moving { Motion::Walk } else { Motion::Idle };
        (ActionTag::new(direction, motion), facing_left)
    }

    /// Pick the walk/idle clip for the held movement keys
    pub fn resolve_movement(&mut self, clips: &ClipSet, axes: IVec2) {
        let (desired, facing_left) = self.desired_movement(axes);

        // Facing only follows the keys when the exact clip exists
        let tag = if clips.contains(desired) {
            self.state.facing_left = facing_left;
            desired
        } else {
            desired.fallback().unwrap_or(desired)
        };

        if self.state.current == Some(tag) {
            return;
        }
        if clips.contains(tag) {
            self.switch_to(tag);
        }
    }

    /// Pick the attack clip aimed along `offset` (pointer minus entity)
    pub fn resolve_attack(&mut self, clips: &ClipSet, offset: Vec2) {
        let (direction, facing_left) = if offset.y.abs() > offset.x.abs() {
            let direction = if offset.y < 0.0 {
                Direction::Up
            } else {
                Direction::Down
            };
            (direction, false)
        } else {
            (Direction::Side, offset.x < 0.0)
        };

        let desired = ActionTag::new(direction, Motion::Attack);
        let tag = if clips.contains(desired) {
            desired
        } else {
            ActionTag::new(Direction::Side, Motion::Attack)
        };

        // No attack clip at all: keep animating the current clip
        if !clips.contains(tag) {
            return;
        }
        if self.state.current != Some(tag) {
            self.switch_to(tag);
        }
        self.state.facing_left = facing_left;
    }

    /// Drop the attack and go straight back to the movement clip
    pub fn release_attack(&mut self, clips: &ClipSet, axes: IVec2) {
        self.state.attacking = false;
        if self.is_playing() {
            self.resolve_movement(clips, axes);
        }
    }

    /// Clip selection for the start of a tick
    pub fn resolve(&mut self, clips: &ClipSet, axes: IVec2, attacking: bool, aim_offset: Vec2) {
        self.state.attacking = attacking;

        if attacking {
            self.resolve_attack(clips, aim_offset);
        } else if self.current_clip(clips).is_some_and(|clip| clip.looping) {
            self.resolve_movement(clips, axes);
        }
    }

    /// Advance the playback timer by `dt_ms`
    ///
    /// Whole elapsed frames are applied in one step, so a long stall costs
    /// the same as a short one. A one-shot clip that wraps once the attack
    /// is released hands control back to movement; while still attacking it
    /// keeps cycling.
    pub fn advance(&mut self, clips: &ClipSet, dt_ms: f32, axes: IVec2) {
        let Some(mut clip) = self.current_clip(clips) else {
            return;
        };

        let mut elapsed = f64::from(self.state.elapsed_ms) + f64::from(dt_ms.max(0.0));
        let mut handed_back = false;

        while !clip.frames.is_empty() {
            let delay = f64::from(clip.frame_delay_ms.max(1));
            let steps = (elapsed / delay).floor();
            if steps < 1.0 {
                break;
            }

            let len = clip.frame_count();
            let to_wrap = len.saturating_sub(self.state.frame_index) as f64;
            if !handed_back && !clip.looping && !self.state.attacking && steps >= to_wrap {
                handed_back = true;
                elapsed -= to_wrap * delay;
                self.state.frame_index = 0;

                let before = self.state.current;
                self.resolve_movement(clips, axes);
                if self.state.current != before {
                    elapsed = 0.0;
                }
                match self.current_clip(clips) {
                    Some(next) => clip = next,
                    None => break,
                }
                continue;
            }

            elapsed -= steps * delay;
            let index = (self.state.frame_index as f64 + steps) % len as f64;
            self.state.frame_index = index as usize;
            break;
        }

        self.state.elapsed_ms = elapsed as f32;
    }

    fn switch_to(&mut self, tag: ActionTag) {
        trace!("Clip {:?} -> {}", self.state.current.map(|t| t.to_string()), tag);
        self.state.current = Some(tag);
        self.state.frame_index = 0;
        self.state.elapsed_ms = 0.0;
    }
}

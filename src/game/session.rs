// Session state and the controller that drives it
//
// `Session` is the one context object holding everything a sheet produces:
// slices, clips, playback, entity pose and preview viewport. `Controller`
// owns the session together with the frame scheduler and the sheet loader,
// and is the only place a (re)slice happens.

use super::characters::{
    idle_over_all_frames, parse_actions, AnimationStateMachine, ClipSet, Entity, MovementStats,
};
use super::config::SessionConfig;
use super::render::{draw_preview, draw_stage, StageSprite};
use crate::engine::assets::{AssetError, SheetImage, SheetLoader, SheetSource, SliceSheet};
use crate::engine::game_loop::{Clock, FrameScheduler};
use crate::engine::input::{InputEvent, InputState};
use crate::engine::renderer::{Canvas, Viewport};
use glam::Vec2;
use log::{debug, error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Please select an image file or enter an image URL.")]
    MissingImage,

    #[error("Row configurations are required for actions.")]
    RowsRequired,

    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Everything derived from the current sheet and configuration
pub struct Session {
    sheet: Option<SheetImage>,
    slices: SliceSheet,
    clips: ClipSet,
    animation: AnimationStateMachine,
    entity: Entity,
    viewport: Viewport,
    stats: MovementStats,
    sprite_scale: f32,
}

impl Session {
    /// Create an empty session for a `field`-sized stage and `preview`-sized viewer
    pub fn new(field: Vec2, preview: Vec2) -> Self {
        let stats = MovementStats::default();
        Self {
            sheet: None,
            slices: SliceSheet::default(),
            clips: ClipSet::new(),
            animation: AnimationStateMachine::new(),
            entity: Entity::new(field, stats.base_speed),
            viewport: Viewport::new(preview),
            stats,
            sprite_scale: 1.0,
        }
    }

    /// Replace slices, clips and playback as one unit
    ///
    /// The sheet is dropped too; it is installed again when its load finishes.
    fn reslice(&mut self, config: &SessionConfig) {
        let rows = config.rows();
        self.slices = SliceSheet::from_rows(rows.iter().copied());

        let actions = config.action_ranges.trim();
        self.clips = if !actions.is_empty() {
            parse_actions(actions, &self.slices, &config.frame_delays)
        } else {
            let mut clips = ClipSet::new();
            if let Some(idle) = idle_over_all_frames(&self.slices, &config.frame_delays) {
                clips.insert(idle);
            }
            clips
        };

        self.sheet = None;
        self.animation.reset();
        self.viewport.set_content(Vec2::ZERO);
        self.entity = Entity::with_walk_delay(
            self.entity.field(),
            &self.stats,
            config.frame_delays.walk,
        );
        self.sprite_scale = config.scale_factor();

        info!(
            "Sliced {} region(s), {} frame(s), {} clip(s)",
            self.slices.slices().len(),
            self.slices.frames().len(),
            self.clips.len()
        );
    }

    /// Install a decoded sheet and start playback if there is a clip
    ///
    /// Returns whether animation can run.
    fn install_sheet(&mut self, sheet: SheetImage) -> bool {
        info!(
            "Sprite sheet {} loaded ({}x{})",
            sheet.name(),
            sheet.width(),
            sheet.height()
        );
        self.viewport
            .set_content(Vec2::new(sheet.width() as f32, sheet.height() as f32));
        self.sheet = Some(sheet);

        self.entity.position = self.entity.field() * 0.5;
        self.animation.start(&self.clips)
    }

    /// One tick: resolve the clip, move, then advance playback
    pub fn tick(&mut self, dt_ms: f32, input: &InputState) {
        if self.sheet.is_none() || !self.animation.is_playing() {
            return;
        }

        let axes = input.axes();
        let aim = self.entity.offset_to(input.pointer());

        self.animation
            .resolve(&self.clips, axes, input.attacking(), aim);
        self.entity.integrate(axes);
        self.animation.advance(&self.clips, dt_ms, axes);
    }

    /// Resolve the attack clip right away, without waiting for the next tick
    pub fn aim(&mut self, input: &InputState) {
        if self.sheet.is_some() {
            let aim = self.entity.offset_to(input.pointer());
            self.animation.resolve_attack(&self.clips, aim);
        }
    }

    /// Cancel the attack and pick the movement clip right away
    pub fn release_attack(&mut self, input: &InputState) {
        if self.sheet.is_some() {
            self.animation.release_attack(&self.clips, input.axes());
        }
    }

    /// Draw the play field
    pub fn draw_stage(&self, canvas: &mut Canvas) {
        let sprite = self.sheet.as_ref().and_then(|sheet| {
            Some(StageSprite {
                sheet,
                frame: self.animation.current_frame(&self.clips)?,
                min_frame: self.slices.min_frame_size()?,
                position: self.entity.position,
                facing_left: self.animation.facing_left(),
                scale: self.sprite_scale,
            })
        });
        draw_stage(canvas, sprite);
    }

    /// Draw the sheet preview
    pub fn draw_preview(&self, canvas: &mut Canvas) {
        draw_preview(
            canvas,
            self.sheet.as_ref(),
            self.slices.slices(),
            &self.clips,
            &self.viewport,
        );
    }

    pub fn sheet(&self) -> Option<&SheetImage> {
        self.sheet.as_ref()
    }

    pub fn slices(&self) -> &SliceSheet {
        &self.slices
    }

    pub fn clips(&self) -> &ClipSet {
        &self.clips
    }

    pub fn animation(&self) -> &AnimationStateMachine {
        &self.animation
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }
}

/// Owns the session, its frame scheduler and its sheet loader
pub struct Controller<C: Clock> {
    session: Session,
    scheduler: FrameScheduler<C>,
    loader: SheetLoader,
    generation: u64,
    last_error: Option<String>,
}

impl<C: Clock> Controller<C> {
    pub fn new(session: Session, clock: C) -> Self {
        Self {
            session,
            scheduler: FrameScheduler::new(clock),
            loader: SheetLoader::new(),
            generation: 0,
            last_error: None,
        }
    }

    /// Re-slice from `config`, loading the sheet named by its `image_url`
    pub fn load(&mut self, config: &SessionConfig) -> Result<bool, SessionError> {
        self.load_from(config, SheetSource::from_location(&config.image_url))
    }

    /// Re-slice from `config`, loading the sheet from `source`
    ///
    /// Returns `Ok(false)` when there is nothing at all to load. Any load
    /// still in flight is superseded.
    pub fn load_from(
        &mut self,
        config: &SessionConfig,
        source: Option<SheetSource>,
    ) -> Result<bool, SessionError> {
        let has_rows = !config.rows().is_empty();
        let has_actions = !config.action_ranges.trim().is_empty();

        let Some(source) = source else {
            if !has_rows && !has_actions {
                debug!("Nothing to load");
                return Ok(false);
            }
            return Err(self.fail(SessionError::MissingImage));
        };
        if has_actions && !has_rows {
            return Err(self.fail(SessionError::RowsRequired));
        }

        self.scheduler.stop();
        self.generation += 1;
        self.last_error = None;
        self.session.reslice(config);
        self.loader.begin(self.generation, source);

        Ok(true)
    }

    /// Apply a finished load, if any; never blocks
    pub fn poll_load(&mut self) -> Option<Result<(), SessionError>> {
        let result = self.loader.poll(self.generation)?;
        Some(self.finish_load(result))
    }

    /// Block until the current load finishes and apply it
    pub fn await_load(&mut self) -> Option<Result<(), SessionError>> {
        let result = self.loader.wait(self.generation)?;
        Some(self.finish_load(result))
    }

    fn finish_load(&mut self, result: Result<SheetImage, AssetError>) -> Result<(), SessionError> {
        let sheet = result.map_err(|err| self.fail(err.into()))?;

        if self.session.install_sheet(sheet) {
            self.scheduler.start();
        } else {
            warn!("Sheet loaded but no clips are defined; nothing to animate");
        }
        Ok(())
    }

    fn fail(&mut self, err: SessionError) -> SessionError {
        error!("{}", err);
        self.last_error = Some(err.to_string());
        err
    }

    /// Run one scheduled tick; returns false while the scheduler is stopped
    pub fn frame(&mut self, input: &InputState) -> bool {
        match self.scheduler.tick() {
            Some(dt_ms) => {
                self.session.tick(dt_ms, input);
                true
            }
            None => false,
        }
    }

    /// React to an input edge
    pub fn handle_event(&mut self, event: InputEvent, input: &InputState) {
        match event {
            InputEvent::AttackStarted => self.session.aim(input),
            InputEvent::DragStarted(pointer) => self.session.viewport_mut().begin_drag(pointer),
            InputEvent::DragMoved(pointer) => self.session.viewport_mut().drag_to(pointer),
            InputEvent::DragEnded => self.session.viewport_mut().end_drag(),
            InputEvent::AttackEnded => self.session.release_attack(input),
            InputEvent::Reload | InputEvent::Quit => {}
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn scheduler(&self) -> &FrameScheduler<C> {
        &self.scheduler
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    /// Message of the last failed load, cleared by the next load
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

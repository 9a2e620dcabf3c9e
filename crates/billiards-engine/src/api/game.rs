//! Session orchestration: input → cue → physics → pockets, once per fixed step.

use glam::{Vec2, Vec3};

use crate::api::types::{BallId, GameEvent, SoundEvent};
use crate::config::{ConfigError, TableConfig};
use crate::core::ball::Ball;
use crate::core::cue::Cue;
use crate::core::physics::{Contact, ContactKind, Physics};
use crate::core::scene::TableScene;
use crate::core::time::FixedTimestep;
use crate::input::queue::{HeldKeys, InputEvent, InputQueue, Key};
use crate::renderer::instance::InstanceBuffer;
use crate::systems::pockets::capture_pockets;
use crate::systems::rack::{build_rack, BallDef, BallKind};
use crate::systems::render::{build_ball_instances, cue_instance};

/// Custom input event kinds from the host UI.
pub mod custom_events {
    pub const RESET: u32 = 1;
}

/// Game event kinds sent to the host UI.
pub mod game_events {
    /// a = ball number, b = pocket index, c = entry speed.
    pub const BALL_POCKETED: f32 = 1.0;
    /// a = power, b/c = aim direction x/z.
    pub const SHOT_TAKEN: f32 = 2.0;
    /// a = object balls still on the table.
    pub const BALLS_REMAINING: f32 = 3.0;
    /// Cue ball returned to the head spot after a scratch.
    pub const CUE_BALL_RESPAWNED: f32 = 4.0;
}

/// Spacing between respawn candidates, in ball diameters.
const SPAWN_GAP: f32 = 1.025;

/// Turn state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Everything at rest; the cue can strike.
    Aiming,
    /// A shot is playing out.
    BallsMoving,
}

/// A complete table session.
///
/// Owns the ball list (index 0 is always the cue ball; indices never
/// change), the cue, and the fixed table. The host feeds it frame times
/// and input, then reads balls/instances back for rendering.
pub struct BilliardsGame {
    config: TableConfig,
    scene: TableScene,
    physics: Physics,
    cue: Cue,
    balls: Vec<Ball>,
    defs: Vec<BallDef>,
    state: GameState,
    held: HeldKeys,
    timestep: FixedTimestep,
    contacts: Vec<Contact>,
    /// Sounds emitted since the last `clear_frame_data`.
    pub sounds: Vec<SoundEvent>,
    /// Game events emitted since the last `clear_frame_data`.
    pub events: Vec<GameEvent>,
}

impl BilliardsGame {
    /// A session on the standard table.
    pub fn new() -> Self {
        Self::from_valid(TableConfig::default())
    }

    /// A session on a custom table. The config is validated first, so the
    /// simulation never sees a zero mass or radius.
    pub fn with_config(config: TableConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: TableConfig) -> Self {
        let scene = TableScene::from_config(&config);
        let physics = scene.physics(config.friction, config.restitution);
        let (balls, defs) = build_rack(&scene, config.rack, config.ball_mass);
        let timestep = FixedTimestep::new(config.game.fixed_dt)
            .with_max_steps(config.game.max_steps_per_frame);

        Self {
            cue: Cue::with_settings(config.cue),
            scene,
            physics,
            balls,
            defs,
            state: GameState::Aiming,
            held: HeldKeys::default(),
            timestep,
            contacts: Vec::with_capacity(32),
            sounds: Vec::new(),
            events: Vec::new(),
            config,
        }
    }

    /// Clear per-frame transient data (sounds, events).
    pub fn clear_frame_data(&mut self) {
        self.sounds.clear();
        self.events.clear();
    }

    /// Run one rendered frame: fold input, then as many fixed steps as the
    /// accumulated frame time allows.
    pub fn tick(&mut self, frame_dt: f32, input: &InputQueue) {
        self.clear_frame_data();

        if !frame_dt.is_finite() || frame_dt < 0.0 {
            log::warn!("skipping frame with invalid dt {}", frame_dt);
            return;
        }

        for event in input.iter() {
            if let InputEvent::Custom { kind, .. } = event {
                if *kind == custom_events::RESET {
                    self.reset();
                    return;
                }
            }
            match self.held.apply(event) {
                Some(Key::Charge) => self.strike(),
                Some(Key::Reset) => {
                    self.reset();
                    return;
                }
                _ => {}
            }
        }

        let steps = self.timestep.accumulate(frame_dt);
        for _ in 0..steps {
            self.update(self.timestep.dt());
        }
    }

    /// One simulation step of `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.apply_held_keys(dt);

        self.contacts.clear();
        self.physics.step_into(&mut self.balls, dt, &mut self.contacts);
        for contact in &self.contacts {
            let sound = match contact.kind {
                ContactKind::Ball { .. } => SoundEvent::BALL_CLICK,
                ContactKind::Cushion { .. } => SoundEvent::CUSHION,
            };
            self.sounds.push(sound);
        }

        for captured in capture_pockets(&mut self.balls, &self.scene) {
            let number = self.defs[captured.ball].number;
            if number == 0 {
                log::info!("cue ball pocketed in pocket {}", captured.pocket);
            } else {
                log::info!("ball {} pocketed in pocket {}", number, captured.pocket);
            }
            self.sounds.push(SoundEvent::POCKET);
            self.events.push(GameEvent {
                kind: game_events::BALL_POCKETED,
                a: number as f32,
                b: captured.pocket as f32,
                c: captured.entry_speed,
            });
        }

        if self.state == GameState::BallsMoving && !self.any_ball_moving() {
            self.settle();
        }
    }

    /// Continuous input: aim rotation, charge and strike offset.
    fn apply_held_keys(&mut self, dt: f32) {
        let settings = *self.cue.settings();

        let mut turn = 0.0;
        if self.held.is_held(Key::RotateLeft) {
            turn += settings.rotate_speed_deg;
        }
        if self.held.is_held(Key::RotateRight) {
            turn -= settings.rotate_speed_deg;
        }
        if turn != 0.0 {
            self.cue.rotate(turn * dt);
        }

        if self.held.is_held(Key::Charge) {
            self.cue.charge(dt);
        }

        let mut offset = Vec2::ZERO;
        if self.held.is_held(Key::OffsetLeft) {
            offset.x -= 1.0;
        }
        if self.held.is_held(Key::OffsetRight) {
            offset.x += 1.0;
        }
        if self.held.is_held(Key::OffsetUp) {
            offset.y += 1.0;
        }
        if self.held.is_held(Key::OffsetDown) {
            offset.y -= 1.0;
        }
        if offset != Vec2::ZERO {
            self.cue.adjust_offset(offset * settings.offset_speed * dt);
        }
    }

    /// Release the cue. The impulse reaches the cue ball only when enough
    /// power was charged and the table is at rest; power is consumed either way.
    pub fn strike(&mut self) {
        let power = self.cue.power();
        let impulse = self.cue.release();

        if power <= self.config.game.min_strike_power {
            log::debug!("release at power {:.3} ignored", power);
            return;
        }
        if self.any_ball_moving() {
            log::debug!("strike ignored while balls are moving");
            return;
        }

        let hit = match self.balls.first() {
            Some(ball) if ball.is_active() => self.cue.hit_point(ball.position(), ball.radius()),
            _ => return,
        };
        if let Some(cue_ball) = self.balls.first_mut() {
            cue_ball.apply_impulse(impulse);
            cue_ball.apply_angular_impulse(hit, impulse);
        }

        let dir = self.cue.direction();
        log::info!("shot taken: power {:.2}, direction ({:.2}, {:.2})", power, dir.x, dir.z);
        self.state = GameState::BallsMoving;
        self.sounds.push(SoundEvent::CUE_STRIKE);
        self.events.push(GameEvent {
            kind: game_events::SHOT_TAKEN,
            a: power,
            b: dir.x,
            c: dir.z,
        });
    }

    /// Shot finished: return a scratched cue ball and report the count.
    fn settle(&mut self) {
        self.state = GameState::Aiming;

        let spawn = self.spawn_point(self.scene.head_spot, self.scene.ball_radius);
        if let Some(cue_ball) = self.balls.first_mut() {
            if !cue_ball.is_active() {
                cue_ball.respawn(spawn);
                log::info!("cue ball respawned at ({:.3}, {:.3})", spawn.x, spawn.z);
                self.events.push(GameEvent {
                    kind: game_events::CUE_BALL_RESPAWNED,
                    ..GameEvent::default()
                });
            }
        }

        self.events.push(GameEvent {
            kind: game_events::BALLS_REMAINING,
            a: self.balls_remaining() as f32,
            ..GameEvent::default()
        });
    }

    /// First point at or behind `spot` (stepping a little over one ball
    /// diameter along -X, then ahead along +X) that no object ball overlaps.
    fn spawn_point(&self, spot: Vec3, radius: f32) -> Vec3 {
        let diameter = radius * 2.0;
        let step = diameter * SPAWN_GAP;
        let limit = self.scene.width / 2.0 - radius;
        let occupied = |p: Vec3| {
            self.balls
                .iter()
                .skip(1)
                .any(|b| b.is_active() && b.position().distance(p) < diameter)
        };

        let behind = (0u32..)
            .map(|k| spot - Vec3::X * (k as f32 * step))
            .take_while(|p| p.x >= -limit);
        let ahead = (1u32..)
            .map(|k| spot + Vec3::X * (k as f32 * step))
            .take_while(|p| p.x <= limit);
        behind.chain(ahead).find(|&p| !occupied(p)).unwrap_or(spot)
    }

    /// Re-rack and reset the cue.
    pub fn reset(&mut self) {
        let (balls, defs) = build_rack(&self.scene, self.config.rack, self.config.ball_mass);
        self.balls = balls;
        self.defs = defs;
        self.cue.reset();
        self.held.clear();
        self.timestep.reset();
        self.state = GameState::Aiming;
        log::info!("table reset");
    }

    /// True while any ball in play is faster than the rest threshold.
    pub fn any_ball_moving(&self) -> bool {
        let threshold = self.config.game.rest_threshold;
        self.balls.iter().any(|b| b.is_active() && b.is_moving(threshold))
    }

    /// Object balls (not the cue ball) still on the table.
    pub fn balls_remaining(&self) -> u32 {
        self.balls
            .iter()
            .zip(&self.defs)
            .filter(|(b, d)| b.is_active() && d.kind != BallKind::Cue)
            .count() as u32
    }

    /// The cue is shown only while aiming at a cue ball in play.
    pub fn cue_visible(&self) -> bool {
        self.state == GameState::Aiming
            && self.balls.first().is_some_and(Ball::is_active)
            && !self.any_ball_moving()
    }

    /// Predicted first contact along the current aim, from the cue ball.
    pub fn impact_point(&self) -> Option<Vec3> {
        let cue_ball = self.balls.first().filter(|b| b.is_active())?;
        let positions: Vec<Vec3> = self
            .balls
            .iter()
            .filter(|b| b.is_active())
            .map(Ball::position)
            .collect();
        Some(self.cue.compute_impact_point(
            cue_ball.position(),
            &positions,
            cue_ball.radius(),
            self.scene.width,
            self.scene.height,
        ))
    }

    /// Fill `buffer` with this frame's ball and cue instances.
    pub fn build_instances(&self, buffer: &mut InstanceBuffer) {
        build_ball_instances(&self.balls, &self.defs, buffer);
        buffer.cue = match (self.balls.first(), self.impact_point()) {
            (Some(cue_ball), Some(impact)) => {
                cue_instance(&self.cue, cue_ball, impact, self.cue_visible())
            }
            _ => Default::default(),
        };
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls.get(id.0)
    }

    pub fn ball_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.balls.get_mut(id.0)
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn ball_defs(&self) -> &[BallDef] {
        &self.defs
    }

    pub fn cue(&self) -> &Cue {
        &self.cue
    }

    pub fn cue_mut(&mut self) -> &mut Cue {
        &mut self.cue
    }

    pub fn scene(&self) -> &TableScene {
        &self.scene
    }

    pub fn physics(&self) -> &Physics {
        &self.physics
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Render interpolation alpha from the fixed-step accumulator.
    pub fn alpha(&self) -> f32 {
        self.timestep.alpha()
    }
}

impl Default for BilliardsGame {
    fn default() -> Self {
        Self::new()
    }
}

//! Table configuration document.
//!
//! Everything a session needs that is not per-frame state: table and ball
//! dimensions, pocket layout, friction, cue tuning and loop timing. Every
//! field is optional in JSON and falls back to the standard table.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::cue::CueSettings;
use crate::core::physics::DEFAULT_RESTITUTION;
use crate::core::scene::POCKET_COUNT;
use crate::systems::rack::RackLayout;

/// Errors produced while loading a [`TableConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed JSON or wrong field types.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// A size, mass or rate that must be strictly positive.
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    /// Strike offset limit outside (0, 1].
    #[error("cue offset limit must be in (0, 1], got {0}")]
    OffsetLimit(f32),
    /// A pocket centre outside the play field.
    #[error("pocket {index} lies outside the table")]
    PocketOutsideTable { index: usize },
}

/// Full session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub table_width: f32,
    pub table_height: f32,
    /// Linear deceleration applied to moving balls (units/s²).
    pub friction: f32,
    /// Ball-ball coefficient of restitution.
    pub restitution: f32,
    pub ball_radius: f32,
    pub ball_mass: f32,
    pub pocket_radius: f32,
    pub pockets: [Vec3; POCKET_COUNT],
    pub rail_height: f32,
    pub rail_thickness: f32,
    /// Cue ball start, as (x, z).
    pub head_spot: [f32; 2],
    /// Rack apex, as (x, z).
    pub foot_spot: [f32; 2],
    pub rack: RackLayout,
    pub cue: CueSettings,
    pub game: GameTiming,
}

/// Loop timing and gating thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTiming {
    /// Fixed physics step in seconds.
    pub fixed_dt: f32,
    /// Most fixed steps run for a single frame.
    pub max_steps_per_frame: u32,
    /// Balls slower than this count as at rest.
    pub rest_threshold: f32,
    /// Releases below this power are discarded.
    pub min_strike_power: f32,
}

impl Default for GameTiming {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_steps_per_frame: 10,
            rest_threshold: 0.01,
            min_strike_power: 0.01,
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            table_width: 2.0,
            table_height: 1.0,
            friction: 0.1,
            restitution: DEFAULT_RESTITUTION,
            ball_radius: 0.05,
            ball_mass: 1.0,
            pocket_radius: 0.08,
            pockets: [
                Vec3::new(-0.95, 0.01, -0.45),
                Vec3::new(-0.95, 0.01, 0.45),
                Vec3::new(0.95, 0.01, -0.45),
                Vec3::new(0.95, 0.01, 0.45),
                Vec3::new(0.0, 0.01, -0.45),
                Vec3::new(0.0, 0.01, 0.45),
            ],
            rail_height: 0.1,
            rail_thickness: 0.05,
            head_spot: [-0.8, 0.0],
            foot_spot: [0.5, 0.0],
            rack: RackLayout::Triangle,
            cue: CueSettings::default(),
            game: GameTiming::default(),
        }
    }
}

impl TableConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::info!(
            "table config loaded: {}x{}, {:?} rack",
            config.table_width,
            config.table_height,
            config.rack
        );
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("table_width", self.table_width),
            ("table_height", self.table_height),
            ("ball_radius", self.ball_radius),
            ("ball_mass", self.ball_mass),
            ("pocket_radius", self.pocket_radius),
            ("cue.max_power", self.cue.max_power),
            ("cue.charge_rate", self.cue.charge_rate),
            ("cue.max_force", self.cue.max_force),
            ("game.fixed_dt", self.game.fixed_dt),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        let limit = self.cue.offset_limit;
        if limit.is_nan() || limit <= 0.0 || limit > 1.0 {
            return Err(ConfigError::OffsetLimit(limit));
        }

        let half_w = self.table_width / 2.0;
        let half_h = self.table_height / 2.0;
        for (index, p) in self.pockets.iter().enumerate() {
            if p.x.abs() > half_w || p.z.abs() > half_h {
                return Err(ConfigError::PocketOutsideTable { index });
            }
        }

        Ok(())
    }
}

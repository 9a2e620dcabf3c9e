pub mod api;
pub mod config;
pub mod core;
pub mod input;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::game::{BilliardsGame, GameState, custom_events, game_events};
pub use api::types::{BallId, SoundEvent, GameEvent};
pub use config::{ConfigError, GameTiming, TableConfig};
pub use crate::core::ball::{Ball, BallState, POCKETED_POSITION, UP};
pub use crate::core::cue::{Cue, CueSettings};
pub use crate::core::physics::{Contact, ContactKind, Physics, DEFAULT_RESTITUTION};
pub use crate::core::scene::{TableScene, POCKET_COUNT};
pub use crate::core::time::FixedTimestep;
pub use input::queue::{HeldKeys, InputEvent, InputQueue, Key};
pub use renderer::instance::{BallInstance, CueInstance, InstanceBuffer};
pub use systems::pockets::{capture_pockets, Pocketed};
pub use systems::rack::{build_rack, triangle_positions, BallDef, BallKind, RackLayout, RACK_SIZE};

pub mod instance;

pub use instance::{BallInstance, CueInstance, InstanceBuffer};

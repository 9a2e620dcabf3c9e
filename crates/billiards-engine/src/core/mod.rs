pub mod ball;
pub mod cue;
pub mod physics;
pub mod scene;
pub mod time;

//! Rack layouts and ball labels.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::ball::Ball;
use crate::core::scene::TableScene;

/// Balls in a full rack, not counting the cue ball.
pub const RACK_SIZE: usize = 15;

/// Rack spacing as a multiple of the ball diameter (a hair loose).
const RACK_GAP: f32 = 1.025;

/// sqrt(3)/2 for an equilateral triangle.
const ROW_ADVANCE: f32 = 0.866;

/// Ball type: solid (1-8) or striped (9-15).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallKind {
    Cue,
    Solid,
    Striped,
}

/// Label for the ball at a given index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BallDef {
    pub number: u8,
    pub kind: BallKind,
}

impl BallDef {
    pub const CUE: BallDef = BallDef { number: 0, kind: BallKind::Cue };

    pub fn numbered(number: u8) -> Self {
        let kind = match number {
            0 => BallKind::Cue,
            1..=8 => BallKind::Solid,
            _ => BallKind::Striped,
        };
        Self { number, kind }
    }
}

/// How the 15 object balls are numbered in the triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RackLayout {
    /// Row by row, 1 through 15.
    #[default]
    Triangle,
    /// Standard 8-ball rack: 1 at the apex, 8 in the middle of the third row.
    EightBall,
}

/// Ball numbers per rack slot, in row order (apex first, each row from -Z to +Z).
const EIGHT_BALL_ORDER: [u8; RACK_SIZE] = [1, 9, 2, 3, 8, 10, 11, 4, 5, 12, 6, 13, 14, 7, 15];

impl RackLayout {
    fn number_at(self, slot: usize) -> u8 {
        match self {
            RackLayout::Triangle => slot as u8 + 1,
            RackLayout::EightBall => EIGHT_BALL_ORDER[slot],
        }
    }
}

/// Triangle slot positions with the apex at `apex`, rows growing toward +X.
///
/// ```text
///        o o o o o
///      o o o o          +Z
///    o o o      ...     ^
///  o o                  |
/// o  <- apex            +--> +X
/// ```
pub fn triangle_positions(apex: Vec3, ball_radius: f32) -> [Vec3; RACK_SIZE] {
    let spacing = ball_radius * 2.0 * RACK_GAP;
    let mut positions = [apex; RACK_SIZE];
    let mut slot = 0;
    for row in 0..5 {
        for col in 0..=row {
            let x = apex.x + row as f32 * spacing * ROW_ADVANCE;
            let z = apex.z - row as f32 * spacing * 0.5 + col as f32 * spacing;
            positions[slot] = Vec3::new(x, apex.y, z);
            slot += 1;
        }
    }
    positions
}

/// Cue ball at the head spot (index 0) followed by a full rack at the foot
/// spot. Returns the balls and a parallel list of labels.
pub fn build_rack(scene: &TableScene, layout: RackLayout, mass: f32) -> (Vec<Ball>, Vec<BallDef>) {
    let r = scene.ball_radius;
    let mut balls = Vec::with_capacity(RACK_SIZE + 1);
    let mut defs = Vec::with_capacity(RACK_SIZE + 1);

    balls.push(Ball::new(scene.head_spot, r, mass));
    defs.push(BallDef::CUE);

    for (slot, pos) in triangle_positions(scene.foot_spot, r).into_iter().enumerate() {
        balls.push(Ball::new(pos, r, mass));
        defs.push(BallDef::numbered(layout.number_at(slot)));
    }

    (balls, defs)
}

use glam::Vec3;

use crate::core::ball::Ball;
use crate::core::cue::Cue;
use crate::renderer::instance::{BallInstance, CueInstance, InstanceBuffer};
use crate::systems::rack::{BallDef, BallKind};

/// Rebuild the ball instances, one slot per ball in index order.
pub fn build_ball_instances(balls: &[Ball], defs: &[BallDef], buffer: &mut InstanceBuffer) {
    buffer.balls.clear();
    for (i, ball) in balls.iter().enumerate() {
        let def = defs.get(i).copied().unwrap_or(BallDef::numbered(i as u8));
        let p = ball.position();
        buffer.push(BallInstance {
            x: p.x,
            y: p.y,
            z: p.z,
            radius: ball.radius(),
            rotation: ball.rotation().to_array(),
            number: def.number as f32,
            striped: if def.kind == BallKind::Striped { 1.0 } else { 0.0 },
            visible: if ball.is_active() { 1.0 } else { 0.0 },
            _pad: 0.0,
        });
    }
}

/// Cue stick placed behind `cue_ball`, plus the predicted impact point.
pub fn cue_instance(cue: &Cue, cue_ball: &Ball, impact: Vec3, visible: bool) -> CueInstance {
    let hit = cue.hit_point(cue_ball.position(), cue_ball.radius());
    CueInstance {
        start: cue.stick_start(hit).to_array(),
        radius: cue.stick_radius(),
        end: cue.stick_end(hit).to_array(),
        power: cue.power() / cue.settings().max_power,
        impact: impact.to_array(),
        visible: if visible { 1.0 } else { 0.0 },
    }
}

//! Pocket capture pass.

use crate::core::ball::Ball;
use crate::core::physics::Physics;
use crate::core::scene::TableScene;

/// A ball captured this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pocketed {
    /// Index of the ball in the caller's slice.
    pub ball: usize,
    /// Index into `TableScene::pockets`.
    pub pocket: usize,
    /// Speed at the moment of capture.
    pub entry_speed: f32,
}

/// Check every active ball against every pocket (in pocket order) and
/// pocket the first match. Indices in `balls` are left unchanged.
pub fn capture_pockets(balls: &mut [Ball], scene: &TableScene) -> Vec<Pocketed> {
    let mut captured = Vec::new();
    for (i, ball) in balls.iter_mut().enumerate() {
        if !ball.is_active() {
            continue;
        }
        let hit = scene
            .pockets
            .iter()
            .position(|&center| Physics::check_pocket_collision(ball, center, scene.pocket_radius));
        if let Some(pocket) = hit {
            let entry_speed = ball.velocity().length();
            ball.pocket(pocket);
            captured.push(Pocketed { ball: i, pocket, entry_speed });
        }
    }
    captured
}

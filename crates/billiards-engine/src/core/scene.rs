use glam::{Vec2, Vec3};

use crate::config::TableConfig;
use crate::core::physics::Physics;

/// Number of pockets on a standard table.
pub const POCKET_COUNT: usize = 6;

/// Static table layout shared by the physics step and the renderer.
///
/// The play field is centred on the origin in the X/Z plane; Y is up and
/// the felt sits at `y = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableScene {
    /// Play-field extent along X.
    pub width: f32,
    /// Play-field extent along Z.
    pub height: f32,
    pub pocket_radius: f32,
    /// Pocket centres: four corners, then the two side pockets.
    pub pockets: [Vec3; POCKET_COUNT],
    pub rail_height: f32,
    pub rail_thickness: f32,
    /// Radius used for spot heights and rack spacing.
    pub ball_radius: f32,
    /// Cue ball start.
    pub head_spot: Vec3,
    /// Rack apex.
    pub foot_spot: Vec3,
}

impl TableScene {
    /// The standard 2 x 1 table.
    pub fn standard() -> Self {
        Self::from_config(&TableConfig::default())
    }

    pub fn from_config(config: &TableConfig) -> Self {
        let r = config.ball_radius;
        Self {
            width: config.table_width,
            height: config.table_height,
            pocket_radius: config.pocket_radius,
            pockets: config.pockets,
            rail_height: config.rail_height,
            rail_thickness: config.rail_thickness,
            ball_radius: r,
            head_spot: Vec3::new(config.head_spot[0], r, config.head_spot[1]),
            foot_spot: Vec3::new(config.foot_spot[0], r, config.foot_spot[1]),
        }
    }

    /// Physics engine bound to this table's dimensions.
    pub fn physics(&self, friction: f32, restitution: f32) -> Physics {
        Physics::new(self.width, self.height, friction).with_restitution(restitution)
    }

    /// Half of width and height, as (x, z).
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Index of the first pocket whose capture radius contains `position`
    /// in the table plane.
    pub fn pocket_at(&self, position: Vec3) -> Option<usize> {
        let r_sq = self.pocket_radius * self.pocket_radius;
        self.pockets.iter().position(|p| {
            let d = Vec2::new(position.x - p.x, position.z - p.z);
            d.length_squared() < r_sq
        })
    }
}

impl Default for TableScene {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_has_six_pockets_on_the_rails() {
        let scene = TableScene::standard();
        assert_eq!(scene.width, 2.0);
        assert_eq!(scene.height, 1.0);
        assert_eq!(scene.pockets.len(), POCKET_COUNT);
        let half = scene.half_extents();
        for p in &scene.pockets {
            assert!(p.x.abs() <= half.x && p.z.abs() <= half.y);
        }
    }

    #[test]
    fn spots_sit_at_ball_height() {
        let scene = TableScene::standard();
        assert_eq!(scene.head_spot, Vec3::new(-0.8, 0.05, 0.0));
        assert_eq!(scene.foot_spot, Vec3::new(0.5, 0.05, 0.0));
    }

    #[test]
    fn pocket_at_finds_corner_and_side() {
        let scene = TableScene::standard();
        assert_eq!(scene.pocket_at(Vec3::new(-0.94, 0.05, -0.44)), Some(0));
        assert_eq!(scene.pocket_at(Vec3::new(0.01, 0.05, 0.44)), Some(5));
        assert_eq!(scene.pocket_at(Vec3::ZERO), None);
    }

    #[test]
    fn physics_uses_table_dimensions() {
        let scene = TableScene::standard();
        let physics = scene.physics(0.1, 0.8);
        assert_eq!(physics.table_width(), 2.0);
        assert_eq!(physics.table_height(), 1.0);
        assert_eq!(physics.friction(), 0.1);
        assert_eq!(physics.restitution(), 0.8);
    }
}

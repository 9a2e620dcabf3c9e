use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::ball::UP;

/// Maximum ray length for the predictive aim line.
const AIM_MAX_DISTANCE: f32 = 100.0;

/// Balls this close to the ray origin are the cue ball itself.
const AIM_SELF_EPSILON: f32 = 1e-4;

/// Slack when checking a cushion hit against the other axis.
const AIM_WALL_TOLERANCE: f32 = 0.01;

/// Cue stick radius (1 cm).
const STICK_RADIUS: f32 = 0.01;
/// Stick length at zero power.
const STICK_MIN_LENGTH: f32 = 0.8;
/// Stick length at full power.
const STICK_MAX_LENGTH: f32 = 1.5;
/// Gap left between the tip and the ball while aiming.
const STICK_TIP_GAP: f32 = 0.02;

/// Tunable cue constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CueSettings {
    /// Upper bound for `power`.
    pub max_power: f32,
    /// Power gained per second of charging.
    pub charge_rate: f32,
    /// Impulse magnitude at full power.
    pub max_force: f32,
    /// Strike offset is clamped to `[-offset_limit, offset_limit]` per axis.
    pub offset_limit: f32,
    /// Aim rotation speed in degrees per second (used by the game loop).
    pub rotate_speed_deg: f32,
    /// Offset change per second while an offset key is held.
    pub offset_speed: f32,
}

impl Default for CueSettings {
    fn default() -> Self {
        Self {
            max_power: 1.0,
            charge_rate: 0.5,
            max_force: 5.0,
            offset_limit: 0.8,
            rotate_speed_deg: 90.0,
            offset_speed: 1.0,
        }
    }
}

/// Aiming and charging state for the cue.
///
/// `direction` persists across shots; `power` is consumed by [`Cue::release`].
#[derive(Debug, Clone)]
pub struct Cue {
    direction: Vec3,
    power: f32,
    offset: Vec2,
    settings: CueSettings,
}

impl Cue {
    pub fn new() -> Self {
        Self::with_settings(CueSettings::default())
    }

    pub fn with_settings(settings: CueSettings) -> Self {
        Self {
            direction: Vec3::X,
            power: 0.0,
            offset: Vec2::ZERO,
            settings,
        }
    }

    /// Rotate the aim about the vertical axis. The caller scales by frame time.
    pub fn rotate(&mut self, angle_deg: f32) {
        let rot = Quat::from_axis_angle(UP, angle_deg.to_radians());
        self.direction = (rot * self.direction).normalize();
    }

    /// Build up power while the charge input is held.
    pub fn charge(&mut self, dt: f32) {
        self.power = (self.power + dt * self.settings.charge_rate).min(self.settings.max_power);
    }

    /// Consume the charged power as an impulse along the aim direction.
    /// At zero power this is a zero vector; callers gate on power first.
    pub fn release(&mut self) -> Vec3 {
        let impulse = self.direction * (self.power * self.settings.max_force);
        self.power = 0.0;
        impulse
    }

    /// Shift the strike point on the ball face, clamped per axis.
    pub fn adjust_offset(&mut self, delta: Vec2) {
        let limit = self.settings.offset_limit;
        self.offset = (self.offset + delta).clamp(Vec2::splat(-limit), Vec2::splat(limit));
    }

    /// Contact point of the tip on a ball, from the offset expressed in the
    /// ball-local right/up basis.
    pub fn hit_point(&self, ball_position: Vec3, ball_radius: f32) -> Vec3 {
        let right = self.direction.cross(UP).normalize_or_zero();
        ball_position
            + right * (self.offset.x * ball_radius)
            + UP * (self.offset.y * ball_radius)
    }

    /// Predictive aim: the nearest point along the aim ray from `origin`
    /// that touches another ball or the cushion line.
    ///
    /// Pure query; the result does not depend on the order of
    /// `ball_positions` except at exact distance ties, where the first
    /// strictly closer candidate wins.
    pub fn compute_impact_point(
        &self,
        origin: Vec3,
        ball_positions: &[Vec3],
        ball_radius: f32,
        table_width: f32,
        table_height: f32,
    ) -> Vec3 {
        let dir = self.direction.normalize_or_zero();
        let mut best = AIM_MAX_DISTANCE;
        let mut hit = origin + dir * best;

        for &pos in ball_positions {
            if pos.distance(origin) < AIM_SELF_EPSILON {
                continue;
            }
            let proj = (pos - origin).dot(dir);
            if proj <= 0.0 || proj >= best {
                continue;
            }
            let closest = origin + dir * proj;
            if pos.distance(closest) < ball_radius {
                hit = closest;
                best = proj;
            }
        }

        let x_max = table_width / 2.0 - ball_radius;
        let z_max = table_height / 2.0 - ball_radius;

        // Axes the ray runs parallel to never reach their cushions.
        let mut candidates = [f32::INFINITY; 4];
        if dir.x != 0.0 {
            candidates[0] = (x_max - origin.x) / dir.x;
            candidates[1] = (-x_max - origin.x) / dir.x;
        }
        if dir.z != 0.0 {
            candidates[2] = (z_max - origin.z) / dir.z;
            candidates[3] = (-z_max - origin.z) / dir.z;
        }

        for t in candidates {
            if t <= 0.0 || t >= best {
                continue;
            }
            let p = origin + dir * t;
            if p.x.abs() <= x_max + AIM_WALL_TOLERANCE && p.z.abs() <= z_max + AIM_WALL_TOLERANCE {
                hit = p;
                best = t;
            }
        }

        hit
    }

    /// Restore the default aim with no charge and a centred strike.
    pub fn reset(&mut self) {
        self.direction = Vec3::X;
        self.power = 0.0;
        self.offset = Vec2::ZERO;
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn power(&self) -> f32 {
        self.power
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn settings(&self) -> &CueSettings {
        &self.settings
    }

    // -- Stick geometry for the renderer --

    pub fn stick_radius(&self) -> f32 {
        STICK_RADIUS
    }

    /// Stick length grows with charge so the pull-back is visible. Scales
    /// with the charge fraction `power / max_power`, so a full charge always
    /// reaches the maximum length.
    pub fn length(&self) -> f32 {
        let frac = self.power / self.settings.max_power;
        STICK_MIN_LENGTH + frac * (STICK_MAX_LENGTH - STICK_MIN_LENGTH)
    }

    /// Butt end of the stick.
    pub fn stick_start(&self, hit_point: Vec3) -> Vec3 {
        hit_point - self.direction * self.length()
    }

    /// Tip of the stick, just short of the ball.
    pub fn stick_end(&self, hit_point: Vec3) -> Vec3 {
        hit_point - self.direction * STICK_TIP_GAP
    }
}

impl Default for Cue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn default_aims_along_x() {
        let cue = Cue::new();
        assert_eq!(cue.direction(), Vec3::X);
        assert_eq!(cue.power(), 0.0);
        assert_eq!(cue.offset(), Vec2::ZERO);
    }

    #[test]
    fn rotate_quarter_turn() {
        let mut cue = Cue::new();
        cue.rotate(90.0);
        // +X rotated 90 degrees about +Y is -Z.
        assert!((cue.direction() - Vec3::new(0.0, 0.0, -1.0)).length() < EPS);
        assert!((cue.direction().length() - 1.0).abs() < EPS);
    }

    #[test]
    fn many_small_rotations_stay_normalized() {
        let mut cue = Cue::new();
        for _ in 0..10_000 {
            cue.rotate(0.37);
        }
        assert!((cue.direction().length() - 1.0).abs() < EPS);
        assert!(cue.direction().y.abs() < EPS);
    }

    #[test]
    fn charge_is_monotonic_and_capped() {
        let mut cue = Cue::new();
        let mut last = 0.0;
        for _ in 0..10 {
            cue.charge(2.0);
            assert!(cue.power() >= last);
            assert!(cue.power() <= 1.0);
            last = cue.power();
        }
        assert_eq!(cue.power(), 1.0);
    }

    #[test]
    fn charge_rate_applies() {
        let mut cue = Cue::new();
        cue.charge(0.5);
        assert!((cue.power() - 0.25).abs() < EPS);
    }

    #[test]
    fn release_returns_impulse_and_resets_power() {
        let mut cue = Cue::new();
        cue.charge(1.0); // 0.5 power
        let impulse = cue.release();
        assert!((impulse - Vec3::new(2.5, 0.0, 0.0)).length() < EPS);
        assert_eq!(cue.power(), 0.0);
    }

    #[test]
    fn release_at_zero_power_is_zero() {
        let mut cue = Cue::new();
        assert_eq!(cue.release(), Vec3::ZERO);
    }

    #[test]
    fn offset_clamps_each_axis() {
        let mut cue = Cue::new();
        cue.adjust_offset(Vec2::new(5.0, -0.3));
        assert_eq!(cue.offset(), Vec2::new(0.8, -0.3));
        cue.adjust_offset(Vec2::new(-10.0, -10.0));
        assert_eq!(cue.offset(), Vec2::new(-0.8, -0.8));
    }

    #[test]
    fn hit_point_centre_without_offset() {
        let cue = Cue::new();
        let p = Vec3::new(0.2, 0.05, 0.1);
        assert_eq!(cue.hit_point(p, 0.05), p);
    }

    #[test]
    fn hit_point_uses_right_and_up() {
        let mut cue = Cue::new();
        cue.adjust_offset(Vec2::new(0.5, 0.4));
        let p = cue.hit_point(Vec3::ZERO, 0.1);
        // right = X x Y = +Z
        assert!((p - Vec3::new(0.0, 0.04, 0.05)).length() < EPS);
    }

    #[test]
    fn impact_point_hits_ball_in_line() {
        let cue = Cue::new();
        let origin = Vec3::new(-0.5, 0.05, 0.0);
        let balls = [origin, Vec3::new(0.3, 0.05, 0.02), Vec3::new(0.1, 0.05, 0.0)];
        let hit = cue.compute_impact_point(origin, &balls, 0.05, 2.0, 1.0);
        // Nearest ball wins regardless of order.
        assert!((hit - Vec3::new(0.1, 0.05, 0.0)).length() < EPS);

        let reversed = [balls[2], balls[1], balls[0]];
        let hit2 = cue.compute_impact_point(origin, &reversed, 0.05, 2.0, 1.0);
        assert_eq!(hit, hit2);
    }

    #[test]
    fn impact_point_falls_back_to_cushion() {
        let cue = Cue::new();
        let origin = Vec3::new(0.0, 0.05, 0.0);
        let hit = cue.compute_impact_point(origin, &[origin], 0.05, 2.0, 1.0);
        assert!((hit - Vec3::new(0.95, 0.05, 0.0)).length() < EPS);
    }

    #[test]
    fn impact_point_ignores_balls_behind() {
        let cue = Cue::new();
        let origin = Vec3::new(0.0, 0.05, 0.0);
        let behind = [Vec3::new(-0.3, 0.05, 0.0)];
        let hit = cue.compute_impact_point(origin, &behind, 0.05, 2.0, 1.0);
        assert!((hit.x - 0.95).abs() < EPS);
    }

    #[test]
    fn impact_point_diagonal_hits_long_cushion_first() {
        let mut cue = Cue::new();
        cue.rotate(-45.0); // toward +X/+Z
        let origin = Vec3::new(0.0, 0.05, 0.0);
        let hit = cue.compute_impact_point(origin, &[], 0.05, 2.0, 1.0);
        assert!((hit.z - 0.45).abs() < EPS);
        assert!((hit.x - 0.45).abs() < EPS);
    }

    #[test]
    fn stick_geometry_follows_power() {
        let mut cue = Cue::new();
        assert!((cue.length() - 0.8).abs() < EPS);
        cue.charge(10.0);
        assert!((cue.length() - 1.5).abs() < EPS);

        let hit = Vec3::new(0.0, 0.05, 0.0);
        assert!((cue.stick_start(hit) - Vec3::new(-1.5, 0.05, 0.0)).length() < EPS);
        assert!((cue.stick_end(hit) - Vec3::new(-0.02, 0.05, 0.0)).length() < EPS);
        assert_eq!(cue.stick_radius(), 0.01);
    }

    #[test]
    fn stick_length_tracks_charge_fraction() {
        let settings = CueSettings { max_power: 2.0, ..CueSettings::default() };
        let mut cue = Cue::with_settings(settings);
        cue.charge(2.0); // 1.0 of 2.0
        assert!((cue.length() - 1.15).abs() < EPS);
        cue.charge(10.0);
        assert!((cue.length() - 1.5).abs() < EPS);
    }

    #[test]
    fn impact_point_axis_aligned_ray_ignores_parallel_cushions() {
        let cue = Cue::new();
        let origin = Vec3::new(-0.5, 0.05, 0.3);
        let hit = cue.compute_impact_point(origin, &[], 0.05, 2.0, 1.0);
        assert!((hit - Vec3::new(0.95, 0.05, 0.3)).length() < EPS);
    }
}

use glam::{Mat4, Quat, Vec3};

/// World up axis. The table surface is the X/Z plane.
pub const UP: Vec3 = Vec3::Y;

/// Where pocketed balls are parked. Far below the table so nothing that
/// forgets to check [`BallState`] can mistake it for a live position.
pub const POCKETED_POSITION: Vec3 = Vec3::new(0.0, -1000.0, 0.0);

/// Angular velocity decay rate (per second).
const ANGULAR_DAMPING: f32 = 0.1;

/// Below this magnitude rotation deltas are skipped.
const ROTATION_EPSILON: f32 = 0.01;

/// Whether a ball is still in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BallState {
    #[default]
    Active,
    /// Captured by the pocket with the given index.
    Pocketed { pocket: usize },
}

/// A single rigid sphere on the table.
///
/// Position and velocity are full 3D vectors, but motion is planar: the
/// y-coordinate stays at table height and the y-velocity stays zero.
#[derive(Debug, Clone)]
pub struct Ball {
    position: Vec3,
    velocity: Vec3,
    radius: f32,
    mass: f32,
    rotation: Quat,
    angular_velocity: Vec3,
    state: BallState,
}

impl Ball {
    /// Create a ball at rest. `radius` and `mass` must be positive.
    pub fn new(position: Vec3, radius: f32, mass: f32) -> Self {
        debug_assert!(radius > 0.0, "ball radius must be positive");
        debug_assert!(mass > 0.0, "ball mass must be positive");
        Self {
            position,
            velocity: Vec3::ZERO,
            radius,
            mass,
            rotation: Quat::IDENTITY,
            angular_velocity: Vec3::ZERO,
            state: BallState::Active,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Advance position and orientation by `dt` seconds.
    ///
    /// Orientation picks up two deltas: one from the free angular velocity
    /// and one from rolling (axis `UP × velocity`, angle `|v|·dt / r`). Both
    /// pre-multiply the current rotation. This is a visual approximation.
    pub fn update(&mut self, dt: f32) {
        self.position += self.velocity * dt;

        let spin = self.angular_velocity.length();
        if spin > ROTATION_EPSILON {
            let axis = self.angular_velocity / spin;
            self.rotation = Quat::from_axis_angle(axis, spin * dt) * self.rotation;
        }

        let speed = self.velocity.length();
        if speed > ROTATION_EPSILON {
            let axis = UP.cross(self.velocity).normalize_or_zero();
            if axis != Vec3::ZERO {
                let angle = speed * dt / self.radius;
                self.rotation = Quat::from_axis_angle(axis, angle) * self.rotation;
            }
        }

        // Counter float drift from repeated composition.
        self.rotation = self.rotation.normalize();

        self.angular_velocity *= 1.0 - ANGULAR_DAMPING * dt;
    }

    /// Instantaneous change in momentum through the centre of mass.
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        self.velocity += impulse / self.mass;
    }

    /// Impulse applied at a world-space `point`; only the resulting torque
    /// about the centre is accumulated into angular velocity.
    pub fn apply_angular_impulse(&mut self, point: Vec3, impulse: Vec3) {
        let r = point - self.position;
        let torque = r.cross(impulse);
        self.angular_velocity += torque / self.moment_of_inertia();
    }

    /// Decelerate by `coeff * dt` against the direction of travel.
    /// Stops exactly at zero rather than reversing.
    pub fn apply_friction(&mut self, coeff: f32, dt: f32) {
        let speed_sq = self.velocity.length_squared();
        if speed_sq <= 0.0 {
            return;
        }

        let friction = -self.velocity.normalize_or_zero() * coeff * dt;
        if friction.length_squared() > speed_sq {
            self.velocity = Vec3::ZERO;
        } else {
            self.velocity += friction;
        }
    }

    /// True iff speed exceeds `threshold`.
    pub fn is_moving(&self, threshold: f32) -> bool {
        self.velocity.length_squared() > threshold * threshold
    }

    /// Solid sphere: 2/5 · m · r².
    pub fn moment_of_inertia(&self) -> f32 {
        0.4 * self.mass * self.radius * self.radius
    }

    /// Remove the ball from play: park it at [`POCKETED_POSITION`] at rest.
    pub fn pocket(&mut self, pocket: usize) {
        self.state = BallState::Pocketed { pocket };
        self.position = POCKETED_POSITION;
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }

    /// Put a pocketed (or any) ball back in play at rest.
    pub fn respawn(&mut self, position: Vec3) {
        self.state = BallState::Active;
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    /// Orientation as a 4x4 matrix for the renderer.
    pub fn rotation_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.rotation)
    }

    pub fn state(&self) -> BallState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == BallState::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn ball() -> Ball {
        Ball::new(Vec3::new(0.0, 0.05, 0.0), 0.05, 1.0)
    }

    #[test]
    fn update_integrates_position() {
        let mut b = ball().with_velocity(Vec3::new(1.0, 0.0, -2.0));
        b.update(0.5);
        assert!((b.position() - Vec3::new(0.5, 0.05, -1.0)).length() < EPS);
    }

    #[test]
    fn impulse_scales_by_inverse_mass() {
        let mut b = Ball::new(Vec3::ZERO, 0.05, 2.0);
        b.apply_impulse(Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(b.velocity(), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn friction_decreases_speed_to_exactly_zero() {
        let mut b = ball().with_velocity(Vec3::new(0.3, 0.0, 0.4));
        let mut last = b.velocity().length();
        for _ in 0..1000 {
            b.apply_friction(0.1, 1.0 / 60.0);
            let speed = b.velocity().length();
            assert!(speed <= last, "speed went up: {} -> {}", last, speed);
            last = speed;
        }
        assert_eq!(b.velocity(), Vec3::ZERO);
    }

    #[test]
    fn friction_never_reverses_direction() {
        let mut b = ball().with_velocity(Vec3::new(0.01, 0.0, 0.0));
        b.apply_friction(10.0, 1.0);
        assert_eq!(b.velocity(), Vec3::ZERO);
    }

    #[test]
    fn friction_on_resting_ball_is_noop() {
        let mut b = ball();
        b.apply_friction(0.1, 1.0);
        assert_eq!(b.velocity(), Vec3::ZERO);
        assert!(b.velocity().is_finite());
    }

    #[test]
    fn is_moving_uses_threshold() {
        let b = ball().with_velocity(Vec3::new(0.02, 0.0, 0.0));
        assert!(b.is_moving(0.01));
        assert!(!b.is_moving(0.03));
    }

    #[test]
    fn angular_impulse_off_centre_spins_ball() {
        let mut b = ball();
        // Strike the top of the ball along +X: topspin about -Z.
        let top = b.position() + Vec3::Y * b.radius();
        b.apply_angular_impulse(top, Vec3::new(1.0, 0.0, 0.0));
        let expected = Vec3::new(0.0, 0.0, -0.05) / b.moment_of_inertia();
        assert!((b.angular_velocity() - expected).length() < 1e-3);
    }

    #[test]
    fn angular_impulse_through_centre_has_no_torque() {
        let mut b = ball();
        b.apply_angular_impulse(b.position(), Vec3::new(3.0, 0.0, 1.0));
        assert_eq!(b.angular_velocity(), Vec3::ZERO);
    }

    #[test]
    fn angular_velocity_is_damped() {
        let mut b = ball();
        b.apply_angular_impulse(b.position() + Vec3::Y * 0.05, Vec3::X);
        let before = b.angular_velocity().length();
        b.update(0.1);
        let after = b.angular_velocity().length();
        assert!((after - before * (1.0 - 0.1 * 0.1)).abs() < 1e-3);
    }

    #[test]
    fn rotation_stays_unit_length() {
        let mut b = ball().with_velocity(Vec3::new(2.0, 0.0, 1.0));
        b.apply_angular_impulse(b.position() + Vec3::new(0.0, 0.05, 0.0), Vec3::Z);
        for _ in 0..10_000 {
            b.update(1.0 / 60.0);
        }
        assert!((b.rotation().length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn rolling_rotates_about_perpendicular_axis() {
        let mut b = ball().with_velocity(Vec3::new(1.0, 0.0, 0.0));
        b.update(0.01);
        let (axis, angle) = b.rotation().to_axis_angle();
        // UP x +X = -Z
        assert!((axis - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-3);
        assert!((angle - 0.01 / 0.05).abs() < 1e-3);
    }

    #[test]
    fn pocket_parks_ball_at_sentinel() {
        let mut b = ball().with_velocity(Vec3::new(1.0, 0.0, 1.0));
        b.pocket(3);
        assert_eq!(b.state(), BallState::Pocketed { pocket: 3 });
        assert_eq!(b.position(), POCKETED_POSITION);
        assert_eq!(b.velocity(), Vec3::ZERO);
        assert!(!b.is_active());
    }

    #[test]
    fn respawn_reactivates() {
        let mut b = ball();
        b.pocket(0);
        b.respawn(Vec3::new(-0.8, 0.05, 0.0));
        assert!(b.is_active());
        assert_eq!(b.position(), Vec3::new(-0.8, 0.05, 0.0));
    }

    #[test]
    fn rotation_matrix_of_identity() {
        assert_eq!(ball().rotation_matrix(), Mat4::IDENTITY);
    }
}

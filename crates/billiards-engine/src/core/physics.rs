use glam::{Vec2, Vec3};

use crate::core::ball::Ball;

/// Default coefficient of restitution for ball-ball contacts.
pub const DEFAULT_RESTITUTION: f32 = 0.9;

/// Contact normal used when two centres coincide exactly.
const COINCIDENT_NORMAL: Vec3 = Vec3::X;

/// Contacts closing slower than this are resolved but not reported.
const MIN_CONTACT_SPEED: f32 = f32::EPSILON;

// ---------------------------------------------------------------------------
// Contact reporting
// ---------------------------------------------------------------------------

/// What a ball touched during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// Two balls, by index, with `a < b`.
    Ball { a: usize, b: usize },
    /// A ball reflected off a cushion.
    Cushion { ball: usize },
}

/// A resolved contact from the most recent step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub kind: ContactKind,
    /// Closing speed along the contact normal before resolution.
    pub speed: f32,
}

// ---------------------------------------------------------------------------
// Physics
// ---------------------------------------------------------------------------

/// Table-bound collision and integration engine.
///
/// Holds only the fixed table parameters. The ball collection is borrowed
/// mutably for the duration of each step and never stored.
#[derive(Debug, Clone)]
pub struct Physics {
    table_width: f32,
    table_height: f32,
    friction: f32,
    restitution: f32,
}

impl Physics {
    pub fn new(table_width: f32, table_height: f32, friction: f32) -> Self {
        Self {
            table_width,
            table_height,
            friction,
            restitution: DEFAULT_RESTITUTION,
        }
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    /// Advance all active balls by one frame.
    pub fn update(&self, balls: &mut [Ball], dt: f32) {
        self.step(balls, dt, |_| {});
    }

    /// Same as [`Physics::update`], appending resolved contacts to `contacts`.
    pub fn step_into(&self, balls: &mut [Ball], dt: f32, contacts: &mut Vec<Contact>) {
        self.step(balls, dt, |c| contacts.push(c));
    }

    /// Advance all active balls by one frame, reporting each resolved contact.
    ///
    /// Phase order is fixed: integrate, cushions, friction (per ball), then
    /// every unordered pair `i < j` in ascending order. Pocketed balls are
    /// skipped throughout. `dt` is used as given.
    pub fn step(&self, balls: &mut [Ball], dt: f32, mut on_contact: impl FnMut(Contact)) {
        for (i, ball) in balls.iter_mut().enumerate() {
            if !ball.is_active() {
                continue;
            }
            ball.update(dt);
            if let Some(speed) = self.handle_wall_collision(ball) {
                on_contact(Contact {
                    kind: ContactKind::Cushion { ball: i },
                    speed,
                });
            }
            ball.apply_friction(self.friction, dt);
        }

        for i in 0..balls.len() {
            let (head, tail) = balls.split_at_mut(i + 1);
            let a = &mut head[i];
            if !a.is_active() {
                continue;
            }
            for (offset, b) in tail.iter_mut().enumerate() {
                if !b.is_active() {
                    continue;
                }
                if let Some(speed) = self.handle_ball_collision(a, b) {
                    on_contact(Contact {
                        kind: ContactKind::Ball { a: i, b: i + 1 + offset },
                        speed,
                    });
                }
            }
        }
    }

    /// Clamp to the radius-inset rectangle and reflect the offending velocity
    /// component. X and Z are independent, so a corner flips both.
    /// Returns the largest reflected speed, if any wall was hit at speed.
    fn handle_wall_collision(&self, ball: &mut Ball) -> Option<f32> {
        let r = ball.radius();
        let left = -self.table_width / 2.0 + r;
        let right = self.table_width / 2.0 - r;
        let near = -self.table_height / 2.0 + r;
        let far = self.table_height / 2.0 - r;

        let mut pos = ball.position();
        let mut vel = ball.velocity();
        let mut hit: Option<f32> = None;

        if pos.x < left {
            pos.x = left;
            hit = Some(vel.x.abs());
            vel.x = -vel.x;
        } else if pos.x > right {
            pos.x = right;
            hit = Some(vel.x.abs());
            vel.x = -vel.x;
        }

        if pos.z < near {
            pos.z = near;
            hit = Some(hit.unwrap_or(0.0).max(vel.z.abs()));
            vel.z = -vel.z;
        } else if pos.z > far {
            pos.z = far;
            hit = Some(hit.unwrap_or(0.0).max(vel.z.abs()));
            vel.z = -vel.z;
        }

        if hit.is_some() {
            ball.set_position(pos);
            ball.set_velocity(vel);
        }
        hit.filter(|&speed| speed > MIN_CONTACT_SPEED)
    }

    /// Separate an overlapping pair and exchange a restitution-scaled impulse
    /// along the contact normal. Returns the closing speed when the pair was
    /// actually approaching.
    fn handle_ball_collision(&self, a: &mut Ball, b: &mut Ball) -> Option<f32> {
        let delta = b.position() - a.position();
        let dist = delta.length();
        let penetration = a.radius() + b.radius() - dist;
        if penetration <= 0.0 {
            return None;
        }

        let normal = if dist > 0.0 {
            delta / dist
        } else {
            log::trace!("coincident ball centres, separating along +X");
            COINCIDENT_NORMAL
        };

        // Heavier ball moves less; together they remove the full overlap.
        let total_mass = a.mass() + b.mass();
        a.set_position(a.position() - normal * (penetration * b.mass() / total_mass));
        b.set_position(b.position() + normal * (penetration * a.mass() / total_mass));

        let relative = b.velocity() - a.velocity();
        let along_normal = relative.dot(normal);
        if along_normal > 0.0 {
            // Already separating.
            return None;
        }

        let magnitude =
            -(1.0 + self.restitution) * along_normal / (1.0 / a.mass() + 1.0 / b.mass());
        let impulse = normal * magnitude;
        a.apply_impulse(-impulse);
        b.apply_impulse(impulse);

        let closing = -along_normal;
        (closing > MIN_CONTACT_SPEED).then_some(closing)
    }

    /// Whether `ball` sits inside the pocket at `center`.
    /// Distance is measured in the table plane (X/Z).
    pub fn check_pocket_collision(ball: &Ball, center: Vec3, radius: f32) -> bool {
        let p = ball.position();
        let horizontal = Vec2::new(p.x - center.x, p.z - center.z);
        horizontal.length_squared() < radius * radius
    }

    pub fn table_width(&self) -> f32 {
        self.table_width
    }

    pub fn table_height(&self) -> f32 {
        self.table_height
    }

    pub fn friction(&self) -> f32 {
        self.friction
    }

    pub fn restitution(&self) -> f32 {
        self.restitution
    }
}

//! Fixed-increment spin and revolution.

use crate::body::{BodyHierarchy, CelestialBody};

/// Bring an angle that has advanced by less than one full turn back into
/// `[0, 360)` with a single subtraction.
pub fn wrap_degrees(angle: f32) -> f32 {
    if angle >= 360.0 { angle - 360.0 } else { angle }
}

/// Advances every body's spin and orbit angles by fixed steps per tick.
///
/// Positions are not touched here; the renderer derives them from the
/// angles when it draws a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalIntegrator {
    /// Degrees of spin added per tick.
    pub spin_speed: f32,
}

impl OrbitalIntegrator {
    pub fn new(spin_speed: f32) -> Self {
        Self { spin_speed }
    }

    /// Orbit degrees a body gains per tick.
    ///
    /// Roots gain the full spin speed. Satellites sweep inversely to their
    /// radius, and moons get an extra `spin_speed * depth` on top.
    pub fn orbit_step(&self, body: &CelestialBody) -> f32 {
        if body.is_root() {
            return self.spin_speed;
        }
        let mut step = self.spin_speed / body.orbit_radius;
        if body.is_moon() {
            step += self.spin_speed * body.depth as f32;
        }
        step
    }

    /// Advance one tick for every body in creation order.
    pub fn advance(&self, bodies: &mut BodyHierarchy) {
        for body in bodies.iter_mut() {
            body.spin_angle = wrap_degrees(body.spin_angle + self.spin_speed);
            let step = self.orbit_step(body);
            body.orbit_angle = wrap_degrees(body.orbit_angle + step);
        }
    }
}

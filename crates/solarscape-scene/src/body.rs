//! Celestial bodies and the host hierarchy they orbit in.
//!
//! Bodies live in a single ordered [`BodyHierarchy`]. A body's host is a
//! [`BodyId`] handle to a body added *earlier*, which is checked on insertion,
//! so the host relation is always a forest and a single pass in creation order
//! sees every host before its satellites.

use glam::Vec3;
use tracing::debug;

use crate::error::SceneError;

/// Handle to a body inside a [`BodyHierarchy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(usize);

impl BodyId {
    /// Position of the body in creation order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A planet, moon or anchor star.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    /// Label used in logs.
    pub name: String,
    /// Diffuse colour, each channel in `[0, 1]`.
    pub color: [f32; 3],
    /// Current centre. For hosted bodies `x` and `z` are derived from the
    /// host; `y` never changes after creation.
    pub position: Vec3,
    /// Radius of the drawn primitive.
    pub scale: f32,
    /// The body this one orbits, `None` for roots.
    pub host: Option<BodyId>,
    /// 0 for roots, host depth + 1 otherwise.
    pub depth: u32,
    /// Distance from the host. Unused for roots.
    pub orbit_radius: f32,
    /// Rotation about the body's own vertical axis, degrees in `[0, 360)`.
    pub spin_angle: f32,
    /// Angle along the orbit around the host, degrees in `[0, 360)`.
    pub orbit_angle: f32,
}

impl CelestialBody {
    /// Whether this body orbits nothing.
    pub fn is_root(&self) -> bool {
        self.host.is_none()
    }

    /// Whether this body orbits a body that itself orbits something. The
    /// number of roots plays no part.
    pub fn is_moon(&self) -> bool {
        self.depth >= 2
    }
}

/// Ordered, size-limited sequence of bodies.
#[derive(Debug, Clone)]
pub struct BodyHierarchy {
    bodies: Vec<CelestialBody>,
    max_bodies: usize,
}

impl BodyHierarchy {
    /// Create an empty hierarchy that accepts at most `max_bodies` bodies.
    pub fn new(max_bodies: usize) -> Self {
        Self {
            bodies: Vec::with_capacity(max_bodies.min(64)),
            max_bodies,
        }
    }

    /// Add a body that orbits nothing and stays at `position` forever.
    pub fn add_root(
        &mut self,
        name: &str,
        color: [f32; 3],
        scale: f32,
        position: Vec3,
    ) -> Result<BodyId, SceneError> {
        self.check_capacity(name)?;
        check_scale(name, scale)?;

        Ok(self.push(CelestialBody {
            name: name.to_string(),
            color,
            position,
            scale,
            host: None,
            depth: 0,
            orbit_radius: 0.0,
            spin_angle: 0.0,
            orbit_angle: 0.0,
        }))
    }

    /// Add a body circling `host` at `orbit_radius`, in the host's `y = 0` plane.
    pub fn add_satellite(
        &mut self,
        name: &str,
        color: [f32; 3],
        scale: f32,
        host: BodyId,
        orbit_radius: f32,
    ) -> Result<BodyId, SceneError> {
        self.check_capacity(name)?;
        check_scale(name, scale)?;

        let host_depth = self
            .bodies
            .get(host.0)
            .map(|h| h.depth)
            .ok_or_else(|| SceneError::UnknownHost {
                name: name.to_string(),
                host: host.0,
            })?;

        if !orbit_radius.is_finite() || orbit_radius <= 0.0 {
            return Err(SceneError::InvalidOrbitRadius {
                name: name.to_string(),
                radius: orbit_radius,
            });
        }

        Ok(self.push(CelestialBody {
            name: name.to_string(),
            color,
            position: Vec3::ZERO,
            scale,
            host: Some(host),
            depth: host_depth + 1,
            orbit_radius,
            spin_angle: 0.0,
            orbit_angle: 0.0,
        }))
    }

    fn push(&mut self, body: CelestialBody) -> BodyId {
        let id = BodyId(self.bodies.len());
        debug!(
            "Added body #{} `{}` (depth {}, host {:?})",
            id.0, body.name, body.depth, body.host
        );
        self.bodies.push(body);
        id
    }

    fn check_capacity(&self, name: &str) -> Result<(), SceneError> {
        if self.bodies.len() >= self.max_bodies {
            return Err(SceneError::TooManyBodies {
                name: name.to_string(),
                limit: self.max_bodies,
            });
        }
        Ok(())
    }

    /// Number of bodies.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether no body has been added.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Look up a body by handle.
    pub fn get(&self, id: BodyId) -> Option<&CelestialBody> {
        self.bodies.get(id.0)
    }

    /// Bodies in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter()
    }

    /// Mutable bodies in creation order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CelestialBody> {
        self.bodies.iter_mut()
    }

    /// Handles of all bodies in creation order.
    pub fn ids(&self) -> impl Iterator<Item = BodyId> + use<> {
        (0..self.bodies.len()).map(BodyId)
    }

    /// Recompute the x/z position of one hosted body from its host's current
    /// position and its orbit angle. Roots are left untouched.
    pub fn update_position(&mut self, id: BodyId) {
        let Some(host) = self.bodies[id.0].host else {
            return;
        };
        let host_position = self.bodies[host.0].position;
        let body = &mut self.bodies[id.0];
        let theta = body.orbit_angle.to_radians();
        body.position.x = host_position.x + body.orbit_radius * theta.cos();
        body.position.z = host_position.z + body.orbit_radius * theta.sin();
    }

    /// Recompute every hosted body's position, hosts first.
    pub fn update_positions(&mut self) {
        for id in self.ids() {
            self.update_position(id);
        }
    }
}

fn check_scale(name: &str, scale: f32) -> Result<(), SceneError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(SceneError::InvalidScale {
            name: name.to_string(),
            scale,
        });
    }
    Ok(())
}

/// Build the fixed system: a sun with two planets, one of which has a moon.
pub fn solar_system(max_bodies: usize) -> Result<BodyHierarchy, SceneError> {
    let mut bodies = BodyHierarchy::new(max_bodies);

    let sun = bodies.add_root("sun", [1.0, 1.0, 0.8], 2.0, Vec3::ZERO)?;
    let verdant = bodies.add_satellite("verdant", [0.0, 1.0, 0.5], 1.0, sun, 4.5)?;
    bodies.add_satellite("ember", [0.8, 0.2, 0.2], 0.5, verdant, 2.0)?;
    bodies.add_satellite("amber", [0.8, 0.6, 0.0], 1.4, sun, 8.5)?;

    Ok(bodies)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solar_system_shape() {
        let bodies = solar_system(10).unwrap();
        assert_eq!(bodies.len(), 4);

        let depths: Vec<u32> = bodies.iter().map(|b| b.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 1]);

        let hosts: Vec<Option<usize>> = bodies
            .iter()
            .map(|b| b.host.map(BodyId::index))
            .collect();
        assert_eq!(hosts, vec![None, Some(0), Some(1), Some(0)]);
    }

    #[test]
    fn test_solar_system_radii_and_scales() {
        let bodies = solar_system(10).unwrap();
        let radii: Vec<f32> = bodies.iter().skip(1).map(|b| b.orbit_radius).collect();
        assert_eq!(radii, vec![4.5, 2.0, 8.5]);
        let scales: Vec<f32> = bodies.iter().map(|b| b.scale).collect();
        assert_eq!(scales, vec![2.0, 1.0, 0.5, 1.4]);
    }

    #[test]
    fn test_only_the_grandchild_is_a_moon() {
        let bodies = solar_system(10).unwrap();
        let moons: Vec<&str> = bodies
            .iter()
            .filter(|b| b.is_moon())
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(moons, vec!["ember"]);
        assert!(bodies.iter().next().unwrap().is_root());
    }

    #[test]
    fn test_capacity_overrun_is_rejected() {
        let err = solar_system(3).unwrap_err();
        assert_eq!(
            err,
            SceneError::TooManyBodies {
                name: "amber".to_string(),
                limit: 3,
            }
        );
    }

    #[test]
    fn test_exact_capacity_is_accepted() {
        assert_eq!(solar_system(4).unwrap().len(), 4);
    }

    #[test]
    fn test_unknown_host_is_rejected() {
        let mut bodies = BodyHierarchy::new(10);
        let err = bodies
            .add_satellite("orphan", [1.0; 3], 1.0, BodyId(0), 3.0)
            .unwrap_err();
        assert!(matches!(err, SceneError::UnknownHost { host: 0, .. }));
        assert!(bodies.is_empty());
    }

    #[test]
    fn test_invalid_orbit_radius_is_rejected() {
        let mut bodies = BodyHierarchy::new(10);
        let sun = bodies.add_root("sun", [1.0; 3], 1.0, Vec3::ZERO).unwrap();
        for radius in [0.0, -1.0, f32::NAN] {
            let err = bodies
                .add_satellite("bad", [1.0; 3], 1.0, sun, radius)
                .unwrap_err();
            assert!(matches!(err, SceneError::InvalidOrbitRadius { .. }));
        }
    }

    #[test]
    fn test_invalid_scale_is_rejected() {
        let mut bodies = BodyHierarchy::new(10);
        let err = bodies
            .add_root("flat", [1.0; 3], 0.0, Vec3::ZERO)
            .unwrap_err();
        assert!(matches!(err, SceneError::InvalidScale { .. }));
    }

    #[test]
    fn test_update_position_follows_host() {
        let mut bodies = BodyHierarchy::new(10);
        let sun = bodies
            .add_root("sun", [1.0; 3], 1.0, Vec3::new(3.0, 1.0, -2.0))
            .unwrap();
        let planet = bodies.add_satellite("p", [1.0; 3], 1.0, sun, 5.0).unwrap();
        bodies.iter_mut().nth(1).unwrap().orbit_angle = 90.0;

        bodies.update_positions();

        let p = bodies.get(planet).unwrap().position;
        assert!((p.x - 3.0).abs() < 1e-5);
        assert!((p.z - 3.0).abs() < 1e-5);
        assert_eq!(p.y, 0.0);
        assert_eq!(bodies.get(sun).unwrap().position, Vec3::new(3.0, 1.0, -2.0));
    }
}

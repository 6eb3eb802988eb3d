//! One-shot background star placement on the faces of a cube shell.

use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::SceneError;

/// Face of the star cube a star was placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl CubeFace {
    /// Face for star `index` out of `count`. The list is split into six
    /// bands by cumulative thresholds checked from the end of the list.
    pub fn for_index(index: usize, count: usize) -> Self {
        let i = index as f64;
        let n = count as f64;
        if i > 5.0 / 6.0 * n {
            CubeFace::PosZ
        } else if i > 4.0 / 6.0 * n {
            CubeFace::NegZ
        } else if i > 3.0 / 6.0 * n {
            CubeFace::PosY
        } else if i > 2.0 / 6.0 * n {
            CubeFace::NegY
        } else if i > 1.0 / 6.0 * n {
            CubeFace::PosX
        } else {
            CubeFace::NegX
        }
    }

    /// Place a point on this face of a cube with half-width `depth`, using
    /// `a` and `b` as the two free coordinates.
    fn place(self, depth: f32, a: f32, b: f32) -> Vec3 {
        match self {
            CubeFace::PosZ => Vec3::new(a, b, depth),
            CubeFace::NegZ => Vec3::new(a, b, -depth),
            CubeFace::PosY => Vec3::new(a, depth, b),
            CubeFace::NegY => Vec3::new(a, -depth, b),
            CubeFace::PosX => Vec3::new(depth, a, b),
            CubeFace::NegX => Vec3::new(-depth, a, b),
        }
    }
}

/// A fixed point of light far from the bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundStar {
    pub position: Vec3,
}

/// Seeded generator for the background star field.
pub struct StarfieldGenerator {
    rng: ChaCha8Rng,
    star_depth: u32,
}

impl StarfieldGenerator {
    /// Create a generator for a shell of half-width `star_depth`.
    pub fn new(seed: u64, star_depth: u32) -> Result<Self, SceneError> {
        if star_depth == 0 {
            return Err(SceneError::InvalidStarDepth);
        }
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            star_depth,
        })
    }

    /// Integer in `(-star_depth, star_depth)`, as a float.
    fn free_coordinate(sign: bool, magnitude: u32) -> f32 {
        let m = magnitude as f32;
        if sign { m } else { -m }
    }

    /// Generate `count` stars.
    pub fn generate(&mut self, count: usize) -> Vec<BackgroundStar> {
        let depth = self.star_depth as f32;
        (0..count)
            .map(|i| {
                let sign1: bool = self.rng.random();
                let sign2: bool = self.rng.random();
                let num1 = self.rng.random_range(0..self.star_depth);
                let num2 = self.rng.random_range(0..self.star_depth);

                let a = Self::free_coordinate(sign1, num1);
                let b = Self::free_coordinate(sign2, num2);
                BackgroundStar {
                    position: CubeFace::for_index(i, count).place(depth, a, b),
                }
            })
            .collect()
    }
}

/// Seed derived from the wall clock, for runs without a configured seed.
pub fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() ^ u64::from(d.subsec_nanos()))
        .unwrap_or(0)
}

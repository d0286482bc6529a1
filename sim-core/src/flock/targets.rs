use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// Fixed points that seeking agents fly to (flowers, hive entrances).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeekTargets {
    pub points: Vec<Vec3>,
}

impl SeekTargets {
    pub fn from_positions(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    /// Scatters `count` points uniformly over the ground disc (`z = 0`)
    /// below `center` with the given `radius`.
    pub fn random_on_ground(count: usize, center: Vec3, radius: f32, rng: &mut impl Rng) -> Self {
        let points = (0..count)
            .map(|_| {
                let r = radius * rng.random::<f32>().sqrt();
                let angle = rng.random_range(0.0..TAU);
                Vec3::new(center.x + r * angle.cos(), center.y + r * angle.sin(), 0.0)
            })
            .collect();

        Self::from_positions(points)
    }

    /// Picks one point uniformly, or `None` when there are no targets.
    pub fn choose(&self, rng: &mut impl Rng) -> Option<Vec3> {
        if self.is_empty() {
            return None;
        }
        Some(self.points[rng.random_range(0..self.points.len())])
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

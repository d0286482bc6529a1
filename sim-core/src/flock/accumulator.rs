use glam::Vec3;

/// Running sum of neighbour contributions for one agent.
///
/// The cohesion and alignment passes feed it every neighbour's position
/// or velocity and then ask for the **average**. An accumulator that saw
/// no neighbours has no average, which the passes treat as "leave the
/// velocity alone".
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NeighborMean {
    /// Sum of all contributed vectors.
    sum: Vec3,
    /// Number of contributions.
    count: u32,
}

impl NeighborMean {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one contribution.
    ///
    /// ### Parameters
    /// - `value` - Vector to add to the running sum.
    #[inline]
    pub fn add(&mut self, value: Vec3) {
        self.sum += value;
        self.count += 1;
    }

    /// Returns the average of all contributions.
    ///
    /// ### Returns
    /// `Some(average)`, or `None` if nothing was added since the last
    /// [`NeighborMean::clear`].
    #[inline]
    pub fn mean(&self) -> Option<Vec3> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f32)
        }
    }

    /// Resets the sum to zero and the count to `0` so the accumulator can
    /// serve the next agent.
    pub fn clear(&mut self) {
        self.sum = Vec3::ZERO;
        self.count = 0;
    }
}

impl Extend<Vec3> for NeighborMean {
    fn extend<I: IntoIterator<Item = Vec3>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

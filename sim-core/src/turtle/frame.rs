use crate::orientation::Orientation;
use glam::Vec3;

/// Full pose of the turtle; saved by value on `[` and restored on `]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurtleFrame {
    pub position: Vec3,
    pub orientation: Orientation,
    pub thickness: f32,
}

impl TurtleFrame {
    pub fn new(position: Vec3, thickness: f32) -> Self {
        Self {
            position,
            orientation: Orientation::INITIAL,
            thickness,
        }
    }

    pub fn heading(&self) -> Vec3 {
        self.orientation.heading
    }

    /// Moves `distance` along the heading and returns the new position.
    pub fn advance(&mut self, distance: f32) -> Vec3 {
        self.position += self.orientation.heading * distance;
        self.position
    }
}

//! Orthonormal orientation frames shared by the turtle and the flock export.
//!
//! A frame is the triple heading `h`, left `l`, up `u` with `u = h × l`.
//! Every rotation re-orthonormalises the triple, so the invariant holds
//! within float tolerance no matter how many rotations are chained.

use crate::types::EPSILON;
use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub heading: Vec3,
    pub left: Vec3,
    pub up: Vec3,
}

impl Default for Orientation {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl Orientation {
    /// Heading `+Z`, left `+X`, up `+Y`.
    pub const INITIAL: Self = Self {
        heading: Vec3::Z,
        left: Vec3::X,
        up: Vec3::Y,
    };

    /// Builds a frame looking along `dir` with `+Z` as the reference up.
    ///
    /// Falls back to [`Orientation::INITIAL`] for a zero direction, and to
    /// `+X` as the left vector when `dir` is vertical.
    pub fn from_direction(dir: Vec3) -> Self {
        let heading = dir.normalize_or_zero();
        if heading == Vec3::ZERO {
            return Self::INITIAL;
        }
        let mut left = Vec3::Z.cross(heading);
        if left.length_squared() < EPSILON {
            left = Vec3::X;
        }
        let left = left.normalize();
        Self {
            heading,
            left,
            up: heading.cross(left),
        }
    }

    /// Rotates `left` and `up` about `heading` by `degrees`.
    pub fn roll(&mut self, degrees: f32) {
        let q = Quat::from_axis_angle(self.heading, degrees.to_radians());
        self.left = q * self.left;
        self.up = q * self.up;
        self.orthonormalize();
    }

    /// Rotates `heading` and `up` about `left` by `degrees`.
    pub fn pitch(&mut self, degrees: f32) {
        let q = Quat::from_axis_angle(self.left, degrees.to_radians());
        self.heading = q * self.heading;
        self.up = q * self.up;
        self.orthonormalize();
    }

    /// Rotates `heading` and `left` about `up` by `degrees`.
    pub fn turn(&mut self, degrees: f32) {
        let q = Quat::from_axis_angle(self.up, degrees.to_radians());
        self.heading = q * self.heading;
        self.left = q * self.left;
        self.orthonormalize();
    }

    /// Rotates the whole frame about a unit `axis` by `radians`.
    pub fn rotate(&mut self, axis: Vec3, radians: f32) {
        let q = Quat::from_axis_angle(axis, radians);
        self.heading = q * self.heading;
        self.left = q * self.left;
        self.up = q * self.up;
        self.orthonormalize();
    }

    /// Column matrix `[h l u]`, mapping local axes to world space.
    pub fn to_mat3(&self) -> Mat3 {
        Mat3::from_cols(self.heading, self.left, self.up)
    }

    /// Largest entry of `MᵀM - I` for `M = [h l u]`; zero for an exact
    /// orthonormal frame.
    pub fn orthonormality_error(&self) -> f32 {
        let m = self.to_mat3();
        (m.transpose() * m - Mat3::IDENTITY)
            .to_cols_array()
            .into_iter()
            .fold(0.0, |worst, x| worst.max(x.abs()))
    }

    // Gram-Schmidt from the heading; keeps the frame right-handed.
    fn orthonormalize(&mut self) {
        self.heading = self.heading.normalize();
        self.left = (self.left - self.heading * self.heading.dot(self.left)).normalize();
        self.up = self.heading.cross(self.left);
    }
}

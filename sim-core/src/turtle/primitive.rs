use crate::leaf::LeafType;
use crate::orientation::Orientation;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A branch segment drawn by `F`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vec3,
    pub end: Vec3,
    pub orientation: Orientation,
    pub thickness: f32,
}

impl Segment {
    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }
}

/// A leaf placed by `L`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    pub position: Vec3,
    pub orientation: Orientation,
    pub scale: f32,
    /// Bend of the outline in degrees.
    pub bend_angle: f32,
    pub leaf_type: LeafType,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Segment(Segment),
    Leaf(Leaf),
}

/// Receiver of the turtle's primitive stream.
///
/// Calls arrive synchronously and in symbol order.
pub trait PrimitiveSink {
    fn segment(&mut self, segment: Segment);
    fn leaf(&mut self, leaf: Leaf);
}

impl PrimitiveSink for Vec<Primitive> {
    fn segment(&mut self, segment: Segment) {
        self.push(Primitive::Segment(segment));
    }

    fn leaf(&mut self, leaf: Leaf) {
        self.push(Primitive::Leaf(leaf));
    }
}

/// Adapts a pair of closures into a [`PrimitiveSink`].
pub struct Callbacks<S, L> {
    pub on_segment: S,
    pub on_leaf: L,
}

impl<S, L> Callbacks<S, L>
where
    S: FnMut(Segment),
    L: FnMut(Leaf),
{
    pub fn new(on_segment: S, on_leaf: L) -> Self {
        Self {
            on_segment,
            on_leaf,
        }
    }
}

impl<S, L> PrimitiveSink for Callbacks<S, L>
where
    S: FnMut(Segment),
    L: FnMut(Leaf),
{
    fn segment(&mut self, segment: Segment) {
        (self.on_segment)(segment);
    }

    fn leaf(&mut self, leaf: Leaf) {
        (self.on_leaf)(leaf);
    }
}

//! Stack-based 3-D turtle that walks a [`SymbolString`] and emits posed
//! primitives.
//!
//! Supported tags:
//!
//! | tag | effect |
//! |---|---|
//! | `F(d)` | segment of length `d` along the heading, then tropism |
//! | `[` / `]` | push / pop the full frame |
//! | `/(a)` `\(a)` | roll: rotate left and up about the heading |
//! | `+(a)` `-(a)` | pitch: rotate heading and up about left |
//! | `&(a)` `^(a)` | turn: rotate heading and left about up |
//! | `?` | roll by a random angle in `[0, 360)` |
//! | `!(t)` | set thickness |
//! | `L` | leaf |
//!
//! Any other tag is a placeholder and does nothing.

mod frame;
mod primitive;

pub use frame::TurtleFrame;
pub use primitive::{Callbacks, Leaf, Primitive, PrimitiveSink, Segment};

use crate::config::PlantParams;
use crate::error::{Result, SimError};
use crate::grammar::{Symbol, SymbolString};
use crate::types::EPSILON;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct Turtle {
    params: PlantParams,
}

impl Turtle {
    /// Creates a turtle after validating `params`.
    pub fn new(params: PlantParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &PlantParams {
        &self.params
    }

    /// Walks `symbols` and feeds every primitive to `sink`.
    ///
    /// Bracket balance is checked up front, so a malformed string emits
    /// nothing at all. Every run reseeds the `?` stream from `params.seed`,
    /// so repeated runs over the same symbols are identical.
    ///
    /// ### Returns
    /// The turtle frame after the last symbol.
    ///
    /// ### Errors
    /// [`SimError::StackUnderflow`] when a `]` has no matching `[`.
    pub fn run(
        &self,
        symbols: &SymbolString,
        sink: &mut impl PrimitiveSink,
    ) -> Result<TurtleFrame> {
        check_brackets(symbols)?;

        let mut rng = StdRng::seed_from_u64(self.params.seed);
        let mut frame = TurtleFrame::new(self.params.origin, self.params.thickness);
        let mut stack: Vec<TurtleFrame> = Vec::new();

        for (index, symbol) in symbols.iter().enumerate() {
            match symbol.tag() {
                'F' => {
                    let distance = arg(symbol, self.params.length);
                    let start = frame.position;
                    let end = frame.advance(distance);
                    sink.segment(Segment {
                        start,
                        end,
                        orientation: frame.orientation,
                        thickness: frame.thickness,
                    });
                    self.apply_tropism(&mut frame);
                }
                '[' => stack.push(frame),
                ']' => frame = stack.pop().ok_or(SimError::StackUnderflow { index })?,
                '/' => frame.orientation.roll(arg(symbol, self.params.branch_angle)),
                '\\' => frame.orientation.roll(-arg(symbol, self.params.branch_angle)),
                '+' => frame.orientation.pitch(arg(symbol, self.params.branch_angle)),
                '-' => frame.orientation.pitch(-arg(symbol, self.params.branch_angle)),
                '&' => frame.orientation.turn(arg(symbol, self.params.branch_angle)),
                '^' => frame.orientation.turn(-arg(symbol, self.params.branch_angle)),
                '?' => {
                    let degrees = rng.random_range(0.0..360.0);
                    frame.orientation.roll(degrees);
                }
                '!' => frame.thickness = arg(symbol, self.params.thickness),
                'L' => sink.leaf(Leaf {
                    position: frame.position,
                    orientation: frame.orientation,
                    scale: self.params.leaf_scale,
                    bend_angle: self.params.leaf_bend,
                    leaf_type: self.params.leaf_type,
                }),
                other => tracing::trace!(tag = %other, index, "skipping placeholder symbol"),
            }
        }

        Ok(frame)
    }

    /// Bends the heading toward the tropism vector.
    ///
    /// The frame turns about `h × T` by `asin(|h × T|) * tropism_scale`.
    /// A heading parallel or anti-parallel to `T` yields no torque and is
    /// left alone.
    fn apply_tropism(&self, frame: &mut TurtleFrame) {
        if self.params.tropism_scale == 0.0 || self.params.tropism == Vec3::ZERO {
            return;
        }
        let torque = frame.heading().cross(self.params.tropism);
        let magnitude = torque.length();
        if magnitude <= EPSILON {
            return;
        }
        let theta = magnitude.min(1.0).asin();
        frame.orientation.rotate(torque / magnitude, theta * self.params.tropism_scale);
    }
}

/// Convenience wrapper collecting the whole primitive stream.
pub fn interpret(symbols: &SymbolString, params: PlantParams) -> Result<Vec<Primitive>> {
    let turtle = Turtle::new(params)?;
    let mut primitives = Vec::new();
    turtle.run(symbols, &mut primitives)?;
    Ok(primitives)
}

fn arg(symbol: &Symbol, default: f32) -> f32 {
    symbol.param(0).unwrap_or(default)
}

fn check_brackets(symbols: &SymbolString) -> Result<()> {
    let mut depth = 0usize;
    for (index, symbol) in symbols.iter().enumerate() {
        match symbol.tag() {
            '[' => depth += 1,
            ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(SimError::StackUnderflow { index })?;
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::parse;
    use crate::leaf::LeafType;

    const TOL: f32 = 1e-5;

    fn still_params() -> PlantParams {
        PlantParams {
            tropism_scale: 0.0,
            ..PlantParams::default()
        }
    }

    fn walk(text: &str, params: PlantParams) -> (TurtleFrame, Vec<Primitive>) {
        let turtle = Turtle::new(params).unwrap();
        let mut out = Vec::new();
        let frame = turtle.run(&parse(text).unwrap(), &mut out).unwrap();
        (frame, out)
    }

    fn segments(prims: &[Primitive]) -> Vec<Segment> {
        prims
            .iter()
            .filter_map(|p| match p {
                Primitive::Segment(s) => Some(*s),
                Primitive::Leaf(_) => None,
            })
            .collect()
    }

    #[test]
    fn straight_segments_are_colinear() {
        let (frame, prims) = walk("F(1)F(1)", still_params());
        let segs = segments(&prims);

        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].start, Vec3::ZERO);
        assert_eq!(segs[0].end, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(segs[1].start, segs[0].end);
        assert_eq!(frame.position, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(frame.heading(), Vec3::Z);
    }

    #[test]
    fn brackets_restore_the_full_frame() {
        let (branched, branched_prims) = walk("F(1)[+(90)F(1)]F(1)", still_params());
        let (plain, _) = walk("F(1)F(1)", still_params());

        assert_eq!(branched, plain);
        assert_eq!(segments(&branched_prims).len(), 3);
    }

    #[test]
    fn pitch_then_draw_goes_along_negative_y() {
        let (frame, _) = walk("+(90)F(2)", still_params());
        assert!((frame.position - Vec3::new(0.0, -2.0, 0.0)).length() < TOL);
    }

    #[test]
    fn rotations_keep_frame_orthonormal() {
        let text = "/(13)+(27)&(41)\\(5)-(88)^(123)".repeat(200);
        let (frame, _) = walk(&text, still_params());
        assert!(frame.orientation.orthonormality_error() < 1e-4);
    }

    #[test]
    fn missing_parameters_fall_back_to_defaults() {
        let params = PlantParams {
            length: 3.0,
            thickness: 0.25,
            ..still_params()
        };
        let (frame, prims) = walk("FF!", params);
        let segs = segments(&prims);
        assert_eq!(segs[0].end, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(segs[0].thickness, 0.25);
        assert_eq!(frame.position, Vec3::new(0.0, 0.0, 6.0));
        assert_eq!(frame.thickness, 0.25);
    }

    #[test]
    fn thickness_symbol_applies_to_later_segments() {
        let (_, prims) = walk("F(1)!(0.5)F(1)", still_params());
        let segs = segments(&prims);
        assert_eq!(segs[0].thickness, still_params().thickness);
        assert_eq!(segs[1].thickness, 0.5);
    }

    #[test]
    fn leaf_uses_configured_shape() {
        let params = PlantParams {
            leaf_scale: 0.75,
            leaf_bend: 90.0,
            leaf_type: LeafType::Maple,
            origin: Vec3::new(1.0, 1.0, 0.0),
            ..still_params()
        };
        let (_, prims) = walk("F(1)L", params);

        assert_eq!(prims.len(), 2);
        let Primitive::Leaf(leaf) = prims[1] else {
            panic!("expected a leaf, got {:?}", prims[1]);
        };
        assert_eq!(leaf.position, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(leaf.scale, 0.75);
        assert_eq!(leaf.bend_angle, 90.0);
        assert_eq!(leaf.leaf_type, LeafType::Maple);
    }

    #[test]
    fn tropism_bends_heading_toward_direction() {
        let params = PlantParams {
            tropism: Vec3::X,
            tropism_scale: 0.5,
            ..PlantParams::default()
        };
        let (frame, _) = walk("F(1)", params);
        let expected = Vec3::new(1.0, 0.0, 1.0).normalize();

        assert!((frame.heading() - expected).length() < TOL);
        assert!(frame.orientation.orthonormality_error() < TOL);
    }

    #[test]
    fn anti_parallel_tropism_is_a_no_op() {
        let params = PlantParams {
            tropism: Vec3::new(0.0, 0.0, -1.0),
            tropism_scale: 1.0,
            ..PlantParams::default()
        };
        let (frame, _) = walk("F(1)F(1)", params);
        assert_eq!(frame.heading(), Vec3::Z);
        assert_eq!(frame.position, Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn unmatched_close_bracket_underflows_without_output() {
        let turtle = Turtle::new(still_params()).unwrap();
        let mut out = Vec::new();
        let err = turtle.run(&parse("F(1)]F(1)").unwrap(), &mut out).unwrap_err();

        assert_eq!(err, SimError::StackUnderflow { index: 1 });
        assert!(out.is_empty());
    }

    #[test]
    fn unclosed_open_bracket_is_allowed() {
        let (frame, _) = walk("F(1)[F(1)", still_params());
        assert_eq!(frame.position, Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn random_roll_is_seeded() {
        let text = "?F(1)?+(30)F(1)?&(20)F(1)";
        let params = PlantParams {
            seed: 7,
            ..still_params()
        };
        let (_, a) = walk(text, params);
        let (_, b) = walk(text, params);
        assert_eq!(a, b);

        let (frame, _) = walk("?", params);
        assert!((frame.heading() - Vec3::Z).length() < TOL);
    }

    #[test]
    fn reused_turtle_replays_the_same_rolls() {
        let params = PlantParams {
            seed: 7,
            ..still_params()
        };
        let turtle = Turtle::new(params).unwrap();
        let symbols = parse("?+(30)F(1)").unwrap();

        let mut first = Vec::new();
        let mut second = Vec::new();
        let a = turtle.run(&symbols, &mut first).unwrap();
        let b = turtle.run(&symbols, &mut second).unwrap();

        assert_eq!(a, b);
        assert_eq!(first, second);
    }

    #[test]
    fn callbacks_receive_stream_in_order() {
        let mut events = Vec::new();
        {
            let turtle = Turtle::new(still_params()).unwrap();
            let mut sink = Callbacks::new(
                |s: Segment| events.push(format!("segment {}", s.end.z)),
                |_: Leaf| {},
            );
            turtle.run(&parse("F(1)LF(2)").unwrap(), &mut sink).unwrap();
        }
        assert_eq!(events, vec!["segment 1", "segment 3"]);
    }

    #[test]
    fn invalid_params_are_rejected_before_running() {
        let params = PlantParams {
            leaf_bend: -5.0,
            ..PlantParams::default()
        };
        assert!(matches!(
            Turtle::new(params),
            Err(SimError::InvalidParameter { name: "leaf_bend", .. })
        ));
    }
}

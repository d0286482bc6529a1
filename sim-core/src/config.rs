//! Immutable per-run parameter records for both engines.
//!
//! Every field has a default so a host can supply a sparse mapping, and
//! every record is checked by `validate` before any rewrite or tick runs.

use crate::error::{Result, SimError};
use crate::leaf::LeafType;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Parameters shared by the grammar presets and the turtle interpreter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantParams {
    /// Number of rewrite generations.
    pub iterations: usize,
    /// Default segment length, also the seed length of preset grammars.
    pub length: f32,
    /// Per-generation length factor applied by preset growth rules.
    pub length_scale: f32,
    /// Base thickness of the turtle at the start of a run.
    pub thickness: f32,
    /// Per-generation thickness factor applied by preset growth rules.
    pub thickness_scale: f32,
    /// Default rotation in degrees for rotation symbols without a parameter.
    pub branch_angle: f32,
    /// Tilt of leaves away from their branch, in degrees.
    pub leaf_angle: f32,
    pub leaf_scale: f32,
    /// Bend applied to the leaf outline by the geometry builder, in degrees.
    pub leaf_bend: f32,
    pub leaf_type: LeafType,
    /// Direction growth is biased toward (gravity, light).
    pub tropism: Vec3,
    pub tropism_scale: f32,
    pub origin: Vec3,
    pub seed: u64,
}

impl Default for PlantParams {
    fn default() -> Self {
        Self {
            iterations: 5,
            length: 1.0,
            length_scale: 1.109,
            thickness: 0.05,
            thickness_scale: 1.5,
            branch_angle: 30.0,
            leaf_angle: 45.0,
            leaf_scale: 0.5,
            leaf_bend: 180.0,
            leaf_type: LeafType::Ovate,
            tropism: Vec3::new(0.0, 0.0, -1.0),
            tropism_scale: 0.22,
            origin: Vec3::ZERO,
            seed: 0,
        }
    }
}

impl PlantParams {
    pub fn validate(&self) -> Result<()> {
        non_negative("length", self.length)?;
        non_negative("length_scale", self.length_scale)?;
        non_negative("thickness", self.thickness)?;
        non_negative("thickness_scale", self.thickness_scale)?;
        angle("branch_angle", self.branch_angle)?;
        angle("leaf_angle", self.leaf_angle)?;
        non_negative("leaf_scale", self.leaf_scale)?;
        angle("leaf_bend", self.leaf_bend)?;
        finite_vec("tropism", self.tropism)?;
        finite("tropism_scale", self.tropism_scale)?;
        finite_vec("origin", self.origin)?;
        Ok(())
    }
}

/// How the separation rule treats its displacement accumulator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeparationMode {
    /// One accumulator for the whole pass; agent `i` receives the running
    /// sum over agents `0..=i`.
    #[default]
    Carried,
    /// The accumulator starts at zero for every agent.
    PerAgent,
}

/// Parameters of one flocking run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockParams {
    pub population: usize,
    pub visual_range: f32,
    pub collision_radius: f32,
    pub cohesion_factor: f32,
    pub separation_factor: f32,
    pub alignment_factor: f32,
    pub max_speed: f32,
    pub territory_center: Vec3,
    pub territory_radius: f32,
    /// Magnitude of the pull back toward the territory center.
    pub territory_pull: f32,
    /// Altitude below which flocking agents are pushed upward.
    pub altitude_margin: f32,
    pub upward_bias: f32,
    /// Per-tick chance that a flocking agent starts seeking a target.
    pub seek_probability: f32,
    /// Per-tick chance that a waiting agent rejoins the flock.
    pub resume_probability: f32,
    /// Explicit seek targets. When empty, `target_count` targets are
    /// scattered on the ground inside the territory.
    pub targets: Vec<Vec3>,
    pub target_count: usize,
    pub separation_mode: SeparationMode,
    /// Host time units per tick, used when sampling keyframes.
    pub tick_duration: f32,
    pub ticks: usize,
    pub seed: u64,
}

impl Default for FlockParams {
    fn default() -> Self {
        Self {
            population: 20,
            visual_range: 10.0,
            collision_radius: 2.0,
            cohesion_factor: 0.005,
            separation_factor: 0.05,
            alignment_factor: 0.05,
            max_speed: 1.0,
            territory_center: Vec3::new(0.0, 0.0, 10.0),
            territory_radius: 30.0,
            territory_pull: 0.1,
            altitude_margin: 1.0,
            upward_bias: 0.1,
            seek_probability: 0.05,
            resume_probability: 0.10,
            targets: Vec::new(),
            target_count: 5,
            separation_mode: SeparationMode::Carried,
            tick_duration: 5.0,
            ticks: 120,
            seed: 0,
        }
    }
}

impl FlockParams {
    pub fn validate(&self) -> Result<()> {
        non_negative("visual_range", self.visual_range)?;
        non_negative("collision_radius", self.collision_radius)?;
        non_negative("cohesion_factor", self.cohesion_factor)?;
        non_negative("separation_factor", self.separation_factor)?;
        non_negative("alignment_factor", self.alignment_factor)?;
        non_negative("max_speed", self.max_speed)?;
        sampled_span("max_speed", -self.max_speed, self.max_speed)?;
        finite_vec("territory_center", self.territory_center)?;
        non_negative("territory_radius", self.territory_radius)?;
        let r = self.territory_radius;
        for c in self.territory_center.to_array() {
            sampled_span("territory_radius", c - r, c + r)?;
        }
        non_negative("territory_pull", self.territory_pull)?;
        finite("altitude_margin", self.altitude_margin)?;
        finite("upward_bias", self.upward_bias)?;
        probability("seek_probability", self.seek_probability)?;
        probability("resume_probability", self.resume_probability)?;
        for target in &self.targets {
            finite_vec("targets", *target)?;
        }
        finite("tick_duration", self.tick_duration)?;
        if self.tick_duration <= 0.0 {
            return Err(SimError::invalid(
                "tick_duration",
                format!("{} must be greater than zero", self.tick_duration),
            ));
        }
        Ok(())
    }
}

fn finite(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::invalid(name, format!("{value} is not finite")))
    }
}

fn finite_vec(name: &'static str, value: Vec3) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::invalid(name, format!("{value} is not finite")))
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<()> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(SimError::invalid(name, format!("{value} is negative")));
    }
    Ok(())
}

/// Spawn positions and velocities are drawn from `low..=high`, whose
/// width must stay finite for the sampler.
fn sampled_span(name: &'static str, low: f32, high: f32) -> Result<()> {
    if (high - low).is_finite() {
        Ok(())
    } else {
        Err(SimError::invalid(name, format!("range {low}..={high} is too wide to sample")))
    }
}

fn angle(name: &'static str, value: f32) -> Result<()> {
    finite(name, value)?;
    if !(0.0..=360.0).contains(&value) {
        return Err(SimError::invalid(name, format!("{value} is outside 0..=360 degrees")));
    }
    Ok(())
}

fn probability(name: &'static str, value: f32) -> Result<()> {
    finite(name, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(SimError::invalid(name, format!("{value} is outside 0..=1")));
    }
    Ok(())
}

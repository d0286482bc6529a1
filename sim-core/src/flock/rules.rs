//! Per-tick passes of the flocking simulation.
//!
//! A tick runs, in this order:
//! 1. [`cohesion_pass`]: steer toward the neighbours' mean position.
//! 2. [`separation_pass`]: push away from agents inside the collision
//!    radius.
//! 3. [`alignment_pass`]: steer toward the neighbours' mean velocity.
//! 4. [`speed_limit_pass`]: rescale anything faster than `max_speed`.
//! 5. [`territory_pass`]: pull strays back and keep low flyers up.
//! 6. [`transition_pass`]: advance the behavior automaton.
//! 7. [`integrate_pass`]: move agents and clamp them above ground.
//!
//! Every pass walks the agents in index order and writes velocities in
//! place, so agent `i` already sees what the same pass did to `j < i`.
//! The simulation's output depends on that order.

use super::accumulator::NeighborMean;
use super::agent::{Agent, BehaviorState};
use super::targets::SeekTargets;
use crate::config::{FlockParams, SeparationMode};
use crate::types::AgentId;
use glam::Vec3;
use rand::Rng;

/// Yields every other agent strictly closer than `radius` to agent `i`.
///
/// A plain O(n²) scan; flocks here hold tens of agents.
///
/// ### Parameters
/// - `agents` - Whole population.
/// - `i` - Index of the agent whose neighbourhood is queried.
/// - `radius` - Query radius; compared as `distance² < radius²`.
pub fn neighbors(
    agents: &[Agent],
    i: AgentId,
    radius: f32,
) -> impl Iterator<Item = AgentId> + '_ {
    let r2 = radius * radius;
    let center = agents[i].position;
    agents
        .iter()
        .enumerate()
        .filter(move |(j, other)| *j != i && (other.position - center).length_squared() < r2)
        .map(|(j, _)| j)
}

fn is_flocking(agent: &Agent) -> bool {
    agent.state == BehaviorState::Flocking
}

/// Moves each flocking agent's velocity a fraction toward the mean
/// position of its neighbours within `visual_range`.
///
/// Agents without neighbours are left untouched.
pub fn cohesion_pass(agents: &mut [Agent], params: &FlockParams) {
    let mut acc = NeighborMean::new();
    for i in 0..agents.len() {
        if !is_flocking(&agents[i]) {
            continue;
        }
        acc.clear();
        acc.extend(neighbors(agents, i, params.visual_range).map(|j| agents[j].position));

        if let Some(center) = acc.mean() {
            let agent = &mut agents[i];
            agent.velocity += (center - agent.position) * params.cohesion_factor;
        }
    }
}

/// Pushes flocking agents away from neighbours within `collision_radius`.
///
/// With [`SeparationMode::Carried`] a single displacement accumulator
/// runs through the whole pass and every flocking agent receives its
/// current value, including agents with no close neighbours. With
/// [`SeparationMode::PerAgent`] it restarts at zero for each agent.
pub fn separation_pass(agents: &mut [Agent], params: &FlockParams) {
    let mut close = Vec3::ZERO;
    for i in 0..agents.len() {
        if !is_flocking(&agents[i]) {
            continue;
        }
        if params.separation_mode == SeparationMode::PerAgent {
            close = Vec3::ZERO;
        }
        let position = agents[i].position;
        for j in neighbors(agents, i, params.collision_radius) {
            close += position - agents[j].position;
        }
        agents[i].velocity += close * params.separation_factor;
    }
}

/// Moves each flocking agent's velocity a fraction toward the mean
/// velocity of its neighbours within `visual_range`.
pub fn alignment_pass(agents: &mut [Agent], params: &FlockParams) {
    let mut acc = NeighborMean::new();
    for i in 0..agents.len() {
        if !is_flocking(&agents[i]) {
            continue;
        }
        acc.clear();
        acc.extend(neighbors(agents, i, params.visual_range).map(|j| agents[j].velocity));

        if let Some(mean) = acc.mean() {
            let agent = &mut agents[i];
            agent.velocity += (mean - agent.velocity) * params.alignment_factor;
        }
    }
}

/// Rescales every agent faster than `max_speed` to exactly `max_speed`,
/// keeping its direction.
pub fn speed_limit_pass(agents: &mut [Agent], params: &FlockParams) {
    let max2 = params.max_speed * params.max_speed;
    for agent in agents.iter_mut() {
        if agent.velocity.length_squared() > max2 {
            agent.velocity = agent.velocity.normalize() * params.max_speed;
        }
    }
}

/// Keeps flocking agents inside the territory sphere and off the ground.
///
/// An agent outside the sphere has a vector of length `territory_pull`
/// pointing away from the center subtracted from its velocity. An agent
/// lower than `altitude_margin` gains `upward_bias` of vertical speed.
pub fn territory_pass(agents: &mut [Agent], params: &FlockParams) {
    let r2 = params.territory_radius * params.territory_radius;
    for agent in agents.iter_mut().filter(|a| is_flocking(a)) {
        let offset = agent.position - params.territory_center;
        if offset.length_squared() > r2 {
            agent.velocity -= offset.normalize_or_zero() * params.territory_pull;
        }
        if agent.position.z < params.altitude_margin {
            agent.velocity.z += params.upward_bias;
        }
    }
}

/// Advances each agent's behavior automaton by one tick.
///
/// At most one transition fires per agent, chosen by its current state:
///
/// - `Flocking` → `Seeking` with `seek_probability`: a target is drawn
///   uniformly and the velocity is pointed at it, keeping the speed.
/// - `Waiting` → `Flocking` with `resume_probability`: the target is
///   cleared and the velocity re-drawn in `[-max_speed, max_speed]³`.
/// - `Seeking`: the velocity is re-pointed at the target, keeping the
///   speed. When the target is closer than one step the agent lands on
///   it exactly and starts `Waiting`.
pub fn transition_pass(
    agents: &mut [Agent],
    params: &FlockParams,
    targets: &SeekTargets,
    rng: &mut impl Rng,
) {
    for agent in agents.iter_mut() {
        match agent.state {
            BehaviorState::Flocking => {
                if rng.random_bool(f64::from(params.seek_probability))
                    && let Some(target) = targets.choose(rng)
                {
                    agent.velocity = toward(agent.position, target, agent.speed());
                    agent.seek_target = Some(target);
                    agent.state = BehaviorState::Seeking;
                }
            }
            BehaviorState::Waiting => {
                if rng.random_bool(f64::from(params.resume_probability)) {
                    agent.seek_target = None;
                    agent.velocity = random_velocity(params.max_speed, rng);
                    agent.state = BehaviorState::Flocking;
                }
            }
            BehaviorState::Seeking => {
                let Some(target) = agent.seek_target else {
                    agent.state = BehaviorState::Flocking;
                    continue;
                };
                let speed = agent.speed();
                agent.velocity = toward(agent.position, target, speed);
                if (target - agent.position).length_squared() < speed * speed {
                    agent.position = target;
                    agent.state = BehaviorState::Waiting;
                }
            }
        }
    }
}

/// Moves every non-waiting agent by its velocity, then clamps all agents
/// to `z >= 0`.
pub fn integrate_pass(agents: &mut [Agent]) {
    for agent in agents.iter_mut() {
        if agent.state != BehaviorState::Waiting {
            agent.position += agent.velocity;
        }
        agent.position.z = agent.position.z.max(0.0);
    }
}

pub(crate) fn random_velocity(max_speed: f32, rng: &mut impl Rng) -> Vec3 {
    let x = rng.random_range(-max_speed..=max_speed);
    let y = rng.random_range(-max_speed..=max_speed);
    let z = rng.random_range(-max_speed..=max_speed);
    Vec3::new(x, y, z)
}

fn toward(from: Vec3, to: Vec3, speed: f32) -> Vec3 {
    (to - from).normalize_or_zero() * speed
}

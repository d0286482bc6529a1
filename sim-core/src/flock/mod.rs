//! Seeded flocking simulation with a flock / seek / wait automaton.
//!
//! [`FlockSimulator`] owns the population and the random stream. Each
//! [`FlockSimulator::step`] runs the passes in [`rules`] in their fixed
//! order and appends one [`TrajectoryRecord`] per agent.

mod accumulator;
mod agent;
pub mod rules;
mod targets;

pub use accumulator::NeighborMean;
pub use agent::{Agent, BehaviorState, Keyframe, Trajectory, TrajectoryRecord};
pub use targets::SeekTargets;

use crate::config::FlockParams;
use crate::error::Result;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct FlockSimulator {
    params: FlockParams,
    agents: Vec<Agent>,
    targets: SeekTargets,
    rng: StdRng,
    tick: usize,
}

impl FlockSimulator {
    /// Validates `params`, then resolves targets and spawns the population
    /// from the seeded stream.
    ///
    /// Agents start uniformly inside the territory's bounding cube (never
    /// below ground) with velocities in `[-max_speed, max_speed]³`.
    pub fn new(params: FlockParams) -> Result<Self> {
        params.validate()?;
        let mut rng = StdRng::seed_from_u64(params.seed);
        let targets = resolve_targets(&params, &mut rng);

        let c = params.territory_center;
        let r = params.territory_radius;
        let z_low = (c.z - r).max(0.0);
        let z_high = (c.z + r).max(z_low);
        let agents = (0..params.population)
            .map(|id| {
                let x = rng.random_range(c.x - r..=c.x + r);
                let y = rng.random_range(c.y - r..=c.y + r);
                let z = rng.random_range(z_low..=z_high);
                let velocity = rules::random_velocity(params.max_speed, &mut rng);
                Agent::new(id, Vec3::new(x, y, z), velocity)
            })
            .collect();

        Ok(Self::assemble(params, agents, targets, rng))
    }

    /// Starts from caller-supplied `(position, velocity)` pairs instead of
    /// a random population; `params.population` is ignored.
    pub fn from_agents(params: FlockParams, starts: Vec<(Vec3, Vec3)>) -> Result<Self> {
        params.validate()?;
        let mut rng = StdRng::seed_from_u64(params.seed);
        let targets = resolve_targets(&params, &mut rng);
        let agents = starts
            .into_iter()
            .enumerate()
            .map(|(id, (position, velocity))| Agent::new(id, position, velocity))
            .collect();

        Ok(Self::assemble(params, agents, targets, rng))
    }

    fn assemble(
        params: FlockParams,
        mut agents: Vec<Agent>,
        targets: SeekTargets,
        rng: StdRng,
    ) -> Self {
        for agent in &mut agents {
            agent.record(0);
        }
        tracing::debug!(
            agents = agents.len(),
            targets = targets.len(),
            seed = params.seed,
            "flock initialised"
        );
        Self {
            params,
            agents,
            targets,
            rng,
            tick: 0,
        }
    }

    pub fn params(&self) -> &FlockParams {
        &self.params
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn targets(&self) -> &SeekTargets {
        &self.targets
    }

    /// Number of ticks simulated so far.
    pub fn tick(&self) -> usize {
        self.tick
    }

    /// Advances the simulation by one tick.
    pub fn step(&mut self) {
        self.tick += 1;
        let agents = &mut self.agents;
        let params = &self.params;

        rules::cohesion_pass(agents, params);
        rules::separation_pass(agents, params);
        rules::alignment_pass(agents, params);
        rules::speed_limit_pass(agents, params);
        rules::territory_pass(agents, params);
        rules::transition_pass(agents, params, &self.targets, &mut self.rng);
        rules::integrate_pass(agents);

        for agent in agents.iter_mut() {
            agent.record(self.tick);
        }

        if tracing::enabled!(tracing::Level::TRACE) {
            let count = |s: BehaviorState| agents.iter().filter(|a| a.state == s).count();
            tracing::trace!(
                tick = self.tick,
                flocking = count(BehaviorState::Flocking),
                seeking = count(BehaviorState::Seeking),
                waiting = count(BehaviorState::Waiting),
                "tick complete"
            );
        }
    }

    /// Runs the remaining ticks up to `params.ticks` and returns every
    /// agent's trajectory, `ticks + 1` records each.
    pub fn run(mut self) -> Vec<Trajectory> {
        while self.tick < self.params.ticks {
            self.step();
        }
        tracing::debug!(ticks = self.tick, agents = self.agents.len(), "flock run complete");
        self.into_trajectories()
    }

    pub fn into_trajectories(self) -> Vec<Trajectory> {
        self.agents.into_iter().map(Agent::into_trajectory).collect()
    }
}

fn resolve_targets(params: &FlockParams, rng: &mut StdRng) -> SeekTargets {
    if params.targets.is_empty() {
        SeekTargets::random_on_ground(
            params.target_count,
            params.territory_center,
            params.territory_radius,
            rng,
        )
    } else {
        SeekTargets::from_positions(params.targets.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    const TOL: f32 = 1e-5;

    fn calm() -> FlockParams {
        FlockParams {
            cohesion_factor: 1.0,
            separation_factor: 1.0,
            alignment_factor: 1.0,
            max_speed: 2.0,
            territory_center: Vec3::new(0.0, 0.0, 10.0),
            territory_radius: 100.0,
            altitude_margin: 0.0,
            upward_bias: 0.0,
            seek_probability: 0.0,
            resume_probability: 0.0,
            ticks: 5,
            ..FlockParams::default()
        }
    }

    #[test]
    fn lone_agent_flies_straight() {
        let start = Vec3::new(0.0, 0.0, 10.0);
        let v = Vec3::new(0.5, 0.25, 0.0);
        let sim = FlockSimulator::from_agents(calm(), vec![(start, v)]).unwrap();
        let trajectories = sim.run();

        let records = &trajectories[0].records;
        assert_eq!(records.len(), 6);
        for (tick, r) in records.iter().enumerate() {
            assert_eq!(r.tick, tick);
            assert_eq!(r.state, BehaviorState::Flocking);
            assert_eq!(r.velocity, v);
            assert!((r.position - (start + v * tick as f32)).length() < TOL);
        }
    }

    #[test]
    fn seeking_agent_snaps_to_target_then_waits() {
        let target = Vec3::new(2.5, 0.0, 10.0);
        let params = FlockParams {
            seek_probability: 1.0,
            targets: vec![target],
            ..calm()
        };
        let start = (Vec3::new(0.0, 0.0, 10.0), Vec3::new(1.0, 0.0, 0.0));
        let trajectories = FlockSimulator::from_agents(params, vec![start]).unwrap().run();
        let r = &trajectories[0].records;

        assert_eq!(r[1].state, BehaviorState::Seeking);
        assert_eq!(r[1].position, Vec3::new(1.0, 0.0, 10.0));
        assert_eq!(r[2].state, BehaviorState::Seeking);
        assert_eq!(r[3].position, target);
        assert_eq!(r[3].state, BehaviorState::Waiting);
        assert_eq!(r[4].state, BehaviorState::Waiting);
        assert_eq!(r[4].position, target);
        assert_eq!(r[5].position, target);
    }

    #[test]
    fn population_spawns_inside_territory_above_ground() {
        let params = FlockParams {
            population: 30,
            territory_center: Vec3::new(0.0, 0.0, 2.0),
            territory_radius: 5.0,
            ..FlockParams::default()
        };
        let sim = FlockSimulator::new(params).unwrap();

        assert_eq!(sim.agents().len(), 30);
        assert_eq!(sim.targets().len(), FlockParams::default().target_count);
        for agent in sim.agents() {
            assert!(agent.position.z >= 0.0);
            assert!(agent.position.x.abs() <= 5.0 && agent.position.y.abs() <= 5.0);
            assert!(agent.velocity.abs().max_element() <= 1.0);
            assert_eq!(agent.history().len(), 1);
        }
    }

    #[test]
    fn nobody_ever_goes_below_ground() {
        let params = FlockParams {
            population: 15,
            ticks: 200,
            seed: 11,
            ..FlockParams::default()
        };
        let trajectories = FlockSimulator::new(params).unwrap().run();
        assert!(
            trajectories
                .iter()
                .flat_map(|t| &t.records)
                .all(|r| r.position.z >= 0.0)
        );
    }

    #[test]
    fn same_seed_reproduces_trajectories() {
        let params = FlockParams {
            population: 12,
            ticks: 80,
            seed: 42,
            seek_probability: 0.2,
            resume_probability: 0.3,
            ..FlockParams::default()
        };
        let a = FlockSimulator::new(params.clone()).unwrap().run();
        let b = FlockSimulator::new(params).unwrap().run();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_params_fail_before_spawning() {
        let params = FlockParams {
            resume_probability: -0.1,
            ..FlockParams::default()
        };
        assert!(matches!(
            FlockSimulator::new(params),
            Err(SimError::InvalidParameter {
                name: "resume_probability",
                ..
            })
        ));
    }

    #[test]
    fn huge_speed_is_rejected_instead_of_sampled() {
        let params = FlockParams {
            max_speed: 2.0e38,
            population: 1,
            ..FlockParams::default()
        };
        assert!(matches!(
            FlockSimulator::new(params),
            Err(SimError::InvalidParameter {
                name: "max_speed",
                ..
            })
        ));
    }

    #[test]
    fn step_advances_tick_and_history() {
        let mut sim = FlockSimulator::new(FlockParams {
            population: 3,
            ..FlockParams::default()
        })
        .unwrap();
        sim.step();
        sim.step();

        assert_eq!(sim.tick(), 2);
        assert!(sim.agents().iter().all(|a| a.history().len() == 3));
    }
}

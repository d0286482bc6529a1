use crate::orientation::Orientation;
use crate::types::AgentId;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Discrete behavior of an agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorState {
    /// Subject to the flocking and territory rules.
    #[default]
    Flocking,
    /// Flying straight at `seek_target` at constant speed.
    Seeking,
    /// Parked on its target; velocity is kept but not integrated.
    Waiting,
}

/// One snapshot of an agent, taken once per tick after integration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    pub tick: usize,
    pub state: BehaviorState,
    pub position: Vec3,
    pub velocity: Vec3,
}

#[derive(Clone, Debug)]
pub struct Agent {
    pub id: AgentId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub state: BehaviorState,
    /// Set only while seeking or waiting on a target.
    pub seek_target: Option<Vec3>,
    history: Vec<TrajectoryRecord>,
}

impl Agent {
    pub fn new(id: AgentId, position: Vec3, velocity: Vec3) -> Self {
        Self {
            id,
            position,
            velocity,
            state: BehaviorState::Flocking,
            seek_target: None,
            history: Vec::new(),
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn history(&self) -> &[TrajectoryRecord] {
        &self.history
    }

    pub(crate) fn record(&mut self, tick: usize) {
        self.history.push(TrajectoryRecord {
            tick,
            state: self.state,
            position: self.position,
            velocity: self.velocity,
        });
    }

    pub fn into_trajectory(self) -> Trajectory {
        Trajectory {
            agent: self.id,
            records: self.history,
        }
    }
}

/// Complete recorded motion of one agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub agent: AgentId,
    pub records: Vec<TrajectoryRecord>,
}

/// A pose sampled for the host's animation timeline.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub position: Vec3,
    /// Frame looking along the velocity, `+Z` up.
    pub orientation: Orientation,
}

impl Trajectory {
    /// Converts records to keyframes at `tick * tick_duration`, stopping at
    /// the first record whose time exceeds `until`.
    pub fn keyframes(&self, tick_duration: f32, until: f32) -> Vec<Keyframe> {
        self.records
            .iter()
            .map(|r| Keyframe {
                time: r.tick as f32 * tick_duration,
                position: r.position,
                orientation: Orientation::from_direction(r.velocity),
            })
            .take_while(|k| k.time <= until)
            .collect()
    }

    pub fn last(&self) -> Option<&TrajectoryRecord> {
        self.records.last()
    }
}

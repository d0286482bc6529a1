/// Identifier for an agent in a [`crate::flock::FlockSimulator`].
///
/// This is an index into the simulator's agent list, and is only
/// meaningful within the lifetime of a given simulator instance.
pub type AgentId = usize;

/// Floating tolerance below which a vector is treated as zero.
pub const EPSILON: f32 = 1e-6;

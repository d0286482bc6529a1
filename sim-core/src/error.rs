use thiserror::Error;

/// Failures raised by the grammar, turtle and flock engines.
///
/// Every variant is raised before or instead of a result; none of the
/// engines retries or swallows them internally.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimError {
    /// A parenthesised parameter group is unterminated, empty, or holds a
    /// token that is not a number.
    #[error("malformed parameter list for '{tag}' at position {position}: {reason}")]
    MalformedParameterList {
        tag: char,
        position: usize,
        reason: String,
    },
    /// The turtle met `]` while its frame stack was empty.
    #[error("stack underflow: ']' at symbol {index} has no matching '['")]
    StackUnderflow { index: usize },
    /// A configuration value is outside its documented domain.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

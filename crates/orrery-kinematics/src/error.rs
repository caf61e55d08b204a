//! Kinematics error types.

/// Errors raised by the kinematics engine.
///
/// Invalid input is the only failure mode: the motion model itself is total
/// over its validated domain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KinematicsError {
    /// A value fell outside its declared range or had the wrong type.
    /// The previous value is left untouched.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the rejected parameter.
        name: String,
        /// Human-readable explanation.
        reason: String,
    },
}

impl KinematicsError {
    pub(crate) fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

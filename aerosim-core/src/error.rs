//! Error taxonomy for the energy network and acoustic models.
//!
//! Functions return `anyhow::Result` like the rest of the crate; the root cause of a
//! failure is one of these variants so callers can tell them apart with
//! `err.downcast_ref::<AerosimError>()`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AerosimError {
    /// A tag referenced during traversal has no entry in the conditions being read.
    #[error("tag `{tag}` not found in {location} (segment {segment})")]
    Topology {
        tag: String,
        location: String,
        segment: usize,
    },

    /// Invalid user-supplied configuration (wiring mode, clock string, array shape).
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// NaN reaching a special-function evaluation after designed clamping.
    #[error("numeric domain error in {quantity} at control point {cpt}: {detail}")]
    NumericDomain {
        quantity: String,
        cpt: usize,
        detail: String,
    },

    /// Flight window does not fit inside the allocated exposure grid.
    #[error(
        "flight {flight} spans time steps {start}..{end}, outside exposure grid of {n_steps} steps"
    )]
    WindowBounds {
        flight: usize,
        start: i64,
        end: i64,
        n_steps: usize,
    },

    /// Solver unknown missing from the segment's unknowns.
    #[error("solver unknown `{0}` not found")]
    UnknownNotFound(String),
}

impl AerosimError {
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn topology<T: Into<String>, L: Into<String>>(tag: T, location: L, segment: usize) -> Self {
        Self::Topology {
            tag: tag.into(),
            location: location.into(),
            segment,
        }
    }
}

#![allow(clippy::field_reassign_with_default)]
// TODO: uncomment when docs are somewhat mature to check for missing docs
// #![warn(missing_docs)]

//! Crate containing models for propagating the state of an aircraft energy network
//! across mission segments and for computing rotor harmonic noise and the noise
//! exposure metrics derived from it.
//! # Features:
//! - logging: route debug/warn messages through the `log` facade (default)
//! - bincode: enable binary (de)serialization in [`traits::SerdeAPI`]

#[macro_use]
pub mod macros;

pub mod energy;
pub mod error;
pub mod imports;
pub mod noise;
pub mod params;
pub mod prelude;
pub mod special;
pub mod traits;
pub mod utils;

pub mod proc_macros {
    pub use aerosim_proc_macros::*;
}

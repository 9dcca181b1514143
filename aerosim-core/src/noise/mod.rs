//! Rotor harmonic noise and the exposure metrics built from it.

pub mod axes;
pub mod decibel;
pub mod harmonic;
pub mod metrics;
pub mod third_octave;

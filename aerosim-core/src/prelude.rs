//! Convenience module for exposing commonly used structs and functions
pub use crate::energy::bus::{carry_forward, initialize_conditions, initialize_coolant_line};
pub use crate::energy::conditions::{
    CoolantLineConditions, DistributorConditions, MotorConditions, PropulsorConditions,
    SegmentConditions, ThermalComponentConditions,
};
pub use crate::energy::network::{
    BatteryModule, BatteryThermalGroup, Bus, CoolantGroup, CoolantLine, ElectricConfiguration,
    EnergyDistributor, FuelLine, HeatExchanger, Motor, Network, Propulsor, PropulsorDevice,
    ThermalComponentVisitor, ThermalManagementSystem, Vehicle,
};
pub use crate::energy::propulsor::{
    power_coefficient_unknown, unpack_distributor_unknowns, unpack_propulsor_unknowns,
};
pub use crate::energy::segment::{Segment, SegmentState};
pub use crate::error::AerosimError;
pub use crate::noise::axes::{AcousticAxes, AcousticAxis};
pub use crate::noise::decibel::{
    a_weighting, background_noise, dbsum, pressure_ratio_to_spl, spl_arithmetic,
};
pub use crate::noise::harmonic::{
    harmonic_noise, AeroacousticData, FlightConditions, Freestream, HarmonicNoise,
    ObserverGeometry, Rotor, RotorNoiseBatch, RotorNoiseCase,
};
pub use crate::noise::metrics::{ExposureSettings, NoiseData, NoiseExposure};
pub use crate::noise::third_octave::{convert_to_third_octave_band, AcousticSettings};
pub use crate::traits::{ApproxEq, SerdeAPI};

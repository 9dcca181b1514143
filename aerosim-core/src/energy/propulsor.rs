//! Bridge between the mission solver's unknowns and the per-propulsor conditions.

use crate::energy::network::{EnergyDistributor, Propulsor};
use crate::energy::segment::Segment;
use crate::imports::*;

/// Name of the power-coefficient unknown the solver assigns to `reference`, e.g.
/// `"rotor_1_ducted_fan_cp"`
pub fn power_coefficient_unknown(reference: &Propulsor) -> String {
    format!("{}_{}_cp", reference.tag, reference.device.as_str())
}

/// Copies the power-coefficient unknown of `reference` into the motor record of
/// `propulsor` under `distributor`'s conditions entry.
pub fn unpack_propulsor_unknowns<T: EnergyDistributor + ?Sized>(
    propulsor: &Propulsor,
    reference: &Propulsor,
    segment: &mut Segment,
    distributor: &T,
) -> anyhow::Result<()> {
    let key = power_coefficient_unknown(reference);
    let n_cpt = segment.state.n_cpt();
    let index = segment.index;
    let values = segment
        .state
        .unknowns
        .get(&key)
        .cloned()
        .ok_or_else(|| AerosimError::UnknownNotFound(key.clone()))?;
    ensure!(
        values.len() == n_cpt,
        AerosimError::configuration(format!(
            "unknown `{key}` has {} values but the segment has {n_cpt} control points",
            values.len()
        ))
    );

    let entry = segment
        .state
        .conditions
        .distributors
        .get_mut(distributor.tag())
        .ok_or_else(|| AerosimError::topology(distributor.tag(), "segment conditions", index))?;
    let motor = entry
        .propulsors
        .get_mut(&propulsor.tag)
        .and_then(|p| p.motors.get_mut(&propulsor.motor.tag))
        .ok_or_else(|| {
            AerosimError::topology(
                format!("{}/{}", propulsor.tag, propulsor.motor.tag),
                format!("conditions of `{}`", distributor.tag()),
                index,
            )
        })?;
    motor.rotor_power_coefficient = values;
    Ok(())
}

/// Unpacks the power-coefficient unknowns of every propulsor on `distributor`.  With
/// `identical_propulsors` set, all of them take the first propulsor's unknown.  Every
/// unknown of the segment must hold one value per control point.
pub fn unpack_distributor_unknowns<T: EnergyDistributor + ?Sized>(
    distributor: &T,
    segment: &mut Segment,
) -> anyhow::Result<()> {
    segment
        .state
        .check_unknowns()
        .with_context(|| format!("segment {} (`{}`)", segment.index, segment.tag))?;
    for propulsor in distributor.propulsors() {
        let reference = distributor.reference_propulsor(propulsor);
        unpack_propulsor_unknowns(propulsor, reference, segment, distributor)
            .with_context(|| format!("propulsor `{}`", propulsor.tag))?;
    }
    Ok(())
}

//! Bus voltage aggregation and segment-to-segment propagation of distributor
//! conditions.

use crate::energy::conditions::{
    CoolantLineConditions, DistributorConditions, MotorConditions, PropulsorConditions,
    SegmentConditions, ThermalComponentConditions,
};
use crate::energy::network::*;
use crate::energy::segment::Segment;
use crate::imports::*;

impl Bus {
    /// Derives the bus voltage from its battery modules.  Series wiring adds every module
    /// voltage to the current bus voltage; parallel wiring takes the highest module
    /// voltage.
    pub fn aggregate_voltage(&mut self) {
        match self.battery_module_electric_configuration {
            ElectricConfiguration::Series => {
                self.voltage += self.battery_modules.iter().map(|m| m.voltage).sum::<f64>();
            }
            ElectricConfiguration::Parallel => {
                self.voltage = self
                    .battery_modules
                    .iter()
                    .map(|m| m.voltage)
                    .fold(0.0, f64::max);
            }
        }
    }
}

/// Allocates a zeroed conditions entry for `distributor` in `segment`, with one
/// propulsor/motor record per propulsor.  Replaces any existing entry.
pub fn initialize_conditions<T: EnergyDistributor + ?Sized>(
    distributor: &T,
    segment: &mut Segment,
) {
    let n_cpt = segment.state.n_cpt();
    let mut entry = DistributorConditions::zeros(n_cpt);
    for propulsor in distributor.propulsors() {
        let mut motors = BTreeMap::new();
        motors.insert(
            propulsor.motor.tag.clone(),
            MotorConditions {
                rotor_power_coefficient: segment.state.zeros(),
            },
        );
        entry
            .propulsors
            .insert(propulsor.tag.clone(), PropulsorConditions { motors });
    }
    segment
        .state
        .conditions
        .distributors
        .insert(distributor.tag().to_string(), entry);
}

/// Allocates zeroed series for every thermal component on `coolant_line`
pub fn initialize_coolant_line(
    coolant_line: &CoolantLine,
    segment: &mut Segment,
) -> anyhow::Result<()> {
    let n_cpt = segment.state.n_cpt();
    let components = coolant_line
        .thermal_component_tags()?
        .into_iter()
        .map(|tag| (tag, ThermalComponentConditions::zeros(n_cpt)))
        .collect();
    segment
        .state
        .conditions
        .coolant_lines
        .insert(coolant_line.tag.clone(), CoolantLineConditions { components });
    Ok(())
}

/// Sums the final power of every thermal component in the previous segment
struct CarriedThermalPower<'a> {
    previous: &'a SegmentConditions,
    segment: usize,
    total: f64,
}

impl ThermalComponentVisitor for CarriedThermalPower<'_> {
    fn visit_btms(
        &mut self,
        coolant_line: &CoolantLine,
        _battery: &BatteryThermalGroup,
        btms: &ThermalManagementSystem,
    ) -> anyhow::Result<()> {
        self.total +=
            self.previous
                .final_thermal_power(&coolant_line.tag, &btms.tag, self.segment)?;
        Ok(())
    }

    fn visit_heat_exchanger(
        &mut self,
        coolant_line: &CoolantLine,
        heat_exchanger: &HeatExchanger,
    ) -> anyhow::Result<()> {
        self.total += self.previous.final_thermal_power(
            &coolant_line.tag,
            &heat_exchanger.tag,
            self.segment,
        )?;
        Ok(())
    }
}

/// Resets the distributor's `power_draw` in `segment`, then, when `previous` holds the
/// preceding segment's final conditions, seeds `power_draw[0]` with the final power of
/// every thermal component on every coolant line of `vehicle`.  The other ten series
/// are left as allocated.
///
/// # Arguments
/// - `distributor`: bus or fuel line whose entry is updated
/// - `segment`: segment being initialized; its entry for `distributor` must exist
/// - `vehicle`: vehicle whose coolant lines are traversed
/// - `previous`: final conditions of the preceding segment, `None` for the first
pub fn carry_forward<T: EnergyDistributor + ?Sized>(
    distributor: &T,
    segment: &mut Segment,
    vehicle: &Vehicle,
    previous: Option<&SegmentConditions>,
) -> anyhow::Result<()> {
    let carried = match previous {
        Some(previous) => {
            let mut visitor = CarriedThermalPower {
                previous,
                segment: segment.index,
                total: 0.0,
            };
            for network in &vehicle.networks {
                for coolant_line in &network.coolant_lines {
                    coolant_line.accept(&mut visitor).with_context(|| {
                        format!(
                            "carrying thermal power into `{}` (segment {})",
                            distributor.tag(),
                            segment.index
                        )
                    })?;
                }
            }
            Some(visitor.total)
        }
        None => None,
    };

    let zeros = segment.state.zeros();
    let entry = segment
        .state
        .conditions
        .distributors
        .get_mut(distributor.tag())
        .ok_or_else(|| {
            AerosimError::topology(distributor.tag(), "segment conditions", segment.index)
        })?;
    entry.power_draw = zeros;
    if let Some(carried) = carried {
        let first = entry.power_draw.first_mut().ok_or_else(|| {
            AerosimError::configuration(format!(
                "segment {} has no control point to carry thermal power into",
                segment.index
            ))
        })?;
        *first += carried;
        #[cfg(feature = "logging")]
        log::debug!(
            "{}",
            format_dbg!((distributor.tag(), segment.index, carried))
        );
    }
    Ok(())
}

impl Network {
    /// Allocates and carries forward the conditions of every distributor and coolant
    /// line of this network for `segment`.
    pub fn initialize_segment(
        &self,
        vehicle: &Vehicle,
        segment: &mut Segment,
        previous: Option<&SegmentConditions>,
    ) -> anyhow::Result<()> {
        for coolant_line in &self.coolant_lines {
            initialize_coolant_line(coolant_line, segment)?;
        }
        for distributor in self.distributors() {
            initialize_conditions(distributor, segment);
            carry_forward(distributor, segment, vehicle, previous)?;
        }
        Ok(())
    }
}

impl Vehicle {
    /// Initializes every network's conditions for `segment`
    pub fn initialize_segment(
        &self,
        segment: &mut Segment,
        previous: Option<&SegmentConditions>,
    ) -> anyhow::Result<()> {
        ensure!(
            segment.state.n_cpt() > 0,
            AerosimError::configuration(format!(
                "segment {} (`{}`) has no control points",
                segment.index, segment.tag
            ))
        );
        ensure!(
            previous.is_some() || segment.is_first(),
            AerosimError::configuration(format!(
                "segment {} (`{}`) needs the previous segment's conditions",
                segment.index, segment.tag
            ))
        );
        for network in &self.networks {
            network
                .initialize_segment(self, segment, previous)
                .with_context(|| format!("network `{}`", network.tag))?;
        }
        Ok(())
    }
}

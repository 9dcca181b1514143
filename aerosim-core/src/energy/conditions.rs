//! Per-segment time series written by the energy network: one entry per
//! distributor (bus or fuel line) and one per coolant line, keyed by tag.

use crate::imports::*;

/// Number of time-series fields every distributor entry carries
pub const N_DISTRIBUTOR_FIELDS: usize = 11;

/// Power coefficient and other per-device quantities for one motor
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ApproxEq)]
pub struct MotorConditions {
    pub rotor_power_coefficient: Array1<f64>,
}

/// Conditions for one propulsor, keyed by motor tag
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ApproxEq)]
pub struct PropulsorConditions {
    pub motors: BTreeMap<String, MotorConditions>,
}

/// Time series for a bus or fuel line.  Every field has one value per control point.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ApproxEq)]
pub struct DistributorConditions {
    /// power drawn from the distributor [W]
    pub power_draw: Array1<f64>,
    /// state of charge [-]
    #[serde(rename = "SOC")]
    pub soc: Array1<f64>,
    /// [A]
    pub current_draw: Array1<f64>,
    /// [A]
    pub charging_current: Array1<f64>,
    /// [V]
    pub voltage_open_circuit: Array1<f64>,
    /// [V]
    pub voltage_under_load: Array1<f64>,
    /// [J]
    pub heat_energy_generated: Array1<f64>,
    /// [-]
    pub efficiency: Array1<f64>,
    /// [K]
    pub temperature: Array1<f64>,
    /// [J]
    pub energy: Array1<f64>,
    /// [W]
    pub regenerative_power: Array1<f64>,
    #[serde(default)]
    pub propulsors: BTreeMap<String, PropulsorConditions>,
}

impl DistributorConditions {
    /// All eleven series zero-filled with `n_cpt` control points, no propulsors
    pub fn zeros(n_cpt: usize) -> Self {
        let zeros = Array1::<f64>::zeros(n_cpt);
        Self {
            power_draw: zeros.clone(),
            soc: zeros.clone(),
            current_draw: zeros.clone(),
            charging_current: zeros.clone(),
            voltage_open_circuit: zeros.clone(),
            voltage_under_load: zeros.clone(),
            heat_energy_generated: zeros.clone(),
            efficiency: zeros.clone(),
            temperature: zeros.clone(),
            energy: zeros.clone(),
            regenerative_power: zeros,
            propulsors: BTreeMap::new(),
        }
    }

    /// the eleven series in declaration order, paired with their serialized names
    pub fn series(&self) -> [(&'static str, &Array1<f64>); N_DISTRIBUTOR_FIELDS] {
        [
            ("power_draw", &self.power_draw),
            ("SOC", &self.soc),
            ("current_draw", &self.current_draw),
            ("charging_current", &self.charging_current),
            ("voltage_open_circuit", &self.voltage_open_circuit),
            ("voltage_under_load", &self.voltage_under_load),
            ("heat_energy_generated", &self.heat_energy_generated),
            ("efficiency", &self.efficiency),
            ("temperature", &self.temperature),
            ("energy", &self.energy),
            ("regenerative_power", &self.regenerative_power),
        ]
    }
}

/// Time series for one thermal component on a coolant line
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ApproxEq)]
pub struct ThermalComponentConditions {
    /// heat removed by the component [W]
    pub power: Array1<f64>,
    /// coolant temperature leaving the component [K]
    pub outlet_temperature: Array1<f64>,
}

impl ThermalComponentConditions {
    pub fn zeros(n_cpt: usize) -> Self {
        Self {
            power: Array1::zeros(n_cpt),
            outlet_temperature: Array1::zeros(n_cpt),
        }
    }
}

/// Thermal components on one coolant line, keyed by component tag
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ApproxEq)]
pub struct CoolantLineConditions {
    pub components: BTreeMap<String, ThermalComponentConditions>,
}

/// Energy conditions of one mission segment
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ApproxEq, SerdeAPI)]
pub struct SegmentConditions {
    #[serde(default)]
    pub distributors: BTreeMap<String, DistributorConditions>,
    #[serde(default)]
    pub coolant_lines: BTreeMap<String, CoolantLineConditions>,
}

impl SegmentConditions {
    /// Final value of a thermal component's power series.
    ///
    /// # Arguments
    /// - `coolant_line`: coolant line tag
    /// - `component`: thermal component tag
    /// - `segment`: index of the segment these conditions belong to, for error reporting
    pub fn final_thermal_power(
        &self,
        coolant_line: &str,
        component: &str,
        segment: usize,
    ) -> anyhow::Result<f64> {
        let line = self.coolant_lines.get(coolant_line).ok_or_else(|| {
            AerosimError::topology(coolant_line, "previous segment coolant lines", segment)
        })?;
        let comp = line.components.get(component).ok_or_else(|| {
            AerosimError::topology(
                component,
                format!("previous segment coolant line `{coolant_line}`"),
                segment,
            )
        })?;
        comp.power.last().copied().ok_or_else(|| {
            AerosimError::topology(
                component,
                format!("previous segment coolant line `{coolant_line}` (empty power series)"),
                segment,
            )
            .into()
        })
    }
}

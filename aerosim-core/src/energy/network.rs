//! Static description of a vehicle's energy network: buses and fuel lines feeding
//! propulsors, and coolant lines grouping the thermal-management components.
//!
//! The topology is built once per vehicle and is read-only for the rest of the
//! mission; only [`Bus::aggregate_voltage`] mutates it, once, during
//! [`Vehicle::initialize_networks`].

use crate::imports::*;
use itertools::Itertools;
use std::fmt;
use std::str::FromStr;

/// How the battery modules on a bus are wired together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ElectricConfiguration {
    /// module voltages add
    Series,
    /// bus voltage is that of the highest-voltage module
    Parallel,
}

impl FromStr for ElectricConfiguration {
    type Err = AerosimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "series" => Ok(Self::Series),
            "parallel" => Ok(Self::Parallel),
            _ => Err(AerosimError::configuration(format!(
                "battery module electric configuration `{s}` must be `series` or `parallel`"
            ))),
        }
    }
}

impl TryFrom<String> for ElectricConfiguration {
    type Error = AerosimError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ElectricConfiguration> for String {
    fn from(value: ElectricConfiguration) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ElectricConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Series => write!(f, "series"),
            Self::Parallel => write!(f, "parallel"),
        }
    }
}

/// Kind of thrust-producing device driven by a propulsor's motor.  Determines the
/// name of the power-coefficient unknown the solver assigns to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PropulsorDevice {
    #[default]
    Rotor,
    Propeller,
    DuctedFan,
}

impl PropulsorDevice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rotor => "rotor",
            Self::Propeller => "propeller",
            Self::DuctedFan => "ducted_fan",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Motor {
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Propulsor {
    pub tag: String,
    pub motor: Motor,
    #[serde(default)]
    pub device: PropulsorDevice,
}

impl Propulsor {
    pub fn new<S: Into<String>>(tag: S, motor_tag: S, device: PropulsorDevice) -> Self {
        Self {
            tag: tag.into(),
            motor: Motor {
                tag: motor_tag.into(),
            },
            device,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BatteryModule {
    pub tag: String,
    /// nominal module voltage [V]
    pub voltage: f64,
}

/// Anything that distributes energy to propulsors and owns a conditions entry keyed
/// by its tag: buses and fuel lines.
pub trait EnergyDistributor {
    fn tag(&self) -> &str;

    fn propulsors(&self) -> &[Propulsor];

    fn identical_propulsors(&self) -> bool;

    /// Propulsor whose solver unknowns drive `propulsor`: the first one on the
    /// distributor when all propulsors are identical, otherwise `propulsor` itself.
    fn reference_propulsor<'a>(&'a self, propulsor: &'a Propulsor) -> &'a Propulsor {
        if self.identical_propulsors() {
            self.propulsors().first().unwrap_or(propulsor)
        } else {
            propulsor
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    pub tag: String,
    #[serde(default)]
    pub propulsors: Vec<Propulsor>,
    #[serde(default)]
    pub battery_modules: Vec<BatteryModule>,
    pub battery_module_electric_configuration: ElectricConfiguration,
    #[serde(default)]
    pub identical_propulsors: bool,
    /// derived by [`Bus::aggregate_voltage`]; the serialized value is the starting point
    #[serde(default)]
    pub(crate) voltage: f64,
}

impl Bus {
    pub fn new<S: Into<String>>(tag: S, configuration: ElectricConfiguration) -> Self {
        Self {
            tag: tag.into(),
            propulsors: Vec::new(),
            battery_modules: Vec::new(),
            battery_module_electric_configuration: configuration,
            identical_propulsors: false,
            voltage: 0.0,
        }
    }

    /// Sets the voltage that series aggregation starts from
    pub fn with_initial_voltage(mut self, voltage: f64) -> Self {
        self.voltage = voltage;
        self
    }

    pub fn with_battery_module<S: Into<String>>(mut self, tag: S, voltage: f64) -> Self {
        self.battery_modules.push(BatteryModule {
            tag: tag.into(),
            voltage,
        });
        self
    }

    pub fn with_propulsor(mut self, propulsor: Propulsor) -> Self {
        self.propulsors.push(propulsor);
        self
    }

    /// bus voltage [V]
    pub fn voltage(&self) -> f64 {
        self.voltage
    }
}

impl EnergyDistributor for Bus {
    fn tag(&self) -> &str {
        &self.tag
    }
    fn propulsors(&self) -> &[Propulsor] {
        &self.propulsors
    }
    fn identical_propulsors(&self) -> bool {
        self.identical_propulsors
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FuelLine {
    pub tag: String,
    #[serde(default)]
    pub propulsors: Vec<Propulsor>,
    #[serde(default)]
    pub identical_propulsors: bool,
}

impl EnergyDistributor for FuelLine {
    fn tag(&self) -> &str {
        &self.tag
    }
    fn propulsors(&self) -> &[Propulsor] {
        &self.propulsors
    }
    fn identical_propulsors(&self) -> bool {
        self.identical_propulsors
    }
}

/// Battery thermal management system attached to one battery on a coolant line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ThermalManagementSystem {
    pub tag: String,
}

/// One battery on a coolant line together with its thermal management systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BatteryThermalGroup {
    /// tag of the battery module being cooled
    pub tag: String,
    #[serde(default)]
    pub btms: Vec<ThermalManagementSystem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HeatExchanger {
    pub tag: String,
}

/// Components on a coolant line, grouped by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoolantGroup {
    BatteryModules(Vec<BatteryThermalGroup>),
    HeatExchangers(Vec<HeatExchanger>),
}

/// Visits every thermal component on a coolant line.  Battery thermal management
/// systems sit one level deeper (under their battery) than heat exchangers.
pub trait ThermalComponentVisitor {
    fn visit_btms(
        &mut self,
        coolant_line: &CoolantLine,
        battery: &BatteryThermalGroup,
        btms: &ThermalManagementSystem,
    ) -> anyhow::Result<()>;

    fn visit_heat_exchanger(
        &mut self,
        coolant_line: &CoolantLine,
        heat_exchanger: &HeatExchanger,
    ) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CoolantLine {
    pub tag: String,
    #[serde(default)]
    pub groups: Vec<CoolantGroup>,
}

impl CoolantLine {
    pub fn accept<V: ThermalComponentVisitor>(&self, visitor: &mut V) -> anyhow::Result<()> {
        for group in &self.groups {
            match group {
                CoolantGroup::BatteryModules(batteries) => {
                    for battery in batteries {
                        for btms in &battery.btms {
                            visitor.visit_btms(self, battery, btms)?;
                        }
                    }
                }
                CoolantGroup::HeatExchangers(heat_exchangers) => {
                    for heat_exchanger in heat_exchangers {
                        visitor.visit_heat_exchanger(self, heat_exchanger)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Tags of every thermal component on the line, in traversal order
    pub fn thermal_component_tags(&self) -> anyhow::Result<Vec<String>> {
        struct TagCollector(Vec<String>);
        impl ThermalComponentVisitor for TagCollector {
            fn visit_btms(
                &mut self,
                _: &CoolantLine,
                _: &BatteryThermalGroup,
                btms: &ThermalManagementSystem,
            ) -> anyhow::Result<()> {
                self.0.push(btms.tag.clone());
                Ok(())
            }
            fn visit_heat_exchanger(
                &mut self,
                _: &CoolantLine,
                heat_exchanger: &HeatExchanger,
            ) -> anyhow::Result<()> {
                self.0.push(heat_exchanger.tag.clone());
                Ok(())
            }
        }
        let mut collector = TagCollector(Vec::new());
        self.accept(&mut collector)?;
        Ok(collector.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Network {
    pub tag: String,
    #[serde(default)]
    pub busses: Vec<Bus>,
    #[serde(default)]
    pub fuel_lines: Vec<FuelLine>,
    #[serde(default)]
    pub coolant_lines: Vec<CoolantLine>,
}

impl Network {
    /// every bus and fuel line, buses first
    pub fn distributors(&self) -> impl Iterator<Item = &dyn EnergyDistributor> {
        self.busses
            .iter()
            .map(|b| b as &dyn EnergyDistributor)
            .chain(self.fuel_lines.iter().map(|f| f as &dyn EnergyDistributor))
    }
}

/// The part of a vehicle this crate cares about: its energy networks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Vehicle {
    pub tag: String,
    #[serde(default)]
    pub networks: Vec<Network>,
}

impl SerdeAPI for Vehicle {
    fn init(&mut self) -> anyhow::Result<()> {
        self.validate()
    }
}

impl Vehicle {
    /// Aggregates every bus voltage from its battery modules.  Call once after the
    /// topology is assembled; series aggregation is additive.
    pub fn initialize_networks(&mut self) -> anyhow::Result<()> {
        self.validate()?;
        for network in self.networks.iter_mut() {
            for bus in network.busses.iter_mut() {
                bus.aggregate_voltage();
                #[cfg(feature = "logging")]
                log::debug!("bus `{}` voltage: {:.3} V", bus.tag, bus.voltage());
            }
        }
        Ok(())
    }

    /// Checks that conditions-tree keys will be unambiguous: distributor and coolant
    /// line tags are unique across the vehicle, and thermal component tags are unique
    /// within their coolant line.
    pub fn validate(&self) -> anyhow::Result<()> {
        let top_level = self
            .networks
            .iter()
            .flat_map(|network| {
                network
                    .distributors()
                    .map(|d| d.tag())
                    .chain(network.coolant_lines.iter().map(|c| c.tag.as_str()))
            })
            .duplicates()
            .next();
        if let Some(tag) = top_level {
            bail!(AerosimError::configuration(format!(
                "duplicate distributor/coolant line tag `{tag}` in vehicle `{}`",
                self.tag
            )));
        }
        for coolant_line in self.networks.iter().flat_map(|n| n.coolant_lines.iter()) {
            if let Some(tag) = coolant_line
                .thermal_component_tags()?
                .into_iter()
                .duplicates()
                .next()
            {
                bail!(AerosimError::configuration(format!(
                    "duplicate thermal component tag `{tag}` on coolant line `{}`",
                    coolant_line.tag
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// one bus with two battery modules, one fuel line feeding a ducted fan, one
    /// coolant line cooling the first battery and carrying one heat exchanger
    pub(crate) fn mock_vehicle() -> Vehicle {
        let bus = Bus::new("bus", ElectricConfiguration::Series)
            .with_battery_module("battery_1", 400.0)
            .with_battery_module("battery_2", 400.0)
            .with_propulsor(Propulsor::new("rotor_1", "motor_1", PropulsorDevice::Rotor))
            .with_propulsor(Propulsor::new("rotor_2", "motor_2", PropulsorDevice::Rotor));
        let coolant_line = CoolantLine {
            tag: "coolant_line".into(),
            groups: vec![
                CoolantGroup::BatteryModules(vec![BatteryThermalGroup {
                    tag: "battery_1".into(),
                    btms: vec![ThermalManagementSystem {
                        tag: "wavy_channel".into(),
                    }],
                }]),
                CoolantGroup::HeatExchangers(vec![HeatExchanger {
                    tag: "cross_flow_hex".into(),
                }]),
            ],
        };
        Vehicle {
            tag: "evtol".into(),
            networks: vec![Network {
                tag: "electric".into(),
                busses: vec![bus],
                fuel_lines: vec![FuelLine {
                    tag: "fuel_line".into(),
                    propulsors: vec![Propulsor::new(
                        "turbofan",
                        "turbofan_engine",
                        PropulsorDevice::DuctedFan,
                    )],
                    identical_propulsors: false,
                }],
                coolant_lines: vec![coolant_line],
            }],
        }
    }

    #[test]
    fn test_electric_configuration_parsing() {
        assert_eq!(
            "Series".parse::<ElectricConfiguration>().unwrap(),
            ElectricConfiguration::Series
        );
        assert_eq!(
            " parallel ".parse::<ElectricConfiguration>().unwrap(),
            ElectricConfiguration::Parallel
        );
        assert!(matches!(
            "hybrid".parse::<ElectricConfiguration>(),
            Err(AerosimError::Configuration(_))
        ));
    }

    #[test]
    fn test_unknown_configuration_rejected_on_load() {
        let yaml = "tag: bus\nbattery_module_electric_configuration: delta\n";
        let res: Result<Bus, _> = serde_yaml::from_str(yaml);
        let err = res.unwrap_err().to_string();
        assert!(err.contains("series"), "{err}");
    }

    #[test]
    fn test_thermal_component_tags_in_traversal_order() {
        let veh = mock_vehicle();
        assert_eq!(
            veh.networks[0].coolant_lines[0]
                .thermal_component_tags()
                .unwrap(),
            vec!["wavy_channel".to_string(), "cross_flow_hex".to_string()]
        );
    }

    #[test]
    fn test_reference_propulsor() {
        let mut veh = mock_vehicle();
        let bus = &veh.networks[0].busses[0];
        assert_eq!(bus.reference_propulsor(&bus.propulsors[1]).tag, "rotor_2");
        veh.networks[0].busses[0].identical_propulsors = true;
        let bus = &veh.networks[0].busses[0];
        assert_eq!(bus.reference_propulsor(&bus.propulsors[1]).tag, "rotor_1");
    }

    #[test]
    fn test_validate_rejects_duplicate_tags() {
        let mut veh = mock_vehicle();
        assert!(veh.validate().is_ok());
        veh.networks[0].coolant_lines[0].tag = "bus".into();
        assert!(veh.validate().is_err());
        veh.networks[0].coolant_lines[0].tag = "coolant_line".into();
        veh.networks[0].fuel_lines[0].tag = "bus".into();
        assert!(veh.validate().is_err());
    }

    #[test]
    fn test_vehicle_yaml_round_trip() {
        let veh = mock_vehicle();
        let yaml = veh.to_yaml().unwrap();
        assert!(yaml.contains("battery_modules"));
        let veh_de = Vehicle::from_yaml(&yaml).unwrap();
        assert_eq!(veh, veh_de);
    }
}

use aerosim_core::prelude::*;
use ndarray::{array, Array3};

const REFERENCE_VEHICLE: &str = include_str!("assets/evtol_network.yaml");

fn reference_vehicle() -> Vehicle {
    let mut vehicle = Vehicle::from_yaml(REFERENCE_VEHICLE).unwrap();
    vehicle.initialize_networks().unwrap();
    vehicle
}

#[test]
fn test_bus_voltage_from_file() {
    let vehicle = reference_vehicle();
    assert_eq!(vehicle.networks[0].busses[0].voltage(), 800.0);
}

#[test]
fn test_vehicle_file_round_trip() {
    let vehicle = reference_vehicle();
    let dir = tempfile::tempdir().unwrap();
    for ext in ["yaml", "json"] {
        let path = dir.path().join(format!("evtol.{ext}"));
        vehicle.to_file(&path).unwrap();
        let vehicle_de = Vehicle::from_file(&path).unwrap();
        assert_eq!(vehicle, vehicle_de);
    }
}

#[test]
fn test_mission_propagates_thermal_power() {
    let vehicle = reference_vehicle();

    let mut climb = Segment::new("climb", 0, 4);
    vehicle.initialize_segment(&mut climb, None).unwrap();
    assert!(climb.state.conditions.distributors["bus"]
        .power_draw
        .iter()
        .all(|&p| p == 0.0));

    // stand-in for the climb solve
    let line = climb
        .state
        .conditions
        .coolant_lines
        .get_mut("coolant_line")
        .unwrap();
    line.components.get_mut("wavy_channel").unwrap().power = array![0.0, 100.0, 300.0, 500.0];
    line.components.get_mut("wavy_channel_2").unwrap().power = array![0.0, 50.0, 75.0, 125.0];

    let mut cruise = Segment::new("cruise", 1, 6);
    vehicle
        .initialize_segment(&mut cruise, Some(&climb.state.conditions))
        .unwrap();
    for distributor in ["bus", "fuel_line"] {
        let power_draw = &cruise.state.conditions.distributors[distributor].power_draw;
        assert_eq!(power_draw.len(), 6);
        assert_eq!(power_draw[0], 625.0);
        assert!(power_draw.iter().skip(1).all(|&p| p == 0.0));
    }

    cruise
        .state
        .unknowns
        .insert("lift_rotor_1_rotor_cp".into(), ndarray::Array1::from_elem(6, 0.05));
    unpack_distributor_unknowns(&vehicle.networks[0].busses[0], &mut cruise).unwrap();
    let entry = &cruise.state.conditions.distributors["bus"];
    assert_eq!(
        entry.propulsors["lift_rotor_2"].motors["lift_motor_2"].rotor_power_coefficient[5],
        0.05
    );

    cruise
        .state
        .unknowns
        .insert("cruise_fan_ducted_fan_cp".into(), ndarray::Array1::from_elem(6, 0.02));
    unpack_distributor_unknowns(&vehicle.networks[0].fuel_lines[0], &mut cruise).unwrap();
    let entry = &cruise.state.conditions.distributors["fuel_line"];
    assert_eq!(
        entry.propulsors["cruise_fan"].motors["turboshaft"].rotor_power_coefficient,
        ndarray::Array1::from_elem(6, 0.02)
    );
}

#[test]
fn test_segment_conditions_round_trip() {
    let vehicle = reference_vehicle();
    let mut hover = Segment::new("hover", 0, 3);
    vehicle.initialize_segment(&mut hover, None).unwrap();
    let json = hover.to_json().unwrap();
    let hover_de = Segment::from_json(json).unwrap();
    assert!(hover.approx_eq(&hover_de, 1e-12));
}

#[test]
fn test_senel_ignores_samples_15_db_below_max() {
    let build = |extra: Option<f64>| {
        let mut spl = Array3::from_elem((4, 1, 1), background_noise());
        spl[[0, 0, 0]] = 72.0;
        spl[[1, 0, 0]] = 78.0;
        if let Some(level) = extra {
            spl[[2, 0, 0]] = level;
        }
        NoiseData {
            spl_dba: spl,
            time: array![0.0, 30.0, 60.0, 90.0],
            microphone_x_resolution: 1,
            microphone_y_resolution: 1,
            ..Default::default()
        }
    };
    let settings = ExposureSettings::default();

    let mut base = build(None);
    base.senel_noise_metric(&settings).unwrap();
    let mut with_quiet_sample = build(Some(78.0 - 15.0));
    with_quiet_sample.senel_noise_metric(&settings).unwrap();

    let senel = base.senel.unwrap()[[0, 0]];
    assert!((senel - dbsum(72.0, 78.0)).abs() < 1e-9);
    assert!((with_quiet_sample.senel.unwrap()[[0, 0]] - senel).abs() < 1e-9);
}

#[test]
fn test_dbsum_associative() {
    let levels = [45.0, 61.5, 58.25, 70.0];
    let left = levels.iter().fold(f64::NAN, |acc, &l| dbsum(acc, l));
    let right = levels.iter().rev().fold(f64::NAN, |acc, &l| dbsum(l, acc));
    assert!((left - right).abs() < 1e-9);
    let total = spl_arithmetic(ndarray::aview1(&levels), ndarray::Axis(0));
    assert!((total[()] - left).abs() < 1e-9);
}

#[test]
fn test_acoustic_settings_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.yaml");
    let mut settings = AcousticSettings::default();
    settings.harmonics = array![1.0, 2.0, 3.0];
    settings.to_file(&path).unwrap();
    assert_eq!(AcousticSettings::from_file(&path).unwrap(), settings);

    // inverted band limits are rejected on load
    settings.upper_frequencies[0] = 10.0;
    settings.to_file(&path).unwrap();
    assert!(AcousticSettings::from_file(&path).is_err());
}

//! Frequency-domain harmonic (thickness and loading) noise of a rotor, after
//! Hanson's helicoidal surface theory with compact radial loading.

use crate::imports::*;
use crate::noise::axes::{AcousticAxes, AcousticAxis};
use crate::noise::decibel::{a_weighted, spl_to_pressure_ratio};
use crate::noise::third_octave::{convert_to_third_octave_band, AcousticSettings};
use crate::params::P_REF;
use crate::special::bessel_jn;
use rayon::prelude::*;
use std::f64::consts::{FRAC_PI_2, PI, SQRT_2};

/// Freestream state per control point
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ApproxEq)]
pub struct Freestream {
    /// [m/s]
    pub speed_of_sound: Array1<f64>,
    /// [kg/m^3]
    pub density: Array1<f64>,
}

/// Aircraft flight state per control point
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ApproxEq, SerdeAPI)]
pub struct FlightConditions {
    pub freestream: Freestream,
    /// [rad]
    pub angle_of_attack: Array1<f64>,
    /// `[control point, xyz]` [m/s]
    pub velocity_vector: Array2<f64>,
}

impl FlightConditions {
    pub fn n_cpt(&self) -> usize {
        self.angle_of_attack.len()
    }
}

/// Observer positions relative to each rotor hub, indexed
/// `[control point, microphone, rotor, section(, xyz)]`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ApproxEq, SerdeAPI)]
pub struct ObserverGeometry {
    /// observer position in the hub frame [m]
    pub x_hub: Array5<f64>,
    /// retarded observer position in the hub frame [m]
    pub x_hub_r: Array5<f64>,
    /// retarded polar angle [rad]
    pub theta_hub_r: Array4<f64>,
    /// retarded azimuth [rad]
    pub phi_hub_r: Array4<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ApproxEq)]
pub struct Rotor {
    pub tag: String,
    pub number_of_blades: u32,
    /// [m]
    pub tip_radius: f64,
    /// radial station locations, root to tip [m]
    pub radius_distribution: Array1<f64>,
    /// [m]
    pub chord_distribution: Array1<f64>,
    pub thickness_to_chord: Array1<f64>,
    /// [m]
    pub mid_chord_alignment: Array1<f64>,
    /// [rad]
    pub phase_offset_angle: f64,
    /// rotation vector from body to thrust frame [rad]
    pub orientation_euler_angles: [f64; 3],
}

impl SerdeAPI for Rotor {
    fn init(&mut self) -> anyhow::Result<()> {
        let n_sec = self.radius_distribution.len();
        ensure!(
            n_sec > 0,
            AerosimError::configuration(format!("rotor `{}` has no radial stations", self.tag))
        );
        for (name, dist) in [
            ("chord_distribution", &self.chord_distribution),
            ("thickness_to_chord", &self.thickness_to_chord),
            ("mid_chord_alignment", &self.mid_chord_alignment),
        ] {
            ensure!(
                dist.len() == n_sec,
                AerosimError::configuration(format!(
                    "rotor `{}` {name} has {} stations, radius_distribution has {n_sec}",
                    self.tag,
                    dist.len()
                ))
            );
        }
        ensure!(
            self.number_of_blades > 0,
            AerosimError::configuration(format!("rotor `{}` has no blades", self.tag))
        );
        Ok(())
    }
}

/// Rotor operating state from the aerodynamic solver
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ApproxEq, SerdeAPI)]
pub struct AeroacousticData {
    /// angular velocity per control point [rad/s]
    pub omega: Array1<f64>,
    /// `[control point, section]` blade thrust per unit span [N/m]
    pub blade_dt_dr: Array2<f64>,
    /// `[control point, section]` blade torque per unit span [N]
    pub blade_dq_dr: Array2<f64>,
}

/// Harmonic noise of one rotor at every observer
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ApproxEq, SerdeAPI)]
pub struct HarmonicNoise {
    /// `[control point, harmonic]` harmonic frequency [Hz]
    pub f: Array2<f64>,
    /// `[control point, microphone, rotor, harmonic]` [dB]
    pub spl_bpf_spectrum: Array4<f64>,
    /// [dBA]
    pub spl_bpf_spectrum_dba: Array4<f64>,
    /// `[control point, microphone, rotor, band]` [dB]
    pub spl_1_3_spectrum: Array4<f64>,
    /// [dBA]
    pub spl_1_3_spectrum_dba: Array4<f64>,
    /// mean-square pressure ratio per harmonic
    pub p_pref_harmonic: Array4<f64>,
    pub p_pref_harmonic_dba: Array4<f64>,
}

/// Shape functions `(ψ_V, ψ_L)` of the thickness and loading sources.  The root
/// station uses the compact-chord limits.
pub fn shape_functions(station: usize, k_x: f64) -> (f64, f64) {
    if station == 0 {
        (2.0 / 3.0, 1.0)
    } else {
        let (s, c) = (0.5 * k_x).sin_cos();
        let psi_l = (2.0 / k_x) * s;
        let psi_v = (8.0 / (k_x * k_x)) * ((2.0 / k_x) * s - c);
        (psi_v, psi_l)
    }
}

fn check_shapes(
    axes: &AcousticAxes,
    conditions: &FlightConditions,
    coordinates: &ObserverGeometry,
    aeroacoustic_data: &AeroacousticData,
) -> anyhow::Result<()> {
    let AcousticAxes {
        n_cpt,
        n_mic,
        n_rot,
        n_sec,
        ..
    } = *axes;
    let checks: [(&str, Vec<usize>, Vec<usize>); 9] = [
        (
            "density",
            conditions.freestream.density.shape().to_vec(),
            vec![n_cpt],
        ),
        (
            "speed_of_sound",
            conditions.freestream.speed_of_sound.shape().to_vec(),
            vec![n_cpt],
        ),
        (
            "velocity_vector",
            conditions.velocity_vector.shape().to_vec(),
            vec![n_cpt, 3],
        ),
        (
            "x_hub",
            coordinates.x_hub.shape().to_vec(),
            vec![n_cpt, n_mic, n_rot, n_sec, 3],
        ),
        (
            "x_hub_r",
            coordinates.x_hub_r.shape().to_vec(),
            vec![n_cpt, n_mic, n_rot, n_sec, 3],
        ),
        (
            "theta_hub_r",
            coordinates.theta_hub_r.shape().to_vec(),
            vec![n_cpt, n_mic, n_rot, n_sec],
        ),
        (
            "phi_hub_r",
            coordinates.phi_hub_r.shape().to_vec(),
            vec![n_cpt, n_mic, n_rot, n_sec],
        ),
        (
            "blade_dt_dr",
            aeroacoustic_data.blade_dt_dr.shape().to_vec(),
            vec![n_cpt, n_sec],
        ),
        (
            "blade_dq_dr",
            aeroacoustic_data.blade_dq_dr.shape().to_vec(),
            vec![n_cpt, n_sec],
        ),
    ];
    for (name, got, expected) in checks {
        ensure!(
            got == expected,
            AerosimError::configuration(format!(
                "`{name}` has shape {got:?}, expected {expected:?}"
            ))
        );
    }
    ensure!(
        aeroacoustic_data.omega.len() == n_cpt,
        AerosimError::configuration(format!(
            "`omega` has {} values for {n_cpt} control points",
            aeroacoustic_data.omega.len()
        ))
    );
    Ok(())
}

fn numeric_domain_error(quantity: &str, cpt: usize, detail: &str) -> anyhow::Error {
    AerosimError::NumericDomain {
        quantity: quantity.into(),
        cpt,
        detail: detail.into(),
    }
    .into()
}

/// Thickness and loading harmonic noise of `rotor` at every observer.
///
/// # Arguments
/// - `harmonics`: harmonic numbers `m`, positive integers
/// - `conditions`: freestream, angle of attack and velocity per control point
/// - `coordinates`: observer geometry relative to the rotor hubs
/// - `rotor`: blade geometry
/// - `aeroacoustic_data`: angular velocity and blade loading
/// - `settings`: one-third-octave band definitions
#[timer]
pub fn harmonic_noise(
    harmonics: &Array1<f64>,
    conditions: &FlightConditions,
    coordinates: &ObserverGeometry,
    rotor: &Rotor,
    aeroacoustic_data: &AeroacousticData,
    settings: &AcousticSettings,
) -> anyhow::Result<HarmonicNoise> {
    let x_hub_dim = coordinates.x_hub.dim();
    let axes = AcousticAxes {
        n_cpt: conditions.n_cpt(),
        n_mic: x_hub_dim.1,
        n_rot: x_hub_dim.2,
        n_sec: rotor.radius_distribution.len(),
        n_h: harmonics.len(),
    };
    ensure!(
        axes.n_sec > 0 && axes.n_h > 0 && rotor.number_of_blades > 0,
        AerosimError::configuration(format!(
            "rotor `{}` needs radial stations, blades and at least one harmonic",
            rotor.tag
        ))
    );
    ensure!(
        harmonics.iter().all(|m| *m >= 1.0 && m.fract() == 0.0),
        AerosimError::configuration("harmonics must be positive integers")
    );
    check_shapes(&axes, conditions, coordinates, aeroacoustic_data)
        .with_context(|| format!("rotor `{}`", rotor.tag))?;

    let b = rotor.number_of_blades as f64;
    let r_tip = rotor.tip_radius;
    let tip_station = rotor.radius_distribution[axes.n_sec - 1];
    let d = 2.0 * tip_station;
    let r_nd = rotor.radius_distribution.mapv(|r| r / tip_station);

    let body2thrust = utils::rotation_matrix_from_rotvec(&rotor.orientation_euler_angles);
    let alpha_offset = body2thrust[0][0].clamp(-1.0, 1.0).acos();
    let speed = conditions
        .velocity_vector
        .map_axis(Axis(1), |v| v.dot(&v).sqrt());
    let alpha_cpt = conditions.angle_of_attack.mapv(|aoa| aoa + alpha_offset);

    // observer geometry that does not depend on the harmonic
    let y_obs = coordinates
        .x_hub
        .map_axis(Axis(4), |x| (x[1] * x[1] + x[2] * x[2]).sqrt());
    let s_r_obs = coordinates.x_hub_r.map_axis(Axis(4), |x| x.dot(&x).sqrt());
    let phi_obs = coordinates.phi_hub_r.mapv(|p| p + rotor.phase_offset_angle);
    let theta_r_prime_obs = Array4::from_shape_fn(coordinates.theta_hub_r.dim(), |idx| {
        let theta = coordinates.theta_hub_r[idx];
        let (alpha, phi) = (alpha_cpt[idx.0], phi_obs[idx]);
        (theta.cos() * alpha.cos() + theta.sin() * phi.sin() * alpha.sin()).acos()
    });
    if let Some((cpt, ..)) = utils::first_nan(&theta_r_prime_obs) {
        return Err(numeric_domain_error(
            "retarded directivity angle",
            cpt,
            "arc-cosine argument outside [-1, 1]",
        ));
    }
    let phi_prime_obs = Array4::from_shape_fn(coordinates.theta_hub_r.dim(), |idx| {
        let ratio = coordinates.theta_hub_r[idx].sin() / theta_r_prime_obs[idx].sin()
            * phi_obs[idx].cos();
        // clamped from above only; a NaN ratio must reach the check below
        let clamped = if ratio > 1.0 { 1.0 } else { ratio };
        clamped.acos()
    });
    if let Some((cpt, ..)) = utils::first_nan(&phi_prime_obs) {
        return Err(numeric_domain_error(
            "phase angle",
            cpt,
            "directivity cosine ratio below -1 or undefined",
        ));
    }

    // [control point, microphone, rotor, section, harmonic]
    let a = axes.per_cpt(&conditions.freestream.speed_of_sound)?;
    let rho = axes.per_cpt(&conditions.freestream.density)?;
    let v = axes.per_cpt(&speed)?;
    let omega = axes.per_cpt(&aeroacoustic_data.omega)?;
    let m = axes.per_harmonic(harmonics)?;
    let r = axes.per_section(&r_nd)?;
    let c = axes.per_section(&rotor.chord_distribution)?;
    let t_c = axes.per_section(&rotor.thickness_to_chord)?;
    let mca = axes.per_section(&rotor.mid_chord_alignment)?;
    let dt_dr = axes.per_cpt_section(&aeroacoustic_data.blade_dt_dr)?;
    let dq_dr = axes.per_cpt_section(&aeroacoustic_data.blade_dq_dr)?;
    let theta_r = axes.per_observer(&coordinates.theta_hub_r)?;
    let theta_r_prime = axes.per_observer(&theta_r_prime_obs)?;
    let phi_prime = axes.per_observer(&phi_prime_obs)?;
    let y = axes.per_observer(&y_obs)?;
    let s_r = axes.per_observer(&s_r_obs)?;

    let mut thickness = Array5::<Complex64>::zeros(axes.shape());
    let mut loading = Array5::<Complex64>::zeros(axes.shape());
    for (idx, p_t) in thickness.indexed_iter_mut() {
        let m_x = v[idx] / a[idx];
        let m_t = r_tip * omega[idx] / a[idx];
        let m_r = (m_x.powi(2) + r[idx].powi(2) * m_t.powi(2)).sqrt();
        let mb = m[idx] * b;
        let doppler = 1.0 - m_x * theta_r[idx].cos();
        let k_x = 2.0 * mb * (c[idx] / d) * m_t / (m_r * doppler);
        let (psi_v, psi_l) = shape_functions(idx.3, k_x);

        let bessel_arg = mb * r[idx] * m_t * theta_r_prime[idx].sin() / doppler;
        if bessel_arg.is_nan() {
            return Err(numeric_domain_error(
                "Bessel argument",
                idx.0,
                "NaN after directivity clamping",
            ));
        }
        let j_mb = bessel_jn(mb.round() as u32, bessel_arg)
            .map_err(|_| numeric_domain_error("Bessel function", idx.0, "NaN argument"))?;

        let phi_s = 2.0 * mb * m_t / (m_r * doppler) * (mca[idx] / d);
        let source_phase = Complex64::from_polar(1.0, phi_s);
        let retarded = Complex64::from_polar(
            1.0,
            mb * (omega[idx] * s_r[idx] / a[idx] + phi_prime[idx] - FRAC_PI_2),
        ) / doppler;
        let sin_theta = theta_r[idx].sin();

        *p_t = -(source_phase * (m_r.powi(2) * t_c[idx] * j_mb * k_x.powi(2) * psi_v))
            * (rho[idx] * a[idx].powi(2) * b * sin_theta / (4.0 * SQRT_2 * PI * (y[idx] / d)))
            * retarded;
        loading[idx] = source_phase
            * ((theta_r_prime[idx].cos() / doppler * dt_dr[idx]
                - dq_dr[idx] / (r[idx].powi(2) * m_t * r_tip))
                * j_mb
                * psi_l)
            * (mb * m_t * sin_theta / (2.0 * SQRT_2 * PI * y[idx] * r_tip))
            * retarded;
        if p_t.is_nan() || loading[idx].is_nan() {
            return Err(numeric_domain_error(
                "source integrand",
                idx.0,
                &format!("NaN at radial station {}, relative Mach number {m_r}", idx.3),
            ));
        }
    }

    let p_thickness = utils::trapz_axis(thickness.view(), &r_nd, AcousticAxis::Section.axis())?;
    let p_loading = utils::trapz_axis(loading.view(), &r_nd, AcousticAxis::Section.axis())?;
    let spl_bpf_spectrum = Zip::from(&p_loading)
        .and(&p_thickness)
        .map_collect(|p_l, p_t| 20.0 * ((p_l.norm() + p_t.norm()) / P_REF).log10());

    let f = Array2::from_shape_fn((axes.n_cpt, axes.n_h), |(i, h)| {
        b * aeroacoustic_data.omega[i] * harmonics[h] / (2.0 * PI)
    });
    let spl_1_3_spectrum =
        convert_to_third_octave_band(spl_bpf_spectrum.view(), f.view(), settings)?
            .mapv_into(|x| if x.is_infinite() { 0.0 } else { x });

    // frequency broadcast as [control point, 1, 1, harmonic]
    let spl_bpf_spectrum_dba = a_weighted(
        &spl_bpf_spectrum,
        f.view().insert_axis(Axis(1)).insert_axis(Axis(2)),
    )?;
    let spl_1_3_spectrum_dba = a_weighted(&spl_1_3_spectrum, settings.center_frequencies.view())?;

    #[cfg(feature = "logging")]
    log::debug!("{}", format_dbg!((rotor.tag.as_str(), axes.shape())));

    Ok(HarmonicNoise {
        p_pref_harmonic: spl_bpf_spectrum.mapv(spl_to_pressure_ratio),
        p_pref_harmonic_dba: spl_bpf_spectrum_dba.mapv(spl_to_pressure_ratio),
        f,
        spl_bpf_spectrum,
        spl_bpf_spectrum_dba,
        spl_1_3_spectrum,
        spl_1_3_spectrum_dba,
    })
}

/// One rotor to evaluate in a [`RotorNoiseBatch`]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ApproxEq)]
pub struct RotorNoiseCase {
    pub rotor: Rotor,
    pub coordinates: ObserverGeometry,
    pub aeroacoustic_data: AeroacousticData,
}

/// Rotors sharing one flight condition, evaluated independently
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ApproxEq)]
pub struct RotorNoiseBatch {
    pub conditions: FlightConditions,
    pub settings: AcousticSettings,
    pub cases: Vec<RotorNoiseCase>,
}

impl SerdeAPI for RotorNoiseBatch {
    fn init(&mut self) -> anyhow::Result<()> {
        self.settings.init()?;
        self.cases
            .iter_mut()
            .try_for_each(|case| case.rotor.init())
    }
}

impl RotorNoiseBatch {
    /// Harmonic noise of every case, in case order
    ///
    /// # Arguments
    /// - `parallelize`: whether to evaluate the cases in parallel with rayon
    pub fn compute(&self, parallelize: bool) -> anyhow::Result<Vec<HarmonicNoise>> {
        let run = |(i, case): (usize, &RotorNoiseCase)| {
            harmonic_noise(
                &self.settings.harmonics,
                &self.conditions,
                &case.coordinates,
                &case.rotor,
                &case.aeroacoustic_data,
                &self.settings,
            )
            .with_context(|| format!("rotor case idx: {}", i))
        };
        if parallelize {
            self.cases.par_iter().enumerate().map(run).collect()
        } else {
            self.cases.iter().enumerate().map(run).collect()
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// hovering four-blade rotor heard by two microphones, one below the disk and one
    /// off to the side
    pub(crate) fn mock_case(n_cpt: usize) -> (FlightConditions, RotorNoiseCase) {
        let n_sec = 5;
        let n_mic = 2;
        let radius = Array1::linspace(0.2, 1.0, n_sec);
        let rotor = Rotor {
            tag: "lift_rotor".into(),
            number_of_blades: 4,
            tip_radius: 1.0,
            radius_distribution: radius.clone(),
            chord_distribution: Array1::from_elem(n_sec, 0.1),
            thickness_to_chord: Array1::from_elem(n_sec, 0.12),
            mid_chord_alignment: Array1::zeros(n_sec),
            phase_offset_angle: 0.0,
            orientation_euler_angles: [0.0, 0.0, 0.0],
        };
        let conditions = FlightConditions {
            freestream: Freestream {
                speed_of_sound: Array1::from_elem(n_cpt, 340.0),
                density: Array1::from_elem(n_cpt, 1.225),
            },
            angle_of_attack: Array1::zeros(n_cpt),
            velocity_vector: Array2::from_shape_fn((n_cpt, 3), |(_, j)| {
                if j == 0 {
                    10.0
                } else {
                    0.0
                }
            }),
        };
        let observers = [[0.0, 30.0, 40.0], [20.0, 0.0, 50.0]];
        let x_hub = Array5::from_shape_fn((n_cpt, n_mic, 1, n_sec, 3), |(_, j, _, _, k)| {
            observers[j][k]
        });
        let theta = Array4::from_shape_fn((n_cpt, n_mic, 1, n_sec), |(_, j, _, _)| {
            [1.2, 0.9][j]
        });
        let phi = Array4::from_shape_fn((n_cpt, n_mic, 1, n_sec), |(_, j, _, _)| {
            [0.3, 0.6][j]
        });
        let case = RotorNoiseCase {
            rotor,
            coordinates: ObserverGeometry {
                x_hub_r: x_hub.clone(),
                x_hub,
                theta_hub_r: theta,
                phi_hub_r: phi,
            },
            aeroacoustic_data: AeroacousticData {
                omega: Array1::from_elem(n_cpt, 150.0),
                blade_dt_dr: Array2::from_shape_fn((n_cpt, n_sec), |(_, l)| 200.0 * radius[l]),
                blade_dq_dr: Array2::from_shape_fn((n_cpt, n_sec), |(_, l)| 20.0 * radius[l]),
            },
        };
        (conditions, case)
    }

    #[test]
    fn test_root_station_shape_functions() {
        assert_eq!(shape_functions(0, 3.7), (2.0 / 3.0, 1.0));
        let (psi_v, psi_l) = shape_functions(2, 1e-3);
        // small-k limits approach the root values
        assert!((psi_l - 1.0).abs() < 1e-6);
        assert!((psi_v - 2.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_harmonic_noise_shapes_and_finite_bands() {
        let (conditions, case) = mock_case(2);
        let settings = AcousticSettings::default();
        let noise = harmonic_noise(
            &settings.harmonics,
            &conditions,
            &case.coordinates,
            &case.rotor,
            &case.aeroacoustic_data,
            &settings,
        )
        .unwrap();
        assert_eq!(noise.f.dim(), (2, 30));
        assert_eq!(noise.spl_bpf_spectrum.dim(), (2, 2, 1, 30));
        assert_eq!(noise.spl_1_3_spectrum.dim(), (2, 2, 1, 29));
        assert!(noise
            .spl_1_3_spectrum
            .iter()
            .all(|x| x.is_finite() && *x >= 0.0));
        // blade passing frequency: 4 * 150 / 2π ≈ 95.5 Hz, 100 Hz band
        assert!((noise.f[[0, 0]] - 600.0 / (2.0 * PI)).abs() < 1e-9);
        assert!(noise.spl_1_3_spectrum[[0, 0, 0, 8]] > 0.0);
        // bands below the blade passing frequency hold no harmonic
        assert_eq!(noise.spl_1_3_spectrum[[0, 0, 0, 0]], 0.0);
        // identical control points give identical spectra
        for h in 0..30 {
            assert!(noise.spl_bpf_spectrum[[0, 1, 0, h]]
                .approx_eq(&noise.spl_bpf_spectrum[[1, 1, 0, h]], 1e-12));
        }
    }

    #[test]
    fn test_mismatched_loading_shape_is_configuration_error() {
        let (conditions, mut case) = mock_case(2);
        case.aeroacoustic_data.blade_dt_dr = Array2::zeros((2, 3));
        let settings = AcousticSettings::default();
        let err = harmonic_noise(
            &settings.harmonics,
            &conditions,
            &case.coordinates,
            &case.rotor,
            &case.aeroacoustic_data,
            &settings,
        )
        .unwrap_err();
        assert!(matches!(
            err.root_cause().downcast_ref::<AerosimError>(),
            Some(AerosimError::Configuration(_))
        ));
    }

    #[test]
    fn test_nan_geometry_is_numeric_domain_error() {
        let (conditions, mut case) = mock_case(3);
        case.coordinates.theta_hub_r[[2, 0, 0, 1]] = f64::NAN;
        let settings = AcousticSettings::default();
        let err = harmonic_noise(
            &settings.harmonics,
            &conditions,
            &case.coordinates,
            &case.rotor,
            &case.aeroacoustic_data,
            &settings,
        )
        .unwrap_err();
        match err.downcast_ref::<AerosimError>() {
            Some(AerosimError::NumericDomain { cpt, .. }) => assert_eq!(*cpt, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn assert_numeric_domain_at(res: anyhow::Result<HarmonicNoise>, expected_cpt: usize) {
        match res.unwrap_err().downcast_ref::<AerosimError>() {
            Some(AerosimError::NumericDomain { cpt, .. }) => assert_eq!(*cpt, expected_cpt),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_hover_with_station_on_hub_axis_is_numeric_domain_error() {
        // zero relative Mach number at r = 0 leaves 0 * inf in the thickness source
        let (mut conditions, mut case) = mock_case(1);
        conditions.velocity_vector.fill(0.0);
        case.rotor.radius_distribution = Array1::linspace(0.0, 1.0, 5);
        let settings = AcousticSettings::default();
        let res = harmonic_noise(
            &settings.harmonics,
            &conditions,
            &case.coordinates,
            &case.rotor,
            &case.aeroacoustic_data,
            &settings,
        );
        assert_numeric_domain_at(res, 0);
    }

    #[test]
    fn test_on_axis_observer_is_numeric_domain_error() {
        // sin θ_r = sin θ'_r = 0 makes the directivity cosine ratio 0/0
        let (conditions, mut case) = mock_case(2);
        case.coordinates.theta_hub_r.fill(0.0);
        let settings = AcousticSettings::default();
        let res = harmonic_noise(
            &settings.harmonics,
            &conditions,
            &case.coordinates,
            &case.rotor,
            &case.aeroacoustic_data,
            &settings,
        );
        assert_numeric_domain_at(res, 0);
    }

    /// two-blade rotor in hover with stations at r = 0.5 and 1.0, one observer at
    /// y = 5 m, first harmonic only
    fn two_station_case(
        thickness_to_chord: f64,
        dt_dr: [f64; 2],
        dq_dr: [f64; 2],
    ) -> HarmonicNoise {
        let conditions = FlightConditions {
            freestream: Freestream {
                speed_of_sound: array![340.0],
                density: array![1.2],
            },
            angle_of_attack: array![0.0],
            velocity_vector: Array2::zeros((1, 3)),
        };
        let rotor = Rotor {
            tag: "tail_rotor".into(),
            number_of_blades: 2,
            tip_radius: 1.0,
            radius_distribution: array![0.5, 1.0],
            chord_distribution: array![0.1, 0.1],
            thickness_to_chord: array![thickness_to_chord, thickness_to_chord],
            mid_chord_alignment: array![0.0, 0.0],
            phase_offset_angle: 0.0,
            orientation_euler_angles: [0.0, 0.0, 0.0],
        };
        let x_hub = Array5::from_shape_fn((1, 1, 1, 2, 3), |(.., k)| [0.0, 3.0, 4.0][k]);
        let coordinates = ObserverGeometry {
            x_hub_r: x_hub.clone(),
            x_hub,
            theta_hub_r: Array4::from_elem((1, 1, 1, 2), 1.0),
            phi_hub_r: Array4::from_elem((1, 1, 1, 2), 0.5),
        };
        let aeroacoustic_data = AeroacousticData {
            omega: array![100.0],
            blade_dt_dr: Array2::from_shape_vec((1, 2), dt_dr.to_vec()).unwrap(),
            blade_dq_dr: Array2::from_shape_vec((1, 2), dq_dr.to_vec()).unwrap(),
        };
        harmonic_noise(
            &array![1.0],
            &conditions,
            &coordinates,
            &rotor,
            &aeroacoustic_data,
            &AcousticSettings::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_two_station_levels_match_closed_form() {
        // |p_T| = 1.139203e-2 Pa and |p_L| = 6.684385e-3 Pa from the two-point
        // trapezoid of the thickness and loading sources evaluated by hand
        let thickness_only = two_station_case(0.1, [0.0, 0.0], [0.0, 0.0]);
        assert!((thickness_only.spl_bpf_spectrum[[0, 0, 0, 0]] - 55.111_420_560).abs() < 1e-6);

        let loading_only = two_station_case(0.0, [150.0, 300.0], [10.0, 20.0]);
        assert!((loading_only.spl_bpf_spectrum[[0, 0, 0, 0]] - 50.480_629_481).abs() < 1e-6);

        let noise = two_station_case(0.1, [150.0, 300.0], [10.0, 20.0]);
        assert!((noise.spl_bpf_spectrum[[0, 0, 0, 0]] - 59.121_645_042).abs() < 1e-6);
        assert!((noise.f[[0, 0]] - 100.0 / PI).abs() < 1e-12);
        // 31.8 Hz falls in the 31.5 Hz band, every other band is empty
        let bands = noise.spl_1_3_spectrum.index_axis(Axis(0), 0).to_owned();
        assert!((bands[[0, 0, 3]] - 59.121_645_042).abs() < 1e-6);
        assert!(bands
            .iter()
            .enumerate()
            .all(|(i, x)| *x >= 0.0 && (i == 3 || *x == 0.0)));
    }

    #[test]
    fn test_batch_parallel_matches_serial() {
        let (conditions, case) = mock_case(2);
        let mut second = case.clone();
        second.rotor.tag = "lift_rotor_2".into();
        second.rotor.phase_offset_angle = 0.4;
        let batch = RotorNoiseBatch {
            conditions,
            settings: AcousticSettings::default(),
            cases: vec![case, second],
        };
        let serial = batch.compute(false).unwrap();
        let parallel = batch.compute(true).unwrap();
        assert_eq!(serial.len(), 2);
        assert!(serial.approx_eq(&parallel, 1e-12));
    }
}

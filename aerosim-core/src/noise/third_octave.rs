//! Acoustic analysis settings and conversion of narrow-band spectra into
//! one-third-octave bands.

use crate::imports::*;
use crate::noise::decibel::{pressure_ratio_to_spl, spl_to_pressure_ratio};
use crate::params::*;

/// Frequency bands and harmonics used by the acoustic models
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ApproxEq)]
pub struct AcousticSettings {
    /// band centre frequencies [Hz]
    pub center_frequencies: Array1<f64>,
    /// band lower limits [Hz]
    pub lower_frequencies: Array1<f64>,
    /// band upper limits [Hz]
    pub upper_frequencies: Array1<f64>,
    /// rotor harmonics to evaluate
    pub harmonics: Array1<f64>,
}

impl Default for AcousticSettings {
    fn default() -> Self {
        Self {
            center_frequencies: Array1::from(THIRD_OCTAVE_CENTER_HZ.to_vec()),
            lower_frequencies: Array1::from(THIRD_OCTAVE_LOWER_HZ.to_vec()),
            upper_frequencies: Array1::from(THIRD_OCTAVE_UPPER_HZ.to_vec()),
            harmonics: Array1::range(1.0, DEFAULT_HARMONICS as f64 + 1.0, 1.0),
        }
    }
}

impl SerdeAPI for AcousticSettings {
    fn init(&mut self) -> anyhow::Result<()> {
        let n_band = self.center_frequencies.len();
        ensure!(
            self.lower_frequencies.len() == n_band && self.upper_frequencies.len() == n_band,
            AerosimError::configuration(format!(
                "band limits have {} lower and {} upper values for {n_band} centre frequencies",
                self.lower_frequencies.len(),
                self.upper_frequencies.len()
            ))
        );
        ensure!(
            self.lower_frequencies
                .iter()
                .zip(self.upper_frequencies.iter())
                .all(|(lo, hi)| lo < hi),
            AerosimError::configuration("every band lower limit must be below its upper limit")
        );
        ensure!(
            self.harmonics
                .iter()
                .all(|m| *m >= 1.0 && m.fract() == 0.0),
            AerosimError::configuration("harmonics must be positive integers")
        );
        Ok(())
    }
}

impl AcousticSettings {
    pub fn n_bands(&self) -> usize {
        self.center_frequencies.len()
    }

    /// index of the band containing `f`, with bands closed below and open above
    pub fn band_of(&self, f: f64) -> Option<usize> {
        self.lower_frequencies
            .iter()
            .zip(self.upper_frequencies.iter())
            .position(|(lo, hi)| *lo <= f && f < *hi)
    }
}

/// Energy-sums the lines of a narrow-band spectrum into one-third-octave bands.
///
/// `spl` is indexed `[control point, microphone, rotor, line]` and `frequency`
/// `[control point, line]`; the result replaces the last axis with the bands of
/// `settings`.  A band receiving no line, or only lines of zero pressure, is
/// `-inf`; a band receiving a NaN line is NaN.
pub fn convert_to_third_octave_band(
    spl: ArrayView<f64, ndarray::Ix4>,
    frequency: ArrayView<f64, ndarray::Ix2>,
    settings: &AcousticSettings,
) -> anyhow::Result<Array4<f64>> {
    let (n_cpt, n_mic, n_rot, n_line) = spl.dim();
    ensure!(
        frequency.dim() == (n_cpt, n_line),
        AerosimError::configuration(format!(
            "frequency grid {:?} does not match spectrum {:?}",
            frequency.shape(),
            spl.shape()
        ))
    );
    // band of every line, per control point
    let bands: Array2<Option<usize>> = frequency.mapv(|f| settings.band_of(f));
    let mut out = Array4::<f64>::zeros((n_cpt, n_mic, n_rot, settings.n_bands()));
    for ((i, j, k, b), band_level) in out.indexed_iter_mut() {
        let total: f64 = (0..n_line)
            .filter(|&l| bands[[i, l]] == Some(b))
            .map(|l| spl_to_pressure_ratio(spl[[i, j, k, l]]))
            .sum();
        *band_level = pressure_ratio_to_spl(total);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let mut settings = AcousticSettings::default();
        assert!(settings.init().is_ok());
        assert_eq!(settings.n_bands(), 29);
        assert_eq!(settings.harmonics.len(), DEFAULT_HARMONICS);
        assert_eq!(settings.band_of(1_000.0), Some(18));
        assert_eq!(settings.band_of(5.0), None);
    }

    #[test]
    fn test_fractional_harmonics_rejected() {
        let mut settings = AcousticSettings::default();
        settings.harmonics = array![1.0, 1.5];
        assert!(settings.init().is_err());
    }

    #[test]
    fn test_lines_in_same_band_are_energy_summed() {
        let settings = AcousticSettings::default();
        let spl = Array4::from_shape_vec((1, 1, 1, 3), vec![70.0, 70.0, 50.0]).unwrap();
        let f = array![[95.0, 105.0, 1_000.0]];
        let bands = convert_to_third_octave_band(spl.view(), f.view(), &settings).unwrap();
        assert!((bands[[0, 0, 0, 8]] - 73.0103).abs() < 1e-3);
        assert!((bands[[0, 0, 0, 18]] - 50.0).abs() < 1e-9);
        assert_eq!(bands[[0, 0, 0, 0]], f64::NEG_INFINITY);
    }

    #[test]
    fn test_nan_line_propagates_to_its_band() {
        let settings = AcousticSettings::default();
        let spl = Array4::from_shape_vec((1, 1, 1, 2), vec![f64::NAN, 50.0]).unwrap();
        let f = array![[100.0, 1_000.0]];
        let bands = convert_to_third_octave_band(spl.view(), f.view(), &settings).unwrap();
        assert!(bands[[0, 0, 0, 8]].is_nan());
        assert!((bands[[0, 0, 0, 18]] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_settings_yaml_round_trip() {
        let settings = AcousticSettings::default();
        let de = AcousticSettings::from_yaml(settings.to_yaml().unwrap()).unwrap();
        assert!(settings.approx_eq(&de, 1e-12));
    }
}

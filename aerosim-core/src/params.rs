//! Module containing model parameters and constants.

/// Reference (threshold of hearing) sound pressure [Pa]
pub const P_REF: f64 = 2.0e-5;

/// Background noise floor [dB] used as the "no signal" sentinel in noise grids
pub const BACKGROUND_NOISE_DB: f64 = 35.0;

/// Exposure grids start at 06:00 [s after midnight]
pub const EXPOSURE_GRID_START_S: f64 = 6.0 * 3_600.0;

/// Default duration of a noise exposure analysis window [s]
pub const DEFAULT_EXPOSURE_PERIOD_S: f64 = 24.0 * 3_600.0;

/// Levels more than this many dB below a cell's maximum do not count toward SENEL
pub const SENEL_BOUND_DB: f64 = 10.0;

/// Nominal one-third-octave band centre frequencies [Hz]
pub const THIRD_OCTAVE_CENTER_HZ: [f64; 29] = [
    16.0, 20.0, 25.0, 31.5, 40.0, 50.0, 63.0, 80.0, 100.0, 125.0, 160.0, 200.0, 250.0, 315.0,
    400.0, 500.0, 630.0, 800.0, 1000.0, 1250.0, 1600.0, 2000.0, 2500.0, 3150.0, 4000.0, 5000.0,
    6300.0, 8000.0, 10000.0,
];

/// Nominal one-third-octave band lower limits [Hz]
pub const THIRD_OCTAVE_LOWER_HZ: [f64; 29] = [
    14.0, 18.0, 22.4, 28.0, 35.5, 45.0, 56.0, 71.0, 90.0, 112.0, 140.0, 180.0, 224.0, 280.0,
    355.0, 450.0, 560.0, 710.0, 900.0, 1120.0, 1400.0, 1800.0, 2240.0, 2800.0, 3550.0, 4500.0,
    5600.0, 7100.0, 9000.0,
];

/// Nominal one-third-octave band upper limits [Hz]
pub const THIRD_OCTAVE_UPPER_HZ: [f64; 29] = [
    18.0, 22.4, 28.0, 35.5, 45.0, 56.0, 71.0, 90.0, 112.0, 140.0, 180.0, 224.0, 280.0, 355.0,
    450.0, 560.0, 710.0, 900.0, 1120.0, 1400.0, 1800.0, 2240.0, 2800.0, 3550.0, 4500.0, 5600.0,
    7100.0, 9000.0, 11200.0,
];

/// Number of rotor harmonics evaluated by default
pub const DEFAULT_HARMONICS: usize = 30;

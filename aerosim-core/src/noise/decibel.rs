//! Decibel arithmetic and frequency weighting.
//!
//! Levels are combined on an energy basis, `10 log10(Σ 10^(L/10))`.  NaN marks a
//! sample with no signal and is skipped; a combination of nothing but NaN stays NaN.

use crate::imports::*;
use crate::params::BACKGROUND_NOISE_DB;

/// Background noise floor [dB]
pub fn background_noise() -> f64 {
    BACKGROUND_NOISE_DB
}

/// Mean-square pressure ratio `(p/p_ref)²` of a level [dB]
pub fn spl_to_pressure_ratio(spl: f64) -> f64 {
    10f64.powf(spl / 10.0)
}

/// Level [dB] of a mean-square pressure ratio
pub fn pressure_ratio_to_spl(ratio: f64) -> f64 {
    10.0 * ratio.log10()
}

/// Energy sum of two levels.
///
/// # Examples
/// ```rust
/// use aerosim_core::noise::decibel::dbsum;
/// assert!((dbsum(60.0, 60.0) - 63.0103).abs() < 1e-4);
/// assert_eq!(dbsum(f64::NAN, 60.0), 60.0);
/// ```
pub fn dbsum(a: f64, b: f64) -> f64 {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => f64::NAN,
        (true, false) => b,
        (false, true) => a,
        (false, false) => {
            pressure_ratio_to_spl(spl_to_pressure_ratio(a) + spl_to_pressure_ratio(b))
        }
    }
}

/// Energy sum of `spl` along `axis`, skipping NaN
pub fn spl_arithmetic<D: RemoveAxis>(spl: ArrayView<f64, D>, axis: Axis) -> Array<f64, D::Smaller> {
    spl.fold_axis(axis, f64::NAN, |acc, &x| {
        if x.is_nan() {
            *acc
        } else if acc.is_nan() {
            spl_to_pressure_ratio(x)
        } else {
            acc + spl_to_pressure_ratio(x)
        }
    })
    .mapv_into(pressure_ratio_to_spl)
}

/// A-weighting correction [dB] at frequency `f` [Hz], IEC 61672-1
pub fn a_weighting(f: f64) -> f64 {
    let f2 = f * f;
    let r_a = (12_194.0f64.powi(2) * f2 * f2)
        / ((f2 + 20.6f64.powi(2))
            * ((f2 + 107.7f64.powi(2)) * (f2 + 737.9f64.powi(2))).sqrt()
            * (f2 + 12_194.0f64.powi(2)));
    20.0 * r_a.log10() + 2.0
}

/// Adds the A-weighting of `frequency` to each level in `spl`.  `frequency` is
/// broadcast against `spl` the way ndarray broadcasts trailing axes.
pub fn a_weighted<D: Dimension, E: Dimension>(
    spl: &Array<f64, D>,
    frequency: ArrayView<f64, E>,
) -> anyhow::Result<Array<f64, D>> {
    let weights = frequency.mapv(a_weighting);
    let weights = weights.broadcast(spl.raw_dim()).ok_or_else(|| {
        AerosimError::configuration(format!(
            "frequency shape {:?} does not broadcast to spectrum shape {:?}",
            frequency.shape(),
            spl.shape()
        ))
    })?;
    let mut weighted = spl.clone();
    Zip::from(&mut weighted)
        .and(&weights)
        .for_each(|level, &w| *level += w);
    Ok(weighted)
}

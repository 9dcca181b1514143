//! Module containing miscellaneous utility functions.

use crate::imports::*;
use std::ops::{Add, Mul};

/// Seconds in one hour
pub const SECONDS_PER_HOUR: f64 = 3_600.0;

lazy_static! {
    static ref CLOCK_REGEX: Regex =
        Regex::new(r"^\s*(\d{1,2}):([0-5]\d):([0-5]\d(?:\.\d+)?)\s*$").unwrap();
}

/// Parses a clock string formatted as `HH:MM:SS` (seconds may carry a fractional
/// part) into seconds after midnight.
///
/// # Examples
/// ```rust
/// use aerosim_core::utils::clock_to_seconds;
/// assert_eq!(clock_to_seconds("06:30:15").unwrap(), 23_415.0);
/// ```
pub fn clock_to_seconds(clock: &str) -> anyhow::Result<f64> {
    let caps = CLOCK_REGEX.captures(clock).ok_or_else(|| {
        AerosimError::configuration(format!("`{clock}` is not a valid HH:MM:SS clock time"))
    })?;
    let hours: f64 = caps[1].parse()?;
    let minutes: f64 = caps[2].parse()?;
    let seconds: f64 = caps[3].parse()?;
    ensure!(
        hours < 24.0,
        AerosimError::configuration(format!("`{clock}` has an hour field past 23"))
    );
    Ok(hours * SECONDS_PER_HOUR + minutes * 60.0 + seconds)
}

/// Trapezoidal integral of `y` over the sample points `x` along `axis`.  The returned
/// array drops `axis`.
pub fn trapz_axis<A, D>(
    y: ArrayView<A, D>,
    x: &Array1<f64>,
    axis: Axis,
) -> anyhow::Result<Array<A, D::Smaller>>
where
    A: Copy + Default + Add<Output = A> + Mul<f64, Output = A>,
    D: RemoveAxis,
{
    ensure!(
        y.len_of(axis) == x.len(),
        AerosimError::configuration(format!(
            "integrand has {} samples along axis {} but {} abscissae were supplied",
            y.len_of(axis),
            axis.index(),
            x.len()
        ))
    );
    let mut integral = Array::from_elem(y.raw_dim().remove_axis(axis), A::default());
    for i in 1..x.len() {
        let half_dx = 0.5 * (x[i] - x[i - 1]);
        Zip::from(&mut integral)
            .and(y.index_axis(axis, i - 1))
            .and(y.index_axis(axis, i))
            .for_each(|acc, &lo, &hi| *acc = *acc + (lo + hi) * half_dx);
    }
    Ok(integral)
}

/// Rotation matrix for a rotation vector (axis scaled by angle in radians), Rodrigues'
/// formula.
pub fn rotation_matrix_from_rotvec(rotvec: &[f64; 3]) -> [[f64; 3]; 3] {
    let theta = rotvec.iter().map(|v| v * v).sum::<f64>().sqrt();
    if theta == 0.0 {
        return [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    }
    let [kx, ky, kz] = [rotvec[0] / theta, rotvec[1] / theta, rotvec[2] / theta];
    let (s, c) = theta.sin_cos();
    let v = 1.0 - c;
    [
        [c + kx * kx * v, kx * ky * v - kz * s, kx * kz * v + ky * s],
        [ky * kx * v + kz * s, c + ky * ky * v, ky * kz * v - kx * s],
        [kz * kx * v - ky * s, kz * ky * v + kx * s, c + kz * kz * v],
    ]
}

/// Max of each lane along `axis`, ignoring NaN.  Lanes with no finite-or-infinite
/// value stay NaN.
pub fn nanmax_axis<D: RemoveAxis>(arr: ArrayView<f64, D>, axis: Axis) -> Array<f64, D::Smaller> {
    arr.fold_axis(axis, f64::NAN, |acc, &x| {
        if x.is_nan() {
            *acc
        } else if acc.is_nan() {
            x
        } else {
            (*acc).max(x)
        }
    })
}

/// Index of the first NaN element, if any
pub fn first_nan<D: Dimension>(arr: &Array<f64, D>) -> Option<D::Pattern> {
    arr.indexed_iter()
        .find(|(_, x)| x.is_nan())
        .map(|(idx, _)| idx)
}

//! Special functions: integer-order Bessel functions of the first kind.
//!
//! `J0` and `J1` use the rational/asymptotic approximations of Numerical Recipes
//! (absolute error ~1e-8).  Higher orders use upward recurrence when `|x| > n` and
//! Miller's normalized downward recurrence otherwise, which stays accurate for the large
//! orders (`harmonic × blade count`) and sub-order arguments that rotor noise needs.

use crate::imports::*;

/// start of the downward recurrence is offset by `sqrt(MILLER_ACC * n)`
const MILLER_ACC: f64 = 160.0;
const BIG: f64 = 1.0e10;
const BIG_INV: f64 = 1.0e-10;

/// Bessel function of the first kind, order 0
pub fn bessel_j0(x: f64) -> f64 {
    let ax = x.abs();
    if ax < 8.0 {
        let y = x * x;
        let num = 57568490574.0
            + y * (-13362590354.0
                + y * (651619640.7 + y * (-11214424.18 + y * (77392.33017 + y * (-184.9052456)))));
        let den = 57568490411.0
            + y * (1029532985.0 + y * (9494680.718 + y * (59272.64853 + y * (267.8532712 + y))));
        num / den
    } else {
        let z = 8.0 / ax;
        let y = z * z;
        let xx = ax - 0.785398164;
        let p = 1.0
            + y * (-0.1098628627e-2
                + y * (0.2734510407e-4 + y * (-0.2073370639e-5 + y * 0.2093887211e-6)));
        let q = -0.1562499995e-1
            + y * (0.1430488765e-3
                + y * (-0.6911147651e-5 + y * (0.7621095161e-6 - y * 0.934935152e-7)));
        (0.636619772 / ax).sqrt() * (xx.cos() * p - z * xx.sin() * q)
    }
}

/// Bessel function of the first kind, order 1
pub fn bessel_j1(x: f64) -> f64 {
    let ax = x.abs();
    if ax < 8.0 {
        let y = x * x;
        let num = x
            * (72362614232.0
                + y * (-7895059235.0
                    + y * (242396853.1
                        + y * (-2972611.439 + y * (15704.48260 + y * (-30.16036606))))));
        let den = 144725228442.0
            + y * (2300535178.0
                + y * (18583304.74 + y * (99447.43394 + y * (376.9991397 + y))));
        num / den
    } else {
        let z = 8.0 / ax;
        let y = z * z;
        let xx = ax - 2.356194491;
        let p = 1.0
            + y * (0.183105e-2
                + y * (-0.3516396496e-4 + y * (0.2457520174e-5 + y * (-0.240337019e-6))));
        let q = 0.04687499995
            + y * (-0.2002690873e-3
                + y * (0.8449199096e-5 + y * (-0.88228987e-6 + y * 0.105787412e-6)));
        let ans = (0.636619772 / ax).sqrt() * (xx.cos() * p - z * xx.sin() * q);
        if x < 0.0 {
            -ans
        } else {
            ans
        }
    }
}

/// Bessel function of the first kind of integer order `n`.
///
/// Returns a `NumericDomain` error for a NaN argument instead of propagating NaN into
/// the acoustic integrals.
pub fn bessel_jn(n: u32, x: f64) -> anyhow::Result<f64> {
    if x.is_nan() {
        return Err(AerosimError::NumericDomain {
            quantity: format!("J_{n}"),
            cpt: 0,
            detail: "NaN argument".into(),
        }
        .into());
    }
    Ok(match n {
        0 => bessel_j0(x),
        1 => bessel_j1(x),
        _ => {
            let ax = x.abs();
            if ax == 0.0 {
                return Ok(0.0);
            }
            if ax.is_infinite() {
                return Ok(0.0);
            }
            let ans = if ax > n as f64 {
                upward_recurrence(n, ax)
            } else {
                miller_recurrence(n, ax)
            };
            if x < 0.0 && n % 2 == 1 {
                -ans
            } else {
                ans
            }
        }
    })
}

fn upward_recurrence(n: u32, ax: f64) -> f64 {
    let tox = 2.0 / ax;
    let mut bjm = bessel_j0(ax);
    let mut bj = bessel_j1(ax);
    for j in 1..n {
        let bjp = j as f64 * tox * bj - bjm;
        bjm = bj;
        bj = bjp;
    }
    bj
}

fn miller_recurrence(n: u32, ax: f64) -> f64 {
    let tox = 2.0 / ax;
    let start = 2 * ((n + (MILLER_ACC * n as f64).sqrt() as u32) / 2);
    let mut even_term = false;
    let mut bjp = 0.0;
    let mut bj = 1.0;
    let mut ans = 0.0;
    let mut sum = 0.0;
    for j in (1..=start).rev() {
        let bjm = j as f64 * tox * bj - bjp;
        bjp = bj;
        bj = bjm;
        if bj.abs() > BIG {
            bj *= BIG_INV;
            bjp *= BIG_INV;
            ans *= BIG_INV;
            sum *= BIG_INV;
        }
        if even_term {
            sum += bj;
        }
        even_term = !even_term;
        if j == n {
            ans = bjp;
        }
    }
    // J0 + 2 (J2 + J4 + ...) = 1
    sum = 2.0 * sum - bj;
    ans / sum
}

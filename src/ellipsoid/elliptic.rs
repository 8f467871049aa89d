// Copyright (c) 2024 Ken Barker

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

//! The elliptic module contains Carlson's symmetric elliptic integrals and
//! the incomplete elliptic integral of the second kind derived from them.
//!
//! The meridian arc length of an ellipsoid is `b E(beta | -ep_2)`, where
//! `beta` is the parametric latitude. Evaluating it with these integrals is
//! valid for any flattening, unlike the series in `coefficients`.
//!
//! See: BC Carlson, [Numerical computation of real or complex elliptic integrals](https://arxiv.org/abs/math/9409227).

#![allow(clippy::suboptimal_flops)]

use crate::Error;

/// The maximum number of duplication steps in `carlson_rf` and `carlson_rd`.
/// Convergence is geometric, so this is never reached for finite arguments.
pub const MAX_DUPLICATIONS: u32 = 64;

/// Carlson's symmetric integral of the first kind,
/// `RF(x, y, z) = 1/2 ∫ dt / sqrt((t + x)(t + y)(t + z))`.
/// * `x`, `y`, `z` - non-negative, at most one of them zero.
///
/// # Errors
///
/// `Error::ConvergenceFailure` if the duplication does not converge.
pub fn carlson_rf(x: f64, y: f64, z: f64) -> Result<f64, Error> {
    let tolerance = libm::pow(3.0 * f64::EPSILON * 0.01, 1.0 / 8.0);
    let a0 = (x + y + z) / 3.0;
    let q = libm::fabs(a0 - x).max(libm::fabs(a0 - y)).max(libm::fabs(a0 - z)) / tolerance;

    let (mut an, mut x0, mut y0, mut z0) = (a0, x, y, z);
    let mut mul = 1.0;
    let mut iterations = 0;
    while q >= mul * libm::fabs(an) {
        if MAX_DUPLICATIONS <= iterations {
            log::warn!("carlson_rf({x}, {y}, {z}) did not converge");
            return Err(Error::ConvergenceFailure {
                algorithm: "carlson_rf",
                iterations,
            });
        }
        iterations += 1;

        let lambda = libm::sqrt(x0) * libm::sqrt(y0)
            + libm::sqrt(y0) * libm::sqrt(z0)
            + libm::sqrt(z0) * libm::sqrt(x0);
        an = (an + lambda) / 4.0;
        x0 = (x0 + lambda) / 4.0;
        y0 = (y0 + lambda) / 4.0;
        z0 = (z0 + lambda) / 4.0;
        mul *= 4.0;
    }

    let xx = (a0 - x) / (mul * an);
    let yy = (a0 - y) / (mul * an);
    let zz = -(xx + yy);
    let e2 = xx * yy - zz * zz;
    let e3 = xx * yy * zz;

    Ok(
        (e3 * (6930.0 * e3 + e2 * (15015.0 * e2 - 16380.0) + 17160.0)
            + e2 * ((10010.0 - 5775.0 * e2) * e2 - 24024.0)
            + 240_240.0)
            / (240_240.0 * libm::sqrt(an)),
    )
}

/// Carlson's degenerate symmetric integral of the third kind,
/// `RD(x, y, z) = 3/2 ∫ dt / ((t + z) sqrt((t + x)(t + y)(t + z)))`.
/// * `x`, `y` - non-negative, at most one of them zero.
/// * `z` - positive.
///
/// # Errors
///
/// `Error::ConvergenceFailure` if the duplication does not converge.
pub fn carlson_rd(x: f64, y: f64, z: f64) -> Result<f64, Error> {
    let tolerance = libm::pow(0.2 * (f64::EPSILON * 0.01), 1.0 / 8.0);
    let a0 = (x + y + 3.0 * z) / 5.0;
    let q = libm::fabs(a0 - x).max(libm::fabs(a0 - y)).max(libm::fabs(a0 - z)) / tolerance;

    let (mut an, mut x0, mut y0, mut z0) = (a0, x, y, z);
    let mut mul = 1.0;
    let mut sum = 0.0;
    let mut iterations = 0;
    while q >= mul * libm::fabs(an) {
        if MAX_DUPLICATIONS <= iterations {
            log::warn!("carlson_rd({x}, {y}, {z}) did not converge");
            return Err(Error::ConvergenceFailure {
                algorithm: "carlson_rd",
                iterations,
            });
        }
        iterations += 1;

        let lambda = libm::sqrt(x0) * libm::sqrt(y0)
            + libm::sqrt(y0) * libm::sqrt(z0)
            + libm::sqrt(z0) * libm::sqrt(x0);
        sum += 1.0 / (mul * libm::sqrt(z0) * (z0 + lambda));
        an = (an + lambda) / 4.0;
        x0 = (x0 + lambda) / 4.0;
        y0 = (y0 + lambda) / 4.0;
        z0 = (z0 + lambda) / 4.0;
        mul *= 4.0;
    }

    let xx = (a0 - x) / (mul * an);
    let yy = (a0 - y) / (mul * an);
    let zz = -(xx + yy) / 3.0;
    let e2 = xx * yy - 6.0 * zz * zz;
    let e3 = (3.0 * xx * yy - 8.0 * zz * zz) * zz;
    let e4 = 3.0 * (xx * yy - zz * zz) * zz * zz;
    let e5 = xx * yy * zz * zz * zz;

    Ok(((471_240.0 - 540_540.0 * e2) * e5
        + (612_612.0 * e2 - 540_540.0 * e3 - 556_920.0) * e4
        + e3 * (306_306.0 * e3 + e2 * (675_675.0 * e2 - 706_860.0) + 680_680.0)
        + e2 * ((417_690.0 - 255_255.0 * e2) * e2 - 875_160.0)
        + 4_084_080.0)
        / (4_084_080.0 * mul * an * libm::sqrt(an))
        + 3.0 * sum)
}

/// The complete elliptic integral of the second kind, `E(k2)`.
/// * `k2` - the square of the modulus, `k2 < 1`.
///
/// # Errors
///
/// `Error::ConvergenceFailure` if a Carlson integral does not converge.
pub fn complete_e(k2: f64) -> Result<f64, Error> {
    let kp2 = 1.0 - k2;
    Ok(carlson_rf(0.0, kp2, 1.0)? - k2 * carlson_rd(0.0, kp2, 1.0)? / 3.0)
}

/// The incomplete elliptic integral of the second kind, `E(phi, k2)`.
/// * `sn`, `cn` - the sine and cosine of `phi`, `|phi| <= pi/2`.
/// * `k2` - the square of the modulus.
///
/// # Errors
///
/// `Error::ConvergenceFailure` if a Carlson integral does not converge.
pub fn incomplete_e(sn: f64, cn: f64, k2: f64) -> Result<f64, Error> {
    if sn == 0.0 {
        return Ok(0.0);
    }

    let cn2 = cn * cn;
    let dn2 = 1.0 - k2 * sn * sn;
    Ok(sn * (carlson_rf(cn2, dn2, 1.0)? - k2 * sn * sn * carlson_rd(cn2, dn2, 1.0)? / 3.0))
}

/// The derivative of `incomplete_e` with respect to `phi`:
/// `sqrt(1 - k2 sin^2 phi)`.
#[must_use]
pub fn delta(sn: f64, k2: f64) -> f64 {
    libm::sqrt(1.0 - k2 * sn * sn)
}

/// The divided difference `(E(x) - E(y)) / (x - y)`, calculated using the
/// addition theorem for `E` when `x` and `y` have the same sign, so that
/// it is accurate when `x` and `y` are close.
/// * `x`, `y` - angles in radians, `|x|, |y| <= pi/2`.
/// * `k2` - the square of the modulus.
///
/// # Errors
///
/// `Error::ConvergenceFailure` if a Carlson integral does not converge.
pub fn divided_e(x: f64, y: f64, k2: f64) -> Result<f64, Error> {
    let d = x - y;
    if x * y <= 0.0 {
        return if d == 0.0 {
            Ok(1.0)
        } else {
            let ex = incomplete_e(libm::sin(x), libm::cos(x), k2)?;
            let ey = incomplete_e(libm::sin(y), libm::cos(y), k2)?;
            Ok((ex - ey) / d)
        };
    }

    let (sx, cx) = (libm::sin(x), libm::cos(x));
    let (sy, cy) = (libm::sin(y), libm::cos(y));

    // tan((x - y) / 2) divided by (x - y)
    let half_d = d / 2.0;
    let dsin = libm::cos((x + y) / 2.0)
        * if half_d == 0.0 {
            1.0
        } else {
            libm::sin(half_d) / half_d
        };
    let dt = dsin * (sx + sy) / ((cx + cy) * (sx * delta(sy, k2) + sy * delta(sx, k2)));
    let t = d * dt;
    let t2 = 1.0 + t * t;
    let dsz = 2.0 * dt / t2;
    let sz = d * dsz;
    let cz = (1.0 - t) * (1.0 + t) / t2;

    let ez = if sz == 0.0 {
        1.0
    } else {
        incomplete_e(sz, cz, k2)? / sz
    };
    Ok((ez - k2 * sx * sy) * dsz)
}

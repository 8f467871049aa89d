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

//! The area module calculates `S12`: the area between a rhumb line and the
//! equator.
//!
//! `S12 = c2 * lon12 * <sin xi>`, where `c2` is the square of the authalic
//! radius and `<sin xi>` is the mean of the sine of the authalic latitude
//! over the rhumb line, with respect to the isometric latitude.
//!
//! The mean is split into the mean of the sine of the conformal latitude,
//! `tanh psi`, which has a closed form divided difference and the mean of the
//! small difference between the two, which is integrated by
//! [Gauss-Legendre quadrature](https://en.wikipedia.org/wiki/Gauss%E2%80%93Legendre_quadrature).

#![allow(clippy::suboptimal_flops)]

use super::differences::dlncosh;
use crate::ellipsoid::{eatanhe, taupf};
use crate::Ellipsoid;

/// The positive nodes and weights of 12 point Gauss-Legendre quadrature.
const GAUSS_LEGENDRE_12: [(f64, f64); 6] = [
    (0.125_233_408_511_468_9, 0.249_147_045_813_402_77),
    (0.367_831_498_998_180_2, 0.233_492_536_538_354_8),
    (0.587_317_954_286_617_5, 0.203_167_426_723_065_92),
    (0.769_902_674_194_304_7, 0.160_078_328_543_346_22),
    (0.904_117_256_370_474_9, 0.106_939_325_995_318_43),
    (0.981_560_634_246_719_2, 0.047_175_336_386_511_83),
];

/// The function `q(sin phi)`, proportional to the area between the equator
/// and the parallel at `phi`.
/// * `x` - the sine of the geodetic latitude.
/// * `e_2` - the square of the Eccentricity of the ellipsoid.
fn q(x: f64, e_2: f64) -> f64 {
    let atanh_term = if e_2 == 0.0 { x } else { eatanhe(x, e_2) / e_2 };
    (1.0 - e_2) * (x / (1.0 - e_2 * x * x) + atanh_term)
}

/// Calculate the sine of the authalic latitude, `xi`.
/// * `sin_lat` - the sine of the geodetic latitude.
/// * `e_2` - the square of the Eccentricity of the ellipsoid.
#[must_use]
pub fn calculate_sin_authalic_latitude(sin_lat: f64, e_2: f64) -> f64 {
    q(sin_lat, e_2) / q(1.0, e_2)
}

/// The integrand: `(sin xi - sin chi) d psi / d phi`.
fn sin_xi_minus_sin_chi(phi: f64, e_2: f64) -> f64 {
    let cos_phi = libm::cos(phi);
    if cos_phi <= 0.0 {
        return 0.0;
    }

    let sin_phi = libm::sin(phi);
    let taup = taupf(sin_phi / cos_phi, e_2);
    let sin_chi = taup / libm::hypot(1.0, taup);
    let sin_xi = calculate_sin_authalic_latitude(sin_phi, e_2);
    (sin_xi - sin_chi) * (1.0 - e_2) / ((1.0 - e_2 * sin_phi * sin_phi) * cos_phi)
}

/// Calculate the mean of `sin xi` with respect to the isometric latitude
/// between two latitudes.
/// * `ellipsoid` - the `Ellipsoid`.
/// * `phi_x`, `phi_y` - the geodetic latitudes in radians.
/// * `psi_x`, `psi_y` - the corresponding isometric latitudes.
/// * `dpsi_dphi` - the divided difference of `psi` with respect to `phi`.
#[must_use]
pub fn calculate_mean_sin_xi(
    ellipsoid: &Ellipsoid,
    phi_x: f64,
    phi_y: f64,
    psi_x: f64,
    psi_y: f64,
    dpsi_dphi: f64,
) -> f64 {
    let e_2 = ellipsoid.e_2();

    let mid = (phi_x + phi_y) / 2.0;
    let half = (phi_x - phi_y) / 2.0;
    let mean_g = GAUSS_LEGENDRE_12
        .iter()
        .map(|(x, w)| {
            w * (sin_xi_minus_sin_chi(mid + half * x, e_2)
                + sin_xi_minus_sin_chi(mid - half * x, e_2))
        })
        .sum::<f64>()
        / 2.0;

    // the mean of sin chi = tanh psi
    let mean_sin_chi = dlncosh(psi_x, psi_y);
    mean_sin_chi + mean_g / dpsi_dphi
}

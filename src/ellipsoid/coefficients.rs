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

//! The coefficients module contains the series expansions in the third
//! flattening, `n`, used to convert between geodetic and rectifying latitudes.
//!
//! The series are truncated at order 6, giving a relative error of about
//! 1e-15 for terrestrial ellipsoids.
//! See: CFF Karney, [On auxiliary latitudes](https://arxiv.org/abs/2212.05818).

use angle_sc::{Angle, Radians};

/// The order of the series expansions.
pub const SERIES_ORDER: usize = 6;

/// Evaluate the coefficients of the series from geodetic latitude to
/// rectifying latitude: `mu = phi + sum C[k] sin(2k phi)`.
///
/// Note: the first coefficient is zero, so that `C[k]` is at index `k`.
/// * `n` - the third flattening of the ellipsoid.
#[must_use]
pub fn evaluate_coeffs_mu_phi(n: f64) -> [f64; SERIES_ORDER + 1] {
    let n2 = n * n;
    [
        0.0,
        n * evaluate_polynomial(&[-3.0 / 2.0, 9.0 / 16.0, -3.0 / 32.0], n2),
        n2 * evaluate_polynomial(&[15.0 / 16.0, -15.0 / 32.0, 135.0 / 2048.0], n2),
        n * n2 * evaluate_polynomial(&[-35.0 / 48.0, 105.0 / 256.0], n2),
        n2 * n2 * evaluate_polynomial(&[315.0 / 512.0, -189.0 / 512.0], n2),
        n * n2 * n2 * (-693.0 / 1280.0),
        n2 * n2 * n2 * (1001.0 / 2048.0),
    ]
}

/// Evaluate the coefficients of the series from rectifying latitude to
/// geodetic latitude: `phi = mu + sum D[k] sin(2k mu)`.
/// * `n` - the third flattening of the ellipsoid.
#[must_use]
pub fn evaluate_coeffs_phi_mu(n: f64) -> [f64; SERIES_ORDER + 1] {
    let n2 = n * n;
    [
        0.0,
        n * evaluate_polynomial(&[3.0 / 2.0, -27.0 / 32.0, 269.0 / 512.0], n2),
        n2 * evaluate_polynomial(&[21.0 / 16.0, -55.0 / 32.0, 6759.0 / 4096.0], n2),
        n * n2 * evaluate_polynomial(&[151.0 / 96.0, -417.0 / 128.0], n2),
        n2 * n2 * evaluate_polynomial(&[1097.0 / 512.0, -15543.0 / 2560.0], n2),
        n * n2 * n2 * (8011.0 / 2560.0),
        n2 * n2 * n2 * (293_393.0 / 61440.0),
    ]
}

/// Evaluate a first degree polynomial in x using
/// [Estrin's scheme](https://en.wikipedia.org/wiki/Estrin%27s_scheme).
/// * `coeffs` - the polynomial coefficients.
/// * `x` - the variable.
#[must_use]
fn evaluate_2_coeffs(coeffs: &[f64], x: f64) -> f64 {
    libm::fma(x, coeffs[1], coeffs[0])
}

/// Evaluate the polynomial in x using
/// [Horner's method](https://en.wikipedia.org/wiki/Horner%27s_method).
/// * `coeffs` - the polynomial coefficients, lowest order first.
/// * `x` - the variable.
#[must_use]
pub fn evaluate_polynomial(coeffs: &[f64], x: f64) -> f64 {
    match coeffs.len() {
        2 => evaluate_2_coeffs(coeffs, x),
        _ => coeffs.split_last().map_or(0.0, |(last, elements)| {
            elements
                .iter()
                .rev()
                .fold(*last, |result, element| libm::fma(result, x, *element))
        }),
    }
}

/// Evaluate the sine series `sum coeffs[k] sin(2k angle)` using
/// [Clenshaw summation](https://en.wikipedia.org/wiki/Clenshaw_algorithm).
///
/// Note: `coeffs[0]` is not used.
/// * `coeffs` - the series coefficients.
/// * `angle` - the angle.
#[must_use]
pub fn sin_cos_series(coeffs: &[f64], angle: Angle) -> Radians {
    let angle2x = angle.double();

    // the Clenshaw ak(theta) parameter, beta(k) = -1
    let ar = 2.0 * angle2x.cos().0;

    let (k0, _) = coeffs
        .get(1..)
        .unwrap_or_default()
        .iter()
        .rev()
        .fold((0.0, 0.0), |(k0, k1), coeff| {
            (libm::fma(ar, k0, coeff - k1), k0)
        });
    Radians(angle2x.sin().0 * k0)
}

/// Evaluate the divided difference of the sine series:
/// `(S(x) - S(y)) / (x - y)` where `S(x) = sum coeffs[k] sin(2k x)`.
///
/// The result is the derivative of the series when `x == y`.
/// * `coeffs` - the series coefficients.
/// * `x`, `y` - the angles in radians.
#[must_use]
pub fn sin_series_difference(coeffs: &[f64], x: Radians, y: Radians) -> f64 {
    let delta = x.0 - y.0;
    let sum = x.0 + y.0;
    let mut k = 0.0;
    let mut result = 0.0;
    for coeff in coeffs.iter().skip(1) {
        k += 1.0;
        let term = if delta == 0.0 {
            2.0 * k * libm::cos(2.0 * k * x.0)
        } else {
            2.0 * libm::cos(k * sum) * libm::sin(k * delta) / delta
        };
        result = libm::fma(*coeff, term, result);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::{calculate_3rd_flattening, wgs84};
    use angle_sc::{is_within_tolerance, Degrees};

    #[test]
    fn test_evaluate_coeffs_mu_phi() {
        let n = calculate_3rd_flattening(wgs84::F);
        let c = evaluate_coeffs_mu_phi(n);

        assert_eq!(0.0, c[0]);
        assert!(is_within_tolerance(-1.5 * n, c[1], 1e-8));
        assert!(is_within_tolerance(15.0 / 16.0 * n * n, c[2], 1e-11));
        assert!(c[3] < 0.0);
        assert!(0.0 < c[4]);
        assert!(c[5] < 0.0);
        assert!(0.0 < c[6]);

        // a sphere has no corrections
        let sphere = evaluate_coeffs_mu_phi(0.0);
        assert!(sphere.iter().all(|c| *c == 0.0));
    }

    #[test]
    fn test_evaluate_coeffs_phi_mu() {
        let n = calculate_3rd_flattening(wgs84::F);
        let d = evaluate_coeffs_phi_mu(n);

        assert_eq!(0.0, d[0]);
        assert!(is_within_tolerance(1.5 * n, d[1], 1e-8));
        assert!(d.iter().skip(1).all(|d| 0.0 < *d));
    }

    #[test]
    fn test_series_are_inverses() {
        let n = calculate_3rd_flattening(wgs84::F);
        let c = evaluate_coeffs_mu_phi(n);
        let d = evaluate_coeffs_phi_mu(n);

        for i in -90..91 {
            let phi = Radians(f64::from(i).to_radians());
            let mu = Radians(phi.0 + sin_cos_series(&c, Angle::from(phi)).0);
            let result = mu.0 + sin_cos_series(&d, Angle::from(mu)).0;
            assert!(is_within_tolerance(phi.0, result, 8.0 * f64::EPSILON));
        }
    }

    #[test]
    fn test_sin_cos_series() {
        let coeffs = [0.0, 1.0, 0.5, 0.25];
        let x = 0.3;
        let expected =
            libm::sin(2.0 * x) + 0.5 * libm::sin(4.0 * x) + 0.25 * libm::sin(6.0 * x);
        let result = sin_cos_series(&coeffs, Angle::from(Radians(x)));
        assert!(is_within_tolerance(expected, result.0, 2.0 * f64::EPSILON));

        // sin(2x) is zero at the equator and the poles
        assert_eq!(0.0, sin_cos_series(&coeffs, Angle::default()).0);
        assert_eq!(
            0.0,
            sin_cos_series(&coeffs, Angle::from(Degrees(90.0))).0
        );

        // proportional to the angle near the equator
        let x = 1.0e-17;
        let result = sin_cos_series(&coeffs, Angle::from(Radians(x)));
        assert!(is_within_tolerance(5.5 * x, result.0, 4.0 * f64::EPSILON * x));

        let empty: &[f64] = &[];
        assert_eq!(0.0, sin_cos_series(empty, Angle::from(Radians(0.3))).0);
    }

    #[test]
    fn test_sin_series_difference() {
        let coeffs = [0.0, 1.0, 0.5, 0.25];
        let series = |x: f64| {
            libm::sin(2.0 * x) + 0.5 * libm::sin(4.0 * x) + 0.25 * libm::sin(6.0 * x)
        };

        let (x, y) = (0.7, 0.2);
        let expected = (series(x) - series(y)) / (x - y);
        let result = sin_series_difference(&coeffs, Radians(x), Radians(y));
        assert!(is_within_tolerance(expected, result, 8.0 * f64::EPSILON));

        // the derivative when x == y
        let expected = 2.0 * libm::cos(2.0 * x)
            + 2.0 * libm::cos(4.0 * x)
            + 1.5 * libm::cos(6.0 * x);
        let result = sin_series_difference(&coeffs, Radians(x), Radians(x));
        assert!(is_within_tolerance(expected, result, 8.0 * f64::EPSILON));
    }

    #[test]
    fn test_evaluate_polynomial() {
        assert_eq!(1.0, evaluate_polynomial(&[1.0, 2.0, 3.0], 0.0));
        assert_eq!(6.0, evaluate_polynomial(&[1.0, 2.0, 3.0], 1.0));
        assert_eq!(17.0, evaluate_polynomial(&[1.0, 2.0, 3.0], 2.0));
        assert_eq!(5.0, evaluate_polynomial(&[1.0, 2.0], 2.0));
        assert_eq!(3.0, evaluate_polynomial(&[3.0], 2.0));

        let empty: &[f64] = &[];
        assert_eq!(0.0, evaluate_polynomial(empty, 2.0));
    }
}

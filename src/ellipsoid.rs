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

//! The ellipsoid module contains types and functions for defining an ellipsoid
//! given its Semimajor axis (the equivalent of its radius) and flattening ratio.
//!
//! It also contains the functions to convert between geodetic latitude and
//! the auxiliary latitudes used by rhumb lines: parametric, rectifying and
//! isometric latitude.

#![allow(clippy::suboptimal_flops)]

pub mod coefficients;
pub mod elliptic;
pub mod wgs84;

use crate::{Error, Metres};
use angle_sc::{Angle, Degrees, Radians};

/// The value returned by `tan_saturated` at the poles: `1 / epsilon^2`.
pub const MAX_TAN: f64 = 1.0 / (f64::EPSILON * f64::EPSILON);

/// The maximum number of Newton-Raphson iterations in `tauf`.
pub const MAX_TAUF_ITERATIONS: u32 = 10;

/// Calculate the Semiminor axis of an ellipsoid.
/// * `a` - the Semimajor axis of an ellipsoid.
/// * `f` - the flattening ratio.
/// # Examples
/// ```
/// use icao_rhumb::Metres;
/// use icao_rhumb::ellipsoid::{calculate_minor_axis, wgs84};
///
/// // The WGS 84 Semiminor axis measured in metres.
/// let b : Metres = Metres(6_356_752.314_245_179);
/// assert_eq!(b, calculate_minor_axis(wgs84::A, wgs84::F));
/// ```
#[must_use]
pub fn calculate_minor_axis(a: Metres, f: f64) -> Metres {
    Metres(a.0 * (1.0 - f))
}

/// Calculate the square of the Eccentricity of an ellipsoid.
/// * `f` - the flattening ratio.
/// # Examples
/// ```
/// use icao_rhumb::ellipsoid::{calculate_sq_eccentricity, wgs84};
///
/// // The WGS 84 sq_eccentricity.
/// assert_eq!(0.0066943799901413165, calculate_sq_eccentricity(wgs84::F));
/// ```
#[must_use]
pub fn calculate_sq_eccentricity(f: f64) -> f64 {
    f * (2.0 - f)
}

/// Calculate the square of the second Eccentricity of an ellipsoid.
/// * `f` - the flattening ratio.
/// # Examples
/// ```
/// use icao_rhumb::ellipsoid::{calculate_sq_2nd_eccentricity, wgs84};
///
/// // The WGS 84 sq 2nd eccentricity.
/// assert_eq!(0.006739496742276434, calculate_sq_2nd_eccentricity(wgs84::F));
/// ```
#[must_use]
pub fn calculate_sq_2nd_eccentricity(f: f64) -> f64 {
    let one_minus_f = 1.0 - f;
    calculate_sq_eccentricity(f) / (one_minus_f * one_minus_f)
}

/// Calculate the third flattening of an ellipsoid.
/// * `f` - the flattening ratio.
/// # Examples
/// ```
/// use icao_rhumb::ellipsoid::{calculate_3rd_flattening, wgs84};
///
/// // The WGS 84 3rd flattening.
/// assert_eq!(0.0016792203863837047, calculate_3rd_flattening(wgs84::F));
/// ```
#[must_use]
pub fn calculate_3rd_flattening(f: f64) -> f64 {
    f / (2.0 - f)
}

/// Function to convert a `geodetic` Latitude to a `parametric` Latitude on the
/// auxiliary sphere.
/// * `lat` - the `geodetic` Latitude
/// * `one_minus_f` - one minus the flattening ratio.
#[must_use]
pub fn calculate_parametric_latitude(lat: Angle, one_minus_f: f64) -> Angle {
    Angle::from_y_x(one_minus_f * lat.sin().0, lat.cos().0)
}

/// Function to convert a `parametric` Latitude on the auxiliary sphere to a
/// `geodetic` Latitude.
/// * `lat` - the `parametric` Latitude
/// * `one_minus_f` - one minus the flattening ratio.
#[must_use]
pub fn calculate_geodetic_latitude(lat: Angle, one_minus_f: f64) -> Angle {
    Angle::from_y_x(lat.sin().0 / one_minus_f, lat.cos().0)
}

/// Calculate the quarter meridian of an ellipsoid: the distance along a
/// meridian from the equator to a pole.
/// * `b` - the Semiminor axis of the ellipsoid.
/// * `ep_2` - the square of the second Eccentricity of the ellipsoid.
///
/// # Errors
///
/// `Error::ConvergenceFailure` if an elliptic integral does not converge.
pub fn calculate_quarter_meridian(b: Metres, ep_2: f64) -> Result<Metres, Error> {
    Ok(Metres(b.0 * elliptic::complete_e(-ep_2)?))
}

/// Calculate the square of the authalic radius of an ellipsoid, i.e. the
/// radius of the sphere with the same surface area.
/// * `a` - the Semimajor axis of the ellipsoid.
/// * `b` - the Semiminor axis of the ellipsoid.
/// * `e_2` - the square of the Eccentricity of the ellipsoid.
#[must_use]
pub fn calculate_authalic_radius_2(a: Metres, b: Metres, e_2: f64) -> f64 {
    let e = libm::sqrt(libm::fabs(e_2));
    let factor = if 0.0 < e_2 {
        libm::atanh(e) / e
    } else if e_2 < 0.0 {
        libm::atan(e) / e
    } else {
        1.0
    };
    (a.0 * a.0 + b.0 * b.0 * factor) / 2.0
}

/// Calculate the radius of the parallel (circle of latitude) at `lat`.
/// * `a` - the Semimajor axis of the ellipsoid.
/// * `e_2` - the square of the Eccentricity of the ellipsoid.
/// * `lat` - the geodetic latitude.
#[must_use]
pub fn calculate_parallel_radius(a: Metres, e_2: f64, lat: Angle) -> Metres {
    let sin_lat = lat.sin().0;
    Metres(a.0 * lat.cos().0 / libm::sqrt(1.0 - e_2 * sin_lat * sin_lat))
}

/// The tangent of a latitude, saturated to `MAX_TAN` at the poles, so
/// that it is always finite.
/// * `lat` - the latitude.
#[must_use]
pub fn tan_saturated(lat: Angle) -> f64 {
    let cos_lat = lat.cos().0;
    if cos_lat == 0.0 {
        libm::copysign(MAX_TAN, lat.sin().0)
    } else {
        lat.sin().0 / cos_lat
    }
}

/// The function `e atanh(e x)`, generalised for a prolate ellipsoid where
/// the square of the Eccentricity is negative and for a sphere.
/// * `x` - the variable, `|x| <= 1`.
/// * `e_2` - the square of the Eccentricity of the ellipsoid.
#[must_use]
pub fn eatanhe(x: f64, e_2: f64) -> f64 {
    let e = libm::sqrt(libm::fabs(e_2));
    if 0.0 < e_2 {
        e * libm::atanh(e * x)
    } else if e_2 < 0.0 {
        -e * libm::atan(e * x)
    } else {
        0.0
    }
}

/// Calculate `tau'`, the tangent of the conformal latitude, from `tau`, the
/// tangent of the geodetic latitude.
///
/// CFF Karney, [Transverse Mercator with an accuracy of a few nanometers](https://arxiv.org/abs/1002.1417)
/// Eqs 7 & 9.
/// * `tau` - the tangent of the geodetic latitude.
/// * `e_2` - the square of the Eccentricity of the ellipsoid.
#[must_use]
pub fn taupf(tau: f64, e_2: f64) -> f64 {
    let tau1 = libm::hypot(1.0, tau);
    let sig = libm::sinh(eatanhe(tau / tau1, e_2));
    libm::hypot(1.0, sig) * tau - sig * tau1
}

/// Calculate `tau`, the tangent of the geodetic latitude, from `tau'`, the
/// tangent of the conformal latitude, by Newton-Raphson iteration.
///
/// CFF Karney, [Transverse Mercator with an accuracy of a few nanometers](https://arxiv.org/abs/1002.1417)
/// Eqs 19-21.
/// * `taup` - the tangent of the conformal latitude.
/// * `e_2` - the square of the Eccentricity of the ellipsoid.
///
/// # Errors
///
/// `Error::ConvergenceFailure` if the iteration does not converge within
/// `MAX_TAUF_ITERATIONS`.
pub fn tauf(taup: f64, e_2: f64) -> Result<f64, Error> {
    let tolerance = libm::sqrt(f64::EPSILON) / 10.0;
    let tau_max = 2.0 / libm::sqrt(f64::EPSILON);

    let e2m = 1.0 - e_2;
    let mut tau = if 70.0 < libm::fabs(taup) {
        taup * libm::exp(eatanhe(1.0, e_2))
    } else {
        taup / e2m
    };
    // tau is accurate enough near the poles
    if !(libm::fabs(tau) < tau_max) {
        return Ok(tau);
    }

    let stol = tolerance * libm::fabs(taup).max(1.0);
    for _ in 0..MAX_TAUF_ITERATIONS {
        let taupa = taupf(tau, e_2);
        let dtau = (taup - taupa) * (1.0 + e2m * tau * tau)
            / (e2m * libm::hypot(1.0, tau) * libm::hypot(1.0, taupa));
        tau += dtau;
        if !(libm::fabs(dtau) >= stol) {
            return Ok(tau);
        }
    }

    log::warn!("tauf({taup}, {e_2}) did not converge");
    Err(Error::ConvergenceFailure {
        algorithm: "tauf",
        iterations: MAX_TAUF_ITERATIONS,
    })
}

/// Calculate the isometric latitude, `psi`, of a geodetic latitude.
///
/// It is finite at the poles since `tan_saturated` is used.
/// * `lat` - the geodetic latitude.
/// * `e_2` - the square of the Eccentricity of the ellipsoid.
#[must_use]
pub fn calculate_isometric_latitude(lat: Angle, e_2: f64) -> Radians {
    Radians(libm::asinh(taupf(tan_saturated(lat), e_2)))
}

/// Calculate the geodetic latitude of an isometric latitude.
/// * `psi` - the isometric latitude.
/// * `e_2` - the square of the Eccentricity of the ellipsoid.
///
/// # Errors
///
/// `Error::ConvergenceFailure` if `tauf` does not converge.
pub fn calculate_latitude_from_isometric(psi: Radians, e_2: f64) -> Result<Angle, Error> {
    let tau = tauf(libm::sinh(psi.0), e_2)?;
    if tau.is_finite() {
        Ok(Angle::from_y_x(tau, 1.0))
    } else {
        Ok(Angle::from(Degrees(libm::copysign(90.0, tau))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use angle_sc::is_within_tolerance;

    #[test]
    fn test_calculate_parametric_and_geodetic_latitude() {
        let one_minus_f = 1.0 - wgs84::F;

        for i in -90..91 {
            let latitude = f64::from(i);
            let lat = Angle::from(Degrees(latitude));
            let parametric_lat = calculate_parametric_latitude(lat, one_minus_f);
            let result = calculate_geodetic_latitude(parametric_lat, one_minus_f);

            assert!(is_within_tolerance(
                Radians::from(lat).0,
                Radians::from(result).0,
                f64::EPSILON
            ));
        }
    }

    #[test]
    fn test_calculate_quarter_meridian() {
        let b = calculate_minor_axis(wgs84::A, wgs84::F);
        let ep_2 = calculate_sq_2nd_eccentricity(wgs84::F);
        let result = calculate_quarter_meridian(b, ep_2).unwrap();
        assert!(is_within_tolerance(
            wgs84::QUARTER_MERIDIAN.0,
            result.0,
            1e-8
        ));

        // a sphere
        let result = calculate_quarter_meridian(Metres(1.0), 0.0).unwrap();
        assert!(is_within_tolerance(
            core::f64::consts::FRAC_PI_2,
            result.0,
            2.0 * f64::EPSILON
        ));
    }

    #[test]
    fn test_calculate_authalic_radius_2() {
        let b = calculate_minor_axis(wgs84::A, wgs84::F);
        let e_2 = calculate_sq_eccentricity(wgs84::F);
        let result = calculate_authalic_radius_2(wgs84::A, b, e_2);
        assert!(is_within_tolerance(40_589_732_499_314.76, result, 0.05));

        assert_eq!(1.0, calculate_authalic_radius_2(Metres(1.0), Metres(1.0), 0.0));

        // a prolate ellipsoid lies between its axes
        let f = -0.1;
        let b = calculate_minor_axis(Metres(1.0), f);
        let result = calculate_authalic_radius_2(Metres(1.0), b, calculate_sq_eccentricity(f));
        assert!(1.0 < result && result < b.0 * b.0);
    }

    #[test]
    fn test_calculate_parallel_radius() {
        let e_2 = calculate_sq_eccentricity(wgs84::F);
        let result = calculate_parallel_radius(wgs84::A, e_2, Angle::default());
        assert_eq!(wgs84::A, result);

        let result = calculate_parallel_radius(wgs84::A, e_2, Angle::from(Degrees(90.0)));
        assert!(libm::fabs(result.0) < 1e-9);

        let result = calculate_parallel_radius(Metres(1.0), 0.0, Angle::from(Degrees(60.0)));
        assert!(is_within_tolerance(0.5, result.0, f64::EPSILON));
    }

    #[test]
    fn test_tan_saturated() {
        assert_eq!(0.0, tan_saturated(Angle::default()));
        assert!(is_within_tolerance(
            1.0,
            tan_saturated(Angle::from(Degrees(45.0))),
            f64::EPSILON
        ));
        assert_eq!(MAX_TAN, tan_saturated(Angle::from(Degrees(90.0))));
        assert_eq!(-MAX_TAN, tan_saturated(Angle::from(Degrees(-90.0))));
    }

    #[test]
    fn test_eatanhe() {
        let e_2 = calculate_sq_eccentricity(wgs84::F);
        let e = libm::sqrt(e_2);
        assert_eq!(e * libm::atanh(e * 0.5), eatanhe(0.5, e_2));
        assert_eq!(0.0, eatanhe(0.5, 0.0));
        assert_eq!(-0.5 * libm::atan(0.5 * 0.5), eatanhe(0.5, -0.25));
    }

    #[test]
    fn test_taupf_and_tauf() {
        let e_2 = calculate_sq_eccentricity(wgs84::F);

        // sphere
        assert_eq!(2.0, taupf(2.0, 0.0));
        assert_eq!(2.0, tauf(2.0, 0.0).unwrap());

        for i in -89..90 {
            let lat = Angle::from(Degrees(f64::from(i)));
            let tau = tan_saturated(lat);
            let taup = taupf(tau, e_2);
            let result = tauf(taup, e_2).unwrap();
            assert!(is_within_tolerance(
                tau,
                result,
                4.0 * f64::EPSILON * libm::fabs(tau).max(1.0)
            ));
        }

        // the poles
        let taup = taupf(MAX_TAN, e_2);
        assert!(taup.is_finite());
        let result = tauf(taup, e_2).unwrap();
        assert!(is_within_tolerance(1.0, result / MAX_TAN, 1e-12));
    }

    #[test]
    fn test_tauf_convergence_failure() {
        // Newton-Raphson oscillates on an extremely prolate ellipsoid
        let e_2 = calculate_sq_eccentricity(-10.0);
        let tau = tan_saturated(Angle::from(Degrees(10.0)));
        let result = tauf(taupf(tau, e_2), e_2);
        assert_eq!(
            Err(Error::ConvergenceFailure {
                algorithm: "tauf",
                iterations: MAX_TAUF_ITERATIONS
            }),
            result
        );
    }

    #[test]
    fn test_isometric_latitude() {
        let e_2 = calculate_sq_eccentricity(wgs84::F);

        assert_eq!(0.0, calculate_isometric_latitude(Angle::default(), e_2).0);
        assert!(is_within_tolerance(
            0.876_634_653_434_598_9,
            calculate_isometric_latitude(Angle::from(Degrees(45.0)), e_2).0,
            2.0 * f64::EPSILON
        ));

        // odd
        let psi = calculate_isometric_latitude(Angle::from(Degrees(-33.0)), e_2);
        assert!(is_within_tolerance(-0.607_079_109_918_331_5, psi.0, 2.0 * f64::EPSILON));

        // no cancellation near the equator
        let psi = calculate_isometric_latitude(Angle::from(Degrees(1e-9)), e_2);
        assert!(is_within_tolerance(
            1.733_645_354_773_570_4e-11,
            psi.0,
            1e-25
        ));

        // saturated at the poles
        let psi = calculate_isometric_latitude(Angle::from(Degrees(90.0)), e_2);
        assert!(psi.0.is_finite());
        assert!(72.0 < psi.0 && psi.0 < 73.0);
        let psi_s = calculate_isometric_latitude(Angle::from(Degrees(-90.0)), e_2);
        assert_eq!(-psi.0, psi_s.0);

        // close to a pole
        let psi_near = calculate_isometric_latitude(Angle::from(Degrees(90.0 - 1e-9)), e_2);
        assert!(psi_near.0.is_finite());
        assert!(psi_near.0 < psi.0);
    }

    #[test]
    fn test_latitude_from_isometric() {
        let e_2 = calculate_sq_eccentricity(wgs84::F);

        for i in -90..91 {
            let latitude = f64::from(i);
            let lat = Angle::from(Degrees(latitude));
            let psi = calculate_isometric_latitude(lat, e_2);
            let result = calculate_latitude_from_isometric(psi, e_2).unwrap();
            assert!(is_within_tolerance(
                latitude,
                Degrees::from(result).0,
                1e-13
            ));
        }

        let result = calculate_latitude_from_isometric(Radians(f64::INFINITY), e_2).unwrap();
        assert_eq!(90.0, Degrees::from(result).0);
        let result = calculate_latitude_from_isometric(Radians(-1000.0), e_2).unwrap();
        assert_eq!(-90.0, Degrees::from(result).0);
    }
}

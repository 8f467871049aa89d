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

//! The rhumb module contains functions for solving the direct and inverse
//! rhumb line problems.
//!
//! A rhumb line is a straight line on a Mercator projection, i.e. in the
//! (`lon`, `psi`) plane, where `psi` is the isometric latitude.
//! Its length is proportional to the change in rectifying latitude, `mu`,
//! divided by the cosine of its azimuth.
//!
//! The ratios between the changes in `lon`, `psi` and `mu` are calculated
//! from divided differences, so that the solutions remain accurate on and
//! near parallels of latitude, where the changes in `psi` and `mu` vanish.
//! See: CFF Karney, [The area of rhumb polygons](https://arxiv.org/abs/2303.03219).

#![allow(clippy::suboptimal_flops)]

pub mod area;
pub mod differences;

use crate::ellipsoid::{elliptic, tan_saturated};
use crate::error::{check_distance, check_latitude, check_longitude};
use crate::{Error, Metres, Rhumb, RhumbLine};
use angle_sc::{Angle, Degrees, Radians};
use core::f64::consts::{FRAC_PI_2, PI};
use differences::{dasinh, datan, deatanhe, dsin, dtan};
use unit_sphere::LatLong;

/// Normalise a longitude in degrees to the range `(-180, 180]`.
/// * `lon` - the longitude in degrees.
#[must_use]
pub fn normalise_longitude(lon: f64) -> f64 {
    let result = libm::remainder(lon, 360.0);
    if result <= -180.0 {
        180.0
    } else {
        result
    }
}

/// Calculate the divided difference of the isometric latitude with respect
/// to the geodetic latitude: `(psi(x) - psi(y)) / (x - y)`.
/// * `e_2` - the square of the Eccentricity of the ellipsoid.
/// * `lat_x`, `lat_y` - the geodetic latitudes.
#[must_use]
pub fn calculate_dpsi_dphi(e_2: f64, lat_x: Angle, lat_y: Angle) -> f64 {
    let phi_x = Radians::from(lat_x).0;
    let phi_y = Radians::from(lat_y).0;
    let tan_x = tan_saturated(lat_x);
    let tan_y = tan_saturated(lat_y);

    dasinh(tan_x, tan_y) * dtan(phi_x, phi_y, tan_x, tan_y)
        - deatanhe(lat_x.sin().0, lat_y.sin().0, e_2) * dsin(phi_x, phi_y)
}

/// Calculate the divided difference of the rectifying latitude with respect
/// to the geodetic latitude: `(mu(x) - mu(y)) / (x - y)`.
///
/// Uses the elliptic integral when `rhumb` is exact, the series otherwise.
/// * `rhumb` - the `Rhumb` solver.
/// * `lat_x`, `lat_y` - the geodetic latitudes.
///
/// # Errors
///
/// `Error::ConvergenceFailure` if an elliptic integral does not converge.
pub fn calculate_dmu_dphi(rhumb: &Rhumb, lat_x: Angle, lat_y: Angle) -> Result<f64, Error> {
    let ellipsoid = rhumb.ellipsoid();
    let phi_x = Radians::from(lat_x);
    let phi_y = Radians::from(lat_y);

    if rhumb.exact() {
        let one_minus_f = ellipsoid.one_minus_f();
        let tan_x = tan_saturated(lat_x);
        let tan_y = tan_saturated(lat_y);
        // tangents of the parametric latitudes
        let tan_beta_x = one_minus_f * tan_x;
        let tan_beta_y = one_minus_f * tan_y;

        let de = elliptic::divided_e(
            libm::atan(tan_beta_x),
            libm::atan(tan_beta_y),
            -ellipsoid.ep_2(),
        )?;
        Ok(FRAC_PI_2 * one_minus_f * de
            * dtan(phi_x.0, phi_y.0, tan_x, tan_y)
            * datan(tan_beta_x, tan_beta_y)
            / ellipsoid.complete_e())
    } else {
        Ok(1.0 + crate::ellipsoid::coefficients::sin_series_difference(
            ellipsoid.mu_phi(),
            phi_x,
            phi_y,
        ))
    }
}

/// Calculate the azimuth and length of the rhumb line between a pair of
/// positions.
/// * `rhumb` - the `Rhumb` solver.
/// * `a`, `b` - the start and finish positions.
///
/// returns the azimuth, the length and the longitude difference in radians,
/// normalised to `(-pi, pi]`.
///
/// # Errors
///
/// `DomainError` if a position is invalid.
/// `Error::ConvergenceFailure` if an elliptic integral does not converge.
pub fn calculate_azimuth_and_length(
    rhumb: &Rhumb,
    a: &LatLong,
    b: &LatLong,
) -> Result<(Angle, Metres, Radians), Error> {
    check_latitude(a.lat().0)?;
    check_latitude(b.lat().0)?;
    let lon1 = check_longitude(a.lon().0)?;
    let lon2 = check_longitude(b.lon().0)?;

    let lat1 = Angle::from(a.lat());
    let lat2 = Angle::from(b.lat());

    let mut lon12 = Radians(
        normalise_longitude(normalise_longitude(lon2) - normalise_longitude(lon1)).to_radians(),
    );
    if lat1.cos().0 < f64::EPSILON || lat2.cos().0 < f64::EPSILON {
        log::trace!("calculate_azimuth_and_length: a pole, along a meridian");
        lon12 = Radians(0.0);
    }

    let ellipsoid = rhumb.ellipsoid();
    let psi12 = ellipsoid.isometric_latitude(lat2)?.0 - ellipsoid.isometric_latitude(lat1)?.0;
    if lon12.0 == 0.0 && psi12 == 0.0 {
        log::trace!("calculate_azimuth_and_length: coincident positions");
        return Ok((Angle::default(), Metres(0.0), lon12));
    }

    let azimuth = Angle::from_y_x(lon12.0, psi12);
    let dmu_dpsi =
        calculate_dmu_dphi(rhumb, lat2, lat1)? / calculate_dpsi_dphi(ellipsoid.e_2(), lat2, lat1);
    let length = libm::hypot(lon12.0, psi12) * dmu_dpsi * ellipsoid.rectifying_radius().0;

    Ok((azimuth, Metres(length), lon12))
}

/// Calculate the latitude and the longitude difference of the position at
/// `distance` along a rhumb line.
/// * `line` - the `RhumbLine`.
/// * `distance` - the signed distance from the start of the line.
///
/// returns the latitude and the (unnormalised) longitude difference in radians.
///
/// # Errors
///
/// `DomainError::Distance` if `distance` is not finite.
/// `Error::ConvergenceFailure` if an iteration does not converge.
pub fn calculate_position(line: &RhumbLine, distance: Metres) -> Result<(Degrees, Radians), Error> {
    let distance = check_distance(distance.0)?;

    let rhumb = line.rhumb();
    let ellipsoid = rhumb.ellipsoid();
    let sin_azi = line.azimuth().sin().0;
    let cos_azi = line.azimuth().cos().0;
    let lat1 = Angle::from(line.lat());

    if cos_azi == 0.0 {
        log::trace!("calculate_position: along a parallel");
        let lon12 = if lat1.cos().0 < f64::EPSILON {
            0.0
        } else {
            sin_azi * distance / line.parallel_radius().0
        };
        return Ok((line.lat(), Radians(lon12)));
    }

    let mu12 = distance * cos_azi / ellipsoid.rectifying_radius().0;
    if mu12 == 0.0 {
        return Ok((line.lat(), Radians(0.0)));
    }

    let mu2 = line.mu1().0 + mu12;
    if libm::fabs(mu2) <= FRAC_PI_2 {
        let lat2 = rhumb.inverse_rectifying_latitude(Radians(mu2))?;
        let psi12 = calculate_dpsi_dphi(ellipsoid.e_2(), lat2, lat1)
            / calculate_dmu_dphi(rhumb, lat2, lat1)?
            * mu12;
        Ok((Degrees::from(lat2), Radians(sin_azi * psi12 / cos_azi)))
    } else if sin_azi == 0.0 {
        log::trace!("calculate_position: along a meridian, over a pole");
        let mu2 = libm::remainder(mu2, 2.0 * PI);
        let (mu2, lon12) = if FRAC_PI_2 < libm::fabs(mu2) {
            (libm::copysign(PI, mu2) - mu2, PI)
        } else {
            (mu2, 0.0)
        };
        let lat2 = rhumb.inverse_rectifying_latitude(Radians(mu2))?;
        Ok((Degrees::from(lat2), Radians(lon12)))
    } else {
        log::trace!("calculate_position: spiralled into a pole");
        let pole = Degrees(libm::copysign(90.0, mu2));
        let psi2 = ellipsoid.isometric_latitude(Angle::from(pole))?;
        let lon12 = sin_azi * (psi2.0 - line.psi1().0) / cos_azi;
        Ok((pole, Radians(lon12)))
    }
}

/// Calculate the area between a rhumb line and the equator, `S12`.
///
/// Note: the area is negative if the rhumb line runs westward or it lies
/// in the southern hemisphere.
/// * `rhumb` - the `Rhumb` solver.
/// * `lat1`, `lat2` - the latitudes at the ends of the rhumb line.
/// * `lon12` - the longitude difference along the rhumb line in radians.
///
/// returns the area in square metres.
#[must_use]
pub fn calculate_area(rhumb: &Rhumb, lat1: Angle, lat2: Angle, lon12: Radians) -> f64 {
    if lon12.0 == 0.0 {
        return 0.0;
    }

    let ellipsoid = rhumb.ellipsoid();
    let e_2 = ellipsoid.e_2();
    let psi1 = crate::ellipsoid::calculate_isometric_latitude(lat1, e_2).0;
    let psi2 = crate::ellipsoid::calculate_isometric_latitude(lat2, e_2).0;
    let mean_sin_xi = area::calculate_mean_sin_xi(
        ellipsoid,
        Radians::from(lat2).0,
        Radians::from(lat1).0,
        psi2,
        psi1,
        calculate_dpsi_dphi(e_2, lat2, lat1),
    );
    ellipsoid.authalic_radius_2() * lon12.0 * mean_sin_xi
}

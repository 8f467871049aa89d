// Copyright (c) 2024-2025 Ken Barker

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

//! icao-rhumb
//!
//! [![License](https://img.shields.io/badge/License-MIT-blue)](https://opensource.org/license/mit/)
//!
//! A library for performing rhumb line (loxodrome) calculations on an
//! ellipsoid of revolution, in particular the
//! [WGS-84](https://www.icao.int/NACC/Documents/Meetings/2014/ECARAIM/REF08-Doc9674.pdf)
//! ellipsoid.
//!
//! ## Rhumb line navigation
//!
//! A [rhumb line](https://en.wikipedia.org/wiki/Rhumb_line) is a path of
//! constant azimuth: it crosses every meridian at the same angle.
//! It is a straight line on a Mercator chart, so it has long been used for
//! marine and air navigation, although it is longer than the geodesic
//! between the same positions.
//!
//! This library solves the two rhumb line problems:
//!
//! - the *direct* problem: the position at a distance along a rhumb line from
//!   a start position with a given azimuth;
//! - the *inverse* problem: the azimuth and length of the rhumb line between
//!   a pair of positions.
//!
//! It also calculates `S12`: the area between a rhumb line and the equator.
//!
//! ## Design
//!
//! The library is based on Charles Karney's
//! [GeographicLib](https://geographiclib.sourceforge.io/) `Rhumb` classes,
//! see: CFF Karney, [The area of rhumb polygons](https://arxiv.org/abs/2303.03219).
//!
//! The `Ellipsoid` class represents an ellipsoid of revolution and converts
//! between geodetic, rectifying and isometric latitudes.
//! The `Rhumb` class solves rhumb line problems on an `Ellipsoid`, using
//! either series expansions in the third flattening or exact elliptic
//! integrals.
//! The `RhumbLine` class represents a rhumb line from a start position
//! with a given azimuth, so that many positions can be calculated along it.
//! The static `WGS84_RHUMB` represents the `Rhumb` on the WGS-84 `Ellipsoid`
//! which is used by the `RhumbLine` `TryFrom` traits.
//!
//! The library depends upon the following crates:
//!
//! - [angle-sc](https://crates.io/crates/angle-sc) - to define `Angle`,
//!   `Degrees` and `Radians` and perform trigonometric calculations;
//! - [unit-sphere](https://crates.io/crates/unit-sphere) - to define `LatLong`;
//! - [icao_units](https://crates.io/crates/icao-units) - to define `Metres` and
//!   `NauticalMiles` and perform conversions between them;
//! - [thiserror](https://crates.io/crates/thiserror) - to define the `Error` types;
//! - [log](https://crates.io/crates/log) - to log degenerate cases and
//!   convergence failures.
//!
//! The library is declared [no_std](https://docs.rust-embedded.org/book/intro/no-std.html)
//! so it can be used in embedded applications.

#![cfg_attr(not(test), no_std)]

extern crate angle_sc;
extern crate icao_units;
extern crate unit_sphere;

pub mod batch;
pub mod ellipsoid;
pub mod error;
pub mod rhumb;

pub use angle_sc::{Angle, Degrees, Radians, Validate};
pub use error::{DomainError, Error};
pub use icao_units::non_si::NauticalMiles;
pub use icao_units::si::Metres;
pub use unit_sphere::LatLong;

use core::f64::consts::FRAC_PI_2;
use error::{
    check_azimuth, check_latitude, check_latitude_angle, check_longitude,
    check_rectifying_latitude,
};

/// The maximum number of Newton-Raphson iterations in
/// `exact_inverse_rectifying_latitude`.
pub const MAX_RECTIFYING_ITERATIONS: u32 = 13;

/// The pole with the same sign as `x`.
fn pole(x: f64) -> Angle {
    Angle::from(Degrees(libm::copysign(90.0, x)))
}

/// The parameters of an `Ellipsoid`.
#[derive(Clone, Debug, PartialEq)]
pub struct Ellipsoid {
    /// The Semimajor axis of the ellipsoid.
    a: Metres,
    /// The flattening of the ellipsoid, a ratio.
    f: f64,

    /// The Semiminor axis of the ellipsoid.
    b: Metres,
    /// One minus the flattening ratio.
    one_minus_f: f64,
    /// The square of the Eccentricity of the ellipsoid.
    e_2: f64,
    /// The square of the second Eccentricity of the ellipsoid.
    ep_2: f64,
    /// The third flattening of the ellipsoid.
    n: f64,

    /// The distance from the equator to a pole along a meridian.
    quarter_meridian: Metres,
    /// The rectifying radius: `2 * quarter_meridian / pi`.
    rectifying_radius: Metres,
    /// The square of the authalic radius.
    authalic_radius_2: f64,
    /// The complete elliptic integral `E(-ep_2)`: `quarter_meridian / b`.
    complete_e: f64,

    /// The series `coefficients` from geodetic to rectifying latitude.
    mu_phi: [f64; ellipsoid::coefficients::SERIES_ORDER + 1],
    /// The series `coefficients` from rectifying to geodetic latitude.
    phi_mu: [f64; ellipsoid::coefficients::SERIES_ORDER + 1],
}

impl Ellipsoid {
    /// Constructor.
    /// * `a` - the Semimajor axis of the `Ellipsoid`.
    /// * `f` - the flattening of the `Ellipsoid`, a ratio.
    ///
    /// # Errors
    ///
    /// `DomainError::SemimajorAxis` if `a` is not positive and finite.
    /// `DomainError::Flattening` if `f` is not finite or not less than one.
    /// `Error::ConvergenceFailure` if the quarter meridian does not converge.
    pub fn new(a: Metres, f: f64) -> Result<Self, Error> {
        if !(a.0.is_finite() && 0.0 < a.0) {
            return Err(DomainError::SemimajorAxis(a.0).into());
        }
        if !(f.is_finite() && f < 1.0) {
            return Err(DomainError::Flattening(f).into());
        }

        let quarter_meridian = ellipsoid::calculate_quarter_meridian(
            ellipsoid::calculate_minor_axis(a, f),
            ellipsoid::calculate_sq_2nd_eccentricity(f),
        )?;
        log::debug!(
            "Ellipsoid::new a: {}, f: {}, quarter meridian: {}",
            a.0,
            f,
            quarter_meridian.0
        );
        Ok(Self::with_quarter_meridian(a, f, quarter_meridian))
    }

    /// Construct an `Ellipsoid` from valid parameters and its quarter meridian.
    fn with_quarter_meridian(a: Metres, f: f64, quarter_meridian: Metres) -> Self {
        let b = ellipsoid::calculate_minor_axis(a, f);
        let e_2 = ellipsoid::calculate_sq_eccentricity(f);
        let n = ellipsoid::calculate_3rd_flattening(f);
        Self {
            a,
            f,
            b,
            one_minus_f: 1.0 - f,
            e_2,
            ep_2: ellipsoid::calculate_sq_2nd_eccentricity(f),
            n,
            quarter_meridian,
            rectifying_radius: Metres(quarter_meridian.0 / FRAC_PI_2),
            authalic_radius_2: ellipsoid::calculate_authalic_radius_2(a, b, e_2),
            complete_e: quarter_meridian.0 / b.0,
            mu_phi: ellipsoid::coefficients::evaluate_coeffs_mu_phi(n),
            phi_mu: ellipsoid::coefficients::evaluate_coeffs_phi_mu(n),
        }
    }

    /// Construct an `Ellipsoid` with the WGS-84 parameters.
    #[must_use]
    pub fn wgs84() -> Self {
        Self::with_quarter_meridian(
            ellipsoid::wgs84::A,
            ellipsoid::wgs84::F,
            ellipsoid::wgs84::QUARTER_MERIDIAN,
        )
    }

    /// The Semimajor axis of the ellipsoid.
    #[must_use]
    pub const fn a(&self) -> Metres {
        self.a
    }

    /// The flattening of the ellipsoid, a ratio.
    #[must_use]
    pub const fn f(&self) -> f64 {
        self.f
    }

    /// The Semiminor axis of the ellipsoid.
    #[must_use]
    pub const fn b(&self) -> Metres {
        self.b
    }

    /// One minus the flattening ratio.
    #[must_use]
    pub const fn one_minus_f(&self) -> f64 {
        self.one_minus_f
    }

    /// The square of the Eccentricity of the ellipsoid.
    #[must_use]
    pub const fn e_2(&self) -> f64 {
        self.e_2
    }

    /// The square of the second Eccentricity of the ellipsoid.
    #[must_use]
    pub const fn ep_2(&self) -> f64 {
        self.ep_2
    }

    /// The third flattening of the ellipsoid.
    #[must_use]
    pub const fn n(&self) -> f64 {
        self.n
    }

    /// The quarter meridian: the distance from the equator to a pole.
    #[must_use]
    pub const fn quarter_meridian(&self) -> Metres {
        self.quarter_meridian
    }

    /// The rectifying radius: the radius of the sphere with the same
    /// meridian length.
    #[must_use]
    pub const fn rectifying_radius(&self) -> Metres {
        self.rectifying_radius
    }

    /// The square of the authalic radius: the radius of the sphere with the
    /// same surface area.
    #[must_use]
    pub const fn authalic_radius_2(&self) -> f64 {
        self.authalic_radius_2
    }

    /// The complete elliptic integral of the second kind, `E(-ep_2)`.
    #[must_use]
    pub const fn complete_e(&self) -> f64 {
        self.complete_e
    }

    /// The series `coefficients` from geodetic to rectifying latitude.
    #[must_use]
    pub const fn mu_phi(&self) -> &[f64; ellipsoid::coefficients::SERIES_ORDER + 1] {
        &self.mu_phi
    }

    /// The series `coefficients` from rectifying to geodetic latitude.
    #[must_use]
    pub const fn phi_mu(&self) -> &[f64; ellipsoid::coefficients::SERIES_ORDER + 1] {
        &self.phi_mu
    }

    /// Convert a geodetic Latitude to a parametric Latitude on the
    /// auxiliary sphere.
    /// * `lat` - the geodetic Latitude
    #[must_use]
    pub fn calculate_parametric_latitude(&self, lat: Angle) -> Angle {
        ellipsoid::calculate_parametric_latitude(lat, self.one_minus_f)
    }

    /// Convert a parametric Latitude on the auxiliary sphere to a
    /// geodetic Latitude.
    /// * `beta` - the parametric Latitude
    #[must_use]
    pub fn calculate_geodetic_latitude(&self, beta: Angle) -> Angle {
        ellipsoid::calculate_geodetic_latitude(beta, self.one_minus_f)
    }

    /// The radius of the parallel (circle of latitude) at `lat`.
    /// * `lat` - the geodetic Latitude
    #[must_use]
    pub fn parallel_radius(&self, lat: Angle) -> Metres {
        ellipsoid::calculate_parallel_radius(self.a, self.e_2, lat)
    }

    /// The distance along a meridian from the equator to `lat`, using the
    /// series expansion of the rectifying latitude.
    /// * `lat` - the geodetic Latitude
    ///
    /// # Errors
    ///
    /// `DomainError::Latitude` if `lat` is not a valid latitude.
    pub fn meridian_arc_length(&self, lat: Angle) -> Result<Metres, Error> {
        let mu = self.rectifying_latitude(lat)?;
        Ok(Metres(self.rectifying_radius.0 * mu.0))
    }

    /// The distance along a meridian from the equator to `lat`, using the
    /// incomplete elliptic integral of the second kind:
    /// `b * E(beta, -ep_2)`.
    /// * `lat` - the geodetic Latitude
    ///
    /// # Errors
    ///
    /// `DomainError::Latitude` if `lat` is not a valid latitude.
    /// `Error::ConvergenceFailure` if the elliptic integral does not converge.
    pub fn exact_meridian_arc_length(&self, lat: Angle) -> Result<Metres, Error> {
        let beta = self.calculate_parametric_latitude(check_latitude_angle(lat)?);
        Ok(Metres(
            self.b.0 * ellipsoid::elliptic::incomplete_e(beta.sin().0, beta.cos().0, -self.ep_2)?,
        ))
    }

    /// Calculate the rectifying latitude, `mu`, of a geodetic latitude using
    /// the series: `mu = phi + sum C[k] sin(2k phi)`.
    /// * `lat` - the geodetic Latitude
    ///
    /// # Examples
    /// ```
    /// use icao_rhumb::*;
    ///
    /// let mu = WGS84_RHUMB.ellipsoid().rectifying_latitude(Angle::from(Degrees(45.0))).unwrap();
    /// assert!((44.855_681_988_906_91 - mu.0.to_degrees()).abs() < 1e-12);
    /// ```
    ///
    /// # Errors
    ///
    /// `DomainError::Latitude` if `lat` is not a valid latitude.
    pub fn rectifying_latitude(&self, lat: Angle) -> Result<Radians, Error> {
        let lat = check_latitude_angle(lat)?;
        Ok(Radians(
            Radians::from(lat).0 + ellipsoid::coefficients::sin_cos_series(&self.mu_phi, lat).0,
        ))
    }

    /// Calculate the rectifying latitude, `mu`, of a geodetic latitude using
    /// the elliptic integral: `mu = (pi/2) * E(beta, -ep_2) / E(-ep_2)`.
    /// * `lat` - the geodetic Latitude
    ///
    /// # Errors
    ///
    /// `DomainError::Latitude` if `lat` is not a valid latitude.
    /// `Error::ConvergenceFailure` if the elliptic integral does not converge.
    pub fn exact_rectifying_latitude(&self, lat: Angle) -> Result<Radians, Error> {
        let beta = self.calculate_parametric_latitude(check_latitude_angle(lat)?);
        let e = ellipsoid::elliptic::incomplete_e(beta.sin().0, beta.cos().0, -self.ep_2)?;
        Ok(Radians(FRAC_PI_2 * e / self.complete_e))
    }

    /// Calculate the geodetic latitude of a rectifying latitude using the
    /// series: `phi = mu + sum D[k] sin(2k mu)`.
    /// * `mu` - the rectifying latitude.
    ///
    /// # Errors
    ///
    /// `DomainError::RectifyingLatitude` if `mu` is not finite or `|mu| > pi/2`.
    pub fn inverse_rectifying_latitude(&self, mu: Radians) -> Result<Angle, Error> {
        let mu = check_rectifying_latitude(mu.0)?;
        if FRAC_PI_2 <= libm::fabs(mu) {
            return Ok(pole(mu));
        }

        let angle = Angle::from(Radians(mu));
        let phi = mu + ellipsoid::coefficients::sin_cos_series(&self.phi_mu, angle).0;
        Ok(Angle::from(Radians(phi.clamp(-FRAC_PI_2, FRAC_PI_2))))
    }

    /// Calculate the geodetic latitude of a rectifying latitude by
    /// Newton-Raphson iteration of the parametric latitude, `beta`, on the
    /// elliptic integral.
    /// * `mu` - the rectifying latitude.
    ///
    /// # Errors
    ///
    /// `DomainError::RectifyingLatitude` if `mu` is not finite or `|mu| > pi/2`.
    /// `Error::ConvergenceFailure` if the iteration does not converge within
    /// `MAX_RECTIFYING_ITERATIONS`.
    pub fn exact_inverse_rectifying_latitude(&self, mu: Radians) -> Result<Angle, Error> {
        let mu = check_rectifying_latitude(mu.0)?;
        if FRAC_PI_2 <= libm::fabs(mu) {
            return Ok(pole(mu));
        }

        let k2 = -self.ep_2;
        let target = mu * self.complete_e / FRAC_PI_2;
        let tolerance = libm::sqrt(f64::EPSILON * 0.01);

        // the first term of the series from mu to beta
        let sqrt_kp = libm::sqrt(1.0 - k2) + 1.0;
        let eps = k2 / (sqrt_kp * sqrt_kp);
        let mut beta = mu - eps * libm::sin(2.0 * mu) / 2.0;

        for _ in 0..MAX_RECTIFYING_ITERATIONS {
            let (sn, cn) = (libm::sin(beta), libm::cos(beta));
            let dbeta = (target - ellipsoid::elliptic::incomplete_e(sn, cn, k2)?)
                / ellipsoid::elliptic::delta(sn, k2);
            beta = (beta + dbeta).clamp(-FRAC_PI_2, FRAC_PI_2);
            if libm::fabs(dbeta) < tolerance {
                return Ok(self.calculate_geodetic_latitude(Angle::from(Radians(beta))));
            }
        }

        log::warn!("exact_inverse_rectifying_latitude({mu}) did not converge");
        Err(Error::ConvergenceFailure {
            algorithm: "exact_inverse_rectifying_latitude",
            iterations: MAX_RECTIFYING_ITERATIONS,
        })
    }

    /// Calculate the isometric latitude, `psi`, of a geodetic latitude.
    ///
    /// It is finite at the poles, where `psi` is about +/-72.77 for WGS-84.
    /// * `lat` - the geodetic Latitude
    ///
    /// # Errors
    ///
    /// `DomainError::Latitude` if `lat` is not a valid latitude.
    pub fn isometric_latitude(&self, lat: Angle) -> Result<Radians, Error> {
        let lat = check_latitude_angle(lat)?;
        Ok(ellipsoid::calculate_isometric_latitude(lat, self.e_2))
    }

    /// Calculate the geodetic latitude of an isometric latitude.
    /// * `psi` - the isometric latitude, infinite values map to the poles.
    ///
    /// # Errors
    ///
    /// `DomainError::IsometricLatitude` if `psi` is NaN.
    /// `Error::ConvergenceFailure` if the iteration does not converge.
    pub fn inverse_isometric_latitude(&self, psi: Radians) -> Result<Angle, Error> {
        if psi.0.is_nan() {
            return Err(DomainError::IsometricLatitude(psi.0).into());
        }
        ellipsoid::calculate_latitude_from_isometric(psi, self.e_2)
    }
}

/// A rhumb line solver on an `Ellipsoid`.
///
/// The solver evaluates the rectifying latitude either by series expansions
/// in the third flattening, `n`, or exactly with elliptic integrals.
/// The series are accurate for `|f| <= 1/150`, the exact form is valid
/// for `-10 <= f <= 0.99`.
#[derive(Clone, Debug, PartialEq)]
pub struct Rhumb {
    /// The `Ellipsoid`.
    ellipsoid: Ellipsoid,
    /// Whether to use the exact elliptic integrals instead of the series.
    exact: bool,
}

impl Rhumb {
    /// Constructor.
    /// * `ellipsoid` - the `Ellipsoid`.
    /// * `exact` - use exact elliptic integrals instead of series expansions.
    #[must_use]
    pub fn new(ellipsoid: Ellipsoid, exact: bool) -> Self {
        log::debug!(
            "Rhumb::new a: {}, f: {}, exact: {}",
            ellipsoid.a().0,
            ellipsoid.f(),
            exact
        );
        Self { ellipsoid, exact }
    }

    /// Construct a `Rhumb` on the WGS-84 `Ellipsoid` using series expansions.
    #[must_use]
    pub fn wgs84() -> Self {
        Self::new(Ellipsoid::wgs84(), false)
    }

    /// The `Ellipsoid`.
    #[must_use]
    pub const fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// Whether the exact elliptic integrals are used.
    #[must_use]
    pub const fn exact(&self) -> bool {
        self.exact
    }

    /// The distance along a meridian from the equator to `lat`.
    /// * `lat` - the geodetic Latitude
    ///
    /// # Errors
    ///
    /// `DomainError::Latitude` if `lat` is not a valid latitude.
    /// `Error::ConvergenceFailure` if an elliptic integral does not converge.
    pub fn meridian_arc_length(&self, lat: Angle) -> Result<Metres, Error> {
        if self.exact {
            self.ellipsoid.exact_meridian_arc_length(lat)
        } else {
            self.ellipsoid.meridian_arc_length(lat)
        }
    }

    /// The rectifying latitude of a geodetic latitude.
    /// * `lat` - the geodetic Latitude
    ///
    /// # Errors
    ///
    /// `DomainError::Latitude` if `lat` is not a valid latitude.
    /// `Error::ConvergenceFailure` if an elliptic integral does not converge.
    pub fn rectifying_latitude(&self, lat: Angle) -> Result<Radians, Error> {
        if self.exact {
            self.ellipsoid.exact_rectifying_latitude(lat)
        } else {
            self.ellipsoid.rectifying_latitude(lat)
        }
    }

    /// The geodetic latitude of a rectifying latitude.
    /// * `mu` - the rectifying latitude.
    ///
    /// # Errors
    ///
    /// `DomainError::RectifyingLatitude` if `mu` is not finite or `|mu| > pi/2`.
    /// `Error::ConvergenceFailure` if the iteration does not converge.
    pub fn inverse_rectifying_latitude(&self, mu: Radians) -> Result<Angle, Error> {
        if self.exact {
            self.ellipsoid.exact_inverse_rectifying_latitude(mu)
        } else {
            self.ellipsoid.inverse_rectifying_latitude(mu)
        }
    }

    /// Construct a `RhumbLine` from a start position and azimuth.
    ///
    /// Note: `Angle::from(Degrees)` maps a non-finite value to a valid
    /// zero angle, use `line_degrees` for azimuths in degrees.
    /// * `a` - the start position in geodetic coordinates.
    /// * `azimuth` - the azimuth of the rhumb line.
    ///
    /// # Errors
    ///
    /// `DomainError` if the position or azimuth is invalid.
    pub fn line(&self, a: &LatLong, azimuth: Angle) -> Result<RhumbLine, Error> {
        RhumbLine::new(self.clone(), a, azimuth, Metres(0.0))
    }

    /// Construct a `RhumbLine` from a start position and azimuth in degrees.
    /// * `a` - the start position in geodetic coordinates.
    /// * `azimuth` - the azimuth of the rhumb line in degrees.
    ///
    /// # Errors
    ///
    /// `DomainError::Azimuth` if `azimuth` is not finite.
    /// `DomainError` if the position is invalid.
    pub fn line_degrees(&self, a: &LatLong, azimuth: Degrees) -> Result<RhumbLine, Error> {
        self.line(a, check_azimuth(azimuth)?)
    }

    /// Construct the `RhumbLine` between a pair of positions.
    /// Its `length` is the distance between the positions.
    /// * `a`, `b` - the start and finish positions in geodetic coordinates.
    ///
    /// # Errors
    ///
    /// `DomainError` if a position is invalid.
    /// `Error::ConvergenceFailure` if an iteration does not converge.
    pub fn inverse_line(&self, a: &LatLong, b: &LatLong) -> Result<RhumbLine, Error> {
        let (azimuth, length, _) = rhumb::calculate_azimuth_and_length(self, a, b)?;
        RhumbLine::new(self.clone(), a, azimuth, length)
    }

    /// Solve the direct rhumb line problem.
    /// * `a` - the start position in geodetic coordinates.
    /// * `azimuth` - the azimuth of the rhumb line.
    /// * `distance` - the signed distance along the rhumb line.
    ///
    /// returns the position at `distance` along the rhumb line.
    ///
    /// # Examples
    /// ```
    /// use icao_rhumb::*;
    ///
    /// let new_york = LatLong::new(Degrees(40.0), Degrees(-73.0));
    /// let azimuth = Angle::from(Degrees(45.0));
    /// let position = WGS84_RHUMB.direct(&new_york, azimuth, Metres(1.0e6)).unwrap();
    ///
    /// assert!((46.364_805_256_835_92 - position.lat().0).abs() < 1e-9);
    /// assert!((-64.289_993_078_310_57 - position.lon().0).abs() < 1e-9);
    /// ```
    ///
    /// # Errors
    ///
    /// `DomainError` if an input is invalid.
    /// `Error::ConvergenceFailure` if an iteration does not converge.
    pub fn direct(&self, a: &LatLong, azimuth: Angle, distance: Metres) -> Result<LatLong, Error> {
        self.line(a, azimuth)?.lat_long(distance)
    }

    /// Solve the direct rhumb line problem with the azimuth in degrees.
    /// * `a` - the start position in geodetic coordinates.
    /// * `azimuth` - the azimuth of the rhumb line in degrees.
    /// * `distance` - the signed distance along the rhumb line.
    ///
    /// # Examples
    /// ```
    /// use icao_rhumb::*;
    ///
    /// let new_york = LatLong::new(Degrees(40.0), Degrees(-73.0));
    /// let position = WGS84_RHUMB
    ///     .direct_degrees(&new_york, Degrees(45.0), Metres(1.0e6))
    ///     .unwrap();
    /// assert!((46.364_805_256_835_92 - position.lat().0).abs() < 1e-9);
    ///
    /// let result = WGS84_RHUMB.direct_degrees(&new_york, Degrees(f64::NAN), Metres(1.0e6));
    /// assert_eq!(Err(Error::Domain(DomainError::Azimuth)), result);
    /// ```
    ///
    /// # Errors
    ///
    /// `DomainError::Azimuth` if `azimuth` is not finite.
    /// `DomainError` if another input is invalid.
    /// `Error::ConvergenceFailure` if an iteration does not converge.
    pub fn direct_degrees(
        &self,
        a: &LatLong,
        azimuth: Degrees,
        distance: Metres,
    ) -> Result<LatLong, Error> {
        self.line_degrees(a, azimuth)?.lat_long(distance)
    }

    /// Solve the direct rhumb line problem and calculate the area between
    /// the rhumb line and the equator.
    /// * `a` - the start position in geodetic coordinates.
    /// * `azimuth` - the azimuth of the rhumb line.
    /// * `distance` - the signed distance along the rhumb line.
    ///
    /// returns the position and the area in square metres.
    ///
    /// # Errors
    ///
    /// `DomainError` if an input is invalid.
    /// `Error::ConvergenceFailure` if an iteration does not converge.
    pub fn direct_with_area(
        &self,
        a: &LatLong,
        azimuth: Angle,
        distance: Metres,
    ) -> Result<(LatLong, f64), Error> {
        self.line(a, azimuth)?.position_and_area(distance)
    }

    /// Solve the direct rhumb line problem with the azimuth in degrees and
    /// calculate the area between the rhumb line and the equator.
    ///
    /// # Errors
    ///
    /// `DomainError::Azimuth` if `azimuth` is not finite.
    /// `DomainError` if another input is invalid.
    /// `Error::ConvergenceFailure` if an iteration does not converge.
    pub fn direct_with_area_degrees(
        &self,
        a: &LatLong,
        azimuth: Degrees,
        distance: Metres,
    ) -> Result<(LatLong, f64), Error> {
        self.line_degrees(a, azimuth)?.position_and_area(distance)
    }

    /// Solve the inverse rhumb line problem.
    /// * `a`, `b` - the start and finish positions in geodetic coordinates.
    ///
    /// returns the azimuth and length of the rhumb line.
    ///
    /// # Examples
    /// ```
    /// use icao_rhumb::*;
    ///
    /// let new_york = LatLong::new(Degrees(40.0), Degrees(-73.0));
    /// let london = LatLong::new(Degrees(51.5), Degrees(-0.1));
    /// let (azimuth, length) = WGS84_RHUMB.inverse(&new_york, &london).unwrap();
    ///
    /// let azimuth_degrees = Degrees::from(azimuth);
    /// println!("New York-London azimuth: {:?}", azimuth_degrees.0);
    ///
    /// let distance_nm = NauticalMiles::from(length);
    /// println!("New York-London distance: {:?}", distance_nm);
    /// ```
    ///
    /// # Errors
    ///
    /// `DomainError` if a position is invalid.
    /// `Error::ConvergenceFailure` if an iteration does not converge.
    pub fn inverse(&self, a: &LatLong, b: &LatLong) -> Result<(Angle, Metres), Error> {
        let (azimuth, length, _) = rhumb::calculate_azimuth_and_length(self, a, b)?;
        Ok((azimuth, length))
    }

    /// Solve the inverse rhumb line problem and calculate the area between
    /// the rhumb line and the equator.
    /// * `a`, `b` - the start and finish positions in geodetic coordinates.
    ///
    /// returns the azimuth, the length and the area in square metres.
    ///
    /// # Errors
    ///
    /// `DomainError` if a position is invalid.
    /// `Error::ConvergenceFailure` if an iteration does not converge.
    pub fn inverse_with_area(&self, a: &LatLong, b: &LatLong) -> Result<(Angle, Metres, f64), Error> {
        let (azimuth, length, lon12) = rhumb::calculate_azimuth_and_length(self, a, b)?;
        let area = rhumb::calculate_area(self, Angle::from(a.lat()), Angle::from(b.lat()), lon12);
        Ok((azimuth, length, area))
    }
}

lazy_static::lazy_static! {
    /// A static instance of the `Rhumb` solver on the WGS-84 `Ellipsoid`.
    pub static ref WGS84_RHUMB: Rhumb = Rhumb::wgs84();
}

/// A rhumb line from a start position with a constant azimuth.
///
/// The rectifying latitude, isometric latitude and parallel radius at the
/// start position are cached, so many positions along the line can be
/// calculated efficiently.
#[derive(Clone, Debug, PartialEq)]
pub struct RhumbLine {
    /// The `Rhumb` solver.
    rhumb: Rhumb,
    /// The start latitude.
    lat: Degrees,
    /// The start longitude.
    lon: Degrees,
    /// The azimuth.
    azimuth: Angle,
    /// The length of the line, zero if it was not constructed between
    /// a pair of positions.
    length: Metres,
    /// The rectifying latitude at the start position.
    mu1: Radians,
    /// The isometric latitude at the start position.
    psi1: Radians,
    /// The radius of the parallel at the start position.
    r1: Metres,
}

impl Validate for RhumbLine {
    /// Test whether a `RhumbLine` is valid.
    /// Whether -90° <= `lat` <= 90°, the azimuth is valid and the `length`
    /// is finite.
    fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat.0) && self.azimuth.is_valid() && self.length.0.is_finite()
    }
}

impl RhumbLine {
    /// Construct a `RhumbLine`.
    fn new(rhumb: Rhumb, a: &LatLong, azimuth: Angle, length: Metres) -> Result<Self, Error> {
        check_latitude(a.lat().0)?;
        check_longitude(a.lon().0)?;
        if !azimuth.is_valid() {
            return Err(DomainError::Azimuth.into());
        }

        let lat1 = Angle::from(a.lat());
        let mu1 = rhumb
            .rectifying_latitude(lat1)?
            .0
            .clamp(-FRAC_PI_2, FRAC_PI_2);
        let psi1 = rhumb.ellipsoid().isometric_latitude(lat1)?;
        let r1 = rhumb.ellipsoid().parallel_radius(lat1);
        log::debug!(
            "RhumbLine::new lat: {}, lon: {}, azimuth: {}",
            a.lat().0,
            a.lon().0,
            Degrees::from(azimuth).0
        );

        Ok(Self {
            rhumb,
            lat: a.lat(),
            lon: a.lon(),
            azimuth,
            length,
            mu1: Radians(mu1),
            psi1,
            r1,
        })
    }

    /// The `Rhumb` solver.
    #[must_use]
    pub const fn rhumb(&self) -> &Rhumb {
        &self.rhumb
    }

    /// The start latitude.
    #[must_use]
    pub const fn lat(&self) -> Degrees {
        self.lat
    }

    /// The start longitude.
    #[must_use]
    pub const fn lon(&self) -> Degrees {
        self.lon
    }

    /// The azimuth.
    #[must_use]
    pub const fn azimuth(&self) -> Angle {
        self.azimuth
    }

    /// The length of the line.
    #[must_use]
    pub const fn length(&self) -> Metres {
        self.length
    }

    /// The rectifying latitude at the start position.
    #[must_use]
    pub const fn mu1(&self) -> Radians {
        self.mu1
    }

    /// The isometric latitude at the start position.
    #[must_use]
    pub const fn psi1(&self) -> Radians {
        self.psi1
    }

    /// The radius of the parallel at the start position.
    #[must_use]
    pub const fn parallel_radius(&self) -> Metres {
        self.r1
    }

    /// The position at `distance` along the line, with the longitude in
    /// the range `(-180, 180]`.
    ///
    /// A line that is not a meridian only reaches a pole after infinitely
    /// many turns. Its longitude is accumulated up to the isometric latitude
    /// of the pole with `tan(90°)` saturated, so a position at a pole, or on
    /// a line that starts at a pole, has a conventional longitude.
    /// * `distance` - the signed distance from the start position.
    ///
    /// # Examples
    /// ```
    /// use icao_rhumb::*;
    ///
    /// let start = LatLong::new(Degrees(40.0), Degrees(-73.0));
    /// let line = RhumbLine::try_from((&start, Angle::from(Degrees(45.0)))).unwrap();
    ///
    /// let position = line.lat_long(Metres(1.0e5)).unwrap();
    /// assert!((40.636_799_301_961_666 - position.lat().0).abs() < 1e-9);
    /// assert!((-72.168_059_180_275_66 - position.lon().0).abs() < 1e-9);
    /// ```
    ///
    /// # Errors
    ///
    /// `DomainError::Distance` if `distance` is not finite.
    /// `Error::ConvergenceFailure` if an iteration does not converge.
    pub fn lat_long(&self, distance: Metres) -> Result<LatLong, Error> {
        let (lat, lon12) = rhumb::calculate_position(self, distance)?;
        Ok(LatLong::new(lat, self.calculate_longitude(lon12)))
    }

    /// The position at `distance` along the line and the area between the
    /// line and the equator, `S12`, in square metres.
    /// * `distance` - the signed distance from the start position.
    ///
    /// # Errors
    ///
    /// `DomainError::Distance` if `distance` is not finite.
    /// `Error::ConvergenceFailure` if an iteration does not converge.
    pub fn position_and_area(&self, distance: Metres) -> Result<(LatLong, f64), Error> {
        let (lat, lon12) = rhumb::calculate_position(self, distance)?;
        let area = if self.azimuth.sin().0 == 0.0 {
            0.0
        } else {
            rhumb::calculate_area(&self.rhumb, Angle::from(self.lat), Angle::from(lat), lon12)
        };
        Ok((LatLong::new(lat, self.calculate_longitude(lon12)), area))
    }

    /// The longitude after travelling `lon12` radians along the line.
    fn calculate_longitude(&self, lon12: Radians) -> Degrees {
        Degrees(rhumb::normalise_longitude(
            rhumb::normalise_longitude(self.lon.0) + lon12.0.to_degrees(),
        ))
    }
}

impl TryFrom<(&LatLong, Angle)> for RhumbLine {
    type Error = Error;

    /// Construct a `RhumbLine` on the WGS-84 ellipsoid from a start position
    /// and azimuth.
    fn try_from(params: (&LatLong, Angle)) -> Result<Self, Self::Error> {
        WGS84_RHUMB.line(params.0, params.1)
    }
}

impl TryFrom<(&LatLong, Degrees)> for RhumbLine {
    type Error = Error;

    /// Construct a `RhumbLine` on the WGS-84 ellipsoid from a start position
    /// and azimuth in degrees.
    fn try_from(params: (&LatLong, Degrees)) -> Result<Self, Self::Error> {
        WGS84_RHUMB.line_degrees(params.0, params.1)
    }
}

impl TryFrom<(&LatLong, &LatLong)> for RhumbLine {
    type Error = Error;

    /// Construct the `RhumbLine` on the WGS-84 ellipsoid between a pair of
    /// positions.
    fn try_from(params: (&LatLong, &LatLong)) -> Result<Self, Self::Error> {
        WGS84_RHUMB.inverse_line(params.0, params.1)
    }
}

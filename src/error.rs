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

//! The error module contains the errors returned by the library.

use angle_sc::{Angle, Degrees, Validate};
use core::f64::consts::FRAC_PI_2;
use thiserror::Error;

/// An input value outside of the domain of a calculation.
#[derive(Error, Clone, Copy, Debug, PartialEq)]
pub enum DomainError {
    #[error("invalid Semimajor axis: {0}, it must be positive and finite")]
    SemimajorAxis(f64),

    #[error("invalid flattening: {0}, it must be finite and less than one")]
    Flattening(f64),

    #[error("invalid latitude: {0} degrees, it must be in the range [-90, 90]")]
    Latitude(f64),

    #[error("invalid longitude: {0} degrees, it must be finite")]
    Longitude(f64),

    #[error("invalid azimuth, it must be finite")]
    Azimuth,

    #[error("invalid distance: {0}, it must be finite")]
    Distance(f64),

    #[error("invalid rectifying latitude: {0} radians, it must be in the range [-pi/2, pi/2]")]
    RectifyingLatitude(f64),

    #[error("invalid isometric latitude: {0}")]
    IsometricLatitude(f64),
}

/// The error type of the library.
#[derive(Error, Clone, Copy, Debug, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{algorithm} failed to converge in {iterations} iterations")]
    ConvergenceFailure {
        algorithm: &'static str,
        iterations: u32,
    },

    #[error("slice lengths differ: distances {distances}, latitudes {latitudes}, longitudes {longitudes}")]
    LengthMismatch {
        distances: usize,
        latitudes: usize,
        longitudes: usize,
    },
}

/// Validate a latitude in degrees.
/// * `lat` - the latitude.
///
/// returns the latitude or a `DomainError::Latitude`.
pub(crate) fn check_latitude(lat: f64) -> Result<f64, DomainError> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(lat)
    } else {
        Err(DomainError::Latitude(lat))
    }
}

/// Validate a latitude `Angle`: it must be valid with a non-negative cosine.
///
/// Note: `Angle::from(Degrees)` maps a non-finite value to a valid zero
/// angle, so latitudes in degrees must be checked with `check_latitude`
/// before conversion.
pub(crate) fn check_latitude_angle(lat: Angle) -> Result<Angle, DomainError> {
    if lat.is_valid() && 0.0 <= lat.cos().0 {
        Ok(lat)
    } else {
        Err(DomainError::Latitude(Degrees::from(lat).0))
    }
}

/// Validate an azimuth in degrees and convert it to an `Angle`.
///
/// returns the azimuth or a `DomainError::Azimuth` if it is not finite.
pub(crate) fn check_azimuth(azimuth: Degrees) -> Result<Angle, DomainError> {
    if azimuth.0.is_finite() {
        Ok(Angle::from(azimuth))
    } else {
        Err(DomainError::Azimuth)
    }
}

/// Validate a rectifying latitude in radians, allowing a little rounding
/// beyond the poles.
///
/// returns the rectifying latitude clamped to `[-pi/2, pi/2]`.
pub(crate) fn check_rectifying_latitude(mu: f64) -> Result<f64, DomainError> {
    if mu.is_finite() && libm::fabs(mu) <= FRAC_PI_2 * (1.0 + 4.0 * f64::EPSILON) {
        Ok(mu.clamp(-FRAC_PI_2, FRAC_PI_2))
    } else {
        Err(DomainError::RectifyingLatitude(mu))
    }
}

/// Validate a longitude in degrees.
pub(crate) fn check_longitude(lon: f64) -> Result<f64, DomainError> {
    if lon.is_finite() {
        Ok(lon)
    } else {
        Err(DomainError::Longitude(lon))
    }
}

/// Validate a distance.
pub(crate) fn check_distance(distance: f64) -> Result<f64, DomainError> {
    if distance.is_finite() {
        Ok(distance)
    } else {
        Err(DomainError::Distance(distance))
    }
}

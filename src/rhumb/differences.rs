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

//! Divided differences: `Df(x, y) = (f(x) - f(y)) / (x - y)`.
//!
//! Each function is evaluated without cancellation when `x` and `y` are
//! close and returns the derivative `f'(x)` when `x == y`.
//! See: CFF Karney, [The area of rhumb polygons](https://arxiv.org/abs/2303.03219).

#![allow(clippy::suboptimal_flops)]

use crate::ellipsoid::{eatanhe, MAX_TAN};

/// The divided difference of `tan`.
/// * `x`, `y` - the angles in radians.
/// * `tx`, `ty` - their tangents, saturated at the poles.
#[must_use]
pub fn dtan(x: f64, y: f64, tx: f64, ty: f64) -> f64 {
    let d = x - y;
    let txy = tx * ty;
    if d == 0.0 {
        1.0 + txy
    } else if 2.0 * txy > -1.0 && libm::fabs(tx) < MAX_TAN && libm::fabs(ty) < MAX_TAN {
        (1.0 + txy) * libm::tan(d) / d
    } else {
        (tx - ty) / d
    }
}

/// The divided difference of `atan`.
#[must_use]
pub fn datan(x: f64, y: f64) -> f64 {
    let d = x - y;
    let xy = x * y;
    if d == 0.0 {
        1.0 / (1.0 + xy)
    } else if 2.0 * xy > -1.0 {
        libm::atan(d / (1.0 + xy)) / d
    } else {
        (libm::atan(x) - libm::atan(y)) / d
    }
}

/// The divided difference of `sin`.
#[must_use]
pub fn dsin(x: f64, y: f64) -> f64 {
    let d = (x - y) / 2.0;
    libm::cos((x + y) / 2.0) * if d == 0.0 { 1.0 } else { libm::sin(d) / d }
}

/// The divided difference of `asinh`.
#[must_use]
pub fn dasinh(x: f64, y: f64) -> f64 {
    let d = x - y;
    let hx = libm::hypot(1.0, x);
    let hy = libm::hypot(1.0, y);
    if d == 0.0 {
        1.0 / hx
    } else {
        let arg = if x * y > 0.0 {
            d * (x + y) / (x * hy + y * hx)
        } else {
            x * hy - y * hx
        };
        libm::asinh(arg) / d
    }
}

/// The divided difference of `eatanhe`.
/// * `x`, `y` - the variables, `|x|, |y| <= 1`.
/// * `e_2` - the square of the Eccentricity of the ellipsoid.
#[must_use]
pub fn deatanhe(x: f64, y: f64, e_2: f64) -> f64 {
    let t = x - y;
    let d = 1.0 - e_2 * x * y;
    if t == 0.0 {
        e_2 / d
    } else {
        eatanhe(t / d, e_2) / t
    }
}

/// The divided difference of `ln`.
/// * `x`, `y` - positive values.
#[must_use]
pub fn dlog(x: f64, y: f64) -> f64 {
    let t = x - y;
    if t == 0.0 {
        1.0 / x
    } else {
        2.0 * libm::atanh(t / (x + y)) / t
    }
}

/// The divided difference of `cosh`.
#[must_use]
pub fn dcosh(x: f64, y: f64) -> f64 {
    let d = (x - y) / 2.0;
    libm::sinh((x + y) / 2.0) * if d == 0.0 { 1.0 } else { libm::sinh(d) / d }
}

/// `ln(cosh(x))`, without overflow for large `|x|`.
fn lncosh(x: f64) -> f64 {
    let ax = libm::fabs(x);
    ax + libm::log1p(libm::exp(-2.0 * ax)) - core::f64::consts::LN_2
}

/// The divided difference of `ln(cosh)`: the mean of `tanh` between `x`
/// and `y`.
/// * `x`, `y` - the values, e.g. isometric latitudes.
#[must_use]
pub fn dlncosh(x: f64, y: f64) -> f64 {
    let d = x - y;
    if libm::fabs(d) <= 1.0 {
        dlog(libm::cosh(x), libm::cosh(y)) * dcosh(x, y)
    } else {
        (lncosh(x) - lncosh(y)) / d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use angle_sc::is_within_tolerance;

    fn naive(f: fn(f64) -> f64, x: f64, y: f64) -> f64 {
        (f(x) - f(y)) / (x - y)
    }

    #[test]
    fn test_dtan() {
        let (x, y) = (0.8_f64, 0.3_f64);
        let (tx, ty) = (libm::tan(x), libm::tan(y));
        assert!(is_within_tolerance(
            naive(libm::tan, x, y),
            dtan(x, y, tx, ty),
            8.0 * f64::EPSILON
        ));
        assert_eq!(1.0 + tx * tx, dtan(x, x, tx, tx));

        // saturated at a pole
        let result = dtan(core::f64::consts::FRAC_PI_2, y, MAX_TAN, ty);
        assert!(result.is_finite());
        assert!(0.0 < result);
    }

    #[test]
    fn test_datan() {
        let (x, y) = (2.0, 0.5);
        assert!(is_within_tolerance(
            naive(libm::atan, x, y),
            datan(x, y),
            4.0 * f64::EPSILON
        ));
        let (x, y) = (4.0, -3.0);
        assert!(is_within_tolerance(
            naive(libm::atan, x, y),
            datan(x, y),
            4.0 * f64::EPSILON
        ));
        assert_eq!(0.5, datan(1.0, 1.0));
    }

    #[test]
    fn test_dsin_and_dcosh() {
        let (x, y) = (1.1, 0.2);
        assert!(is_within_tolerance(
            naive(libm::sin, x, y),
            dsin(x, y),
            4.0 * f64::EPSILON
        ));
        assert_eq!(libm::cos(x), dsin(x, x));

        assert!(is_within_tolerance(
            naive(libm::cosh, x, y),
            dcosh(x, y),
            4.0 * f64::EPSILON
        ));
        assert_eq!(libm::sinh(x), dcosh(x, x));
    }

    #[test]
    fn test_dasinh() {
        for (x, y) in [(3.0, 0.5), (-2.0, 1.5), (1e-8, 2e-8)] {
            assert!(is_within_tolerance(
                naive(libm::asinh, x, y),
                dasinh(x, y),
                1e-12
            ));
        }
        assert_eq!(1.0 / libm::hypot(1.0, 2.0), dasinh(2.0, 2.0));
    }

    #[test]
    fn test_dlog() {
        let (x, y) = (3.0, 1.5);
        assert!(is_within_tolerance(
            libm::log(2.0) / 1.5,
            dlog(x, y),
            2.0 * f64::EPSILON
        ));
        assert_eq!(0.25, dlog(4.0, 4.0));
    }

    #[test]
    fn test_dlncosh() {
        let lncosh_naive = |x: f64| libm::log(libm::cosh(x));
        for (x, y) in [(1.5, 0.5), (2.0, 0.5), (3.0, 0.5), (-2.0, 1.5)] {
            assert!(is_within_tolerance(
                naive(lncosh_naive, x, y),
                dlncosh(x, y),
                1e-14
            ));
        }
        assert!(is_within_tolerance(libm::tanh(0.7), dlncosh(0.7, 0.7), 4.0 * f64::EPSILON));

        // continuous across the change of method
        let below = dlncosh(1.5, 0.5);
        let above = dlncosh(1.5 + 1e-12, 0.5);
        assert!(is_within_tolerance(below, above, 1e-12));

        // the saturated isometric latitude of a pole
        let result = dlncosh(72.77, 0.5);
        assert!(is_within_tolerance(0.995_665_397_986_464_4, result, 1e-14));
        assert!(dlncosh(72.77, 72.0).is_finite());
        assert!(is_within_tolerance(-0.998_231_461_459_621_3, dlncosh(-72.77, -1.0), 1e-14));
    }

    #[test]
    fn test_deatanhe() {
        let e_2 = 0.006_694_379_990_141_316_5;
        let (x, y) = (0.9, 0.1);
        let expected = (eatanhe(x, e_2) - eatanhe(y, e_2)) / (x - y);
        assert!(is_within_tolerance(expected, deatanhe(x, y, e_2), 4.0 * f64::EPSILON));
        assert_eq!(e_2, deatanhe(0.0, 0.0, e_2));
        assert_eq!(0.0, deatanhe(0.3, 0.2, 0.0));
    }
}

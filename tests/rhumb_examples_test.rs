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

extern crate icao_rhumb;

use angle_sc::{is_within_tolerance, Angle, Degrees};
use icao_rhumb::{Ellipsoid, Metres, Rhumb};
use unit_sphere::LatLong;

const FILENAME: &str = "data/rhumb_examples.csv";

/// lat1, lon1, lat2, lon2, azi12, s12, S12
type DataRecord = (f64, f64, f64, f64, f64, f64, f64);

/// Read the reference rhumb lines.
fn read_records() -> Result<Vec<DataRecord>, Box<dyn std::error::Error>> {
    let mut rdr = csv::Reader::from_path(FILENAME)?;
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: DataRecord = result?;
        records.push(record);
    }
    Ok(records)
}

/// The difference between a pair of longitudes in degrees.
fn longitude_difference(a: f64, b: f64) -> f64 {
    libm::fabs(libm::remainder(a - b, 360.0))
}

fn check_rhumb_examples(rhumb: &Rhumb) -> Result<(), Box<dyn std::error::Error>> {
    let records = read_records()?;
    assert!(!records.is_empty());

    for (line_number, (lat1, lon1, lat2, lon2, azi12, s12, area)) in records.into_iter().enumerate()
    {
        let a = LatLong::new(Degrees(lat1), Degrees(lon1));
        let b = LatLong::new(Degrees(lat2), Degrees(lon2));

        let (azimuth, length, result_area) = rhumb.inverse_with_area(&a, &b)?;
        let delta_azimuth = libm::fabs(azi12 - Degrees::from(azimuth).0);
        assert!(
            delta_azimuth < 1e-11,
            "azimuth, line: {line_number} delta: {delta_azimuth}"
        );
        assert!(
            is_within_tolerance(s12, length.0, 1e-6),
            "length, line: {line_number} expected: {s12} result: {}",
            length.0
        );
        assert!(
            is_within_tolerance(area, result_area, 1.0),
            "area, line: {line_number} expected: {area} result: {result_area}"
        );

        let (position, result_area) =
            rhumb.direct_with_area(&a, Angle::from(Degrees(azi12)), Metres(s12))?;
        assert!(
            is_within_tolerance(lat2, position.lat().0, 1e-10),
            "latitude, line: {line_number} result: {}",
            position.lat().0
        );
        assert!(
            longitude_difference(lon2, position.lon().0) < 1e-10,
            "longitude, line: {line_number} result: {}",
            position.lon().0
        );
        assert!(
            is_within_tolerance(area, result_area, 1.0),
            "direct area, line: {line_number} expected: {area} result: {result_area}"
        );
    }

    Ok(())
}

#[test]
fn test_rhumb_examples_series() -> Result<(), Box<dyn std::error::Error>> {
    check_rhumb_examples(&Rhumb::wgs84())
}

#[test]
fn test_rhumb_examples_exact() -> Result<(), Box<dyn std::error::Error>> {
    check_rhumb_examples(&Rhumb::new(Ellipsoid::wgs84(), true))
}

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

//! The batch module calculates many positions along a `RhumbLine`.
//!
//! Each position is calculated independently from the line's cached start
//! values, so the distances may be in any order and the work may be split
//! between threads.

use crate::{Error, LatLong, Metres, RhumbLine};

/// Calculate the positions at `distances` along a rhumb line.
/// * `line` - the `RhumbLine`.
/// * `distances` - the signed distances from the start of the line.
///
/// returns an iterator over the positions, in the order of `distances`.
///
/// # Examples
/// ```
/// use icao_rhumb::*;
///
/// let start = LatLong::new(Degrees(40.0), Degrees(-73.0));
/// let line = WGS84_RHUMB.line(&start, Angle::from(Degrees(45.0))).unwrap();
///
/// let distances = [Metres(0.0), Metres(1.0e5), Metres(5.0e5), Metres(1.0e6)];
/// let positions: Result<Vec<LatLong>, Error> =
///     batch::calculate_positions(&line, &distances).collect();
/// assert_eq!(4, positions.unwrap().len());
/// ```
pub fn calculate_positions<'a>(
    line: &'a RhumbLine,
    distances: &'a [Metres],
) -> impl Iterator<Item = Result<LatLong, Error>> + 'a {
    distances.iter().map(move |distance| line.lat_long(*distance))
}

/// Calculate the latitudes and longitudes in degrees at `distances` in
/// metres along a rhumb line, writing them into parallel slices.
/// * `line` - the `RhumbLine`.
/// * `distances` - the signed distances from the start of the line.
/// * `lats`, `lons` - the latitudes and longitudes to write.
///
/// # Errors
///
/// `Error::LengthMismatch` if the slices have different lengths, nothing
/// is written.
/// `DomainError::Distance` at the first distance that is not finite,
/// the positions before it have been written.
pub fn calculate_positions_into(
    line: &RhumbLine,
    distances: &[f64],
    lats: &mut [f64],
    lons: &mut [f64],
) -> Result<(), Error> {
    if distances.len() != lats.len() || distances.len() != lons.len() {
        return Err(Error::LengthMismatch {
            distances: distances.len(),
            latitudes: lats.len(),
            longitudes: lons.len(),
        });
    }

    for ((distance, lat), lon) in distances.iter().zip(lats.iter_mut()).zip(lons.iter_mut()) {
        let position = line.lat_long(Metres(*distance))?;
        *lat = position.lat().0;
        *lon = position.lon().0;
    }
    Ok(())
}

//! Station-based interpolation along cutlines.
//!
//! Cross-section profiles are recorded as (station, elevation) pairs while
//! the cutline is an x/y polyline. When the profile length agrees with the
//! cutline's planar length, each station is located along the cutline and
//! the elevation is attached as z.

use tracing::warn;

use crate::geometry::{distance, Xy, Xyz};

/// Stations may overshoot the end of the cutline by this much and still
/// snap to its last vertex.
pub const STATION_TOLERANCE: f64 = 0.1;

/// A new point along a straight segment at `delta` from `p0` towards `p1`.
fn point_at_distance(p0: Xy, p1: Xy, delta: f64) -> Xy {
    let ratio = delta / distance(p0, p1);
    [
        (1.0 - ratio) * p0[0] + ratio * p1[0],
        (1.0 - ratio) * p0[1] + ratio * p1[1],
    ]
}

/// Locate the point a given distance along a multi-segment polyline.
///
/// Returns `None` when the distance overshoots the polyline by more than
/// [`STATION_TOLERANCE`]; an overshoot within tolerance snaps to the last
/// vertex.
pub fn interp_xy(xy_pairs: &[Xy], d: f64) -> Option<Xy> {
    let mut line_length = 0.0;

    for w in xy_pairs.windows(2) {
        let (p0, p1) = (w[0], w[1]);
        let segment = distance(p0, p1);
        line_length += segment;

        if line_length > d {
            let delta = segment - (line_length - d);
            return Some(point_at_distance(p0, p1, delta));
        }
    }

    if d - line_length <= STATION_TOLERANCE {
        return xy_pairs.last().copied();
    }

    warn!(
        station = d,
        line_length, "interpolated station lies beyond the end of the line"
    );
    None
}

/// Attribute elevations onto a cutline by station.
///
/// `mz_pairs` are (station, elevation) pairs; stations are measured from the
/// first pair's station. Stations that cannot be located are dropped.
pub fn attribute_z(xy_pairs: &[Xy], mz_pairs: &[[f64; 2]]) -> Vec<Xyz> {
    let Some(first) = mz_pairs.first() else {
        return Vec::new();
    };
    let starting_station = first[0];

    mz_pairs
        .iter()
        .filter_map(|mz| {
            interp_xy(xy_pairs, mz[0] - starting_station).map(|p| [p[0], p[1], mz[1]])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interp_on_segment() {
        let line = [[0.0, 0.0], [100.0, 0.0]];
        assert_eq!(interp_xy(&line, 50.0), Some([50.0, 0.0]));
        assert_eq!(interp_xy(&line, 0.0), Some([0.0, 0.0]));
    }

    #[test]
    fn test_interp_across_vertices() {
        let line = [[0.0, 0.0], [3.0, 4.0], [3.0, 14.0]];
        // 5 along the first segment, then 5 up the second
        assert_eq!(interp_xy(&line, 10.0), Some([3.0, 5.0]));
    }

    #[test]
    fn test_interp_end_tolerance() {
        let line = [[0.0, 0.0], [100.0, 0.0]];
        assert_eq!(interp_xy(&line, 100.05), Some([100.0, 0.0]));
        assert_eq!(interp_xy(&line, 100.2), None);
    }

    #[test]
    fn test_attribute_z() {
        let cutline = [[0.0, 0.0], [100.0, 0.0]];
        let profile = [[0.0, 10.0], [50.0, 5.0], [100.0, 10.0]];
        let points = attribute_z(&cutline, &profile);
        assert_eq!(
            points,
            vec![[0.0, 0.0, 10.0], [50.0, 0.0, 5.0], [100.0, 0.0, 10.0]]
        );
    }

    #[test]
    fn test_attribute_z_nonzero_start_station() {
        // Stations are relative to the first station, not absolute.
        let cutline = [[10.0, 10.0], [10.0, 110.0]];
        let profile = [[1000.0, 7.0], [1100.0, 9.0]];
        let points = attribute_z(&cutline, &profile);
        assert_eq!(points, vec![[10.0, 10.0, 7.0], [10.0, 110.0, 9.0]]);
    }

    #[test]
    fn test_attribute_z_empty_profile() {
        assert!(attribute_z(&[[0.0, 0.0], [1.0, 0.0]], &[]).is_empty());
    }
}

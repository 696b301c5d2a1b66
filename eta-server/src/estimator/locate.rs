//! Placing points on a route path.
//!
//! A point is located by finding its nearest waypoint and then checking the
//! segments either side of it with [`is_between`]. The first and last
//! waypoints only have one adjoining segment, which is returned without a
//! betweenness check.

use crate::geo::{Coordinate, distance, is_between};

/// A pair of adjacent waypoint indices, `end == start + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    fn starting_at(start: usize) -> Self {
        Self {
            start,
            end: start + 1,
        }
    }
}

/// Index of the waypoint closest to `point`; ties go to the lowest index.
///
/// `None` for an empty path.
pub fn nearest_waypoint_index(path: &[Coordinate], point: Coordinate) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, waypoint) in path.iter().enumerate() {
        let d = distance(*waypoint, point);
        match best {
            Some((_, min)) if d >= min => {}
            _ => best = Some((idx, d)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// The segment of `path` that contains `point`.
///
/// `None` when the path has fewer than two waypoints, or when the nearest
/// waypoint is interior and `point` lies on neither adjoining segment.
pub fn locating_segment(path: &[Coordinate], point: Coordinate) -> Option<Segment> {
    if path.len() < 2 {
        return None;
    }
    let last = path.len() - 1;
    let nearest = nearest_waypoint_index(path, point)?;

    if nearest == 0 {
        return Some(Segment::starting_at(0));
    }
    if nearest == last {
        return Some(Segment::starting_at(last - 1));
    }

    if is_between(path[nearest - 1], path[nearest], point) {
        return Some(Segment::starting_at(nearest - 1));
    }
    if is_between(path[nearest], path[nearest + 1], point) {
        return Some(Segment::starting_at(nearest));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng)
    }

    /// Four waypoints 222 m apart heading east along 1.33N.
    fn path() -> Vec<Coordinate> {
        vec![
            c(1.33, 103.690),
            c(1.33, 103.692),
            c(1.33, 103.694),
            c(1.33, 103.696),
        ]
    }

    #[test]
    fn nearest_on_empty_path() {
        assert_eq!(nearest_waypoint_index(&[], c(1.33, 103.69)), None);
    }

    #[test]
    fn nearest_prefers_lowest_index_on_tie() {
        let p = c(1.33, 103.69);
        let path = vec![c(1.33, 103.691), p, p];
        assert_eq!(nearest_waypoint_index(&path, p), Some(1));

        let twins = vec![c(1.33, 103.692), c(1.33, 103.692)];
        assert_eq!(nearest_waypoint_index(&twins, c(1.33, 103.69)), Some(0));
    }

    #[test]
    fn nearest_picks_closest() {
        assert_eq!(nearest_waypoint_index(&path(), c(1.3301, 103.6939)), Some(2));
    }

    #[test]
    fn near_first_waypoint_is_first_segment() {
        assert_eq!(
            locating_segment(&path(), c(1.33, 103.6903)),
            Some(Segment { start: 0, end: 1 })
        );
    }

    #[test]
    fn near_last_waypoint_is_last_segment() {
        assert_eq!(
            locating_segment(&path(), c(1.33, 103.6958)),
            Some(Segment { start: 2, end: 3 })
        );
    }

    #[test]
    fn interior_point_before_nearest_waypoint() {
        // Nearest waypoint is index 2, 41 m east; the point lies back
        // towards index 1.
        assert_eq!(
            locating_segment(&path(), c(1.33, 103.69363)),
            Some(Segment { start: 1, end: 2 })
        );
    }

    #[test]
    fn interior_point_after_nearest_waypoint() {
        // Nearest waypoint is index 1, point lies towards index 2.
        assert_eq!(
            locating_segment(&path(), c(1.33, 103.69227)),
            Some(Segment { start: 1, end: 2 })
        );
    }

    #[test]
    fn unplaceable_interior_point() {
        // Nearest waypoint is index 2 but rounding puts the point on
        // neither adjoining segment.
        assert_eq!(locating_segment(&path(), c(1.33, 103.69406)), None);
    }

    #[test]
    fn degenerate_paths_locate_nothing() {
        let p = c(1.33, 103.69);
        assert_eq!(locating_segment(&[], p), None);
        assert_eq!(locating_segment(&[p], p), None);
    }

    #[test]
    fn two_point_path_always_has_its_only_segment() {
        let path = vec![c(1.33, 103.690), c(1.33, 103.692)];
        assert_eq!(
            locating_segment(&path, c(1.40, 103.80)),
            Some(Segment { start: 0, end: 1 })
        );
    }
}

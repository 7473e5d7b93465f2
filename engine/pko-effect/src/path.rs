//! Constant-velocity path following
//!
//! An effect with a path travels along a polyline at a fixed speed. The
//! follower maps elapsed time to a point on the polyline, either stopping at
//! the final point or wrapping back to the first.

use glam::Vec3;

use crate::error::{EffectError, Result};
use crate::math::{Lerp, ratio_or};

/// Ordered, non-empty sequence of path points
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Vec3>", into = "Vec<Vec3>")
)]
pub struct PathPoints {
    points: Vec<Vec3>,
    segment_lengths: Vec<f32>,
    total_length: f32,
}

impl PathPoints {
    /// Build a path; at least one point is required
    pub fn new(points: Vec<Vec3>) -> Result<Self> {
        if points.is_empty() {
            return Err(EffectError::InvalidPath(
                "a path needs at least one point".to_string(),
            ));
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(EffectError::InvalidPath(format!(
                "point {} is not finite",
                index
            )));
        }

        let segment_lengths: Vec<f32> = points
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .collect();
        let total_length = segment_lengths.iter().sum();

        Ok(Self {
            points,
            segment_lengths,
            total_length,
        })
    }

    /// Path points in travel order
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with slices
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Length of each segment, one fewer than the point count
    pub fn segment_lengths(&self) -> &[f32] {
        &self.segment_lengths
    }

    /// Sum of all segment lengths
    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Time one pass takes at `velocity`, if the path can be travelled at all
    pub fn travel_time(&self, velocity: f32) -> Option<f32> {
        let time = ratio_or(self.total_length, velocity.abs(), f32::NAN);
        time.is_finite().then_some(time)
    }

    fn first(&self) -> Vec3 {
        self.points[0]
    }

    fn last(&self) -> Vec3 {
        self.points[self.points.len() - 1]
    }

    /// Position after travelling `elapsed` seconds at `velocity`
    ///
    /// Without looping the follower stops exactly on the final point; with
    /// looping the travelled distance wraps at the total length. Negative or
    /// non-finite distances stay on the first point.
    pub fn position_at(&self, elapsed: f32, velocity: f32, looping: bool) -> Vec3 {
        if self.points.len() == 1 || self.total_length <= 0.0 {
            return self.first();
        }

        let mut distance = velocity * elapsed;
        if !distance.is_finite() || distance < 0.0 {
            return self.first();
        }

        if looping {
            distance %= self.total_length;
        } else if distance >= self.total_length {
            return self.last();
        }

        let mut remaining = distance;
        for (index, &length) in self.segment_lengths.iter().enumerate() {
            if length <= 0.0 {
                continue;
            }
            if remaining <= length {
                let start = self.points[index];
                let end = self.points[index + 1];
                let ratio = ratio_or(remaining, length, 0.0);
                if ratio >= 1.0 {
                    return end;
                }
                return start.lerp_to(&end, ratio);
            }
            remaining -= length;
        }

        self.last()
    }
}

impl TryFrom<Vec<Vec3>> for PathPoints {
    type Error = EffectError;

    fn try_from(points: Vec<Vec3>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<PathPoints> for Vec<Vec3> {
    fn from(path: PathPoints) -> Self {
        path.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn corner_path() -> PathPoints {
        PathPoints::new(vec![
            Vec3::ZERO,
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 10.0, 0.0),
        ])
        .expect("valid path")
    }

    #[test]
    fn test_empty_path_rejected() {
        let err = PathPoints::new(Vec::new()).unwrap_err();
        assert!(matches!(err, EffectError::InvalidPath(_)));
    }

    #[test]
    fn test_non_finite_point_rejected() {
        assert!(PathPoints::new(vec![Vec3::ZERO, Vec3::splat(f32::NAN)]).is_err());
    }

    #[test]
    fn test_lengths() {
        let path = corner_path();
        assert_eq!(path.segment_lengths(), &[10.0, 10.0]);
        assert_eq!(path.total_length(), 20.0);
        assert_eq!(path.travel_time(5.0), Some(4.0));
        assert_eq!(path.travel_time(0.0), None);
    }

    #[test]
    fn test_clamped_travel() {
        let path = corner_path();
        assert_eq!(path.position_at(0.0, 5.0, false), Vec3::ZERO);
        assert_eq!(path.position_at(1.0, 5.0, false), Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(path.position_at(2.0, 5.0, false), Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(path.position_at(3.0, 5.0, false), Vec3::new(10.0, 5.0, 0.0));
        assert_eq!(path.position_at(100.0, 5.0, false), Vec3::new(10.0, 10.0, 0.0));
    }

    #[test]
    fn test_looping_wraps_exactly() {
        let path = corner_path();
        assert_eq!(path.position_at(4.0, 5.0, true), Vec3::ZERO);
        assert_eq!(path.position_at(5.0, 5.0, true), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_single_point() {
        let path = PathPoints::new(vec![Vec3::new(1.0, 2.0, 3.0)]).expect("valid path");
        assert_eq!(path.position_at(50.0, 9.0, false), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(path.position_at(50.0, 9.0, true), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_zero_length_path() {
        let path = PathPoints::new(vec![Vec3::ONE, Vec3::ONE]).expect("valid path");
        assert_eq!(path.position_at(3.0, 1.0, true), Vec3::ONE);
    }

    #[test]
    fn test_zero_length_segment_skipped() {
        let path = PathPoints::new(vec![
            Vec3::ZERO,
            Vec3::ZERO,
            Vec3::new(4.0, 0.0, 0.0),
        ])
        .expect("valid path");
        assert_eq!(path.position_at(1.0, 1.0, false), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_negative_distance_is_start() {
        let path = corner_path();
        assert_eq!(path.position_at(-1.0, 5.0, false), Vec3::ZERO);
        assert_eq!(path.position_at(1.0, -5.0, true), Vec3::ZERO);
    }
}

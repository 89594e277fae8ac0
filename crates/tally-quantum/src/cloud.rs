//! Random point cloud drifting through four or five dimensions.
//!
//! Points start uniformly inside the unit hypercube and take a small random
//! step on every tick. Drawing goes through successive perspective
//! projections: 5D to 4D, 4D to 3D, then 3D onto the screen plane. Clouds
//! with three or fewer dimensions are padded with zeros instead.

use rand::Rng;
use tally_core::{Result, TallyError};
use tracing::debug;

/// Points in a freshly generated cloud.
pub const NUM_POINTS: usize = 50;

/// Dimensions used when none are requested.
pub const DEFAULT_DIMENSIONS: usize = 4;

/// Highest dimension count with a projection.
pub const MAX_DIMENSIONS: usize = 5;

/// Largest change applied to one coordinate in one step.
pub const INFLUENCE: f64 = 0.05;

/// Viewer distance along the fourth and fifth axes.
pub const PROJECTION_DISTANCE: f64 = 2.0;

/// Viewer distance from the screen plane.
pub const SCREEN_DISTANCE: f64 = 500.0;

/// Smallest divisor a projection will use.
const MIN_DIVISOR: f64 = 1e-6;

/// A set of points of equal dimension evolving by random steps.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    points: Vec<Vec<f64>>,
    dimensions: usize,
    steps: u64,
}

impl PointCloud {
    /// `n_points` random points with `dimensions` coordinates in `[-1, 1]`.
    ///
    /// Returns [`TallyError::Config`] unless `1 <= dimensions <= 5`.
    pub fn new<R: Rng + ?Sized>(rng: &mut R, n_points: usize, dimensions: usize) -> Result<Self> {
        if !(1..=MAX_DIMENSIONS).contains(&dimensions) {
            return Err(TallyError::Config(format!(
                "point cloud dimensions must be between 1 and {MAX_DIMENSIONS}, got {dimensions}"
            )));
        }
        Ok(Self::generate(rng, n_points, dimensions))
    }

    /// [`NUM_POINTS`] points in [`DEFAULT_DIMENSIONS`].
    pub fn with_defaults<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::generate(rng, NUM_POINTS, DEFAULT_DIMENSIONS)
    }

    fn generate<R: Rng + ?Sized>(rng: &mut R, n_points: usize, dimensions: usize) -> Self {
        let points = (0..n_points)
            .map(|_| (0..dimensions).map(|_| rng.gen_range(-1.0..=1.0)).collect())
            .collect();
        Self {
            points,
            dimensions,
            steps: 0,
        }
    }

    /// Replace every point with a fresh random one and restart the step count.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        *self = Self::generate(rng, self.points.len(), self.dimensions);
        debug!(
            "Regenerated {} points in {} dimensions",
            self.points.len(),
            self.dimensions
        );
    }

    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Steps taken since the cloud was generated.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Move every coordinate by a uniform draw from `[-INFLUENCE, INFLUENCE]`.
    ///
    /// Coordinates are unbounded, so points may drift out of view.
    pub fn evolve<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for point in &mut self.points {
            for coordinate in point.iter_mut() {
                *coordinate += rng.gen_range(-INFLUENCE..=INFLUENCE);
            }
        }
        self.steps += 1;
    }

    /// Every point projected onto the screen plane, centred on the origin.
    pub fn project(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| project_to_plane(p)).collect()
    }
}

/// `distance - depth`, kept away from zero.
fn perspective_divisor(distance: f64, depth: f64) -> f64 {
    let divisor = distance - depth;
    if divisor.abs() < MIN_DIVISOR {
        MIN_DIVISOR
    } else {
        divisor
    }
}

/// Perspective along `w`: `xyz / (PROJECTION_DISTANCE - w)`.
pub fn project_4d_to_3d(point: [f64; 4]) -> [f64; 3] {
    let [x, y, z, w] = point;
    let divisor = perspective_divisor(PROJECTION_DISTANCE, w);
    [x / divisor, y / divisor, z / divisor]
}

/// Perspective along `v` down to 4D, then along `w` down to 3D.
pub fn project_5d_to_3d(point: [f64; 5]) -> [f64; 3] {
    let [x, y, z, w, v] = point;
    let divisor = perspective_divisor(PROJECTION_DISTANCE, v);
    project_4d_to_3d([x / divisor, y / divisor, z / divisor, w / divisor])
}

/// Pinhole projection onto a screen [`SCREEN_DISTANCE`] in front of the viewer.
///
/// Points at or behind the viewer use a tiny positive depth.
pub fn project_3d_to_2d(point: [f64; 3]) -> (f64, f64) {
    let [x, y, z] = point;
    let mut depth = z + SCREEN_DISTANCE;
    if depth < MIN_DIVISOR {
        depth = MIN_DIVISOR;
    }
    (x * SCREEN_DISTANCE / depth, y * SCREEN_DISTANCE / depth)
}

/// Project a point of any supported dimension onto the plane.
///
/// Four and five coordinates go through the perspective steps; shorter
/// points are zero-padded to 3D and longer ones keep their first three axes.
pub fn project_to_plane(point: &[f64]) -> (f64, f64) {
    let at = |i: usize| point.get(i).copied().unwrap_or(0.0);
    let point_3d = match point.len() {
        4 => project_4d_to_3d([at(0), at(1), at(2), at(3)]),
        5 => project_5d_to_3d([at(0), at(1), at(2), at(3), at(4)]),
        _ => [at(0), at(1), at(2)],
    };
    project_3d_to_2d(point_3d)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_new_rejects_unsupported_dimensions() {
        let mut rng = StdRng::seed_from_u64(1);
        for dims in [0, 6, 10] {
            let err = PointCloud::new(&mut rng, 10, dims).unwrap_err();
            assert!(matches!(err, TallyError::Config(_)), "dims {dims}");
        }
    }

    #[test]
    fn test_new_points_lie_in_unit_hypercube() {
        let mut rng = StdRng::seed_from_u64(2);
        let cloud = PointCloud::new(&mut rng, NUM_POINTS, 5).unwrap();
        assert_eq!(cloud.len(), NUM_POINTS);
        assert_eq!(cloud.dimensions(), 5);
        assert_eq!(cloud.steps(), 0);
        for point in cloud.points() {
            assert_eq!(point.len(), 5);
            assert!(point.iter().all(|c| (-1.0..=1.0).contains(c)));
        }
    }

    #[test]
    fn test_with_defaults() {
        let cloud = PointCloud::with_defaults(&mut StdRng::seed_from_u64(3));
        assert_eq!(cloud.len(), NUM_POINTS);
        assert_eq!(cloud.dimensions(), DEFAULT_DIMENSIONS);
    }

    #[test]
    fn test_same_seed_same_cloud() {
        let a = PointCloud::new(&mut StdRng::seed_from_u64(9), 20, 4).unwrap();
        let b = PointCloud::new(&mut StdRng::seed_from_u64(9), 20, 4).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_evolve_moves_each_coordinate_by_at_most_influence() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut cloud = PointCloud::new(&mut rng, 30, 4).unwrap();
        let before = cloud.points().to_vec();
        cloud.evolve(&mut rng);
        assert_eq!(cloud.steps(), 1);
        assert_ne!(cloud.points(), before.as_slice());
        for (old, new) in before.iter().zip(cloud.points()) {
            for (a, b) in old.iter().zip(new) {
                assert!((a - b).abs() <= INFLUENCE + 1e-12);
            }
        }
    }

    #[test]
    fn test_regenerate_keeps_shape_and_resets_steps() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut cloud = PointCloud::new(&mut rng, 12, 5).unwrap();
        cloud.evolve(&mut rng);
        cloud.evolve(&mut rng);
        let before = cloud.clone();
        cloud.regenerate(&mut rng);
        assert_eq!(cloud.steps(), 0);
        assert_eq!(cloud.len(), 12);
        assert_eq!(cloud.dimensions(), 5);
        assert_ne!(cloud.points(), before.points());
    }

    #[test]
    fn test_project_4d_to_3d() {
        assert_eq!(project_4d_to_3d([1.0, 2.0, 3.0, 1.0]), [1.0, 2.0, 3.0]);
        assert_eq!(project_4d_to_3d([1.0, 2.0, 3.0, 0.0]), [0.5, 1.0, 1.5]);
    }

    #[test]
    fn test_project_4d_to_3d_clamps_zero_divisor() {
        let [x, y, _] = project_4d_to_3d([1.0, 0.0, 0.0, PROJECTION_DISTANCE]);
        assert!(close(x, 1.0 / MIN_DIVISOR));
        assert_eq!(y, 0.0);
    }

    #[test]
    fn test_project_5d_to_3d_goes_through_4d() {
        // v = 0 halves everything, then w = 1 leaves xyz unchanged.
        assert_eq!(
            project_5d_to_3d([2.0, 4.0, 6.0, 2.0, 0.0]),
            [1.0, 2.0, 3.0]
        );
    }

    #[test]
    fn test_project_3d_to_2d() {
        assert_eq!(project_3d_to_2d([1.0, 2.0, 0.0]), (1.0, 2.0));
        let (x, y) = project_3d_to_2d([10.0, -10.0, SCREEN_DISTANCE]);
        assert!(close(x, 5.0));
        assert!(close(y, -5.0));
    }

    #[test]
    fn test_project_3d_to_2d_behind_viewer_uses_tiny_depth() {
        let (x, _) = project_3d_to_2d([1.0, 0.0, -2.0 * SCREEN_DISTANCE]);
        assert!(close(x, SCREEN_DISTANCE / MIN_DIVISOR));
    }

    #[test]
    fn test_project_to_plane_pads_low_dimensions() {
        assert_eq!(project_to_plane(&[0.5, -0.5]), (0.5, -0.5));
        assert_eq!(project_to_plane(&[0.25]), (0.25, 0.0));
        assert_eq!(project_to_plane(&[1.0, 2.0, 0.0]), (1.0, 2.0));
    }

    #[test]
    fn test_project_cloud_matches_point_projection() {
        let cloud = PointCloud::new(&mut StdRng::seed_from_u64(6), 8, 4).unwrap();
        let projected = cloud.project();
        assert_eq!(projected.len(), 8);
        for (point, &xy) in cloud.points().iter().zip(&projected) {
            assert_eq!(project_to_plane(point), xy);
        }
    }

    proptest! {
        #[test]
        fn prop_fresh_points_project_near_origin(seed in any::<u64>(), dims in 1usize..=5) {
            let cloud = PointCloud::new(&mut StdRng::seed_from_u64(seed), 10, dims).unwrap();
            for (x, y) in cloud.project() {
                prop_assert!(x.abs() <= 1.01 && y.abs() <= 1.01);
            }
        }
    }
}

//! Polygonal room model with ray casting.

use crate::core::types::{LaserScan, Point2D, Pose2D};

/// A straight wall between two points (meters, world frame).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wall {
    pub start: Point2D,
    pub end: Point2D,
}

impl Wall {
    /// Create a wall from `start` to `end`.
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    /// Distance along a unit-direction ray to this wall, if the ray hits it.
    pub fn ray_intersection(&self, origin: &Point2D, dir_x: f64, dir_y: f64) -> Option<f64> {
        let seg_x = self.end.x - self.start.x;
        let seg_y = self.end.y - self.start.y;

        // origin + t·dir = start + s·seg
        let cross = dir_x * seg_y - dir_y * seg_x;
        if cross.abs() < 1e-12 {
            return None;
        }

        let to_start_x = self.start.x - origin.x;
        let to_start_y = self.start.y - origin.y;
        let t = (to_start_x * seg_y - to_start_y * seg_x) / cross;
        let s = (to_start_x * dir_y - to_start_y * dir_x) / cross;

        if t >= 0.0 && (0.0..=1.0).contains(&s) {
            Some(t)
        } else {
            None
        }
    }
}

/// A set of walls a simulated range sensor can see.
#[derive(Clone, Debug, Default)]
pub struct SyntheticRoom {
    walls: Vec<Wall>,
}

impl SyntheticRoom {
    /// Empty room (every ray misses).
    pub fn new() -> Self {
        Self::default()
    }

    /// Axis-aligned rectangular room between two corners.
    pub fn rectangle(min: Point2D, max: Point2D) -> Self {
        Self::new().with_box(
            Point2D::new(0.5 * (min.x + max.x), 0.5 * (min.y + max.y)),
            0.5 * (max.x - min.x),
            0.5 * (max.y - min.y),
        )
    }

    /// 8m × 6m room with two boxes and a slanted wall, off-centre around the origin.
    ///
    /// The asymmetry keeps scan matching well constrained along every axis.
    pub fn furnished() -> Self {
        Self::rectangle(Point2D::new(-3.0, -2.5), Point2D::new(5.0, 3.5))
            .with_box(Point2D::new(2.0, 1.5), 0.4, 0.3)
            .with_box(Point2D::new(-1.5, -1.0), 0.3, 0.5)
            .with_wall(Point2D::new(3.5, -2.0), Point2D::new(4.5, -0.8))
    }

    /// Add a single wall.
    pub fn with_wall(mut self, start: Point2D, end: Point2D) -> Self {
        self.walls.push(Wall::new(start, end));
        self
    }

    /// Add an axis-aligned box given its centre and half extents.
    pub fn with_box(self, center: Point2D, half_width: f64, half_height: f64) -> Self {
        let (x0, x1) = (center.x - half_width, center.x + half_width);
        let (y0, y1) = (center.y - half_height, center.y + half_height);
        self.with_wall(Point2D::new(x0, y0), Point2D::new(x1, y0))
            .with_wall(Point2D::new(x1, y0), Point2D::new(x1, y1))
            .with_wall(Point2D::new(x1, y1), Point2D::new(x0, y1))
            .with_wall(Point2D::new(x0, y1), Point2D::new(x0, y0))
    }

    /// All walls.
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Distance to the nearest wall along world-frame `angle`, if any.
    pub fn raycast(&self, origin: &Point2D, angle: f64) -> Option<f64> {
        let (dir_y, dir_x) = angle.sin_cos();
        self.walls
            .iter()
            .filter_map(|wall| wall.ray_intersection(origin, dir_x, dir_y))
            .filter(|&t| t > 0.0)
            .min_by(f64::total_cmp)
    }

    /// Simulate a scan taken at `pose`, using `template`'s metadata.
    ///
    /// Rays that miss or fall outside `[range_min, range_max]` read zero,
    /// the driver's invalid marker.
    pub fn scan_from(&self, pose: &Pose2D, template: &LaserScan) -> LaserScan {
        let origin = Point2D::new(pose.x, pose.y);
        let n = template.len();
        let step = if n > 1 {
            template.field_of_view() / (n - 1) as f64
        } else {
            0.0
        };
        let range_min = template.range_min as f64;
        let range_max = template.range_max as f64;

        let ranges = (0..n)
            .map(|i| {
                let angle = pose.theta + template.angle_min as f64 + i as f64 * step;
                match self.raycast(&origin, angle) {
                    Some(d) if d >= range_min && d <= range_max => d as f32,
                    _ => 0.0,
                }
            })
            .collect();

        LaserScan {
            ranges,
            ..template.clone()
        }
    }
}

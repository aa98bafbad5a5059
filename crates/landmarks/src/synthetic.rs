//! Synthetic landmark builders for tests and benchmarks.
//!
//! Produces geometrically consistent face meshes, poses and hands whose
//! derived measurements (face size, roll angle, iris offset, mouth lift,
//! shoulder heights) are known in advance.

use crate::frame::{Landmark, LandmarkFrame, LandmarkSet};
use crate::indices::{face, hand, pose};

/// Builder for a synthetic face mesh.
///
/// Face-oval extremes span a `size` x `size` bounding box around the nose, so
/// the measured face size equals `size`. Eyes and mouth are rotated by
/// `roll_deg` around the nose.
#[derive(Debug, Clone)]
pub struct SyntheticFace {
    center: (f64, f64),
    size: f64,
    roll_deg: f64,
    iris_offset: f64,
    mouth_lift: f64,
    with_iris: bool,
}

impl Default for SyntheticFace {
    fn default() -> Self {
        Self {
            center: (0.5, 0.5),
            size: 0.3,
            roll_deg: 0.0,
            iris_offset: 0.0,
            mouth_lift: 0.0,
            with_iris: true,
        }
    }
}

impl SyntheticFace {
    /// Centered, level, looking at the camera
    pub fn new() -> Self {
        Self::default()
    }

    /// Nose tip position
    #[must_use]
    pub fn centered_at(mut self, x: f64, y: f64) -> Self {
        self.center = (x, y);
        self
    }

    /// Bounding-box span (mean of width and height)
    #[must_use]
    pub fn size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    /// Eye-line angle in degrees (positive = clockwise in image space)
    #[must_use]
    pub fn roll(mut self, degrees: f64) -> Self {
        self.roll_deg = degrees;
        self
    }

    /// Horizontal iris offset from the eye center, as a fraction of eye width
    #[must_use]
    pub fn iris_offset(mut self, ratio: f64) -> Self {
        self.iris_offset = ratio;
        self
    }

    /// How far the mouth corners sit above the mid-mouth point
    #[must_use]
    pub fn mouth_lift(mut self, lift: f64) -> Self {
        self.mouth_lift = lift;
        self
    }

    /// Emit a 468-point mesh (detector without iris refinement)
    #[must_use]
    pub fn without_iris(mut self) -> Self {
        self.with_iris = false;
        self
    }

    pub fn build(&self) -> LandmarkSet {
        let count = if self.with_iris {
            face::REFINED_MESH_POINTS
        } else {
            face::MESH_POINTS
        };
        let (cx, cy) = self.center;
        let s = self.size;
        let mut points = vec![Landmark::new(cx, cy); count];

        // Oval extremes are not rotated so the bounding box stays exact
        points[face::FOREHEAD] = Landmark::new(cx, cy - 0.5 * s);
        points[face::CHIN] = Landmark::new(cx, cy + 0.5 * s);
        points[face::LEFT_CHEEK] = Landmark::new(cx - 0.5 * s, cy);
        points[face::RIGHT_CHEEK] = Landmark::new(cx + 0.5 * s, cy);

        let (sin, cos) = self.roll_deg.to_radians().sin_cos();
        let place = |dx: f64, dy: f64| {
            Landmark::new(
                cx + s * (dx * cos - dy * sin),
                cy + s * (dx * sin + dy * cos),
            )
        };

        points[face::LEFT_EYE_OUTER] = place(-0.35, -0.1);
        points[face::LEFT_EYE_INNER] = place(-0.15, -0.1);
        points[face::RIGHT_EYE_INNER] = place(0.15, -0.1);
        points[face::RIGHT_EYE_OUTER] = place(0.35, -0.1);

        points[face::UPPER_LIP] = place(0.0, 0.22);
        points[face::LOWER_LIP] = place(0.0, 0.28);
        let mut left_corner = place(-0.2, 0.25);
        let mut right_corner = place(0.2, 0.25);
        left_corner.y -= self.mouth_lift;
        right_corner.y -= self.mouth_lift;
        points[face::MOUTH_LEFT] = left_corner;
        points[face::MOUTH_RIGHT] = right_corner;

        if self.with_iris {
            points[face::LEFT_IRIS] = self.iris(
                &points[face::LEFT_EYE_OUTER],
                &points[face::LEFT_EYE_INNER],
            );
            points[face::RIGHT_IRIS] = self.iris(
                &points[face::RIGHT_EYE_OUTER],
                &points[face::RIGHT_EYE_INNER],
            );
        }

        LandmarkSet::new(points)
    }

    fn iris(&self, outer: &Landmark, inner: &Landmark) -> Landmark {
        let width = (outer.x - inner.x).abs();
        let center_x = (outer.x + inner.x) / 2.0;
        let center_y = (outer.y + inner.y) / 2.0;
        Landmark::new(center_x + self.iris_offset * width, center_y)
    }
}

/// Builder for a synthetic upper-body pose.
#[derive(Debug, Clone)]
pub struct SyntheticPose {
    center_x: f64,
    left_y: f64,
    right_y: f64,
    half_width: f64,
    visibility: f64,
}

impl Default for SyntheticPose {
    fn default() -> Self {
        Self {
            center_x: 0.5,
            left_y: 0.8,
            right_y: 0.8,
            half_width: 0.15,
            visibility: 0.99,
        }
    }
}

impl SyntheticPose {
    /// Level shoulders under the frame center
    pub fn new() -> Self {
        Self::default()
    }

    /// Horizontal midpoint between the shoulders
    #[must_use]
    pub fn centered_at(mut self, x: f64) -> Self {
        self.center_x = x;
        self
    }

    /// Vertical shoulder positions
    #[must_use]
    pub fn shoulders(mut self, left_y: f64, right_y: f64) -> Self {
        self.left_y = left_y;
        self.right_y = right_y;
        self
    }

    /// Visibility reported for both shoulders
    #[must_use]
    pub fn visibility(mut self, visibility: f64) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn build(&self) -> LandmarkSet {
        let mut points = vec![Landmark::new(self.center_x, 0.5); pose::POINTS];
        points[pose::LEFT_SHOULDER] =
            Landmark::new(self.center_x - self.half_width, self.left_y)
                .with_confidence(self.visibility);
        points[pose::RIGHT_SHOULDER] =
            Landmark::new(self.center_x + self.half_width, self.right_y)
                .with_confidence(self.visibility);
        LandmarkSet::new(points)
    }
}

/// Hand with every fingertip at `(x, y)` and the remaining joints just below
pub fn hand_at(x: f64, y: f64) -> LandmarkSet {
    let mut points = vec![Landmark::new(x, y + 0.1); hand::POINTS];
    for tip in hand::FINGERTIPS {
        points[tip] = Landmark::new(x, y);
    }
    LandmarkSet::new(points)
}

/// Frame of a candidate sitting straight, centered and looking at the camera
pub fn attentive_frame(sequence: u64) -> LandmarkFrame {
    LandmarkFrame::empty(sequence)
        .with_face(SyntheticFace::new().build())
        .with_pose(SyntheticPose::new().build())
}

//! Projective 2D transforms for quadrilateral image placement.

use kurbo::{Point, Rect};

/// Determinants below this magnitude are treated as singular.
const SINGULAR_EPSILON: f64 = 1e-12;

/// Destination-space placement of a source image's four corners.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Quad {
    /// Where the source's top-left corner lands.
    pub top_left: Point,
    /// Where the source's top-right corner lands.
    pub top_right: Point,
    /// Where the source's bottom-left corner lands.
    pub bottom_left: Point,
    /// Where the source's bottom-right corner lands.
    pub bottom_right: Point,
}

impl Quad {
    /// Build a quad from four corner points.
    pub fn new(
        top_left: impl Into<Point>,
        top_right: impl Into<Point>,
        bottom_left: impl Into<Point>,
        bottom_right: impl Into<Point>,
    ) -> Self {
        Self {
            top_left: top_left.into(),
            top_right: top_right.into(),
            bottom_left: bottom_left.into(),
            bottom_right: bottom_right.into(),
        }
    }

    /// The axis-aligned quad covering `rect`.
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            top_left: Point::new(rect.x0, rect.y0),
            top_right: Point::new(rect.x1, rect.y0),
            bottom_left: Point::new(rect.x0, rect.y1),
            bottom_right: Point::new(rect.x1, rect.y1),
        }
    }

    /// Axis-aligned bounding rect of the four corners.
    pub fn bounds(&self) -> Rect {
        let xs = [
            self.top_left.x,
            self.top_right.x,
            self.bottom_left.x,
            self.bottom_right.x,
        ];
        let ys = [
            self.top_left.y,
            self.top_right.y,
            self.bottom_left.y,
            self.bottom_right.y,
        ];
        let fold = |vals: [f64; 4], pick: fn(f64, f64) -> f64| {
            vals.into_iter().reduce(pick).unwrap_or(0.0)
        };
        Rect::new(
            fold(xs, f64::min),
            fold(ys, f64::min),
            fold(xs, f64::max),
            fold(ys, f64::max),
        )
    }
}

/// A 3x3 projective matrix over homogeneous 2D points, row-major:
///
/// ```text
/// | m0 m1 m2 |       x' = (m0*x + m1*y + m2) / w'
/// | m3 m4 m5 |       y' = (m3*x + m4*y + m5) / w'
/// | m6 m7 m8 |       w' =  m6*x + m7*y + m8
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    m: [f64; 9],
}

impl Homography {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    /// Build from nine row-major coefficients.
    pub fn from_coeffs(m: [f64; 9]) -> Self {
        Self { m }
    }

    /// The nine row-major coefficients.
    pub fn coeffs(&self) -> [f64; 9] {
        self.m
    }

    /// Solve the transform taking the unit square's corners
    /// `(0,0) (1,0) (0,1) (1,1)` to the quad's corners.
    ///
    /// Parallelograms resolve to a plain affine matrix; a singular corner
    /// system returns `None`.
    pub fn unit_square_to_quad(quad: &Quad) -> Option<Self> {
        let (x0, y0) = (quad.top_left.x, quad.top_left.y);
        let (x1, y1) = (quad.top_right.x, quad.top_right.y);
        let (x2, y2) = (quad.bottom_right.x, quad.bottom_right.y);
        let (x3, y3) = (quad.bottom_left.x, quad.bottom_left.y);

        let dx = x0 - x1 + x2 - x3;
        let dy = y0 - y1 + y2 - y3;

        if dx == 0.0 && dy == 0.0 {
            // Parallelogram: the affine solution is exact.
            return Some(Self::from_coeffs([
                x1 - x0,
                x3 - x0,
                x0,
                y1 - y0,
                y3 - y0,
                y0,
                0.0,
                0.0,
                1.0,
            ]));
        }

        let dx1 = x1 - x2;
        let dy1 = y1 - y2;
        let dx2 = x3 - x2;
        let dy2 = y3 - y2;
        let den = dx1 * dy2 - dx2 * dy1;
        if den == 0.0 {
            return None;
        }
        let u = (dx * dy2 - dy * dx2) / den;
        let v = (dy * dx1 - dx * dy1) / den;

        Some(Self::from_coeffs([
            x1 - x0 + u * x1,
            x3 - x0 + v * x3,
            x0,
            y1 - y0 + u * y1,
            y3 - y0 + v * y3,
            y0,
            u,
            v,
            1.0,
        ]))
    }

    /// Solve the transform taking the rectangle `(0,0)-(width,height)` to
    /// the quad's corners.
    pub fn rect_to_quad(width: f64, height: f64, quad: &Quad) -> Option<Self> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let unit = Self::unit_square_to_quad(quad)?;
        let mut m = unit.m;
        // Pre-scale the unit square back to (0,0)-(width,height).
        for row in 0..3 {
            m[row * 3] /= width;
            m[row * 3 + 1] /= height;
        }
        Some(Self::from_coeffs(m))
    }

    /// The inverse transform, or `None` when this matrix is singular
    /// (for corner mappings: three or more corners colinear).
    pub fn invert(&self) -> Option<Self> {
        let m = &self.m;
        let adj = [
            m[4] * m[8] - m[5] * m[7],
            m[2] * m[7] - m[1] * m[8],
            m[1] * m[5] - m[2] * m[4],
            m[5] * m[6] - m[3] * m[8],
            m[0] * m[8] - m[2] * m[6],
            m[2] * m[3] - m[0] * m[5],
            m[3] * m[7] - m[4] * m[6],
            m[1] * m[6] - m[0] * m[7],
            m[0] * m[4] - m[1] * m[3],
        ];
        let det = m[0] * adj[0] + m[1] * adj[3] + m[2] * adj[6];
        if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
            return None;
        }
        let mut out = [0.0; 9];
        for (o, a) in out.iter_mut().zip(adj) {
            *o = a / det;
        }
        Some(Self::from_coeffs(out))
    }

    /// Transform a point, applying the perspective divide.
    ///
    /// Points on the transform's vanishing line divide by zero and come
    /// back non-finite; callers treat those as out of bounds.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let m = &self.m;
        let w = m[6] * x + m[7] * y + m[8];
        (
            (m[0] * x + m[1] * y + m[2]) / w,
            (m[3] * x + m[4] * y + m[5]) / w,
        )
    }
}

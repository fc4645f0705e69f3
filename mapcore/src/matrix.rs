//! 2D affine transformations used to move between the projection plane, the tile grid and the
//! screen.
//!
//! Points are row vectors multiplied from the left, so a matrix maps `(x, y)` to
//! `(x·m11 + y·m21 + offset_x, x·m12 + y·m22 + offset_y)`, and [`Matrix::append`] composes
//! transformations in the order they are applied.

use geo_types::{Coord, Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct Matrix {
    pub m11: f64,
    pub m12: f64,
    pub m21: f64,
    pub m22: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub const fn new(m11: f64, m12: f64, m21: f64, m22: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            m11,
            m12,
            m21,
            m22,
            offset_x,
            offset_y,
        }
    }

    pub const fn identity() -> Self {
        Self::new(1., 0., 0., 1., 0., 0.)
    }

    /// Transformation which applies `self` first and `other` afterwards.
    #[must_use]
    pub fn append(&self, other: &Matrix) -> Matrix {
        Matrix {
            m11: self.m11 * other.m11 + self.m12 * other.m21,
            m12: self.m11 * other.m12 + self.m12 * other.m22,
            m21: self.m21 * other.m11 + self.m22 * other.m21,
            m22: self.m21 * other.m12 + self.m22 * other.m22,
            offset_x: self.offset_x * other.m11 + self.offset_y * other.m21 + other.offset_x,
            offset_y: self.offset_x * other.m12 + self.offset_y * other.m22 + other.offset_y,
        }
    }

    #[must_use]
    pub fn translate(&self, x: f64, y: f64) -> Matrix {
        self.append(&Matrix::new(1., 0., 0., 1., x, y))
    }

    #[must_use]
    pub fn scale(&self, x: f64, y: f64) -> Matrix {
        self.append(&Matrix::new(x, 0., 0., y, 0., 0.))
    }

    /// Rotate around the origin. Positive angles (in degrees) turn the x axis towards the y axis,
    /// which is clockwise on a screen whose y axis points down.
    #[must_use]
    pub fn rotate(&self, degrees: f64) -> Matrix {
        let (sin, cos) = degrees.to_radians().sin_cos();
        self.append(&Matrix::new(cos, sin, -sin, cos, 0., 0.))
    }

    pub fn determinant(&self) -> f64 {
        self.m11 * self.m22 - self.m12 * self.m21
    }

    pub fn is_finite(&self) -> bool {
        [
            self.m11,
            self.m12,
            self.m21,
            self.m22,
            self.offset_x,
            self.offset_y,
        ]
        .iter()
        .all(|value| value.is_finite())
    }

    /// Analytic inverse. `None` if the matrix is singular or contains non-finite values.
    pub fn invert(&self) -> Option<Matrix> {
        let det = self.determinant();
        if det == 0. || !det.is_finite() || !self.is_finite() {
            return None;
        }

        Some(Matrix {
            m11: self.m22 / det,
            m12: -self.m12 / det,
            m21: -self.m21 / det,
            m22: self.m11 / det,
            offset_x: (self.m21 * self.offset_y - self.m22 * self.offset_x) / det,
            offset_y: (self.m12 * self.offset_x - self.m11 * self.offset_y) / det,
        })
    }

    pub fn transform(&self, point: Point) -> Point {
        Point::new(
            point.x() * self.m11 + point.y() * self.m21 + self.offset_x,
            point.x() * self.m12 + point.y() * self.m22 + self.offset_y,
        )
    }

    /// Axis-aligned bounding box of the transformed rectangle.
    pub fn transform_bounds(&self, rect: Rect) -> Rect {
        let corners = [
            (rect.min().x, rect.min().y),
            (rect.max().x, rect.min().y),
            (rect.min().x, rect.max().y),
            (rect.max().x, rect.max().y),
        ]
        .map(|(x, y)| self.transform(Point::new(x, y)));

        let (mut min, mut max) = (corners[0].0, corners[0].0);
        for corner in &corners[1..] {
            min.x = min.x.min(corner.x());
            min.y = min.y.min(corner.y());
            max.x = max.x.max(corner.x());
            max.y = max.y.max(corner.y());
        }

        Rect::new(min, Coord { x: max.x, y: max.y })
    }
}

/// Translate by `(t1x, t1y)`, scale, rotate by `angle` degrees and finally translate by
/// `(t2x, t2y)`.
pub fn translate_scale_rotate_translate(
    t1x: f64,
    t1y: f64,
    sx: f64,
    sy: f64,
    angle: f64,
    t2x: f64,
    t2y: f64,
) -> Matrix {
    Matrix::identity()
        .translate(t1x, t1y)
        .scale(sx, sy)
        .rotate(angle)
        .translate(t2x, t2y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_point_eq(expected: Point, actual: Point) {
        approx::assert_abs_diff_eq!(expected.x(), actual.x(), epsilon = 1e-9);
        approx::assert_abs_diff_eq!(expected.y(), actual.y(), epsilon = 1e-9);
    }

    #[test]
    fn operations_apply_in_order() {
        let matrix = Matrix::identity().translate(1., 2.).scale(10., -10.);
        assert_point_eq(Point::new(10., -20.), matrix.transform(Point::new(0., 0.)));

        let matrix = Matrix::identity().scale(10., -10.).translate(1., 2.);
        assert_point_eq(Point::new(1., 2.), matrix.transform(Point::new(0., 0.)));
    }

    #[test]
    fn rotating_quarter_turn() {
        let matrix = Matrix::identity().rotate(90.);
        assert_point_eq(Point::new(0., 1.), matrix.transform(Point::new(1., 0.)));
        assert_point_eq(Point::new(-1., 0.), matrix.transform(Point::new(0., 1.)));
    }

    #[test]
    fn inverse_composes_to_identity() {
        let matrix = translate_scale_rotate_translate(-120., 45., 3.5, -2., 33., 400., 300.);
        let inverse = matrix.invert().unwrap();
        let product = matrix.append(&inverse);

        assert_relative_eq!(1., product.m11, epsilon = 1e-12);
        assert_relative_eq!(0., product.m12, epsilon = 1e-12);
        assert_relative_eq!(0., product.m21, epsilon = 1e-12);
        assert_relative_eq!(1., product.m22, epsilon = 1e-12);
        assert_relative_eq!(0., product.offset_x, epsilon = 1e-9);
        assert_relative_eq!(0., product.offset_y, epsilon = 1e-9);

        let point = Point::new(17., -3.);
        assert_point_eq(point, inverse.transform(matrix.transform(point)));
    }

    #[test]
    fn singular_and_non_finite_matrices_have_no_inverse() {
        assert_eq!(None, Matrix::identity().scale(0., 1.).invert());
        assert_eq!(None, Matrix::identity().translate(f64::NAN, 0.).invert());
        assert_eq!(None, Matrix::identity().scale(f64::INFINITY, 1.).invert());
    }

    #[test]
    fn bounds_of_rotated_rectangle() {
        let rect = Rect::new(Coord { x: -1., y: -1. }, Coord { x: 1., y: 1. });
        let bounds = Matrix::identity().rotate(45.).transform_bounds(rect);
        let half_diagonal = 2f64.sqrt();

        assert_relative_eq!(-half_diagonal, bounds.min().x, epsilon = 1e-12);
        assert_relative_eq!(-half_diagonal, bounds.min().y, epsilon = 1e-12);
        assert_relative_eq!(half_diagonal, bounds.max().x, epsilon = 1e-12);
        assert_relative_eq!(half_diagonal, bounds.max().y, epsilon = 1e-12);
    }
}

use crate::shared::geometry::Point;

/// Bounding box of one detected face, in frame pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectedFace {
    pub top_left: Point,
    pub bottom_right: Point,
    /// Detector score in `[0, 1]`, when the backend reports one.
    pub confidence: Option<f64>,
}

impl DetectedFace {
    pub fn new(top_left: Point, bottom_right: Point) -> Self {
        Self {
            top_left,
            bottom_right,
            confidence: None,
        }
    }

    pub fn width(&self) -> f64 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> f64 {
        self.bottom_right.y - self.top_left.y
    }

    /// `top_left + (bottom_right - top_left) / 2`
    pub fn center(&self) -> Point {
        Point::new(
            self.top_left.x + self.width() / 2.0,
            self.top_left.y + self.height() / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_center_of_box() {
        let face = DetectedFace::new(Point::new(290.0, 210.0), Point::new(350.0, 270.0));
        assert_eq!(face.center(), Point::new(320.0, 240.0));
    }

    #[test]
    fn test_dimensions() {
        let face = DetectedFace::new(Point::new(10.0, 20.0), Point::new(110.0, 170.0));
        assert_relative_eq!(face.width(), 100.0);
        assert_relative_eq!(face.height(), 150.0);
    }

    #[test]
    fn test_center_of_fractional_box() {
        let face = DetectedFace::new(Point::new(0.5, 0.5), Point::new(2.0, 3.5));
        let c = face.center();
        assert_relative_eq!(c.x, 1.25);
        assert_relative_eq!(c.y, 2.0);
    }
}

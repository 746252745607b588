/// A point in a 2-D pixel coordinate space (frame or container).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Width and height of a frame or display container, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions are finite and strictly positive.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width as f64, height as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_distance_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_relative_eq!(a.distance_to(b), 5.0);
        assert_relative_eq!(b.distance_to(a), 5.0);
    }

    #[test]
    fn test_center_of_size() {
        let size = Size::new(640.0, 480.0);
        assert_eq!(size.center(), Point::new(320.0, 240.0));
    }

    #[test]
    fn test_from_u32_pair() {
        let size: Size = (1280, 720).into();
        assert_relative_eq!(size.aspect(), 16.0 / 9.0);
    }

    #[rstest]
    #[case::regular(Size::new(640.0, 480.0), true)]
    #[case::zero_width(Size::new(0.0, 480.0), false)]
    #[case::zero_height(Size::new(640.0, 0.0), false)]
    #[case::negative(Size::new(-1.0, 480.0), false)]
    #[case::nan(Size::new(f64::NAN, 480.0), false)]
    fn test_is_drawable(#[case] size: Size, #[case] expected: bool) {
        assert_eq!(size.is_drawable(), expected);
    }
}

use crate::shared::geometry::{Point, Size};

/// How the live view is fitted into its container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FitMode {
    /// Container relatively wider than the frame scales by width and
    /// centers vertically; otherwise scales by height and centers
    /// horizontally. The overflowing axis is cropped, so its offset is
    /// negative or zero.
    #[default]
    Cover,
    /// Whole frame visible: scales by the limiting side and pads the
    /// other, so both offsets are non-negative.
    Contain,
}

/// Uniform scale plus centering offset that places a frame inside a
/// display container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportMapping {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl ViewportMapping {
    /// Cover fit, as used by the live view.
    pub fn fit(frame: Size, container: Size) -> Option<Self> {
        Self::fit_with(frame, container, FitMode::Cover)
    }

    /// `None` when either size has a zero, negative or non-finite side.
    pub fn fit_with(frame: Size, container: Size, mode: FitMode) -> Option<Self> {
        if !frame.is_drawable() || !container.is_drawable() {
            return None;
        }

        let container_wider = container.aspect() > frame.aspect();
        let by_width = match mode {
            FitMode::Cover => container_wider,
            FitMode::Contain => !container_wider,
        };

        let mapping = if by_width {
            let scale = container.width / frame.width;
            ViewportMapping {
                scale,
                offset_x: 0.0,
                offset_y: (container.height - frame.height * scale) / 2.0,
            }
        } else {
            let scale = container.height / frame.height;
            ViewportMapping {
                scale,
                offset_x: (container.width - frame.width * scale) / 2.0,
                offset_y: 0.0,
            }
        };
        Some(mapping)
    }

    /// Frame coordinates to container coordinates.
    pub fn map(&self, point: Point) -> Point {
        Point::new(
            point.x * self.scale + self.offset_x,
            point.y * self.scale + self.offset_y,
        )
    }
}

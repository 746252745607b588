use crate::alignment::domain::alignment_state::AlignmentState;
use crate::alignment::domain::viewport_mapping::{FitMode, ViewportMapping};
use crate::detection::domain::detected_face::DetectedFace;
use crate::shared::geometry::{Point, Size};

/// Result of evaluating one frame's detections.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlignmentReading {
    pub state: AlignmentState,
    /// Face center in container coordinates, when a face was mapped.
    pub mapped_center: Option<Point>,
    /// Distance from `mapped_center` to the container center.
    pub distance: Option<f64>,
}

impl AlignmentReading {
    pub fn misaligned() -> Self {
        Self {
            state: AlignmentState::Misaligned,
            mapped_center: None,
            distance: None,
        }
    }
}

/// Decides alignment from a frame's detections and the current
/// container geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlignmentEvaluator {
    radius: f64,
    fit: FitMode,
}

impl AlignmentEvaluator {
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            fit: FitMode::default(),
        }
    }

    pub fn with_fit(mut self, fit: FitMode) -> Self {
        self.fit = fit;
        self
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Only the first face counts. No face, or no usable mapping, is
    /// always misaligned.
    pub fn evaluate(&self, faces: &[DetectedFace], frame: Size, container: Size) -> AlignmentReading {
        let Some(face) = faces.first() else {
            return AlignmentReading::misaligned();
        };
        let Some(mapping) = ViewportMapping::fit_with(frame, container, self.fit) else {
            return AlignmentReading::misaligned();
        };

        let mapped = mapping.map(face.center());
        let distance = mapped.distance_to(container.center());
        AlignmentReading {
            state: AlignmentState::from_distance(distance, self.radius),
            mapped_center: Some(mapped),
            distance: Some(distance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const VGA: Size = Size::new(640.0, 480.0);

    fn face_at(cx: f64, cy: f64) -> DetectedFace {
        DetectedFace::new(Point::new(cx - 30.0, cy - 30.0), Point::new(cx + 30.0, cy + 30.0))
    }

    #[test]
    fn test_centered_face_is_aligned() {
        let face = DetectedFace::new(Point::new(290.0, 210.0), Point::new(350.0, 270.0));
        let reading = AlignmentEvaluator::new(60.0).evaluate(&[face], VGA, VGA);

        assert_eq!(reading.state, AlignmentState::Aligned);
        assert_eq!(reading.mapped_center, Some(Point::new(320.0, 240.0)));
        assert_relative_eq!(reading.distance.unwrap(), 0.0);
    }

    #[test]
    fn test_far_face_is_misaligned() {
        let reading = AlignmentEvaluator::new(60.0).evaluate(&[face_at(500.0, 240.0)], VGA, VGA);
        assert_eq!(reading.state, AlignmentState::Misaligned);
        assert_relative_eq!(reading.distance.unwrap(), 180.0);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let evaluator = AlignmentEvaluator::new(60.0);
        let at_radius = evaluator.evaluate(&[face_at(380.0, 240.0)], VGA, VGA);
        let past_radius = evaluator.evaluate(&[face_at(381.0, 240.0)], VGA, VGA);

        assert_eq!(at_radius.state, AlignmentState::Aligned);
        assert_eq!(past_radius.state, AlignmentState::Misaligned);
    }

    #[test]
    fn test_no_faces_is_misaligned() {
        let reading = AlignmentEvaluator::new(60.0).evaluate(&[], VGA, VGA);
        assert_eq!(reading, AlignmentReading::misaligned());
    }

    #[test]
    fn test_only_first_face_counts() {
        let evaluator = AlignmentEvaluator::new(60.0);
        let far_first = [face_at(600.0, 50.0), face_at(320.0, 240.0)];
        let near_first = [face_at(320.0, 240.0), face_at(600.0, 50.0)];

        assert_eq!(
            evaluator.evaluate(&far_first, VGA, VGA).state,
            AlignmentState::Misaligned
        );
        assert_eq!(
            evaluator.evaluate(&near_first, VGA, VGA).state,
            AlignmentState::Aligned
        );
    }

    #[test]
    fn test_radius_is_in_container_pixels() {
        // Frame scaled ×2: a 40 px frame offset becomes 80 px on screen.
        let container = Size::new(1280.0, 960.0);
        let reading =
            AlignmentEvaluator::new(60.0).evaluate(&[face_at(360.0, 240.0)], VGA, container);

        assert_relative_eq!(reading.distance.unwrap(), 80.0);
        assert_eq!(reading.state, AlignmentState::Misaligned);
    }

    #[test]
    fn test_contain_fit_changes_mapping() {
        let container = Size::new(1280.0, 720.0);
        let face = [face_at(320.0, 200.0)];

        let cover = AlignmentEvaluator::new(60.0).evaluate(&face, VGA, container);
        let contain = AlignmentEvaluator::new(60.0)
            .with_fit(FitMode::Contain)
            .evaluate(&face, VGA, container);

        // Cover scales ×2 (80 px off), contain ×1.5 (60 px off).
        assert_relative_eq!(cover.distance.unwrap(), 80.0);
        assert_relative_eq!(contain.distance.unwrap(), 60.0);
        assert_eq!(contain.state, AlignmentState::Aligned);
    }

    #[test]
    fn test_degenerate_container_is_misaligned() {
        let reading = AlignmentEvaluator::new(60.0).evaluate(
            &[face_at(320.0, 240.0)],
            VGA,
            Size::new(0.0, 0.0),
        );
        assert_eq!(reading, AlignmentReading::misaligned());
    }
}

/// Whether the face is centered closely enough to allow a capture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlignmentState {
    Aligned,
    #[default]
    Misaligned,
}

impl AlignmentState {
    /// Inclusive at the boundary: `distance == radius` is aligned.
    pub fn from_distance(distance: f64, radius: f64) -> Self {
        if distance <= radius {
            AlignmentState::Aligned
        } else {
            AlignmentState::Misaligned
        }
    }

    pub fn is_aligned(self) -> bool {
        self == AlignmentState::Aligned
    }
}

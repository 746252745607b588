use std::sync::{Arc, RwLock};

use crate::shared::geometry::Size;

/// Current on-screen size of the live view.
///
/// Cloned handles share one value, so a resize from the UI side is seen
/// by the tracker on its next cycle.
#[derive(Clone, Debug)]
pub struct DisplayContainer {
    size: Arc<RwLock<Size>>,
}

impl DisplayContainer {
    pub fn new(size: Size) -> Self {
        Self {
            size: Arc::new(RwLock::new(size)),
        }
    }

    pub fn size(&self) -> Size {
        *self.size.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn resize(&self, size: Size) {
        *self.size.write().unwrap_or_else(|e| e.into_inner()) = size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_visible_through_clones() {
        let container = DisplayContainer::new(Size::new(640.0, 480.0));
        let seen_by_tracker = container.clone();

        container.resize(Size::new(1280.0, 720.0));

        assert_eq!(seen_by_tracker.size(), Size::new(1280.0, 720.0));
    }
}

//! Webcam-guided face capture and facial-symmetry analysis client.
//!
//! The alignment tracker maps detected face boxes from frame space into
//! display-container space and gates the capture action on the distance
//! to the container center. Capture sources, the detector model and the
//! analysis endpoint sit behind domain traits.

pub mod shared {
    pub mod config;
    pub mod constants;
    pub mod frame;
    pub mod geometry;
    pub mod model_resolver;
}

pub mod capture {
    pub mod capture_source_manager;
    pub mod domain {
        pub mod camera_device;
        pub mod capture_error;
        pub mod frame_source;
    }
    pub mod infrastructure;
}

pub mod detection {
    pub mod domain {
        pub mod detected_face;
        pub mod detection_error;
        pub mod face_detector;
    }
    pub mod infrastructure;
}

pub mod alignment {
    pub mod alignment_tracker;
    pub mod domain {
        pub mod alignment_evaluator;
        pub mod alignment_observer;
        pub mod alignment_state;
        pub mod display_container;
        pub mod viewport_mapping;
    }
}

pub mod analysis {
    pub mod domain {
        pub mod analysis_service;
        pub mod score_map;
        pub mod transport_error;
    }
    pub mod infrastructure;
}

pub mod presentation {
    pub mod score_bar;
    pub mod text_renderer;
}

pub mod pipeline {
    pub mod session_error;
    pub mod submission_gate;
    pub mod symmetry_session;
    pub mod ui_state;
    pub mod upload_image_use_case;
    pub mod webcam_capture_use_case;
}

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};

use facesym_core::alignment::alignment_tracker::run_cycle;
use facesym_core::alignment::domain::alignment_evaluator::AlignmentEvaluator;
use facesym_core::alignment::domain::viewport_mapping::FitMode;
use facesym_core::analysis::domain::analysis_service::AnalysisService;
use facesym_core::analysis::infrastructure::http_analysis_client::HttpAnalysisClient;
use facesym_core::capture::domain::camera_device::CameraDevice;
use facesym_core::capture::infrastructure::image_sequence_camera::ImageSequenceCamera;
use facesym_core::capture::infrastructure::still_codec;
use facesym_core::detection::domain::face_detector::FaceModelLoader;
use facesym_core::detection::infrastructure::blazeface_loader::BlazefaceLoader;
use facesym_core::pipeline::session_error::SessionError;
use facesym_core::pipeline::submission_gate::SubmissionGate;
use facesym_core::pipeline::symmetry_session::SymmetrySession;
use facesym_core::pipeline::ui_state::{lock_ui, shared_ui, Mode, ResultsPanel};
use facesym_core::pipeline::upload_image_use_case::UploadImageUseCase;
use facesym_core::shared::config::SessionConfig;
use facesym_core::shared::constants::{ALIGNMENT_RADIUS, BLAZEFACE_MODEL_NAME, DEFAULT_ENDPOINT};
use facesym_core::shared::geometry::Size;
use facesym_core::shared::model_resolver::{self, ModelLocation};

/// Facial symmetry analysis from an image file or a guided webcam capture.
#[derive(Parser)]
#[command(name = "facesym")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Base URL of the analysis service.
    #[arg(long, global = true, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Request timeout in seconds (client default if omitted).
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Alignment radius in container pixels.
    #[arg(long, global = true, default_value_t = ALIGNMENT_RADIUS)]
    radius: f64,

    /// On-screen size of the live view as WIDTHxHEIGHT (defaults to the frame size).
    #[arg(long, global = true)]
    container: Option<String>,

    /// How the frame fills the container: cover or contain.
    #[arg(long, global = true, default_value = "cover")]
    fit: String,

    /// Path to the BlazeFace ONNX model.
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// URL to download the BlazeFace model from if it is not cached.
    #[arg(long, global = true)]
    model_url: Option<String>,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, global = true, default_value = "0.75")]
    confidence: f64,
}

#[derive(Subcommand)]
enum Command {
    /// Upload an image file for analysis.
    Upload {
        /// Image to analyze.
        file: PathBuf,
    },
    /// Stream from a camera, wait for the face to be centered, then capture.
    Webcam {
        /// Replay images from this directory instead of a camera.
        #[arg(long)]
        frames: Option<PathBuf>,

        /// Camera device index.
        #[arg(long, default_value = "0")]
        camera_index: u32,

        /// Give up if the face is not aligned within this many seconds.
        #[arg(long, default_value = "30")]
        max_wait_secs: u64,
    },
    /// Report face alignment for a single still image.
    Align {
        /// Image to check.
        image: PathBuf,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;
    let config = build_config(&cli)?;

    match &cli.command {
        Command::Upload { file } => run_upload(&config, file),
        Command::Webcam {
            frames,
            camera_index,
            max_wait_secs,
        } => run_webcam(
            &config,
            frames.as_deref(),
            *camera_index,
            Duration::from_secs(*max_wait_secs),
        ),
        Command::Align { image } => run_align(&config, image),
    }
}

fn run_upload(config: &SessionConfig, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let ui = shared_ui();
    let use_case = UploadImageUseCase::new(
        build_service(config)?,
        ui.clone(),
        SubmissionGate::new(),
        config.jpeg_quality,
    );

    let outcome = use_case
        .select_path(file)
        .and_then(|_| use_case.upload());
    if let Err(e) = outcome {
        return Err(e.user_message().into());
    }
    println!("{}", lock_ui(&ui).results_text());
    Ok(())
}

fn run_webcam(
    config: &SessionConfig,
    frames: Option<&Path>,
    camera_index: u32,
    max_wait: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let camera = build_camera(frames, camera_index)?;
    let loader = build_loader(config)?;
    let mut session = SymmetrySession::new(config, camera, loader, build_service(config)?);

    if let Err(e) = session.select_mode(Mode::Webcam) {
        return Err(e.user_message().into());
    }
    eprintln!("Center your face in the frame...");

    let result = wait_and_capture(&mut session, max_wait);
    session.stop_webcam();
    result?;

    println!("{}", session.snapshot().results_text());
    Ok(())
}

fn wait_and_capture(
    session: &mut SymmetrySession,
    max_wait: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let deadline = Instant::now() + max_wait;
    let mut was_aligned = false;

    loop {
        let ui = session.snapshot();
        if let ResultsPanel::Error(message) = &ui.results {
            return Err(message.clone().into());
        }
        if ui.capture_enabled {
            eprintln!("Aligned, capturing");
            match session.capture() {
                Ok(_) => return Ok(()),
                // Alignment was lost between the snapshot and the capture.
                Err(SessionError::CaptureDisabled) => {}
                Err(e) => return Err(e.user_message().into()),
            }
        }
        if was_aligned && ui.misaligned {
            eprintln!("Lost alignment");
        }
        was_aligned = !ui.misaligned;

        if Instant::now() >= deadline {
            return Err(format!(
                "Face was not aligned within {} seconds",
                max_wait.as_secs()
            )
            .into());
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

fn run_align(config: &SessionConfig, image: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let frame = still_codec::decode_file(image)?;
    let container = config.container.unwrap_or_else(|| frame.size());
    let evaluator = AlignmentEvaluator::new(config.alignment_radius).with_fit(config.fit);

    let mut detector = build_loader(config)?.load()?;
    let reading = run_cycle(detector.as_mut(), &evaluator, &frame, container)?;

    println!(
        "Frame {}x{} in container {}x{}",
        frame.width(),
        frame.height(),
        container.width,
        container.height
    );
    match (reading.mapped_center, reading.distance) {
        (Some(center), Some(distance)) => println!(
            "Face center ({:.1}, {:.1}), {:.1} px from center (radius {})",
            center.x,
            center.y,
            distance,
            evaluator.radius()
        ),
        _ => println!("No face detected"),
    }
    println!("{:?}", reading.state);
    Ok(())
}

fn build_config(cli: &Cli) -> Result<SessionConfig, Box<dyn std::error::Error>> {
    Ok(SessionConfig {
        endpoint: cli.endpoint.clone(),
        alignment_radius: cli.radius,
        container: cli.container.as_deref().map(parse_container).transpose()?,
        fit: parse_fit(&cli.fit)?,
        request_timeout: cli.timeout_secs.map(Duration::from_secs),
        detector_confidence: cli.confidence,
        model_path: cli.model.clone(),
        model_url: cli.model_url.clone(),
        ..SessionConfig::default()
    })
}

fn build_service(
    config: &SessionConfig,
) -> Result<Arc<dyn AnalysisService>, Box<dyn std::error::Error>> {
    Ok(Arc::new(HttpAnalysisClient::new(
        &config.endpoint,
        config.request_timeout,
    )?))
}

/// Fetches the model up front when it has to be downloaded, so progress
/// can be shown before the live view starts.
fn build_loader(
    config: &SessionConfig,
) -> Result<Arc<dyn FaceModelLoader>, Box<dyn std::error::Error>> {
    let mut model_path = config.model_path.clone();
    if model_path.is_none() {
        if let Some(url) = config.model_url.as_deref() {
            log::info!("Resolving model: {BLAZEFACE_MODEL_NAME}");
            let location = ModelLocation {
                name: BLAZEFACE_MODEL_NAME,
                explicit: None,
                bundled_dir: None,
                url: Some(url),
            };
            model_path = Some(model_resolver::resolve(
                &location,
                Some(Box::new(download_progress)),
            )?);
            eprintln!();
        }
    }

    Ok(Arc::new(
        BlazefaceLoader::new(config.detector_confidence)
            .with_model_path(model_path)
            .with_bundled_dir(bundled_model_dir()),
    ))
}

fn build_camera(
    frames: Option<&Path>,
    camera_index: u32,
) -> Result<Box<dyn CameraDevice>, Box<dyn std::error::Error>> {
    if let Some(dir) = frames {
        return Ok(Box::new(ImageSequenceCamera::from_dir(
            dir,
            Duration::from_millis(33),
        )));
    }

    #[cfg(feature = "camera")]
    {
        use facesym_core::capture::infrastructure::nokhwa_camera::NokhwaCamera;
        Ok(Box::new(NokhwaCamera::new(camera_index)))
    }
    #[cfg(not(feature = "camera"))]
    {
        let _ = camera_index;
        Err("No camera backend in this build; pass --frames DIR or rebuild with --features camera".into())
    }
}

/// `models/` next to the executable, if present.
fn bundled_model_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("models")))
        .filter(|dir| dir.is_dir())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        Command::Upload { file } | Command::Align { image: file } => {
            if !file.exists() {
                return Err(format!("Input file not found: {}", file.display()).into());
            }
        }
        Command::Webcam { frames, .. } => {
            if let Some(dir) = frames {
                if !dir.is_dir() {
                    return Err(format!("Frames directory not found: {}", dir.display()).into());
                }
            }
        }
    }
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if cli.radius.is_nan() || cli.radius <= 0.0 {
        return Err(format!("Radius must be positive, got {}", cli.radius).into());
    }
    Ok(())
}

fn parse_container(value: &str) -> Result<Size, String> {
    let parsed = value
        .split_once(['x', 'X'])
        .and_then(|(w, h)| Some((w.trim().parse::<f64>().ok()?, h.trim().parse::<f64>().ok()?)));
    match parsed {
        Some((width, height)) if width > 0.0 && height > 0.0 => Ok(Size::new(width, height)),
        _ => Err(format!("Container must look like 1280x720, got '{value}'")),
    }
}

fn parse_fit(value: &str) -> Result<FitMode, String> {
    match value {
        "cover" => Ok(FitMode::Cover),
        "contain" => Ok(FitMode::Contain),
        other => Err(format!("Fit must be 'cover' or 'contain', got '{other}'")),
    }
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}

use crate::capture_session::StartOutcome;
use crate::config::Config;
use crate::device_display::interface::View;
use crate::error::{CaptureError, ClassifyError};
use crate::image_classifier::rank::RankedResult;
use image::{DynamicImage, GenericImageView};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStatus {
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraStatus {
    Off,
    Starting,
    Live,
    Capturing,
    Captured,
}

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub model: ModelStatus,
    pub camera: CameraStatus,
    /// Files chosen while the model was still loading.
    pub pending_files: Vec<PathBuf>,
    pub view: View,
    pub running: bool,
}

#[derive(Debug)]
pub enum Event {
    EngineLoadDone(Result<(), String>),
    ModelStatusLingerDone,
    FileChosen(PathBuf),
    CameraPressed,
    CameraStartDone(Result<StartOutcome, CaptureError>),
    CapturePressed,
    CaptureDone(Result<DynamicImage, CaptureError>),
    ResetPressed,
    ClassifyDone(Result<RankedResult, ClassifyError>),
    Shutdown,
}

impl Event {
    pub fn to_display_string(&self) -> String {
        match self {
            Event::CaptureDone(Ok(still)) => {
                format!("CaptureDone(Ok({}x{}))", still.width(), still.height())
            }
            event => format!("{:?}", event),
        }
    }
}

#[derive(Clone, Debug)]
pub enum Effect {
    LoadEngine,
    LingerModelStatus,
    ClassifyFile(PathBuf),
    ClassifyCapture(DynamicImage),
    StartCamera { reset_first: bool },
    CapturePhoto,
    ResetCamera,
}

impl PartialEq for Effect {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Effect::LoadEngine, Effect::LoadEngine)
            | (Effect::LingerModelStatus, Effect::LingerModelStatus)
            | (Effect::CapturePhoto, Effect::CapturePhoto)
            | (Effect::ResetCamera, Effect::ResetCamera) => true,
            (Effect::ClassifyFile(a), Effect::ClassifyFile(b)) => a == b,
            (Effect::ClassifyCapture(a), Effect::ClassifyCapture(b)) => {
                a.dimensions() == b.dimensions() && a.as_bytes() == b.as_bytes()
            }
            (
                Effect::StartCamera { reset_first: a },
                Effect::StartCamera { reset_first: b },
            ) => a == b,
            _ => false,
        }
    }
}

impl Effect {
    pub fn to_display_string(&self) -> String {
        match self {
            Effect::ClassifyCapture(still) => {
                format!("ClassifyCapture({}x{})", still.width(), still.height())
            }
            effect => format!("{:?}", effect),
        }
    }
}

pub fn init(config: &Config) -> (State, Vec<Effect>) {
    (
        State {
            model: ModelStatus::Loading,
            camera: CameraStatus::Off,
            pending_files: config.initial_files.clone(),
            view: View::ModelLoading,
            running: true,
        },
        vec![Effect::LoadEngine],
    )
}

const CAMERA_ALERT: &str = "Cannot access the camera. Make sure camera access is allowed.";

fn view_for_classify_error(error: &ClassifyError) -> View {
    match error {
        ClassifyError::EngineNotReady => View::StillLoading,
        ClassifyError::EngineFailed(_) => View::ModelFailed,
        ClassifyError::Engine(_) | ClassifyError::ImageDecode(_) => View::InferenceError,
    }
}

pub fn transition(state: State, event: Event) -> (State, Vec<Effect>) {
    match (state.model, state.camera, event) {
        // Model bootstrap
        (ModelStatus::Loading, _, Event::EngineLoadDone(Ok(()))) => {
            let mut effects = vec![Effect::LingerModelStatus];
            effects.extend(state.pending_files.iter().cloned().map(Effect::ClassifyFile));
            (
                State {
                    model: ModelStatus::Ready,
                    pending_files: vec![],
                    view: View::ModelLoaded,
                    ..state
                },
                effects,
            )
        }
        (ModelStatus::Loading, _, Event::EngineLoadDone(Err(_))) => (
            State {
                model: ModelStatus::Failed,
                pending_files: vec![],
                view: View::ModelFailed,
                ..state
            },
            vec![],
        ),
        (_, _, Event::ModelStatusLingerDone) => {
            if state.view == View::ModelLoaded {
                (
                    State {
                        view: View::Placeholder,
                        ..state
                    },
                    vec![],
                )
            } else {
                (state, vec![])
            }
        }

        // File input
        (ModelStatus::Loading, _, Event::FileChosen(path)) => {
            let mut pending_files = state.pending_files.clone();
            pending_files.push(path);
            (
                State {
                    pending_files,
                    view: View::StillLoading,
                    ..state
                },
                vec![],
            )
        }
        (ModelStatus::Failed, _, Event::FileChosen(_)) => (
            State {
                view: View::ModelFailed,
                ..state
            },
            vec![],
        ),
        (_, camera, Event::FileChosen(path)) => {
            // A chosen file replaces whatever the camera is showing.
            let mut effects = vec![];
            if camera != CameraStatus::Off {
                effects.push(Effect::ResetCamera);
            }
            effects.push(Effect::ClassifyFile(path));
            (
                State {
                    camera: CameraStatus::Off,
                    ..state
                },
                effects,
            )
        }

        // Camera input
        (ModelStatus::Loading, _, Event::CameraPressed) => (
            State {
                view: View::StillLoading,
                ..state
            },
            vec![],
        ),
        (ModelStatus::Failed, _, Event::CameraPressed) => (
            State {
                view: View::ModelFailed,
                ..state
            },
            vec![],
        ),
        (ModelStatus::Ready, CameraStatus::Off, Event::CameraPressed) => (
            State {
                camera: CameraStatus::Starting,
                ..state
            },
            vec![Effect::StartCamera { reset_first: false }],
        ),
        (ModelStatus::Ready, CameraStatus::Captured, Event::CameraPressed) => (
            State {
                camera: CameraStatus::Starting,
                ..state
            },
            vec![Effect::StartCamera { reset_first: true }],
        ),
        (
            _,
            CameraStatus::Starting,
            Event::CameraStartDone(Ok(StartOutcome::Started { width, height })),
        ) => (
            State {
                camera: CameraStatus::Live,
                view: View::LivePreview { width, height },
                ..state
            },
            vec![],
        ),
        (_, CameraStatus::Starting, Event::CameraStartDone(Err(_))) => (
            State {
                camera: CameraStatus::Off,
                view: View::Alert(CAMERA_ALERT.to_string()),
                ..state
            },
            vec![],
        ),
        // The camera was reset while it was still starting.
        (_, CameraStatus::Off, Event::CameraStartDone(Ok(StartOutcome::Started { .. }))) => {
            (state, vec![Effect::ResetCamera])
        }
        (_, CameraStatus::Live, Event::CapturePressed) => (
            State {
                camera: CameraStatus::Capturing,
                ..state
            },
            vec![Effect::CapturePhoto],
        ),
        (_, CameraStatus::Capturing, Event::CaptureDone(Ok(still))) => (
            State {
                camera: CameraStatus::Captured,
                view: View::Still {
                    width: still.width(),
                    height: still.height(),
                },
                ..state
            },
            vec![Effect::ClassifyCapture(still)],
        ),
        (_, CameraStatus::Off, Event::CaptureDone(Ok(_))) => (state, vec![Effect::ResetCamera]),
        (_, CameraStatus::Capturing, Event::CaptureDone(Err(_))) => (
            State {
                camera: CameraStatus::Off,
                view: View::Alert(CAMERA_ALERT.to_string()),
                ..state
            },
            vec![Effect::ResetCamera],
        ),
        (_, camera, Event::ResetPressed) => {
            let view = if matches!(state.view, View::LivePreview { .. } | View::Still { .. }) {
                View::Placeholder
            } else {
                state.view.clone()
            };
            let effects = if camera == CameraStatus::Off {
                vec![]
            } else {
                vec![Effect::ResetCamera]
            };
            (
                State {
                    camera: CameraStatus::Off,
                    view,
                    ..state
                },
                effects,
            )
        }

        // Results
        (_, _, Event::ClassifyDone(Ok(result))) => (
            State {
                view: View::Predictions(result),
                ..state
            },
            vec![],
        ),
        (_, _, Event::ClassifyDone(Err(error))) => (
            State {
                view: view_for_classify_error(&error),
                ..state
            },
            vec![],
        ),

        (_, _, Event::Shutdown) => (
            State {
                camera: CameraStatus::Off,
                running: false,
                ..state
            },
            vec![Effect::ResetCamera],
        ),

        // Default case
        _ => (state, vec![]),
    }
}

use crate::device_camera::interface::{DeviceCamera, DeviceStream, FacingMode};
use crate::error::CaptureError;
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Acquiring,
    Live,
    Captured,
}

impl CaptureState {
    fn name(&self) -> &'static str {
        match self {
            CaptureState::Idle => "idle",
            CaptureState::Acquiring => "acquiring",
            CaptureState::Live => "live",
            CaptureState::Captured => "captured",
        }
    }
}

/// What the display may show for this session. Never both at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplaySource {
    LiveFeed,
    Still,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started { width: u32, height: u32 },
    /// A stream is already being acquired or is live. Nothing was requested from the device.
    AlreadyActive,
}

/// Owns an acquired stream and stops all of its tracks exactly once, on release or on drop.
struct LiveStream {
    stream: Box<dyn DeviceStream>,
    released: bool,
}

impl LiveStream {
    fn new(stream: Box<dyn DeviceStream>) -> Self {
        Self {
            stream,
            released: false,
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        for track in self.stream.tracks() {
            track.stop();
        }
        self.released = true;
    }
}

impl Drop for LiveStream {
    fn drop(&mut self) {
        self.release();
    }
}

enum Phase {
    Idle,
    Acquiring,
    Live(LiveStream),
    Captured(DynamicImage),
}

impl Phase {
    fn state(&self) -> CaptureState {
        match self {
            Phase::Idle => CaptureState::Idle,
            Phase::Acquiring => CaptureState::Acquiring,
            Phase::Live(_) => CaptureState::Live,
            Phase::Captured(_) => CaptureState::Captured,
        }
    }
}

/// Preview-then-snapshot camera session.
///
/// `Idle -> Acquiring -> Live -> Captured -> Idle`. Holds at most one device stream; the
/// stream is released on every path out of `Live`, including errors and drop.
pub struct CaptureSession {
    device: Arc<dyn DeviceCamera + Send + Sync>,
    facing: FacingMode,
    logger: Arc<dyn Logger + Send + Sync>,
    phase: Phase,
}

impl CaptureSession {
    pub fn new(
        device: Arc<dyn DeviceCamera + Send + Sync>,
        facing: FacingMode,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            device,
            facing,
            logger: logger.with_namespace("capture_session"),
            phase: Phase::Idle,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.phase.state()
    }

    pub fn display_source(&self) -> Option<DisplaySource> {
        match self.phase {
            Phase::Live(_) => Some(DisplaySource::LiveFeed),
            Phase::Captured(_) => Some(DisplaySource::Still),
            Phase::Idle | Phase::Acquiring => None,
        }
    }

    pub fn start(&mut self) -> Result<StartOutcome, CaptureError> {
        match self.phase {
            Phase::Idle => {}
            Phase::Acquiring | Phase::Live(_) => {
                let _ = self.logger.info("Stream already active, ignoring start");
                return Ok(StartOutcome::AlreadyActive);
            }
            Phase::Captured(_) => {
                return Err(CaptureError::InvalidState {
                    operation: "start",
                    state: self.state().name(),
                });
            }
        }

        self.phase = Phase::Acquiring;

        match self.acquire() {
            Ok(live) => {
                let (width, height) = live.stream.frame_size();
                self.phase = Phase::Live(live);
                let _ = self
                    .logger
                    .info(&format!("Live preview {}x{}", width, height));
                Ok(StartOutcome::Started { width, height })
            }
            Err(e) => {
                self.phase = Phase::Idle;
                let _ = self.logger.error(&format!("Camera unavailable: {}", e));
                Err(CaptureError::Unavailable(e))
            }
        }
    }

    fn acquire(&self) -> Result<LiveStream, Box<dyn std::error::Error + Send + Sync>> {
        let stream = self.device.acquire(self.facing)?;
        // Wrapped before waiting, so a stream that never becomes ready is still stopped.
        let mut live = LiveStream::new(stream);
        live.stream.wait_ready()?;
        Ok(live)
    }

    /// Samples the live frame, then stops the stream. No frame is read after this returns.
    pub fn capture(&mut self) -> Result<DynamicImage, CaptureError> {
        let mut live = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Live(live) => live,
            other => {
                let state = other.state().name();
                self.phase = other;
                return Err(CaptureError::InvalidState {
                    operation: "capture",
                    state,
                });
            }
        };

        let frame = live.stream.sample_frame();
        live.release();
        drop(live);

        match frame {
            Ok(still) => {
                let _ = self.logger.info(&format!(
                    "Captured still {}x{}, stream stopped",
                    still.width(),
                    still.height()
                ));
                self.phase = Phase::Captured(still.clone());
                Ok(still)
            }
            Err(e) => {
                let _ = self.logger.error(&format!("Frame capture failed: {}", e));
                Err(CaptureError::Unavailable(e))
            }
        }
    }

    /// Returns to Idle from any state, releasing whatever is held. Safe to call repeatedly.
    pub fn reset(&mut self) {
        if matches!(self.phase, Phase::Idle) {
            return;
        }
        let _ = self
            .logger
            .info(&format!("Reset from {}", self.state().name()));
        self.phase = Phase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device_camera::impl_fake::{DeviceCameraFake, FakeCameraFailure};
    use crate::library::logger::impl_console::LoggerConsole;

    fn logger() -> Arc<dyn Logger + Send + Sync> {
        Arc::new(LoggerConsole::new(chrono::FixedOffset::east_opt(0).unwrap()))
    }

    fn session_with(camera: DeviceCameraFake) -> (Arc<DeviceCameraFake>, CaptureSession) {
        let camera = Arc::new(camera);
        let session = CaptureSession::new(camera.clone(), FacingMode::Environment, logger());
        (camera, session)
    }

    #[test]
    fn test_start_twice_acquires_once() {
        let (camera, mut session) = session_with(DeviceCameraFake::new(logger()));

        let first = session.start().unwrap();
        let second = session.start().unwrap();

        assert!(matches!(first, StartOutcome::Started { .. }));
        assert_eq!(second, StartOutcome::AlreadyActive);
        assert_eq!(camera.acquire_count(), 1);
        assert_eq!(camera.running_track_count(), 1);
        assert_eq!(session.state(), CaptureState::Live);
    }

    #[test]
    fn test_capture_stops_every_track_once() {
        let (camera, mut session) =
            session_with(DeviceCameraFake::new(logger()).with_tracks_per_stream(3));

        session.start().unwrap();
        let still = session.capture().unwrap();

        assert_eq!((still.width(), still.height()), (640, 480));
        assert_eq!(session.state(), CaptureState::Captured);
        let tracks = camera.tracks();
        assert_eq!(tracks.len(), 3);
        assert!(tracks.iter().all(|track| track.stop_count() == 1));

        session.reset();
        assert!(tracks.iter().all(|track| track.stop_count() == 1));
    }

    #[test]
    fn test_capture_before_start_fails_fast() {
        let (camera, mut session) = session_with(DeviceCameraFake::new(logger()));

        let result = session.capture();

        assert!(matches!(
            result,
            Err(CaptureError::InvalidState {
                operation: "capture",
                ..
            })
        ));
        assert_eq!(session.state(), CaptureState::Idle);
        assert_eq!(camera.acquire_count(), 0);
    }

    #[test]
    fn test_denied_returns_to_idle_and_can_retry() {
        let (camera, mut session) = session_with(DeviceCameraFake::new(logger()));
        camera.set_failure(FakeCameraFailure::Denied);

        let denied = session.start();

        assert!(matches!(denied, Err(CaptureError::Unavailable(_))));
        assert_eq!(session.state(), CaptureState::Idle);

        camera.set_failure(FakeCameraFailure::None);
        assert!(session.start().is_ok());
        assert_eq!(session.state(), CaptureState::Live);
        assert_eq!(camera.acquire_count(), 2);
    }

    #[test]
    fn test_partial_acquisition_is_released() {
        let (camera, mut session) =
            session_with(DeviceCameraFake::new(logger()).with_tracks_per_stream(2));
        camera.set_failure(FakeCameraFailure::NeverReady);

        let result = session.start();

        assert!(matches!(result, Err(CaptureError::Unavailable(_))));
        assert_eq!(session.state(), CaptureState::Idle);
        assert_eq!(camera.running_track_count(), 0);
        assert!(camera.tracks().iter().all(|track| track.stop_count() == 1));
    }

    #[test]
    fn test_reset_is_idempotent_and_releases_live_stream() {
        let (camera, mut session) = session_with(DeviceCameraFake::new(logger()));

        session.reset();
        session.start().unwrap();
        session.reset();
        session.reset();

        assert_eq!(session.state(), CaptureState::Idle);
        assert_eq!(camera.running_track_count(), 0);
        assert!(camera.tracks().iter().all(|track| track.stop_count() == 1));
    }

    #[test]
    fn test_new_session_requires_reset_after_capture() {
        let (camera, mut session) = session_with(DeviceCameraFake::new(logger()));

        session.start().unwrap();
        session.capture().unwrap();
        let restart = session.start();

        assert!(matches!(
            restart,
            Err(CaptureError::InvalidState {
                operation: "start",
                ..
            })
        ));

        session.reset();
        session.start().unwrap();
        assert_eq!(camera.acquire_count(), 2);
        assert_eq!(camera.running_track_count(), 1);
    }

    #[test]
    fn test_display_source_is_exclusive() {
        let (_camera, mut session) = session_with(DeviceCameraFake::new(logger()));

        assert_eq!(session.display_source(), None);
        session.start().unwrap();
        assert_eq!(session.display_source(), Some(DisplaySource::LiveFeed));
        session.capture().unwrap();
        assert_eq!(session.display_source(), Some(DisplaySource::Still));
        session.reset();
        assert_eq!(session.display_source(), None);
    }

    #[test]
    fn test_prefers_rear_camera_with_fallback() {
        let (camera, mut session) = session_with(DeviceCameraFake::new(logger()));
        session.start().unwrap();
        assert_eq!(camera.last_facing(), Some(FacingMode::Environment));

        session.reset();
        camera.set_has_rear_camera(false);
        session.start().unwrap();
        assert_eq!(camera.last_facing(), Some(FacingMode::User));
    }

    #[test]
    fn test_drop_releases_live_stream() {
        let (camera, mut session) = session_with(DeviceCameraFake::new(logger()));

        session.start().unwrap();
        drop(session);

        assert_eq!(camera.running_track_count(), 0);
    }
}

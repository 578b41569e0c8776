use crate::device_camera::interface::{DeviceCamera, DeviceStream, DeviceTrack, FacingMode};
use crate::library::logger::interface::Logger;
use image::{DynamicImage, ImageBuffer, Rgb};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FakeCameraFailure {
    #[default]
    None,
    /// `acquire` fails, as if permission was denied.
    Denied,
    /// `acquire` hands out a stream that never becomes ready.
    NeverReady,
}

pub struct FakeTrack {
    stop_count: AtomicUsize,
}

impl FakeTrack {
    pub fn stop_count(&self) -> usize {
        self.stop_count.load(Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.stop_count() > 0
    }
}

impl DeviceTrack for FakeTrack {
    fn stop(&self) {
        self.stop_count.fetch_add(1, Ordering::SeqCst);
    }
}

struct FakeStream {
    width: u32,
    height: u32,
    tracks: Vec<Arc<FakeTrack>>,
    never_ready: bool,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceStream for FakeStream {
    fn wait_ready(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.never_ready {
            return Err("video metadata never loaded".into());
        }
        Ok(())
    }

    fn sample_frame(&self) -> Result<DynamicImage, Box<dyn std::error::Error + Send + Sync>> {
        if self.tracks.iter().any(|track| track.is_stopped()) {
            return Err("stream stopped".into());
        }
        self.logger.info("Sampling frame")?;
        let frame = ImageBuffer::from_fn(self.width, self.height, |x, y| {
            Rgb([
                (x * 255 / self.width.max(1)) as u8,
                (y * 255 / self.height.max(1)) as u8,
                rand::random::<u8>(),
            ])
        });
        Ok(DynamicImage::ImageRgb8(frame))
    }

    fn tracks(&self) -> Vec<Arc<dyn DeviceTrack>> {
        self.tracks
            .iter()
            .map(|track| track.clone() as Arc<dyn DeviceTrack>)
            .collect()
    }

    fn frame_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Synthetic camera producing gradient frames, with counters for tests.
pub struct DeviceCameraFake {
    logger: Arc<dyn Logger + Send + Sync>,
    failure: Mutex<FakeCameraFailure>,
    has_rear_camera: AtomicBool,
    tracks_per_stream: usize,
    acquire_count: AtomicUsize,
    last_facing: Mutex<Option<FacingMode>>,
    tracks: Mutex<Vec<Arc<FakeTrack>>>,
}

impl DeviceCameraFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("fake"),
            failure: Mutex::new(FakeCameraFailure::None),
            has_rear_camera: AtomicBool::new(true),
            tracks_per_stream: 1,
            acquire_count: AtomicUsize::new(0),
            last_facing: Mutex::new(None),
            tracks: Mutex::new(Vec::new()),
        }
    }

    #[allow(dead_code)]
    pub fn with_tracks_per_stream(mut self, tracks_per_stream: usize) -> Self {
        self.tracks_per_stream = tracks_per_stream;
        self
    }

    #[allow(dead_code)]
    pub fn set_failure(&self, failure: FakeCameraFailure) {
        if let Ok(mut current) = self.failure.lock() {
            *current = failure;
        }
    }

    #[allow(dead_code)]
    pub fn set_has_rear_camera(&self, has_rear_camera: bool) {
        self.has_rear_camera.store(has_rear_camera, Ordering::SeqCst);
    }

    pub fn acquire_count(&self) -> usize {
        self.acquire_count.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn last_facing(&self) -> Option<FacingMode> {
        self.last_facing.lock().ok().and_then(|facing| *facing)
    }

    /// Every track handed out so far, in acquisition order.
    #[allow(dead_code)]
    pub fn tracks(&self) -> Vec<Arc<FakeTrack>> {
        self.tracks
            .lock()
            .map(|tracks| tracks.clone())
            .unwrap_or_default()
    }

    /// Tracks that were handed out and not stopped yet.
    #[allow(dead_code)]
    pub fn running_track_count(&self) -> usize {
        self.tracks()
            .iter()
            .filter(|track| !track.is_stopped())
            .count()
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn acquire(
        &self,
        facing: FacingMode,
    ) -> Result<Box<dyn DeviceStream>, Box<dyn std::error::Error + Send + Sync>> {
        self.acquire_count.fetch_add(1, Ordering::SeqCst);
        self.logger.info(&format!("Acquiring stream ({:?})", facing))?;

        let failure = self
            .failure
            .lock()
            .map(|failure| *failure)
            .unwrap_or_default();
        if failure == FakeCameraFailure::Denied {
            return Err("permission denied".into());
        }

        let facing = match facing {
            FacingMode::Environment if !self.has_rear_camera.load(Ordering::SeqCst) => {
                FacingMode::User
            }
            facing => facing,
        };
        if let Ok(mut last) = self.last_facing.lock() {
            *last = Some(facing);
        }

        let tracks: Vec<Arc<FakeTrack>> = (0..self.tracks_per_stream)
            .map(|_| {
                Arc::new(FakeTrack {
                    stop_count: AtomicUsize::new(0),
                })
            })
            .collect();
        if let Ok(mut all) = self.tracks.lock() {
            all.extend(tracks.iter().cloned());
        }

        Ok(Box::new(FakeStream {
            width: 640,
            height: 480,
            tracks,
            never_ready: failure == FakeCameraFailure::NeverReady,
            logger: self.logger.clone(),
        }))
    }
}

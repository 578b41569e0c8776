use image::DynamicImage;
use std::sync::Arc;

/// Which camera to prefer. Devices without a choice fall back to their default camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingMode {
    /// Rear-facing.
    Environment,
    User,
}

pub trait DeviceTrack: Send + Sync {
    fn stop(&self);
}

/// A live video stream. Frames may only be sampled while its tracks are running.
pub trait DeviceStream: Send {
    /// Blocks until the first frame is available.
    fn wait_ready(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn sample_frame(&self) -> Result<DynamicImage, Box<dyn std::error::Error + Send + Sync>>;
    fn tracks(&self) -> Vec<Arc<dyn DeviceTrack>>;
    fn frame_size(&self) -> (u32, u32);
}

pub trait DeviceCamera: Send + Sync {
    fn acquire(
        &self,
        facing: FacingMode,
    ) -> Result<Box<dyn DeviceStream>, Box<dyn std::error::Error + Send + Sync>>;
}

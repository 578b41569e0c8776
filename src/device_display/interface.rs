use crate::image_classifier::rank::RankedResult;
use std::error::Error;

/// Everything the display can be asked to show.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    ModelLoading,
    ModelLoaded,
    ModelFailed,
    /// Nothing to show: no image, no status.
    Placeholder,
    LivePreview { width: u32, height: u32 },
    Still { width: u32, height: u32 },
    Predictions(RankedResult),
    /// A classification was requested before the model finished loading.
    StillLoading,
    InferenceError,
    Alert(String),
}

pub trait DeviceDisplay: Send + Sync {
    fn show(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>>;
}

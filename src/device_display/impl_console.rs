use crate::device_display::interface::{DeviceDisplay, View};
use crate::image_classifier::rank::RankedResult;
use std::error::Error;

const BAR_WIDTH: usize = 20;

pub struct DeviceDisplayConsole {}

impl DeviceDisplayConsole {
    pub fn new() -> Self {
        Self {}
    }

    fn bar(confidence_percent: f32) -> String {
        let filled = ((confidence_percent / 100.0) * BAR_WIDTH as f32).round() as usize;
        let filled = filled.min(BAR_WIDTH);
        format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
    }

    fn render_predictions(result: &RankedResult) -> Vec<String> {
        result
            .predictions
            .iter()
            .enumerate()
            .map(|(i, prediction)| {
                format!(
                    "{}. {:<12} {:>6.2}% {}",
                    i + 1,
                    prediction.label,
                    prediction.confidence_percent,
                    Self::bar(prediction.confidence_percent)
                )
            })
            .collect()
    }

    fn render(view: &View) -> Vec<String> {
        match view {
            View::ModelLoading => vec!["Loading model...".to_string()],
            View::ModelLoaded => vec!["Model loaded successfully".to_string()],
            View::ModelFailed => vec!["Failed to load model".to_string()],
            View::Placeholder => vec![],
            View::LivePreview { width, height } => {
                vec![format!("Camera live ({}x{}). Type 'capture'.", width, height)]
            }
            View::Still { width, height } => vec![format!("Captured photo {}x{}", width, height)],
            View::Predictions(result) => Self::render_predictions(result),
            View::StillLoading => vec!["Model is still loading...".to_string()],
            View::InferenceError => vec![
                "Error during inference".to_string(),
                "Check the log for details".to_string(),
            ],
            View::Alert(message) => vec![format!("! {}", message)],
        }
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn show(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>> {
        for line in Self::render(view) {
            println!("{}", line);
        }
        Ok(())
    }
}

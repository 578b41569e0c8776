use crate::device_camera::interface::FacingMode;
use crate::image_classifier::models::model_config::ModelConfig;
use crate::image_classifier::preprocess::INPUT_SIZE;
use chrono::Offset;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub model_path: PathBuf,
    pub top_k: usize,
    pub input_size: u32,
    pub preferred_facing: FacingMode,
    pub logger_timezone: chrono::FixedOffset,
    pub model_status_linger: Duration,
    /// Images to classify once the model is ready.
    pub initial_files: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("model/model_resnet18.onnx"),
            top_k: 3,
            input_size: INPUT_SIZE,
            preferred_facing: FacingMode::Environment,
            logger_timezone: utc(),
            model_status_linger: Duration::from_millis(1500),
            initial_files: vec![],
        }
    }
}

/// Classify photos of waste from files or the camera.
#[derive(Parser, Debug)]
#[command(name = "waste-sorter")]
pub struct Args {
    /// Path to the ONNX model file
    #[arg(short, long)]
    pub model_path: Option<PathBuf>,

    /// Image files to classify once the model is loaded
    pub images: Vec<PathBuf>,
}

impl Config {
    pub fn from_args(args: Args) -> Self {
        let defaults = Self::default();
        Self {
            model_path: args.model_path.unwrap_or(defaults.model_path.clone()),
            initial_files: args.images,
            ..defaults
        }
    }

    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            onnx_model_path: self.model_path.clone(),
            input_shape: (self.input_size, self.input_size),
        }
    }
}

fn utc() -> chrono::FixedOffset {
    chrono::Utc.fix()
}

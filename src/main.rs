use clap::Parser;
use config::{Args, Config};
use device_camera::impl_fake::DeviceCameraFake;
use device_display::impl_console::DeviceDisplayConsole;
use image_classifier::impl_tract_onnx::InferenceEngineTractOnnx;
use image_classifier::interface::InferenceEngine;
use library::logger::{impl_console::LoggerConsole, interface::Logger};
use std::sync::{Arc, Mutex};
use waste_sorter::input::spawn_stdin_reader;
use waste_sorter::main::WasteSorter;
use waste_sorter::run_effect::{EngineLoader, LoadResult};

mod capture_session;
mod config;
mod device_camera;
mod device_display;
mod error;
mod image_classifier;
mod library;
mod orchestrator;
mod waste_sorter;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_args(Args::parse());

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone));

    let device_camera = Arc::new(DeviceCameraFake::new(logger.clone()));

    let device_display = Arc::new(Mutex::new(DeviceDisplayConsole::new()));

    let model_config = config.model_config();
    let engine_logger = logger.clone();
    let engine_loader: EngineLoader = Arc::new(move || -> LoadResult {
        let engine: Arc<dyn InferenceEngine + Send + Sync> = Arc::new(
            InferenceEngineTractOnnx::new(&model_config, engine_logger.clone())?,
        );
        Ok(engine)
    });

    let waste_sorter = WasteSorter::new(
        config,
        logger.clone(),
        device_camera,
        device_display,
        engine_loader,
    );

    spawn_stdin_reader(waste_sorter.event_sender(), logger.with_namespace("input"));

    waste_sorter.run()?;

    Ok(())
}

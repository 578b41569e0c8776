use crate::config::Config;
use crate::image_classifier::interface::InferenceEngine;
use crate::library::logger::interface::Logger;
use crate::orchestrator::{ImageSource, Orchestrator};
use crate::waste_sorter::core::{Effect, Event};
use std::sync::mpsc::Sender;
use std::sync::Arc;

pub type LoadResult =
    Result<Arc<dyn InferenceEngine + Send + Sync>, Box<dyn std::error::Error + Send + Sync>>;

pub type EngineLoader = Arc<dyn Fn() -> LoadResult + Send + Sync>;

#[derive(Clone)]
pub struct RunEffect {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    orchestrator: Arc<Orchestrator>,
    engine_loader: EngineLoader,
    event_sender: Sender<Event>,
}

impl RunEffect {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        orchestrator: Arc<Orchestrator>,
        engine_loader: EngineLoader,
        event_sender: Sender<Event>,
    ) -> Self {
        Self {
            config,
            logger,
            orchestrator,
            engine_loader,
            event_sender,
        }
    }

    pub fn run_effect(&self, effect: Effect) {
        let _ = self
            .logger
            .info(&format!("Running effect: {}", effect.to_display_string()));

        match effect {
            Effect::LoadEngine => {
                let loaded = match (self.engine_loader)() {
                    Ok(engine) => {
                        self.orchestrator.engine_ready(engine);
                        Ok(())
                    }
                    Err(e) => {
                        let _ = self.logger.error(&format!("Failed to load model: {}", e));
                        self.orchestrator.engine_failed(e.to_string());
                        Err(e.to_string())
                    }
                };
                let _ = self.event_sender.send(Event::EngineLoadDone(loaded));
            }
            Effect::LingerModelStatus => {
                std::thread::sleep(self.config.model_status_linger);
                let _ = self.event_sender.send(Event::ModelStatusLingerDone);
            }
            Effect::ClassifyFile(path) => {
                let result = self.orchestrator.classify_file(&path);
                let _ = self.event_sender.send(Event::ClassifyDone(result));
            }
            Effect::ClassifyCapture(still) => {
                let result = self.orchestrator.classify(ImageSource::Capture(still));
                let _ = self.event_sender.send(Event::ClassifyDone(result));
            }
            Effect::StartCamera { .. } | Effect::CapturePhoto | Effect::ResetCamera => {
                let _ = self.logger.error(&format!(
                    "{} belongs to the camera worker",
                    effect.to_display_string()
                ));
            }
        }
    }
}

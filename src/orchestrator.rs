use crate::error::ClassifyError;
use crate::image_classifier::interface::InferenceEngine;
use crate::image_classifier::invoker::ClassifierInvoker;
use crate::image_classifier::labels::LabelSet;
use crate::image_classifier::preprocess::preprocess_sized;
use crate::image_classifier::rank::{effective_k, rank, RankedResult};
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Instant;

#[derive(Clone)]
pub enum EngineState {
    Uninitialized,
    Ready(ClassifierInvoker),
    Failed(String),
}

impl EngineState {
    fn name(&self) -> &'static str {
        match self {
            EngineState::Uninitialized => "uninitialized",
            EngineState::Ready(_) => "ready",
            EngineState::Failed(_) => "failed",
        }
    }
}

/// Where a still image came from.
pub enum ImageSource {
    File(DynamicImage),
    Capture(DynamicImage),
}

impl ImageSource {
    fn origin(&self) -> &'static str {
        match self {
            ImageSource::File(_) => "file",
            ImageSource::Capture(_) => "capture",
        }
    }

    fn image(&self) -> &DynamicImage {
        match self {
            ImageSource::File(image) | ImageSource::Capture(image) => image,
        }
    }
}

/// Runs preprocess, inference and ranking for one image.
///
/// Owns the engine readiness state; nothing else looks at the engine handle directly.
pub struct Orchestrator {
    engine: RwLock<EngineState>,
    labels: LabelSet,
    top_k: usize,
    input_size: u32,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl Orchestrator {
    pub fn new(
        labels: LabelSet,
        top_k: usize,
        input_size: u32,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            engine: RwLock::new(EngineState::Uninitialized),
            labels,
            top_k,
            input_size,
            logger: logger.with_namespace("orchestrator"),
        }
    }

    pub fn engine_ready(&self, engine: Arc<dyn InferenceEngine + Send + Sync>) {
        self.set_engine_state(EngineState::Ready(ClassifierInvoker::new(engine)));
    }

    pub fn engine_failed(&self, reason: impl Into<String>) {
        self.set_engine_state(EngineState::Failed(reason.into()));
    }

    fn set_engine_state(&self, state: EngineState) {
        let _ = self.logger.info(&format!("Engine {}", state.name()));
        match self.engine.write() {
            Ok(mut engine) => *engine = state,
            Err(poisoned) => *poisoned.into_inner() = state,
        }
    }

    pub fn engine_state(&self) -> EngineState {
        match self.engine.read() {
            Ok(engine) => engine.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn ready_invoker(&self) -> Result<ClassifierInvoker, ClassifyError> {
        match self.engine_state() {
            EngineState::Ready(invoker) => Ok(invoker),
            EngineState::Uninitialized => Err(ClassifyError::EngineNotReady),
            EngineState::Failed(reason) => Err(ClassifyError::EngineFailed(reason)),
        }
    }

    pub fn classify(&self, source: ImageSource) -> Result<RankedResult, ClassifyError> {
        let invoker = self.ready_invoker()?;

        let start = Instant::now();
        let tensor = preprocess_sized(source.image(), self.input_size);

        let scores = invoker.infer(tensor).map_err(|e| self.log_failure(e))?;

        if scores.len() != self.labels.len() {
            return Err(self.log_failure(ClassifyError::engine(format!(
                "output width {} does not match {} labels",
                scores.len(),
                self.labels.len()
            ))));
        }

        if effective_k(self.top_k, self.labels.len()) != self.top_k {
            let _ = self.logger.error(&format!(
                "top_k {} out of range, returning all {} labels",
                self.top_k,
                self.labels.len()
            ));
        }

        let result = rank(&scores, &self.labels, self.top_k);

        let _ = self.logger.info(&format!(
            "Classified {} image in {} ms: {:?}",
            source.origin(),
            start.elapsed().as_millis(),
            result.top()
        ));

        Ok(result)
    }

    pub fn classify_file(&self, path: &Path) -> Result<RankedResult, ClassifyError> {
        self.ready_invoker()?;
        let image =
            image::open(path).map_err(|e| self.log_failure(ClassifyError::ImageDecode(e)))?;
        self.classify(ImageSource::File(image))
    }

    fn log_failure(&self, error: ClassifyError) -> ClassifyError {
        let cause = std::error::Error::source(&error)
            .map(|source| source.to_string())
            .unwrap_or_default();
        let _ = self
            .logger
            .error(&format!("Error during inference: {} {}", error, cause));
        error
    }
}

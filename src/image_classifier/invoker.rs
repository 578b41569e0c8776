use crate::error::ClassifyError;
use crate::image_classifier::interface::{InferenceEngine, NamedTensors};
use crate::image_classifier::tensor::FloatTensor;
use std::sync::Arc;

/// Runs one forward pass through a loaded engine.
///
/// Binds the input to the engine's first declared input name and reads the first declared
/// output name, so it works across model exports with different slot names. Holds no
/// per-call state: a failed call does not affect the next one.
#[derive(Clone)]
pub struct ClassifierInvoker {
    engine: Arc<dyn InferenceEngine + Send + Sync>,
}

impl ClassifierInvoker {
    pub fn new(engine: Arc<dyn InferenceEngine + Send + Sync>) -> Self {
        Self { engine }
    }

    pub fn infer(&self, tensor: FloatTensor) -> Result<Vec<f32>, ClassifyError> {
        let input_name = self
            .engine
            .input_names()
            .first()
            .ok_or_else(|| ClassifyError::engine("model declares no inputs"))?
            .clone();
        let output_name = self
            .engine
            .output_names()
            .first()
            .ok_or_else(|| ClassifyError::engine("model declares no outputs"))?
            .clone();

        let mut inputs = NamedTensors::new();
        inputs.insert(input_name, tensor);

        let mut outputs = self.engine.run(inputs).map_err(ClassifyError::Engine)?;

        let output = outputs.remove(&output_name).ok_or_else(|| {
            ClassifyError::engine(format!("engine returned no '{}' output", output_name))
        })?;

        Ok(output.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_classifier::impl_fake::InferenceEngineFake;

    fn input() -> FloatTensor {
        FloatTensor::zeros(vec![1, 3, 224, 224])
    }

    #[test]
    fn test_uses_first_declared_names() {
        let engine = Arc::new(
            InferenceEngineFake::with_scores(vec![1.0, 2.0, 3.0])
                .with_names(&["pixel_values", "mask"], &["logits", "features"]),
        );
        let invoker = ClassifierInvoker::new(engine.clone());

        let scores = invoker.infer(input()).unwrap();

        assert_eq!(scores, vec![1.0, 2.0, 3.0]);
        assert_eq!(engine.last_input_shape(), Some(vec![1, 3, 224, 224]));
    }

    #[test]
    fn test_engine_failure_is_surfaced_then_recovers() {
        let engine = Arc::new(InferenceEngineFake::with_scores(vec![0.5; 10]));
        let invoker = ClassifierInvoker::new(engine.clone());

        engine.fail_next_run();
        let failed = invoker.infer(input());
        let recovered = invoker.infer(input());

        assert!(matches!(failed, Err(ClassifyError::Engine(_))));
        assert_eq!(recovered.unwrap().len(), 10);
        assert_eq!(engine.run_count(), 2);
    }

    #[test]
    fn test_malformed_tensor_is_engine_error() {
        let engine = Arc::new(InferenceEngineFake::with_scores(vec![0.5; 10]));
        let invoker = ClassifierInvoker::new(engine);

        let result = invoker.infer(FloatTensor::new(vec![1, 3, 224, 224], vec![0.0; 7]));

        assert!(matches!(result, Err(ClassifyError::Engine(_))));
    }

    #[test]
    fn test_model_without_inputs_is_engine_error() {
        let engine = Arc::new(InferenceEngineFake::with_scores(vec![0.5; 10]).with_names(&[], &["out"]));
        let invoker = ClassifierInvoker::new(engine.clone());

        let result = invoker.infer(input());

        assert!(matches!(result, Err(ClassifyError::Engine(_))));
        assert_eq!(engine.run_count(), 0);
    }
}

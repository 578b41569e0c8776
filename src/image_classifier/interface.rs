use crate::image_classifier::tensor::FloatTensor;
use std::collections::HashMap;

pub type NamedTensors = HashMap<String, FloatTensor>;

/// A loaded model that maps named input tensors to named output tensors.
///
/// Implementations are shared read-only between concurrent calls.
pub trait InferenceEngine: Send + Sync {
    fn input_names(&self) -> &[String];
    fn output_names(&self) -> &[String];
    fn run(
        &self,
        inputs: NamedTensors,
    ) -> Result<NamedTensors, Box<dyn std::error::Error + Send + Sync>>;
}

use crate::image_classifier::interface::{InferenceEngine, NamedTensors};
use crate::image_classifier::models::model_config::ModelConfig;
use crate::image_classifier::tensor::FloatTensor;
use crate::library::logger::interface::Logger;
use std::sync::Arc;
use tract_onnx::prelude::*;

pub struct InferenceEngineTractOnnx {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl InferenceEngineTractOnnx {
    pub fn new(
        config: &ModelConfig,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let logger = logger.with_namespace("engine").with_namespace("tract");
        logger.info(&format!("Loading model {}", config.onnx_model_path.display()))?;

        let model = tract_onnx::onnx().model_for_path(&config.onnx_model_path)?;

        let input_names = model
            .input_outlets()?
            .iter()
            .map(|outlet| model.node(outlet.node).name.clone())
            .collect::<Vec<_>>();

        let output_names = model
            .output_outlets()?
            .iter()
            .map(|outlet| {
                model
                    .outlet_label(*outlet)
                    .map(str::to_string)
                    .unwrap_or_else(|| model.node(outlet.node).name.clone())
            })
            .collect::<Vec<_>>();

        let (height, width) = config.input_shape;
        let model = model
            .with_input_fact(
                0,
                f32::fact([1, 3, height as usize, width as usize]).into(),
            )?
            .into_optimized()?
            .into_runnable()?;

        logger.info(&format!("Input names: {:?}", input_names))?;
        logger.info(&format!("Output names: {:?}", output_names))?;

        Ok(Self {
            model,
            input_names,
            output_names,
        })
    }
}

impl InferenceEngine for InferenceEngineTractOnnx {
    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }

    fn run(
        &self,
        mut inputs: NamedTensors,
    ) -> Result<NamedTensors, Box<dyn std::error::Error + Send + Sync>> {
        let mut values: TVec<TValue> = tvec!();

        for name in &self.input_names {
            let tensor = inputs
                .remove(name)
                .ok_or_else(|| format!("missing input tensor '{}'", name))?;
            let array =
                tract_ndarray::ArrayD::from_shape_vec(tract_ndarray::IxDyn(&tensor.shape), tensor.data)?;
            values.push(array.into_tensor().into_tvalue());
        }

        let outputs = self.model.run(values)?;

        let mut named = NamedTensors::new();
        for (name, value) in self.output_names.iter().zip(outputs.iter()) {
            let view = value.to_array_view::<f32>()?;
            named.insert(
                name.clone(),
                FloatTensor::new(view.shape().to_vec(), view.iter().copied().collect()),
            );
        }

        Ok(named)
    }
}

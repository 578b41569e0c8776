use crate::image_classifier::interface::{InferenceEngine, NamedTensors};
use crate::image_classifier::tensor::FloatTensor;
use rand::distr::{Distribution, Uniform};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

enum Scores {
    Fixed(Vec<f32>),
    Random(usize),
}

/// Engine double with scripted output and a run counter.
pub struct InferenceEngineFake {
    input_names: Vec<String>,
    output_names: Vec<String>,
    scores: Scores,
    fail_next: AtomicBool,
    run_count: AtomicUsize,
    last_input_shape: Mutex<Option<Vec<usize>>>,
}

impl InferenceEngineFake {
    fn build(scores: Scores) -> Self {
        Self {
            input_names: vec!["input".to_string()],
            output_names: vec!["output".to_string()],
            scores,
            fail_next: AtomicBool::new(false),
            run_count: AtomicUsize::new(0),
            last_input_shape: Mutex::new(None),
        }
    }

    pub fn with_scores(scores: Vec<f32>) -> Self {
        Self::build(Scores::Fixed(scores))
    }

    /// Uniformly random logits in [-5, 5).
    pub fn random(width: usize) -> Self {
        Self::build(Scores::Random(width))
    }

    pub fn with_names(mut self, input_names: &[&str], output_names: &[&str]) -> Self {
        self.input_names = input_names.iter().map(|n| n.to_string()).collect();
        self.output_names = output_names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// The next call to `run` fails; later calls succeed again.
    pub fn fail_next_run(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn run_count(&self) -> usize {
        self.run_count.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn last_input_shape(&self) -> Option<Vec<usize>> {
        self.last_input_shape.lock().ok().and_then(|shape| shape.clone())
    }

    fn scores(&self) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
        match &self.scores {
            Scores::Fixed(scores) => Ok(scores.clone()),
            Scores::Random(width) => {
                let mut rng = rand::rng();
                let dist = Uniform::new(-5.0f32, 5.0)?;
                Ok((0..*width).map(|_| dist.sample(&mut rng)).collect())
            }
        }
    }
}

impl InferenceEngine for InferenceEngineFake {
    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }

    fn run(
        &self,
        inputs: NamedTensors,
    ) -> Result<NamedTensors, Box<dyn std::error::Error + Send + Sync>> {
        self.run_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err("fake engine failure".into());
        }

        let input_name = self.input_names.first().ok_or("no inputs declared")?;
        let input = inputs
            .get(input_name)
            .ok_or_else(|| format!("missing input tensor '{}'", input_name))?;
        if !input.is_consistent() {
            return Err(format!("input shape {:?} does not match data", input.shape).into());
        }
        if let Ok(mut last) = self.last_input_shape.lock() {
            *last = Some(input.shape.clone());
        }

        let scores = self.scores()?;
        let mut outputs = NamedTensors::new();
        for name in &self.output_names {
            outputs.insert(
                name.clone(),
                FloatTensor::new(vec![1, scores.len()], scores.clone()),
            );
        }

        Ok(outputs)
    }
}

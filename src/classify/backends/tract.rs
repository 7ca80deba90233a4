#![cfg(feature = "backend-tract")]

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tract_onnx::prelude::*;

use crate::classify::backend::LogitsBackend;
use crate::label::LABELS;
use crate::preprocess::FrameTensor;

/// Tract-based backend for ONNX inference on the CPU.
///
/// The model is the ResNet-101 transfer-learning network exported with its
/// final linear layer already replaced by a 3-output layer. Loading fails when
/// the file is missing or when its output does not hold one score per label.
pub struct TractBackend {
    model: TypedRunnableModel<TypedModel>,
}

impl TractBackend {
    /// Load an ONNX model from disk and prepare it for inference.
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();
        let input_shape: TVec<usize> = FrameTensor::SHAPE.iter().copied().collect();
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .with_context(|| format!("failed to load ONNX model from {}", model_path.display()))?
            .with_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), input_shape))
            .context("failed to set input fact")?
            .into_optimized()
            .context("failed to optimize ONNX model")?;

        check_output_shape(&model)?;

        let model = model
            .into_runnable()
            .context("failed to build runnable ONNX model")?;
        Ok(Self { model })
    }
}

fn check_output_shape(model: &TypedModel) -> Result<()> {
    let fact = model
        .output_fact(0)
        .context("model declares no outputs")?;
    match fact.shape.as_concrete() {
        Some(dims) if dims.iter().product::<usize>() == LABELS.len() => Ok(()),
        Some(dims) => Err(anyhow!(
            "model output shape {:?} does not match {} classes",
            dims,
            LABELS.len()
        )),
        None => Err(anyhow!("model output shape is not concrete")),
    }
}

impl LogitsBackend for TractBackend {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn logits(&mut self, input: &FrameTensor) -> Result<Vec<f32>> {
        let tensor = tract_ndarray::Array4::from_shape_vec(
            (
                FrameTensor::SHAPE[0],
                FrameTensor::SHAPE[1],
                FrameTensor::SHAPE[2],
                FrameTensor::SHAPE[3],
            ),
            input.as_slice().to_vec(),
        )
        .context("input tensor has wrong length")?
        .into_tensor();

        let outputs = self
            .model
            .run(tvec!(tensor.into()))
            .context("ONNX inference failed")?;
        let output = outputs
            .first()
            .ok_or_else(|| anyhow!("model produced no outputs"))?;
        let scores = output
            .to_array_view::<f32>()
            .context("model output tensor was not f32")?;
        Ok(scores.iter().copied().collect())
    }

    fn warm_up(&mut self) -> Result<()> {
        let logits = self.logits(&FrameTensor::zeros())?;
        if logits.len() != LABELS.len() {
            return Err(anyhow!(
                "warm-up produced {} scores, expected {}",
                logits.len(),
                LABELS.len()
            ));
        }
        Ok(())
    }
}

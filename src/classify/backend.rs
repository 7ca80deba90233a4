use anyhow::Result;

use crate::preprocess::FrameTensor;

/// Numeric inference backend.
///
/// Backends receive a fully preprocessed tensor and return one raw score per
/// output of the final layer. They do not interpret the scores; label
/// selection happens in `ModelClassifier`.
pub trait LogitsBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Run one forward pass.
    fn logits(&mut self, input: &FrameTensor) -> Result<Vec<f32>>;

    /// Optional warm-up hook, run once before the loop starts.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}

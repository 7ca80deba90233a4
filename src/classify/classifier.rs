use crate::classify::{ClassifyError, LogitsBackend};
use crate::label::{select_label, Label};
use crate::preprocess;

/// Classification capability used by the loop driver.
pub trait Classifier {
    /// Classify exactly one encoded frame.
    fn classify(&mut self, frame: &[u8]) -> Result<Label, ClassifyError>;
}

/// Classifier backed by a neural network backend.
pub struct ModelClassifier<B> {
    backend: B,
}

impl<B: LogitsBackend> ModelClassifier<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn warm_up(&mut self) -> anyhow::Result<()> {
        self.backend.warm_up()
    }
}

impl<B: LogitsBackend> Classifier for ModelClassifier<B> {
    fn classify(&mut self, frame: &[u8]) -> Result<Label, ClassifyError> {
        let input = preprocess::prepare(frame)?;
        let logits = self
            .backend
            .logits(&input)
            .map_err(ClassifyError::Inference)?;
        log::debug!("{} logits: {:?}", self.backend.name(), logits);
        select_label(&logits)
    }
}

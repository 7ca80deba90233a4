use anyhow::{anyhow, Result};

use crate::classify::backend::LogitsBackend;
use crate::preprocess::FrameTensor;

/// Stub backend for testing. Returns the same scores for every frame.
pub struct StubBackend {
    logits: Vec<f32>,
    failure: Option<String>,
    calls: u64,
}

impl StubBackend {
    pub fn new(logits: Vec<f32>) -> Self {
        Self {
            logits,
            failure: None,
            calls: 0,
        }
    }

    /// Backend whose every forward pass fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            logits: Vec::new(),
            failure: Some(message.to_string()),
            calls: 0,
        }
    }

    /// Number of forward passes run so far.
    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl LogitsBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn logits(&mut self, _input: &FrameTensor) -> Result<Vec<f32>> {
        self.calls += 1;
        match &self.failure {
            Some(message) => Err(anyhow!("{}", message)),
            None => Ok(self.logits.clone()),
        }
    }
}

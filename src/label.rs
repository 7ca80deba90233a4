//! Class labels and logit selection.
//!
//! The model emits one score per class. The label set is fixed and ordered;
//! the output index of the model maps 1:1 onto `LABELS`.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;

use crate::classify::ClassifyError;

/// Posture class reported to the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    Bdr,
    Ddk,
    Tdr,
}

/// Model output order. Index `i` of the logit vector scores `LABELS[i]`.
pub const LABELS: [Label; 3] = [Label::Bdr, Label::Ddk, Label::Tdr];

impl Label {
    /// Wire form used in the `status` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Bdr => "BDR",
            Label::Ddk => "DDK",
            Label::Tdr => "TDR",
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        LABELS.get(index).copied()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LABELS
            .iter()
            .copied()
            .find(|label| label.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow!("unknown label '{}'; expected one of BDR, DDK, TDR", s))
    }
}

/// Index of the highest score. Ties resolve to the first occurrence; NaN never wins.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((idx, score)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Map a logit vector onto a label.
///
/// A vector that does not hold exactly one score per label, or whose argmax
/// falls outside the label set, is reported as `ClassifyError::OutOfRange`.
pub fn select_label(logits: &[f32]) -> Result<Label, ClassifyError> {
    let index = argmax(logits);
    if logits.len() != LABELS.len() {
        return Err(ClassifyError::OutOfRange {
            index,
            logits: logits.len(),
        });
    }
    index
        .and_then(Label::from_index)
        .ok_or(ClassifyError::OutOfRange {
            index,
            logits: logits.len(),
        })
}

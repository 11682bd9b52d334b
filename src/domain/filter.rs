//! Fixed-order recursive (IIR) filter evaluator.
//!
//! y[i] = gain * x[i] + sum(feedback[j-1] * y[i-j] for j in 1..=order)
//!
//! The first `order` outputs are seeded with the inputs. History lives in a
//! fixed array that starts zeroed and is filled by the seed rows, so the
//! recurrence never looks before index 0.

use crate::domain::error::TaframeError;

pub const MAX_ORDER: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct RecurrenceFilter {
    gain: f64,
    feedback: Vec<f64>,
}

/// Most recent outputs, newest first.
#[derive(Debug, Clone, Copy, Default)]
struct FilterState {
    history: [f64; MAX_ORDER],
}

impl FilterState {
    fn push(&mut self, value: f64) {
        self.history.rotate_right(1);
        self.history[0] = value;
    }
}

impl RecurrenceFilter {
    pub fn new(gain: f64, feedback: &[f64]) -> Result<Self, TaframeError> {
        if feedback.is_empty() || feedback.len() > MAX_ORDER {
            return Err(TaframeError::validation(format!(
                "filter order must be 1..={MAX_ORDER}, got {}",
                feedback.len()
            )));
        }
        Ok(Self {
            gain,
            feedback: feedback.to_vec(),
        })
    }

    pub fn order(&self) -> usize {
        self.feedback.len()
    }

    #[cfg(test)]
    pub(crate) fn gain(&self) -> f64 {
        self.gain
    }

    #[cfg(test)]
    pub(crate) fn feedback(&self) -> &[f64] {
        &self.feedback
    }

    /// Sum of all coefficients; 1.0 means a constant input passes unchanged.
    #[cfg(test)]
    pub(crate) fn dc_gain(&self) -> f64 {
        self.gain + self.feedback.iter().sum::<f64>()
    }

    /// Run the filter over `input` into a newly allocated buffer.
    pub fn apply(&self, input: &[f64]) -> Vec<f64> {
        let order = self.order();
        let mut state = FilterState::default();
        let mut output = Vec::with_capacity(input.len());

        for (i, &x) in input.iter().enumerate() {
            let y = if i < order {
                x
            } else {
                let recursive: f64 = self
                    .feedback
                    .iter()
                    .zip(state.history.iter())
                    .map(|(c, prev)| c * prev)
                    .sum();
                self.gain * x + recursive
            };
            state.push(y);
            output.push(y);
        }

        output
    }
}

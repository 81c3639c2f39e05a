//! Sequence model: stacked LSTM layers followed by a dense head.
//!
//! Weights use the column layout of the framework the model was trained in:
//! `kernel` is `[input_dim][4 * units]`, `recurrent_kernel` is
//! `[units][4 * units]`, and the four gate blocks are ordered
//! input, forget, cell, output.
//!
//! ```text
//! i = sigmoid(x Wi + h Ui + bi)
//! f = sigmoid(x Wf + h Uf + bf)
//! g = tanh(x Wc + h Uc + bc)
//! o = sigmoid(x Wo + h Uo + bo)
//! c' = f * c + i * g
//! h' = o * tanh(c')
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{check_width, read_json, ModelError};

#[inline]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Element-wise activation of a dense layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Linear,
    Sigmoid,
    Tanh,
    Relu,
}

impl Activation {
    #[inline]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Linear => x,
            Self::Sigmoid => sigmoid(x),
            Self::Tanh => x.tanh(),
            Self::Relu => x.max(0.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LstmLayer {
    pub units: usize,
    pub kernel: Vec<Vec<f64>>,
    pub recurrent_kernel: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    /// Emit the hidden state at every timestep instead of only the last.
    #[serde(default)]
    pub return_sequences: bool,
}

impl LstmLayer {
    fn input_dim(&self) -> usize {
        self.kernel.len()
    }

    fn validate(&self, input_dim: usize, idx: usize) -> Result<(), ModelError> {
        let gates = 4 * self.units;
        if self.units == 0 {
            return Err(ModelError::Invalid(format!("layer {idx}: lstm has zero units")));
        }
        if self.input_dim() != input_dim {
            return Err(ModelError::Invalid(format!(
                "layer {idx}: lstm kernel expects {} inputs, previous layer emits {input_dim}",
                self.input_dim()
            )));
        }
        if self.kernel.iter().any(|row| row.len() != gates)
            || self.recurrent_kernel.len() != self.units
            || self.recurrent_kernel.iter().any(|row| row.len() != gates)
            || self.bias.len() != gates
        {
            return Err(ModelError::Invalid(format!(
                "layer {idx}: lstm weights do not match 4 x {} gate columns",
                self.units
            )));
        }
        Ok(())
    }

    /// Run the layer over a sequence, starting from zero state.
    fn forward(&self, sequence: &[Vec<f64>]) -> Vec<Vec<f64>> {
        let u = self.units;
        let mut h = vec![0.0; u];
        let mut c = vec![0.0; u];
        let mut outputs = Vec::with_capacity(sequence.len());

        for x in sequence {
            let mut z = self.bias.clone();
            for (xi, row) in x.iter().zip(&self.kernel) {
                for (zj, w) in z.iter_mut().zip(row) {
                    *zj += xi * w;
                }
            }
            for (hi, row) in h.iter().zip(&self.recurrent_kernel) {
                for (zj, w) in z.iter_mut().zip(row) {
                    *zj += hi * w;
                }
            }

            for k in 0..u {
                let i = sigmoid(z[k]);
                let f = sigmoid(z[u + k]);
                let g = z[2 * u + k].tanh();
                let o = sigmoid(z[3 * u + k]);
                c[k] = f * c[k] + i * g;
                h[k] = o * c[k].tanh();
            }

            if self.return_sequences {
                outputs.push(h.clone());
            }
        }

        if !self.return_sequences {
            outputs.push(h);
        }
        outputs
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    pub units: usize,
    /// `[input_dim][units]`
    pub kernel: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    #[serde(default)]
    pub activation: Activation,
}

impl DenseLayer {
    fn validate(&self, input_dim: usize, idx: usize) -> Result<(), ModelError> {
        if self.kernel.len() != input_dim {
            return Err(ModelError::Invalid(format!(
                "layer {idx}: dense kernel expects {} inputs, previous layer emits {input_dim}",
                self.kernel.len()
            )));
        }
        if self.units == 0
            || self.kernel.iter().any(|row| row.len() != self.units)
            || self.bias.len() != self.units
        {
            return Err(ModelError::Invalid(format!(
                "layer {idx}: dense weights do not match {} units",
                self.units
            )));
        }
        Ok(())
    }

    fn forward(&self, x: &[f64]) -> Vec<f64> {
        let mut out = self.bias.clone();
        for (xi, row) in x.iter().zip(&self.kernel) {
            for (o, w) in out.iter_mut().zip(row) {
                *o += xi * w;
            }
        }
        for o in &mut out {
            *o = self.activation.apply(*o);
        }
        out
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layer {
    Lstm(LstmLayer),
    Dense(DenseLayer),
}

impl Layer {
    const fn output_dim(&self) -> usize {
        match self {
            Self::Lstm(l) => l.units,
            Self::Dense(d) => d.units,
        }
    }
}

/// Failure-probability model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LstmModel {
    /// Features per timestep.
    pub input_dim: usize,
    pub layers: Vec<Layer>,
}

impl LstmModel {
    pub fn new(input_dim: usize, layers: Vec<Layer>) -> Result<Self, ModelError> {
        let model = Self { input_dim, layers };
        model.validate()?;
        Ok(model)
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let model: Self = read_json(path)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if !matches!(self.layers.first(), Some(Layer::Lstm(_))) {
            return Err(ModelError::Invalid("sequence model must start with an lstm layer".into()));
        }
        let mut dim = self.input_dim;
        for (idx, layer) in self.layers.iter().enumerate() {
            match layer {
                Layer::Lstm(l) => l.validate(dim, idx)?,
                Layer::Dense(d) => d.validate(dim, idx)?,
            }
            dim = layer.output_dim();
        }
        match self.layers.last() {
            Some(Layer::Dense(d)) if d.units == 1 => Ok(()),
            _ => Err(ModelError::Invalid(
                "sequence model must end in a single-unit dense layer".into(),
            )),
        }
    }

    /// Forward pass over a `(timesteps, input_dim)` window.
    ///
    /// Returns the output of the final layer at the last timestep.
    pub fn forward(&self, window: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        if window.is_empty() {
            return Err(ModelError::Invalid("empty input window".into()));
        }
        for step in window {
            check_width(self.input_dim, step)?;
        }

        let mut seq: Vec<Vec<f64>> = window.to_vec();
        for layer in &self.layers {
            seq = match layer {
                Layer::Lstm(l) => l.forward(&seq),
                Layer::Dense(d) => seq.iter().map(|x| d.forward(x)).collect(),
            };
        }
        seq.pop().ok_or_else(|| ModelError::Invalid("model produced no output".into()))
    }

    /// Failure probability for a single feature vector, fed as a
    /// one-timestep window.
    pub fn predict_probability(&self, features: &[f64]) -> Result<f64, ModelError> {
        let out = self.forward(&[features.to_vec()])?;
        let p = out.first().copied().ok_or(ModelError::NonFinite)?;
        if !p.is_finite() {
            return Err(ModelError::NonFinite);
        }
        Ok(p.clamp(0.0, 1.0))
    }
}

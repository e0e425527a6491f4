//! Feed-forward network inference over pre-trained weights.
//!
//! Weights are loaded from JSON:
//!
//! ```json
//! {
//!   "input_ranges": [{"min": 0, "max": 500}, ...],
//!   "layers": [
//!     {"weights": [[...5 inputs...], ...], "biases": [...], "activation": "sigmoid"},
//!     {"weights": [[...]], "biases": [0.1], "activation": "sigmoid"}
//!   ]
//! }
//! ```
//!
//! `weights[j][i]` connects input `i` to unit `j`. Inputs are taken in the
//! order rainfall, water level, humidity, temp_min, temp_max and min-max
//! normalised to the training range before propagation. The last layer must
//! have exactly one unit, read as the risk scalar.

use std::path::Path;

use serde::Deserialize;

use crate::features::risk::models::RiskInput;
use crate::features::risk::services::{RiskModel, RiskModelError};

const INPUT_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct InputRange {
    pub min: f64,
    pub max: f64,
}

impl InputRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Scale into [0,1], saturating outside the training range
    pub fn normalize(&self, value: f64) -> f64 {
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

/// Ranges the network was trained on
pub const DEFAULT_INPUT_RANGES: [InputRange; INPUT_COUNT] = [
    InputRange::new(0.0, 500.0),  // rainfall (mm)
    InputRange::new(60.0, 150.0), // water level
    InputRange::new(0.0, 100.0),  // humidity (%)
    InputRange::new(15.0, 35.0),  // temp_min (°C)
    InputRange::new(20.0, 40.0),  // temp_max (°C)
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Sigmoid,
    Relu,
    Tanh,
    Linear,
}

impl Activation {
    fn apply(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Relu => x.max(0.0),
            Activation::Tanh => x.tanh(),
            Activation::Linear => x,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
    pub activation: Activation,
}

impl DenseLayer {
    fn inputs(&self) -> usize {
        self.weights.first().map(|row| row.len()).unwrap_or(0)
    }

    fn units(&self) -> usize {
        self.weights.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.biases)
            .map(|(row, bias)| {
                let sum: f64 = row.iter().zip(input).map(|(w, x)| w * x).sum();
                self.activation.apply(sum + bias)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkWeights {
    #[serde(default)]
    pub input_ranges: Option<Vec<InputRange>>,
    pub layers: Vec<DenseLayer>,
}

#[derive(Debug, Clone)]
pub struct NeuralNetworkModel {
    input_ranges: [InputRange; INPUT_COUNT],
    layers: Vec<DenseLayer>,
}

impl NeuralNetworkModel {
    pub const NAME: &'static str = "neural_network";

    pub fn from_weights(weights: NetworkWeights) -> Result<Self, RiskModelError> {
        let input_ranges = match weights.input_ranges {
            None => DEFAULT_INPUT_RANGES,
            Some(ranges) => {
                let ranges: [InputRange; INPUT_COUNT] = ranges.try_into().map_err(|r: Vec<_>| {
                    RiskModelError::Shape(format!(
                        "expected {} input ranges, got {}",
                        INPUT_COUNT,
                        r.len()
                    ))
                })?;
                if let Some(bad) = ranges
                    .iter()
                    .find(|r| !r.min.is_finite() || !r.max.is_finite() || r.max <= r.min)
                {
                    return Err(RiskModelError::Shape(format!(
                        "input range [{}, {}] is empty",
                        bad.min, bad.max
                    )));
                }
                ranges
            }
        };

        if weights.layers.is_empty() {
            return Err(RiskModelError::Shape("network has no layers".to_string()));
        }

        let mut expected_inputs = INPUT_COUNT;
        for (index, layer) in weights.layers.iter().enumerate() {
            if layer.units() == 0 {
                return Err(RiskModelError::Shape(format!("layer {} has no units", index)));
            }
            if layer.biases.len() != layer.units() {
                return Err(RiskModelError::Shape(format!(
                    "layer {} has {} units but {} biases",
                    index,
                    layer.units(),
                    layer.biases.len()
                )));
            }
            if layer.weights.iter().any(|row| row.len() != expected_inputs) {
                return Err(RiskModelError::Shape(format!(
                    "layer {} expects {} inputs per unit",
                    index, expected_inputs
                )));
            }
            let all_finite = layer
                .weights
                .iter()
                .flatten()
                .chain(&layer.biases)
                .all(|w| w.is_finite());
            if !all_finite {
                return Err(RiskModelError::Shape(format!(
                    "layer {} contains non-finite weights",
                    index
                )));
            }
            expected_inputs = layer.units();
        }

        if expected_inputs != 1 {
            return Err(RiskModelError::Shape(format!(
                "output layer must have 1 unit, has {}",
                expected_inputs
            )));
        }

        debug_assert!(weights.layers[0].inputs() == INPUT_COUNT);

        Ok(Self {
            input_ranges,
            layers: weights.layers,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, RiskModelError> {
        let weights: NetworkWeights = serde_json::from_str(json)?;
        Self::from_weights(weights)
    }

    pub fn load(path: &Path) -> Result<Self, RiskModelError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Propagate raw (un-normalised) features through the network
    pub fn forward(&self, features: &[f64; INPUT_COUNT]) -> f64 {
        let mut activations: Vec<f64> = features
            .iter()
            .zip(&self.input_ranges)
            .map(|(value, range)| range.normalize(*value))
            .collect();

        for layer in &self.layers {
            activations = layer.forward(&activations);
        }

        activations.first().copied().unwrap_or(0.0)
    }
}

impl RiskModel for NeuralNetworkModel {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn raw_risk(&self, input: &RiskInput) -> f64 {
        self.forward(&input.features())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::risk::models::RiskStatus;
    use fake::Fake;

    /// Single sigmoid unit: weights on normalised rainfall and water level only
    const SINGLE_UNIT: &str = r#"{
        "layers": [
            {"weights": [[4.0, 2.0, 0.0, 0.0, 0.0]], "biases": [-3.0], "activation": "sigmoid"}
        ]
    }"#;

    const TWO_LAYER: &str = r#"{
        "input_ranges": [
            {"min": 0, "max": 500}, {"min": 60, "max": 150}, {"min": 0, "max": 100},
            {"min": 15, "max": 35}, {"min": 20, "max": 40}
        ],
        "layers": [
            {
                "weights": [[1.0, 1.0, 0.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0, 0.0]],
                "biases": [0.0, -0.5],
                "activation": "relu"
            },
            {"weights": [[1.0, 1.0]], "biases": [0.0], "activation": "linear"}
        ]
    }"#;

    fn sigmoid(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    #[test]
    fn test_known_vector_single_unit() {
        let model = NeuralNetworkModel::from_json(SINGLE_UNIT).unwrap();

        // rain 250/500 = 0.5, water (105-60)/90 = 0.5 -> 4*0.5 + 2*0.5 - 3 = 0
        let input = RiskInput::new(250.0, 105.0, 50.0, 24.0, 32.0).unwrap();
        let estimate = model.evaluate(&input);
        assert!((estimate.risk_level - 0.5).abs() < 1e-12);
        assert_eq!(estimate.status, RiskStatus::Menengah);

        // Saturated inputs -> sigmoid(3)
        let input = RiskInput::new(800.0, 200.0, 50.0, 24.0, 32.0).unwrap();
        assert!((model.evaluate(&input).risk_level - sigmoid(3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_known_vector_two_layer() {
        let model = NeuralNetworkModel::from_json(TWO_LAYER).unwrap();

        // hidden = [relu(0.2 + 0.5), relu(0.9 - 0.5)] = [0.7, 0.4]; output = 1.1 -> clamped
        let input = RiskInput::new(100.0, 105.0, 90.0, 24.0, 32.0).unwrap();
        assert!((model.forward(&input.features()) - 1.1).abs() < 1e-12);
        assert_eq!(model.evaluate(&input).risk_level, 1.0);

        // hidden = [0.0, relu(0.3 - 0.5)] = [0.0, 0.0]
        let input = RiskInput::new(0.0, 60.0, 30.0, 24.0, 32.0).unwrap();
        assert_eq!(model.evaluate(&input).risk_level, 0.0);
    }

    #[test]
    fn test_inference_is_deterministic() {
        let model = NeuralNetworkModel::from_json(SINGLE_UNIT).unwrap();
        let input = RiskInput::new(123.0, 99.0, 70.0, 23.0, 31.0).unwrap();
        assert_eq!(model.evaluate(&input), model.evaluate(&input));
    }

    #[test]
    fn test_rejects_wrong_input_width() {
        let json = r#"{"layers": [{"weights": [[1.0, 1.0]], "biases": [0.0], "activation": "sigmoid"}]}"#;
        assert!(matches!(
            NeuralNetworkModel::from_json(json),
            Err(RiskModelError::Shape(_))
        ));
    }

    #[test]
    fn test_rejects_multi_unit_output() {
        let json = r#"{"layers": [{
            "weights": [[1, 1, 1, 1, 1], [1, 1, 1, 1, 1]],
            "biases": [0, 0],
            "activation": "sigmoid"
        }]}"#;
        assert!(matches!(
            NeuralNetworkModel::from_json(json),
            Err(RiskModelError::Shape(_))
        ));
    }

    #[test]
    fn test_rejects_bias_mismatch_and_bad_ranges() {
        let json = r#"{"layers": [{"weights": [[1, 1, 1, 1, 1]], "biases": [], "activation": "tanh"}]}"#;
        assert!(NeuralNetworkModel::from_json(json).is_err());

        let json = r#"{
            "input_ranges": [{"min": 1, "max": 1}, {"min": 0, "max": 1}, {"min": 0, "max": 1},
                             {"min": 0, "max": 1}, {"min": 0, "max": 1}],
            "layers": [{"weights": [[1, 1, 1, 1, 1]], "biases": [0], "activation": "sigmoid"}]
        }"#;
        assert!(NeuralNetworkModel::from_json(json).is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            NeuralNetworkModel::from_json("{not json"),
            Err(RiskModelError::WeightsFormat(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = NeuralNetworkModel::load(Path::new("/nonexistent/flood_ann.json"));
        assert!(matches!(result, Err(RiskModelError::WeightsIo(_))));
    }

    #[test]
    fn test_risk_level_bounded_for_random_inputs() {
        let model = NeuralNetworkModel::from_json(TWO_LAYER).unwrap();
        for _ in 0..500 {
            let input = RiskInput::new(
                (0.0..500.0).fake(),
                (60.0..150.0).fake(),
                (0.0..100.0).fake(),
                (15.0..30.0).fake(),
                (30.0..40.0).fake(),
            )
            .unwrap();
            let level = model.evaluate(&input).risk_level;
            assert!((0.0..=1.0).contains(&level));
        }
    }
}

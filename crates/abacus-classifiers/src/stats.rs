use serde::ser::{Serialize, SerializeMap, Serializer};

/// Probabilities are clipped to `[EPSILON, 1 - EPSILON]` before taking logs.
pub const EPSILON: f64 = 1e-7;

/// Mean binary cross-entropy of predicted probabilities against 0/1 labels.
///
/// NaN probabilities propagate to a NaN loss. An empty input gives NaN.
pub fn binary_cross_entropy(probs: &[f64], labels: &[f64]) -> f64 {
    assert_eq!(
        probs.len(),
        labels.len(),
        "Probabilities and labels must have the same length"
    );
    let total: f64 = probs
        .iter()
        .zip(labels)
        .map(|(&p, &y)| {
            let p = p.clamp(EPSILON, 1.0 - EPSILON);
            -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
        })
        .sum();
    total / probs.len() as f64
}

/// Fraction of rows where `p > 0.5` agrees with the label.
pub fn binary_accuracy(probs: &[f64], labels: &[f64]) -> f64 {
    assert_eq!(
        probs.len(),
        labels.len(),
        "Probabilities and labels must have the same length"
    );
    let correct = probs
        .iter()
        .zip(labels)
        .filter(|&(&p, &y)| {
            let predicted = if p > 0.5 { 1.0 } else { 0.0 };
            predicted == y
        })
        .count();
    correct as f64 / probs.len() as f64
}

/// Loss and accuracy of a model on one labelled set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub loss: f64,
    pub accuracy: f64,
}

impl Evaluation {
    pub fn compute(probs: &[f64], labels: &[f64]) -> Self {
        Evaluation {
            loss: binary_cross_entropy(probs, labels),
            accuracy: binary_accuracy(probs, labels),
        }
    }
}

/// Per-epoch metric values, keyed by metric name in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    metrics: Vec<(String, Vec<f64>)>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the series for `name`, creating it if needed.
    pub fn record(&mut self, name: &str, value: f64) {
        match self.metrics.iter_mut().find(|(n, _)| n == name) {
            Some((_, values)) => values.push(value),
            None => self.metrics.push((name.to_string(), vec![value])),
        }
    }

    pub fn record_epoch(&mut self, train: Evaluation, validation: Evaluation) {
        self.record("loss", train.loss);
        self.record("accuracy", train.accuracy);
        self.record("val_loss", validation.loss);
        self.record("val_accuracy", validation.accuracy);
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.metrics
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn metric_names(&self) -> impl Iterator<Item = &str> {
        self.metrics.iter().map(|(n, _)| n.as_str())
    }

    /// Number of epochs recorded, taken from the longest series.
    pub fn epochs(&self) -> usize {
        self.metrics.iter().map(|(_, v)| v.len()).max().unwrap_or(0)
    }

    pub fn last(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|v| v.last().copied())
    }
}

impl Serialize for History {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.metrics.len()))?;
        for (name, values) in &self.metrics {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_entropy_of_confident_correct_predictions_is_small() {
        let loss = binary_cross_entropy(&[0.99, 0.01], &[1.0, 0.0]);
        assert!(loss < 0.02, "loss = {}", loss);
    }

    #[test]
    fn cross_entropy_clips_extreme_probabilities() {
        let loss = binary_cross_entropy(&[0.0], &[1.0]);
        assert!(loss.is_finite());
        assert!((loss - (-(EPSILON).ln())).abs() < 1e-9);
    }

    #[test]
    fn nan_probability_propagates_to_loss() {
        assert!(binary_cross_entropy(&[f64::NAN], &[1.0]).is_nan());
        // NaN never exceeds the threshold, so it predicts the 0 class.
        assert_eq!(binary_accuracy(&[f64::NAN], &[0.0]), 1.0);
    }

    #[test]
    fn accuracy_uses_half_threshold() {
        let acc = binary_accuracy(&[0.6, 0.5, 0.4, 0.9], &[1.0, 1.0, 0.0, 0.0]);
        assert!((acc - 0.5).abs() < 1e-12);
    }

    #[test]
    fn history_keeps_insertion_order() {
        let mut h = History::new();
        h.record_epoch(
            Evaluation { loss: 0.7, accuracy: 0.5 },
            Evaluation { loss: 0.8, accuracy: 0.4 },
        );
        h.record_epoch(
            Evaluation { loss: 0.6, accuracy: 0.6 },
            Evaluation { loss: 0.7, accuracy: 0.5 },
        );
        assert_eq!(
            h.metric_names().collect::<Vec<_>>(),
            vec!["loss", "accuracy", "val_loss", "val_accuracy"]
        );
        assert_eq!(h.epochs(), 2);
        assert_eq!(h.get("loss"), Some(&[0.7, 0.6][..]));
        assert_eq!(h.last("val_accuracy"), Some(0.5));

        let json = serde_json::to_string(&h).unwrap();
        assert!(json.starts_with(r#"{"loss":[0.7,0.6],"accuracy""#));
    }
}

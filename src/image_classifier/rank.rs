use crate::image_classifier::labels::LabelSet;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    /// Percentage in [0, 100], rounded to two decimals.
    pub confidence_percent: f32,
}

/// Top predictions, strictly ordered by descending confidence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RankedResult {
    pub predictions: Vec<Prediction>,
}

impl RankedResult {
    pub fn top(&self) -> Option<&Prediction> {
        self.predictions.first()
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}

/// Softmax with the maximum subtracted first, so large logits do not overflow.
pub fn softmax(scores: &[f32]) -> Vec<f32> {
    if scores.is_empty() {
        return Vec::new();
    }
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if !sum.is_finite() || sum <= 0.0 {
        return vec![0.0; scores.len()];
    }
    exps.iter().map(|e| e / sum).collect()
}

/// The number of entries `rank` returns for a requested `k`. Out-of-range values fall back to
/// the full list.
pub fn effective_k(k: usize, available: usize) -> usize {
    if k >= 1 && k <= available {
        k
    } else {
        available
    }
}

fn round_percent(probability: f32) -> f32 {
    (probability as f64 * 100.0 * 100.0).round() as f32 / 100.0
}

pub fn rank(scores: &[f32], labels: &LabelSet, k: usize) -> RankedResult {
    let probabilities = softmax(scores);

    let mut indexed: Vec<(usize, f32)> = probabilities
        .into_iter()
        .enumerate()
        .take(labels.len())
        .collect();

    // `sort_by` is stable: equal probabilities stay in label order.
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));
    indexed.truncate(effective_k(k, indexed.len()));

    let predictions = indexed
        .into_iter()
        .filter_map(|(index, probability)| {
            labels.get(index).map(|label| Prediction {
                label: label.to_string(),
                confidence_percent: round_percent(probability),
            })
        })
        .collect();

    RankedResult { predictions }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels_of(result: &RankedResult) -> Vec<&str> {
        result.predictions.iter().map(|p| p.label.as_str()).collect()
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let inputs: Vec<Vec<f32>> = vec![
            vec![1.0, 2.0, 3.0],
            vec![-1000.0, -999.0, -1001.0],
            vec![1000.0, 1000.0, -1000.0],
            vec![88.0, 89.0, 90.0, 1.0e30],
            vec![0.0; 10],
        ];

        for scores in inputs {
            let probabilities = softmax(&scores);
            let sum: f32 = probabilities.iter().sum();

            assert!(probabilities.iter().all(|p| p.is_finite()));
            assert!((sum - 1.0).abs() < 1e-4, "sum {} for {:?}", sum, scores);
        }
    }

    #[test]
    fn test_uniform_scores_keep_label_order() {
        let labels = LabelSet::waste();

        let result = rank(&[0.7; 10], &labels, 3);

        assert_eq!(labels_of(&result), vec!["battery", "biological", "cardboard"]);
        assert!(result.predictions.iter().all(|p| p.confidence_percent == 10.0));
    }

    #[test]
    fn test_descending_order() {
        let labels = LabelSet::waste();
        let scores = [0.1, 0.2, 3.0, 0.0, 0.0, 0.0, 5.0, 0.0, 4.0, 0.0];

        let result = rank(&scores, &labels, 3);

        assert_eq!(labels_of(&result), vec!["paper", "shoes", "cardboard"]);
        assert!(result.predictions[0].confidence_percent > result.predictions[1].confidence_percent);
        assert!(result.predictions[1].confidence_percent > result.predictions[2].confidence_percent);
    }

    #[test]
    fn test_ties_break_by_label_index() {
        let labels = LabelSet::waste();
        let scores = [0.0, 2.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0];

        let first = rank(&scores, &labels, 3);
        let second = rank(&scores, &labels, 3);

        assert_eq!(labels_of(&first), vec!["biological", "clothes", "trash"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_sort_uses_unrounded_probabilities() {
        let labels = LabelSet::new(vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        // Probabilities of "a" and "b" differ below the rounding precision.
        let scores = [0.0, 0.000_001, -20.0];

        let result = rank(&scores, &labels, 2);

        assert_eq!(labels_of(&result), vec!["b", "a"]);
    }

    #[test]
    fn test_out_of_range_k_returns_full_list() {
        let labels = LabelSet::waste();
        let scores = [1.0; 10];

        assert_eq!(rank(&scores, &labels, 0).len(), 10);
        assert_eq!(rank(&scores, &labels, 11).len(), 10);
        assert_eq!(rank(&scores, &labels, 10).len(), 10);
        assert_eq!(effective_k(3, 10), 3);
    }

    #[test]
    fn test_percent_rounding() {
        let labels = LabelSet::new(vec!["a".to_string(), "b".to_string(), "c".to_string()]);

        let result = rank(&[0.0, 0.0, 0.0], &labels, 1);

        assert_eq!(result.predictions[0].confidence_percent, 33.33);
    }
}

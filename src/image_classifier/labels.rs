/// Waste categories in model output order. Index `i` of the model output is `WASTE_LABELS[i]`.
pub const WASTE_LABELS: [&str; 10] = [
    "battery",
    "biological",
    "cardboard",
    "clothes",
    "glass",
    "metal",
    "paper",
    "plastic",
    "shoes",
    "trash",
];

#[derive(Debug, Clone, PartialEq)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub fn waste() -> Self {
        Self::new(WASTE_LABELS.iter().map(|label| label.to_string()).collect())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }
}

impl Default for LabelSet {
    fn default() -> Self {
        Self::waste()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waste_label_order() {
        let labels = LabelSet::waste();

        assert_eq!(labels.len(), 10);
        assert_eq!(labels.get(0), Some("battery"));
        assert_eq!(labels.get(2), Some("cardboard"));
        assert_eq!(labels.get(9), Some("trash"));
        assert_eq!(labels.get(10), None);
    }
}

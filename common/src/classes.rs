//! Tumor classes and classification outcomes.
//!
use std::fmt;

use serde::{Deserialize, Serialize};

/// Categories the classifier distinguishes, in the order of its output vector.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TumorClass {
    Glioma,
    Meningioma,
    NoTumor,
    Pituitary,
}

impl TumorClass {
    /// All classes, indexed like the classifier output.
    pub const ALL: [TumorClass; 4] = [
        TumorClass::Glioma,
        TumorClass::Meningioma,
        TumorClass::NoTumor,
        TumorClass::Pituitary,
    ];

    /// Class for a given position in the classifier output vector.
    pub fn from_index(index: usize) -> Option<TumorClass> {
        Self::ALL.get(index).copied()
    }

    /// Short description shown to the user next to a prediction.
    pub fn info(&self) -> &'static str {
        match self {
            TumorClass::Glioma => {
                "Glioma: A tumor that arises from glial cells in the brain. \
                 Can be slow-growing or aggressive."
            }
            TumorClass::Meningioma => {
                "Meningioma: Usually benign tumor forming on the meninges, \
                 the brain's protective layers."
            }
            TumorClass::NoTumor => {
                "No tumor detected: The scan appears normal without signs of a tumor."
            }
            TumorClass::Pituitary => {
                "Pituitary tumor: A growth in the pituitary gland which can \
                 affect hormone levels."
            }
        }
    }
}

impl fmt::Display for TumorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TumorClass::Glioma => "glioma",
            TumorClass::Meningioma => "meningioma",
            TumorClass::NoTumor => "notumor",
            TumorClass::Pituitary => "pituitary",
        };
        write!(f, "{}", name)
    }
}

/// Successful classifier output with the winning class and its probability.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Prediction {
    pub class: TumorClass,
    /// Probability of `class`, in `[0, 1]`.
    pub confidence: f32,
}

/// Outcome of classifying one uploaded image.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Classification {
    Predicted(Prediction),
    Failed(String),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_class_order_matches_indices() {
        assert_eq!(TumorClass::from_index(0), Some(TumorClass::Glioma));
        assert_eq!(TumorClass::from_index(1), Some(TumorClass::Meningioma));
        assert_eq!(TumorClass::from_index(2), Some(TumorClass::NoTumor));
        assert_eq!(TumorClass::from_index(3), Some(TumorClass::Pituitary));
        assert_eq!(TumorClass::from_index(4), None);
    }

    #[test]
    fn test_display_names() {
        let names: Vec<String> = TumorClass::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(names, ["glioma", "meningioma", "notumor", "pituitary"]);
    }

    #[test]
    fn test_every_class_has_info() {
        for class in TumorClass::ALL {
            assert!(!class.info().is_empty());
        }
    }
}

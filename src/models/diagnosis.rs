use serde::{Deserialize, Serialize};

use super::enums::{ClassificationBasis, DiagnosisCategory};

/// Keyword-derived differential diagnosis for display.
///
/// Recomputed for every new record; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisClassification {
    pub primary: String,
    /// Ordered alternatives. Never contains `primary`.
    pub alternatives: Vec<String>,
    pub confidence: String,
    pub category: DiagnosisCategory,
    pub basis: ClassificationBasis,
}

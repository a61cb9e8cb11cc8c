use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named criterion channels are scored against during analysis.
///
/// System filters are server-provided; custom filters are user-authored
/// and carry the prompt text they were created from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisFilter {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub is_custom: bool,
    pub created_at: DateTime<Utc>,
}

/// Body of a create-custom-filter request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomFilter {
    pub name: String,
    pub prompt: String,
}

/// The set of filter ids chosen to parameterize an analysis run or a
/// smart-set build. Ordered, no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    ids: Vec<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.iter().any(|x| x == id)
    }

    /// Add the id if absent, remove it if present.
    pub fn toggle(&mut self, id: &str) {
        match self.ids.iter().position(|x| x == id) {
            Some(pos) => {
                self.ids.remove(pos);
            }
            None => self.ids.push(id.to_string()),
        }
    }

    pub fn select(&mut self, id: &str) {
        if !self.is_selected(id) {
            self.ids.push(id.to_string());
        }
    }

    pub fn deselect(&mut self, id: &str) {
        self.ids.retain(|x| x != id);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Selected ids in selection order.
    pub fn selected(&self) -> &[String] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

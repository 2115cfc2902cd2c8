use serde::{Deserialize, Serialize};

/// Options shared by find and replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub fuzzy: bool,
    /// Minimum similarity a fuzzy window needs (inclusive)
    pub threshold: f64,
    /// Columns to search; empty means every column
    pub column_scope: Vec<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            fuzzy: false,
            threshold: 0.6,
            column_scope: Vec::new(),
        }
    }
}

impl SearchOptions {
    #[must_use]
    pub fn fuzzy(threshold: f64) -> Self {
        Self {
            fuzzy: true,
            threshold,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    #[must_use]
    pub fn in_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_scope = columns.into_iter().map(Into::into).collect();
        self
    }
}

/// Search options as a host submits them. Every field is optional; a missing
/// threshold is filled from the editor config by [`SearchRequest::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    pub case_sensitive: bool,
    pub fuzzy: bool,
    #[serde(alias = "fuzzyThreshold")]
    pub threshold: Option<f64>,
    pub column_scope: Vec<String>,
}

impl SearchRequest {
    /// Options to search with, taking the threshold from `default_threshold`
    /// when the request leaves it out.
    pub fn resolve(self, default_threshold: f64) -> SearchOptions {
        SearchOptions {
            case_sensitive: self.case_sensitive,
            fuzzy: self.fuzzy,
            threshold: self.threshold.unwrap_or(default_threshold),
            column_scope: self.column_scope,
        }
    }
}

/// One cell that matched a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub row_index: usize,
    pub column_id: String,
    /// Character offset of the match within the cell text
    pub match_index: usize,
    /// The matched span, as it appears in the cell
    pub matched_text: String,
    pub score: f64,
    pub exact: bool,
}

/// Summary of a finished search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStats {
    pub total: usize,
    pub exact: usize,
    pub fuzzy: usize,
}

impl MatchStats {
    pub fn from_results(results: &[SearchResult]) -> Self {
        let exact = results.iter().filter(|r| r.exact).count();
        Self {
            total: results.len(),
            exact,
            fuzzy: results.len() - exact,
        }
    }
}

/// Lifecycle of the search panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchStatus {
    #[default]
    Idle,
    Running,
    Done,
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    #[test]
    fn test_request_without_threshold_uses_default() {
        let request: SearchRequest = serde_json::from_str(r#"{"fuzzy": true}"#).unwrap();
        let options = request.resolve(0.8);
        assert!(options.fuzzy);
        assert_eq!(options.threshold, 0.8);
    }

    #[test]
    fn test_request_threshold_wins() {
        let request: SearchRequest =
            serde_json::from_str(r#"{"fuzzyThreshold": 0.4, "columnScope": ["name"]}"#).unwrap();
        let options = request.resolve(0.8);
        assert_eq!(options.threshold, 0.4);
        assert_eq!(options.column_scope, vec!["name".to_string()]);
    }
}

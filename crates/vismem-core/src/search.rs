//! Client-side post-processing of search responses: confidence
//! filtering followed by sorting. The remote query itself is untouched
//! by these settings.

use serde::{Deserialize, Serialize};

use crate::model::SearchResult;

/// How a result set is ordered after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Keep the backend's relevance order.
    #[default]
    Relevance,
    /// Newest upload first.
    Date,
    /// Lexicographic by filename, ascending.
    Filename,
    /// Highest confidence first.
    Confidence,
}

pub const ALL_SORT_KEYS: &[SortKey] = &[
    SortKey::Relevance,
    SortKey::Date,
    SortKey::Filename,
    SortKey::Confidence,
];

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Relevance => write!(f, "relevance"),
            Self::Date => write!(f, "date"),
            Self::Filename => write!(f, "filename"),
            Self::Confidence => write!(f, "confidence"),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "relevance" => Ok(Self::Relevance),
            "date" => Ok(Self::Date),
            "filename" => Ok(Self::Filename),
            "confidence" => Ok(Self::Confidence),
            _ => Err(format!("unknown sort key: {s}")),
        }
    }
}

/// User-selected post-processing settings. Applied client-side to each
/// response after it arrives.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Results scored below this are dropped. Zero disables filtering.
    #[serde(default)]
    pub min_confidence: f32,
    #[serde(default)]
    pub sort_by: SortKey,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            min_confidence: 0.0,
            sort_by: SortKey::Relevance,
        }
    }
}

/// Apply the fixed post-processing order: confidence filter first, then
/// sort. All sorts are stable, so equal keys keep backend order.
pub fn postprocess(results: Vec<SearchResult>, filters: &SearchFilters) -> Vec<SearchResult> {
    let mut out: Vec<SearchResult> = if filters.min_confidence > 0.0 {
        results
            .into_iter()
            .filter(|r| r.confidence_score >= filters.min_confidence)
            .collect()
    } else {
        results
    };

    match filters.sort_by {
        SortKey::Relevance => {
            // Backend already returns relevance order.
        }
        SortKey::Date => {
            out.sort_by(|a, b| b.screenshot.upload_time.cmp(&a.screenshot.upload_time));
        }
        SortKey::Filename => {
            out.sort_by(|a, b| a.screenshot.filename.cmp(&b.screenshot.filename));
        }
        SortKey::Confidence => {
            out.sort_by(|a, b| {
                b.confidence_score
                    .partial_cmp(&a.confidence_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Screenshot;
    use chrono::{Duration, Utc};
    use std::str::FromStr;

    fn hit(filename: &str, confidence: f32, days_old: i64) -> SearchResult {
        SearchResult {
            screenshot: Screenshot {
                filename: filename.to_string(),
                upload_time: Utc::now() - Duration::days(days_old),
                text_content: None,
                image_data: None,
            },
            confidence_score: confidence,
            visual_description: String::new(),
        }
    }

    #[test]
    fn test_confidence_filter_drops_low_scores() {
        // Backend order [0.9, 0.4, 0.6], threshold 0.5 → [0.9, 0.6] in
        // backend order.
        let results = vec![hit("a.png", 0.9, 1), hit("b.png", 0.4, 2), hit("c.png", 0.6, 3)];
        let filters = SearchFilters {
            min_confidence: 0.5,
            sort_by: SortKey::Relevance,
        };
        let out = postprocess(results, &filters);
        let names: Vec<&str> = out.iter().map(|r| r.filename()).collect();
        assert_eq!(names, vec!["a.png", "c.png"]);
    }

    #[test]
    fn test_zero_threshold_keeps_everything() {
        let results = vec![hit("a.png", 0.0, 1), hit("b.png", 0.01, 2)];
        let out = postprocess(results, &SearchFilters::default());
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_filter_monotonicity() {
        let results = vec![
            hit("a.png", 0.9, 1),
            hit("b.png", 0.6, 2),
            hit("c.png", 0.4, 3),
            hit("d.png", 0.2, 4),
        ];
        let mut prev_len = usize::MAX;
        for threshold in [0.0, 0.3, 0.5, 0.7, 0.95] {
            let filters = SearchFilters {
                min_confidence: threshold,
                sort_by: SortKey::Relevance,
            };
            let len = postprocess(results.clone(), &filters).len();
            assert!(len <= prev_len, "raising the threshold grew the result set");
            prev_len = len;
        }
    }

    #[test]
    fn test_sort_by_filename_ascending() {
        let results = vec![hit("c.png", 0.5, 1), hit("a.png", 0.4, 2), hit("b.png", 0.9, 3)];
        let filters = SearchFilters {
            min_confidence: 0.0,
            sort_by: SortKey::Filename,
        };
        let out = postprocess(results, &filters);
        for pair in out.windows(2) {
            assert!(pair[0].filename() <= pair[1].filename());
        }
    }

    #[test]
    fn test_sort_by_date_descending() {
        let results = vec![hit("old.png", 0.5, 10), hit("new.png", 0.5, 0), hit("mid.png", 0.5, 5)];
        let filters = SearchFilters {
            min_confidence: 0.0,
            sort_by: SortKey::Date,
        };
        let out = postprocess(results, &filters);
        let names: Vec<&str> = out.iter().map(|r| r.filename()).collect();
        assert_eq!(names, vec!["new.png", "mid.png", "old.png"]);
    }

    #[test]
    fn test_sort_by_confidence_descending() {
        let results = vec![hit("a.png", 0.3, 1), hit("b.png", 0.9, 2), hit("c.png", 0.6, 3)];
        let filters = SearchFilters {
            min_confidence: 0.0,
            sort_by: SortKey::Confidence,
        };
        let out = postprocess(results, &filters);
        let scores: Vec<f32> = out.iter().map(|r| r.confidence_score).collect();
        assert_eq!(scores, vec![0.9, 0.6, 0.3]);
    }

    #[test]
    fn test_relevance_preserves_backend_order() {
        let results = vec![hit("z.png", 0.2, 1), hit("a.png", 0.9, 2)];
        let out = postprocess(results, &SearchFilters::default());
        let names: Vec<&str> = out.iter().map(|r| r.filename()).collect();
        assert_eq!(names, vec!["z.png", "a.png"]);
    }

    #[test]
    fn test_sort_key_round_trip() {
        for key in ALL_SORT_KEYS {
            assert_eq!(SortKey::from_str(&key.to_string()).unwrap(), *key);
        }
        assert!(SortKey::from_str("popularity").is_err());
    }
}

// crates/server/src/routes/autocomplete.rs
//! Tag suggestion endpoints.
//!
//! - GET  /api/autocomplete?mode=addtag|search&fragment=...
//! - POST /api/autocomplete/rebuild

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use mediatag_autocomplete::{Autocompleter, IndexStats, TagFrequency};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Query parameters for GET /api/autocomplete.
///
/// Both are optional here so a missing one is reported as our own 400.
#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    pub mode: Option<String>,
    pub fragment: Option<String>,
}

/// A tag operator from the search box, e.g. `t=cat` or `-t~at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOperator {
    /// `t=` / `T=`: tag equals.
    TagExact,
    /// `-t=` / `-T=`: tag does not equal.
    NotTagExact,
    /// `t~` / `T~`: tag contains.
    TagPartial,
    /// `-t~` / `-T~`: tag does not contain.
    NotTagPartial,
}

impl SearchOperator {
    /// Split a search term into its tag operator and the text being typed.
    pub fn parse(term: &str) -> Option<(Self, &str)> {
        let (negated, rest) = match term.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, term),
        };
        let mut chars = rest.chars();
        if !matches!(chars.next(), Some('t' | 'T')) {
            return None;
        }
        let op = match (chars.next()?, negated) {
            ('=', false) => Self::TagExact,
            ('=', true) => Self::NotTagExact,
            ('~', false) => Self::TagPartial,
            ('~', true) => Self::NotTagPartial,
            _ => return None,
        };
        Some((op, chars.as_str()))
    }

    /// Operator that a completed suggestion is rewritten to; partial
    /// matches become exact ones once a tag has been picked.
    fn completion_prefix(self) -> &'static str {
        match self {
            Self::TagExact | Self::TagPartial => "t=",
            Self::NotTagExact | Self::NotTagPartial => "-t=",
        }
    }
}

/// GET /api/autocomplete - Suggest tags for a partially typed input.
///
/// `mode=addtag` suggests tags to attach to a file (prefix and infix
/// matches merged). `mode=search` expects a search term carrying a tag
/// operator and returns suggestions rewritten as complete terms.
pub async fn suggest(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AutocompleteQuery>,
) -> ApiResult<Json<Vec<TagFrequency>>> {
    let mode = required(query.mode.as_deref(), "mode")?;
    let fragment = required(query.fragment.as_deref(), "fragment")?;

    let tags = if mode.eq_ignore_ascii_case("addtag") {
        state.autocomplete.suggest_merged(fragment)
    } else if mode.eq_ignore_ascii_case("search") {
        for_search(&state.autocomplete, fragment)?
    } else {
        return Err(ApiError::BadRequest("Invalid mode.".to_string()));
    };
    Ok(Json(tags))
}

fn required<'a>(value: Option<&'a str>, name: &str) -> ApiResult<&'a str> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::BadRequest(format!("Param '{name}' not specified."))),
    }
}

fn for_search(ac: &Autocompleter, term: &str) -> ApiResult<Vec<TagFrequency>> {
    let (op, text) = SearchOperator::parse(term).ok_or_else(|| {
        ApiError::BadRequest(format!("Fragment does not start with a tag operator: {term}"))
    })?;
    let found = match op {
        SearchOperator::TagExact | SearchOperator::NotTagExact => ac.suggest_exact(text),
        SearchOperator::TagPartial | SearchOperator::NotTagPartial => ac.suggest_merged(text),
    };
    let prefix = op.completion_prefix();
    Ok(found.iter().map(|tf| tf.with_tag_prefix(prefix)).collect())
}

/// POST /api/autocomplete/rebuild - Rebuild the suggestion indexes now.
///
/// Waits for the rebuild to finish. On a store error the previous indexes
/// keep serving and the error is returned.
pub async fn rebuild(State(state): State<Arc<AppState>>) -> ApiResult<Json<IndexStats>> {
    let stats = state.autocomplete.rebuild().await?;
    tracing::info!(
        tags = stats.exact_entries,
        fragments = stats.fragment_entries,
        "Manual autocomplete rebuild complete"
    );
    Ok(Json(stats))
}

/// Create the autocomplete routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/autocomplete", get(suggest))
        .route("/autocomplete/rebuild", post(rebuild))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_operators() {
        assert_eq!(SearchOperator::parse("t=cat"), Some((SearchOperator::TagExact, "cat")));
        assert_eq!(SearchOperator::parse("T=cat"), Some((SearchOperator::TagExact, "cat")));
        assert_eq!(SearchOperator::parse("-t=cat"), Some((SearchOperator::NotTagExact, "cat")));
        assert_eq!(SearchOperator::parse("-T=cat"), Some((SearchOperator::NotTagExact, "cat")));
        assert_eq!(SearchOperator::parse("t~at"), Some((SearchOperator::TagPartial, "at")));
        assert_eq!(SearchOperator::parse("T~at"), Some((SearchOperator::TagPartial, "at")));
        assert_eq!(SearchOperator::parse("-t~at"), Some((SearchOperator::NotTagPartial, "at")));
        assert_eq!(SearchOperator::parse("-T~at"), Some((SearchOperator::NotTagPartial, "at")));
    }

    #[test]
    fn test_parse_keeps_operator_chars_in_text() {
        assert_eq!(SearchOperator::parse("t=a=b"), Some((SearchOperator::TagExact, "a=b")));
        assert_eq!(SearchOperator::parse("t="), Some((SearchOperator::TagExact, "")));
    }

    #[test]
    fn test_parse_rejects_other_terms() {
        assert_eq!(SearchOperator::parse("cat"), None);
        assert_eq!(SearchOperator::parse("f~cat"), None);
        assert_eq!(SearchOperator::parse("t<3"), None);
        assert_eq!(SearchOperator::parse("--t=cat"), None);
        assert_eq!(SearchOperator::parse("t"), None);
        assert_eq!(SearchOperator::parse(""), None);
    }

    #[test]
    fn test_completion_prefix() {
        assert_eq!(SearchOperator::TagPartial.completion_prefix(), "t=");
        assert_eq!(SearchOperator::NotTagPartial.completion_prefix(), "-t=");
    }
}

//! Glossary handlers.
//!
//! Numeric parameters arrive as strings so a malformed value is reported as a
//! validation error in the usual envelope instead of a bare rejection.

use axum::Json;
use axum::extract::{Path, Query, State};
use skymates_core::models::term::{TermDetail, TermSummary};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{
    Envelope, ListTermsQuery, ListTermsResponse, SearchQuery, SearchResponse, TermCountResponse,
};

/// `GET /api/terms/suggestions?query=`: ranked name matches.
pub async fn suggestions_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Envelope<SearchResponse>>> {
    let terms: Vec<TermSummary> = state.terms.search(&params.query).await?;
    Ok(Json(Envelope::ok(SearchResponse { terms })))
}

/// `GET /api/terms?category_id=&last_id=&limit=`: one page of a category.
pub async fn list_terms_handler(
    State(state): State<AppState>,
    Query(params): Query<ListTermsQuery>,
) -> AppResult<Json<Envelope<ListTermsResponse>>> {
    let category_id = params
        .category_id
        .as_deref()
        .ok_or_else(|| AppError::Validation("category_id is required".into()))
        .and_then(|raw| parse_i64("category_id", raw))?;
    let last_id = optional_i64("last_id", params.last_id.as_deref())?;
    let limit = optional_i64("limit", params.limit.as_deref())?;

    let page = state
        .terms
        .list_by_category(category_id, last_id, limit)
        .await?;
    let last_id = page.next_cursor();
    Ok(Json(Envelope::ok(ListTermsResponse {
        terms: page.terms,
        last_id,
        has_more: page.has_more,
    })))
}

/// `GET /api/terms/{id}`: a term with its categories.
pub async fn term_detail_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Envelope<TermDetail>>> {
    let id = parse_i64("term id", &id)?;
    let detail = state.terms.get_term(id).await?;
    Ok(Json(Envelope::ok(detail)))
}

/// `GET /api/categories/{id}/term-count`: number of terms in a category.
pub async fn term_count_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Envelope<TermCountResponse>>> {
    let category_id = parse_i64("category id", &id)?;
    let term_count = state.terms.count_in_category(category_id).await?;
    Ok(Json(Envelope::ok(TermCountResponse {
        category_id,
        term_count,
    })))
}

fn parse_i64(name: &str, raw: &str) -> AppResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::Validation(format!("Invalid {name}: {raw:?}")))
}

/// Empty values count as absent.
fn optional_i64(name: &str, raw: Option<&str>) -> AppResult<Option<i64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_i64(name, raw).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_optional_numbers() {
        assert_eq!(optional_i64("limit", None).unwrap(), None);
        assert_eq!(optional_i64("limit", Some("")).unwrap(), None);
        assert_eq!(optional_i64("limit", Some(" 7 ")).unwrap(), Some(7));
        assert!(matches!(
            optional_i64("limit", Some("seven")),
            Err(AppError::Validation(_))
        ));
    }
}

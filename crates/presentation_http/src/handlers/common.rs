//! Envelopes, paging parameters and helpers shared by the resource handlers

use std::str::FromStr;

use application::{ListQuery, Pagination};
use axum::{Json, http::StatusCode};
use chrono::{Datelike, Utc};
use domain::{Creator, Slug};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::ApiError;

/// Success envelope: `{status, data}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    #[schema(example = 200)]
    pub status: u16,
    pub data: T,
}

/// Response pair handlers return on success
pub type Reply<T> = (StatusCode, Json<ApiResponse<T>>);

pub fn reply<T>(status: StatusCode, data: T) -> Reply<T> {
    (
        status,
        Json(ApiResponse {
            status: status.as_u16(),
            data,
        }),
    )
}

pub fn ok<T>(data: T) -> Reply<T> {
    reply(StatusCode::OK, data)
}

pub fn created<T>(data: T) -> Reply<T> {
    reply(StatusCode::CREATED, data)
}

/// Paging and search parameters of list endpoints
#[derive(Debug, Clone, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// 1-based page number
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "must be at least 1"))]
    #[param(default = 1, minimum = 1)]
    pub page: u32,
    /// Items per page
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    #[param(default = 10, minimum = 1, maximum = 100)]
    pub limit: u32,
    /// Substring filter
    #[serde(default)]
    pub search: String,
}

const fn default_page() -> u32 {
    ListQuery::DEFAULT_PAGE
}

const fn default_limit() -> u32 {
    ListQuery::DEFAULT_LIMIT
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            search: String::new(),
        }
    }
}

impl From<ListParams> for ListQuery {
    fn from(params: ListParams) -> Self {
        Self::new(params.page, params.limit, params.search)
    }
}

/// Paging summary of a list response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationResponse {
    /// Matching items across all pages
    pub total: u64,
    /// Items skipped before this page
    pub skip: u64,
    pub page: u32,
    /// Items on this page
    pub count: usize,
}

impl From<Pagination> for PaginationResponse {
    fn from(p: Pagination) -> Self {
        Self {
            total: p.total,
            skip: p.skip,
            page: p.page,
            count: p.count,
        }
    }
}

/// User who created a catalog record
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreatorResponse {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
}

impl From<Creator> for CreatorResponse {
    fn from(creator: Creator) -> Self {
        Self {
            id: creator.id.as_uuid(),
            name: creator.name,
            email: creator.email.as_str().to_string(),
        }
    }
}

/// Body of a successful delete
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct Deleted {
    pub deleted: bool,
}

/// Body of a successful removal from a playlist
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct Removed {
    pub removed: bool,
}

/// Parse a path id; anything unparsable is reported as `"{entity} not found"`
pub fn path_id<T: FromStr>(raw: &str, entity: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("{entity} not found")))
}

/// `#RRGGBB`
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].bytes().all(|b| b.is_ascii_hexdigit());

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("hex_color")
            .with_message("must be a hex color like #FF5722".into()))
    }
}

/// Names and titles must contain at least one ASCII letter or digit
///
/// The slug keeps only `[a-z0-9]`; a name without any would store an empty
/// slug and collide with every other such name.
pub fn validate_sluggable(name: &str) -> Result<(), ValidationError> {
    if Slug::from_name(name).is_empty() {
        Err(ValidationError::new("slug")
            .with_message("must contain at least one letter (a-z) or digit".into()))
    } else {
        Ok(())
    }
}

/// Between 1900 and the current year
pub fn validate_debut_year(year: i32) -> Result<(), ValidationError> {
    if (1900..=Utc::now().year()).contains(&year) {
        Ok(())
    } else {
        Err(ValidationError::new("debut_year")
            .with_message("must be between 1900 and the current year".into()))
    }
}

#[cfg(test)]
mod tests {
    use domain::GenreId;

    use super::*;

    #[test]
    fn list_params_defaults() {
        let params: ListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 10);
        assert!(params.search.is_empty());
        assert!(params.validate().is_ok());
    }

    #[test]
    fn list_params_bounds() {
        let too_many = ListParams {
            limit: 101,
            ..ListParams::default()
        };
        assert!(too_many.validate().is_err());

        let page_zero = ListParams {
            page: 0,
            ..ListParams::default()
        };
        assert!(page_zero.validate().is_err());
    }

    #[test]
    fn list_params_convert() {
        let query = ListQuery::from(ListParams {
            page: 3,
            limit: 20,
            search: "rock".to_string(),
        });
        assert_eq!(query.skip(), 40);
        assert_eq!(query.search_term(), Some("rock"));
    }

    #[test]
    fn envelope_shape() {
        let (status, Json(body)) = created(Deleted { deleted: true });
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"status": 201, "data": {"deleted": true}})
        );
    }

    #[test]
    fn bad_path_id_is_not_found() {
        let err = path_id::<GenreId>("not-a-uuid", "Genre").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(msg) if msg == "Genre not found"));

        let id = GenreId::new();
        assert_eq!(path_id::<GenreId>(&id.to_string(), "Genre").unwrap(), id);
    }

    #[test]
    fn hex_colors() {
        assert!(validate_hex_color("#FF5722").is_ok());
        assert!(validate_hex_color("#ff5722").is_ok());
        assert!(validate_hex_color("FF5722").is_err());
        assert!(validate_hex_color("#FF572").is_err());
        assert!(validate_hex_color("#GG5722").is_err());
    }

    #[test]
    fn debut_years() {
        let this_year = Utc::now().year();
        assert!(validate_debut_year(1900).is_ok());
        assert!(validate_debut_year(this_year).is_ok());
        assert!(validate_debut_year(1899).is_err());
        assert!(validate_debut_year(this_year + 1).is_err());
    }

    #[test]
    fn names_need_a_slug_character() {
        assert!(validate_sluggable("Rock").is_ok());
        assert!(validate_sluggable("Björk").is_ok());
        assert!(validate_sluggable("日本").is_err());
        assert!(validate_sluggable("!!!").is_err());
    }
}

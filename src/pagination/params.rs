//! Query parameter parsing and pagination default resolution.

use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::config::PaginationConfig;

/// Errors raised while parsing inbound query or path values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{name} must be a non-negative integer, got '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Raw `start`/`limit` values as they appear in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub start: Option<String>,
    pub limit: Option<String>,
}

/// Concrete `[start, start + limit)` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub start: usize,
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::from(PaginationConfig::default())
    }
}

impl From<PaginationConfig> for Pagination {
    fn from(config: PaginationConfig) -> Self {
        Self {
            start: config.default_start,
            limit: config.default_limit,
        }
    }
}

impl Pagination {
    /// Fill absent values from `defaults` and parse present ones.
    pub fn resolve(query: &PageQuery, defaults: PaginationConfig) -> Result<Self, ParamError> {
        let start =
            parse_optional("start", query.start.as_deref())?.unwrap_or(defaults.default_start);
        let limit =
            parse_optional("limit", query.limit.as_deref())?.unwrap_or(defaults.default_limit);
        Ok(Self { start, limit })
    }
}

/// Parse an optional numeric value. Empty strings count as absent.
pub fn parse_optional<T>(name: &'static str, raw: Option<&str>) -> Result<Option<T>, ParamError>
where
    T: FromStr,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(|_| ParamError::Invalid {
            name,
            value: value.to_string(),
        }),
    }
}

/// Parse a numeric value that must be present.
pub fn parse_required<T>(name: &'static str, raw: Option<&str>) -> Result<T, ParamError>
where
    T: FromStr,
{
    parse_optional(name, raw)?.ok_or(ParamError::Missing(name))
}

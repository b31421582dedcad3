//! Boundary parsing of raw request parameters.
//!
//! Every query value arrives as an optional string. The functions here turn
//! them into typed values or a [`ServiceError`] naming the parameter, before
//! any repository call is made. Empty strings are treated as absent.

use std::num::IntErrorKind;

use crate::catalog::domain::{ListParams, SortOrder};
use crate::errors::ServiceError;
use crate::pagination::{Pagination, MAX_LIMIT};

/// Largest integer a JSON number carries without loss (2^53 - 1).
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

fn present(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.is_empty())
}

pub fn parse_sort_order(raw: Option<&str>) -> Result<Option<SortOrder>, ServiceError> {
    let Some(value) = present(raw) else { return Ok(None) };
    value
        .parse::<SortOrder>()
        .map(Some)
        .map_err(|_| ServiceError::invalid_parameter("sort", "'ASC' or 'DESC'", value))
}

/// Parse a non-negative integer no larger than `max` (defaults to [`MAX_SAFE_INTEGER`]).
pub fn parse_bounded_integer(name: &str, raw: Option<&str>, max: Option<u64>) -> Result<Option<u64>, ServiceError> {
    let Some(value) = present(raw) else { return Ok(None) };
    let max = max.unwrap_or(MAX_SAFE_INTEGER).min(MAX_SAFE_INTEGER);
    match value.parse::<u64>() {
        Ok(n) if n <= max => Ok(Some(n)),
        _ => Err(ServiceError::invalid_parameter(name, format!("integer <={max}"), value)),
    }
}

/// Apply defaults when both values are absent; reject a half-specified pair.
pub fn resolve_pagination(limit: Option<u64>, offset: Option<u64>) -> Result<Pagination, ServiceError> {
    Pagination::from_pair(limit, offset).ok_or_else(|| ServiceError::InvalidPaginationPair {
        limit: render(limit),
        offset: render(offset),
    })
}

fn render(v: Option<u64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_else(|| "undefined".to_string())
}

pub fn parse_flag(name: &str, raw: Option<&str>) -> Result<bool, ServiceError> {
    match present(raw) {
        None | Some("false") => Ok(false),
        Some("true") => Ok(true),
        Some(other) => Err(ServiceError::invalid_parameter(name, "'true' or 'false'", other)),
    }
}

/// Path ids are 32-bit to match the `serial` primary keys. A well-formed
/// integer outside that range cannot name a stored service and is reported as not found.
pub fn parse_id(raw: &str) -> Result<i32, ServiceError> {
    raw.parse::<i32>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ServiceError::not_found(raw),
        _ => ServiceError::invalid_parameter("id", "integer", raw),
    })
}

/// Validate the four list parameters of `GET /services`.
pub fn list_params(
    filter: Option<&str>,
    sort: Option<&str>,
    limit: Option<&str>,
    offset: Option<&str>,
) -> Result<ListParams, ServiceError> {
    let sort = parse_sort_order(sort)?;
    let limit = parse_bounded_integer("limit", limit, Some(MAX_LIMIT))?;
    let offset = parse_bounded_integer("offset", offset, None)?;
    let pagination = resolve_pagination(limit, offset)?;
    Ok(ListParams {
        filter: present(filter).map(str::to_string),
        sort,
        pagination,
    })
}

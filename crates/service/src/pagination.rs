//! Pagination utilities for service layer
//!
//! Offset/limit window applied to list queries, with the defaults used when a
//! caller supplies neither value.

/// Items returned when the caller does not ask for a specific page size.
pub const DEFAULT_LIMIT: u64 = 12;
/// Largest page a caller may request.
pub const MAX_LIMIT: u64 = 100;
pub const DEFAULT_OFFSET: u64 = 0;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// rows to return
    pub limit: u64,
    /// rows to skip
    pub offset: u64,
}

impl Pagination {
    pub fn new(limit: u64, offset: u64) -> Self { Self { limit, offset } }

    /// Combine separately parsed values; `None` unless both or neither are present.
    pub fn from_pair(limit: Option<u64>, offset: Option<u64>) -> Option<Self> {
        match (limit, offset) {
            (Some(limit), Some(offset)) => Some(Self { limit, offset }),
            (None, None) => Some(Self::default()),
            _ => None,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { limit: DEFAULT_LIMIT, offset: DEFAULT_OFFSET } }
}

#[cfg(test)]
mod tests {
    use super::Pagination;

    #[test]
    fn default_values_are_sane() {
        let d = Pagination::default();
        assert_eq!(d.limit, 12);
        assert_eq!(d.offset, 0);
    }

    #[test]
    fn pair_requires_both_or_neither() {
        assert_eq!(Pagination::from_pair(Some(5), Some(10)), Some(Pagination::new(5, 10)));
        assert_eq!(Pagination::from_pair(None, None), Some(Pagination::default()));
        assert_eq!(Pagination::from_pair(Some(5), None), None);
        assert_eq!(Pagination::from_pair(None, Some(10)), None);
    }
}

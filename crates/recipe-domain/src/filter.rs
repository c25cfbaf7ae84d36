//! Query-string filters.

/// Error returned by [`parse_id_list`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseIdListError {
    #[error("empty item at position {0}")]
    EmptyItem(usize),
    #[error("invalid id {0:?}")]
    InvalidId(String),
}

/// Parse a comma-separated list of integer ids, e.g. `"1,2, 3"`.
///
/// Whitespace around items is ignored. Empty items (`"1,,2"`) and anything that
/// is not an `i32` are rejected.
pub fn parse_id_list(raw: &str) -> Result<Vec<i32>, ParseIdListError> {
    raw.split(',')
        .enumerate()
        .map(|(pos, item)| {
            let item = item.trim();
            if item.is_empty() {
                return Err(ParseIdListError::EmptyItem(pos));
            }
            item.parse::<i32>()
                .map_err(|_| ParseIdListError::InvalidId(item.to_owned()))
        })
        .collect()
}

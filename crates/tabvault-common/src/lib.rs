mod domain;
pub use domain::*;

pub const MEMORY_DB_PATH: &str = ":memory:";
pub const DEFAULT_DB_PATH: &str = "tabvault.db";
pub const DEFAULT_POOL_SIZE: usize = 4;

/// Trims a search string. An empty search means "no filter".
#[inline]
pub fn normalize_query(query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_queries_are_no_filter() {
        assert_eq!(normalize_query(None), None);
        assert_eq!(normalize_query(Some("   ")), None);
        assert_eq!(normalize_query(Some(" pink ")), Some("pink".to_owned()));
    }
}

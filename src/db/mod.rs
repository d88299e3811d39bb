pub mod cities;
pub mod connection;
pub mod events;
pub mod free_agents;
pub mod leagues;
pub mod models;
pub mod sessions;
pub mod submissions;
pub mod teams;

pub use connection::DbClient;

/// Wraps a search term for a case-insensitive substring match
pub(crate) fn like_pattern(term: &str) -> String {
    format!("%{term}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern("hawks"), "%hawks%");
    }
}

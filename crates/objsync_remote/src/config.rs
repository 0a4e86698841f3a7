//! Server configuration.

use objsync_storage::DEFAULT_KEYSPACE;

/// Configuration for the mock remote server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Alphabet of generated record keys.
    pub keyspace: String,
    /// Whether queries may match numeric fields by their decimal text. On by default.
    pub numeric_queries: bool,
}

impl ServerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            keyspace: DEFAULT_KEYSPACE.to_string(),
            numeric_queries: true,
        }
    }

    /// Sets the key alphabet.
    pub fn with_keyspace(mut self, keyspace: impl Into<String>) -> Self {
        self.keyspace = keyspace.into();
        self
    }

    /// Sets whether query values also match numeric fields.
    pub fn with_numeric_queries(mut self, enabled: bool) -> Self {
        self.numeric_queries = enabled;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.keyspace, DEFAULT_KEYSPACE);
        assert!(config.numeric_queries);
    }

    #[test]
    fn config_builder() {
        let config = ServerConfig::new()
            .with_keyspace("0123456789")
            .with_numeric_queries(false);
        assert_eq!(config.keyspace, "0123456789");
        assert!(!config.numeric_queries);
    }
}

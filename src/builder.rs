//! Engine builder for flexible configuration
//!
//! This module provides a builder pattern for creating engines with
//! validated configuration.

use crate::engine::Engine;
use crate::error::Result;
use crate::types::Config;

/// Builder for engine configuration.
#[derive(Debug)]
pub struct EngineBuilder {
    config: Config,
}

impl EngineBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Cap the radius a search may request, in meters.
    pub fn max_search_radius_m(mut self, radius_m: f64) -> Self {
        self.config.max_search_radius_m = radius_m;
        self
    }

    /// Set the result cap applied when a search passes no explicit limit.
    pub fn default_search_limit(mut self, limit: usize) -> Self {
        self.config.default_search_limit = limit;
        self
    }

    /// Cap the result limit a search may request.
    pub fn max_search_limit(mut self, limit: usize) -> Self {
        self.config.max_search_limit = limit;
        self
    }

    /// Build the engine, validating the configuration first.
    pub fn build(self) -> Result<Engine> {
        Engine::with_config(self.config)
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParkadeError;

    #[test]
    fn test_builder_default() {
        let engine = EngineBuilder::new().build().unwrap();
        assert_eq!(engine.config().max_search_radius_m, 20_000.0);
        assert_eq!(engine.config().default_search_limit, 20);
    }

    #[test]
    fn test_builder_with_config() {
        let config = Config::default().with_max_search_radius_m(3_000.0);
        let engine = EngineBuilder::new().config(config).build().unwrap();
        assert_eq!(engine.config().max_search_radius_m, 3_000.0);
    }

    #[test]
    fn test_builder_field_setters() {
        let engine = Engine::builder()
            .max_search_radius_m(8_000.0)
            .default_search_limit(5)
            .max_search_limit(50)
            .build()
            .unwrap();

        assert_eq!(engine.config().max_search_radius_m, 8_000.0);
        assert_eq!(engine.config().default_search_limit, 5);
        assert_eq!(engine.config().max_search_limit, 50);
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let result = EngineBuilder::new().default_search_limit(0).build();
        assert!(matches!(result, Err(ParkadeError::InvalidInput(_))));
    }
}

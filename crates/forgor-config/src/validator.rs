//! Configuration validation.

use url::Url;

use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_timing(config, &mut result);
        Self::validate_relevance(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        match Url::parse(&config.server.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                if url.scheme() == "http" {
                    result.add_warning(ValidationWarning::new(
                        "server.base_url",
                        "base_url uses plain http, tokens will travel unencrypted",
                    ));
                }
            }
            Ok(_) => result.add_error(ValidationError::new(
                "server.base_url",
                "base_url must start with http:// or https://",
            )),
            Err(e) => result.add_error(ValidationError::new(
                "server.base_url",
                format!("base_url is not a valid URL: {}", e),
            )),
        }

        if config.server.app_key.is_empty() {
            result.add_warning(ValidationWarning::new(
                "server.app_key",
                "app_key is not set, the server may reject requests",
            ));
        }

        if config.server.user_agent.trim().is_empty() {
            result.add_error(ValidationError::new(
                "server.user_agent",
                "user_agent cannot be empty",
            ));
        }
    }

    fn validate_timing(config: &Config, result: &mut ValidationResult) {
        let timing = &config.timing;
        for (path, value) in [
            ("timing.flush_ms", timing.flush_ms),
            ("timing.badge_clear_ms", timing.badge_clear_ms),
            ("timing.idle_ms", timing.idle_ms),
        ] {
            if value == 0 {
                result.add_error(ValidationError::new(path, "must be greater than 0"));
            }
        }

        if timing.cache_ttl_ms == 0 {
            result.add_warning(ValidationWarning::new(
                "timing.cache_ttl_ms",
                "cache_ttl_ms is 0, every cached result expires immediately",
            ));
        }

        if timing.idle_ms <= timing.flush_ms {
            result.add_warning(ValidationWarning::new(
                "timing.idle_ms",
                "idle_ms should be longer than flush_ms",
            ));
        }
    }

    fn validate_relevance(config: &Config, result: &mut ValidationResult) {
        let threshold = config.relevance.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            result.add_error(ValidationError::new(
                "relevance.threshold",
                format!("threshold must be within 0.0..=1.0, got {}", threshold),
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

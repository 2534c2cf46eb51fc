//! Configuration validation.

use feedtidy_protocols::Selector;

use crate::error::ConfigError;
use crate::schema::FeedConfig;

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

    /// Collapse into the first error, if any.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
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
    pub fn validate(config: &FeedConfig) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_selectors(config, &mut result);
        Self::validate_markers(config, &mut result);
        Self::validate_attributes(config, &mut result);
        Self::validate_expansion(config, &mut result);
        Self::validate_dedupe(config, &mut result);
        Self::validate_timing(config, &mut result);

        result
    }

    fn validate_selectors(config: &FeedConfig, result: &mut ValidationResult) {
        let selectors = &config.selectors;

        if selectors.item_class.trim().is_empty() {
            result.add_error(ValidationError::new(
                "selectors.item_class",
                "Entry class cannot be empty",
            ));
        } else if selectors.item_class.chars().any(char::is_whitespace) {
            result.add_error(ValidationError::new(
                "selectors.item_class",
                "Entry class must be a single class name",
            ));
        }

        for (path, value) in [
            ("selectors.title", &selectors.title),
            ("selectors.body", &selectors.body),
        ] {
            if let Err(e) = Selector::parse(value) {
                result.add_error(ValidationError::new(path, e.to_string()));
            }
        }

        for (i, rule) in selectors.spacers.iter().enumerate() {
            if rule.is_empty() {
                result.add_error(ValidationError::new(
                    format!("selectors.spacers[{}]", i),
                    "Spacer rule without classes would match every sibling",
                ));
            }
        }
    }

    fn validate_markers(config: &FeedConfig, result: &mut ValidationResult) {
        if config.markers.mention.trim().is_empty() {
            result.add_warning(ValidationWarning::new(
                "markers.mention",
                "Empty mention marker: nothing will be expanded",
            ));
        }
        if config.markers.reaction.trim().is_empty() {
            result.add_warning(ValidationWarning::new(
                "markers.reaction",
                "Empty reaction marker: reactions will not be deduplicated",
            ));
        }
    }

    fn validate_attributes(config: &FeedConfig, result: &mut ValidationResult) {
        let attrs = &config.attributes;
        for (path, name) in [
            ("attributes.expanded", &attrs.expanded),
            ("attributes.hidden", &attrs.hidden),
            ("attributes.duplicate", &attrs.duplicate),
            ("attributes.stripped_classes", &attrs.stripped_classes),
            ("attributes.ellipsis", &attrs.ellipsis),
        ] {
            if name.trim().is_empty() {
                result.add_error(ValidationError::new(path, "Attribute name cannot be empty"));
            } else if !name.starts_with("data-") {
                result.add_warning(ValidationWarning::new(
                    path,
                    format!("'{}' is not a data attribute and may collide with the host page", name),
                ));
            }
        }
    }

    fn validate_expansion(config: &FeedConfig, result: &mut ValidationResult) {
        if config.expansion.clamp_lines == 0 {
            result.add_error(ValidationError::new(
                "expansion.clamp_lines",
                "Clamp must show at least one line",
            ));
        }
        if config.expansion.ellipsis_class.trim().is_empty() {
            result.add_error(ValidationError::new(
                "expansion.ellipsis_class",
                "Ellipsis marker class cannot be empty",
            ));
        }
    }

    fn validate_dedupe(config: &FeedConfig, result: &mut ValidationResult) {
        if config.dedupe.key_lines == 0 {
            result.add_error(ValidationError::new(
                "dedupe.key_lines",
                "Body key needs at least one line",
            ));
        }
        if config.dedupe.min_key_chars == 0 {
            result.add_warning(ValidationWarning::new(
                "dedupe.min_key_chars",
                "Short bodies will be compared; expect false duplicates",
            ));
        }
    }

    fn validate_timing(config: &FeedConfig, result: &mut ValidationResult) {
        let timing = &config.timing;

        if timing.debounce_ms == 0 {
            result.add_warning(ValidationWarning::new(
                "timing.debounce_ms",
                "Zero debounce reconciles after every mutation burst",
            ));
        }
        if timing.rescan_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "timing.rescan_interval_ms",
                "Rescan interval must be positive",
            ));
        } else if timing.rescan_interval_ms < timing.debounce_ms {
            result.add_warning(ValidationWarning::new(
                "timing.rescan_interval_ms",
                "Rescan interval shorter than the debounce window",
            ));
        }
        if timing.dedupe_delay_ms == 0 {
            result.add_warning(ValidationWarning::new(
                "timing.dedupe_delay_ms",
                "Dedupe activates together with expansion, before expanded layout settles",
            ));
        }
        if timing.discovery_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "timing.discovery_interval_ms",
                "Discovery interval must be positive",
            ));
        }
        if timing.discovery_max_attempts == 0 {
            result.add_warning(ValidationWarning::new(
                "timing.discovery_max_attempts",
                "Discovery gives up after the first miss",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

//! Generated object names

use infraprov_errors::InfrastructureError;
use uuid::Uuid;

/// Source of generated names.
///
/// Implementations may block, e.g. to check a candidate against the target
/// platform. They are shared between concurrent runs.
pub trait NameGenerator: Send + Sync {
    /// Produce a name starting with `prefix`
    ///
    /// # Errors
    ///
    /// Returns an `InfrastructureError` if no name can be produced.
    fn generate(&self, prefix: &str) -> Result<String, InfrastructureError>;
}

/// Appends a random lowercase hex suffix to the prefix
#[derive(Debug, Clone)]
pub struct RandomNameGenerator {
    suffix_length: usize,
}

impl RandomNameGenerator {
    /// Longest suffix a single uuid can supply
    pub const MAX_SUFFIX_LENGTH: usize = 32;

    /// Suffix length is clamped to `1..=32`
    #[must_use]
    pub fn new(suffix_length: usize) -> Self {
        Self {
            suffix_length: suffix_length.clamp(1, Self::MAX_SUFFIX_LENGTH),
        }
    }
}

impl Default for RandomNameGenerator {
    fn default() -> Self {
        Self::new(8)
    }
}

impl NameGenerator for RandomNameGenerator {
    fn generate(&self, prefix: &str) -> Result<String, InfrastructureError> {
        let mut suffix = Uuid::new_v4().simple().to_string();
        suffix.truncate(self.suffix_length);
        Ok(format!("{prefix}{suffix}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_prefix_and_suffix_length() {
        let name = RandomNameGenerator::new(5).generate("ws1.").unwrap();
        assert!(name.starts_with("ws1."));
        assert_eq!(name.len(), "ws1.".len() + 5);
        assert!(name["ws1.".len()..]
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn suffix_length_is_clamped() {
        let long = RandomNameGenerator::new(100).generate("").unwrap();
        assert_eq!(long.len(), RandomNameGenerator::MAX_SUFFIX_LENGTH);

        let short = RandomNameGenerator::new(0).generate("p-").unwrap();
        assert_eq!(short.len(), 3);
    }
}

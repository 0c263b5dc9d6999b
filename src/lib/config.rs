use super::dissolve::{DEFAULT_KEY_FIELDS, DEFAULT_OUTPUT_KEY};
use super::{Error, Result};

/// Default tolerance, in degrees for WGS84 input.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Maximum distance of a dropped vertex from the chord replacing it,
    /// in coordinate units.
    pub tolerance: f64,
    /// Merge features by region before simplifying.
    pub dissolve: bool,
    /// Property fields tried in order to find a feature's region.
    pub key_fields: Vec<String>,
    /// Property holding the region name on dissolved features.
    pub output_key: String,
    /// Simplify features on the rayon thread pool.
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tolerance: DEFAULT_TOLERANCE,
            dissolve: true,
            key_fields: DEFAULT_KEY_FIELDS.iter().map(|f| f.to_string()).collect(),
            output_key: DEFAULT_OUTPUT_KEY.into(),
            parallel: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(Error::InvalidTolerance(self.tolerance));
        }
        if self.dissolve && self.key_fields.is_empty() {
            return Err(Error::InvalidInput("no key fields to dissolve by".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.key_fields, vec!["N03_001", "name"]);
        assert_eq!(config.output_key, "name");
    }

    #[test]
    fn zero_tolerance_is_valid() {
        let config = Config {
            tolerance: 0.,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_tolerance() {
        for tolerance in &[-0.5, f64::NAN, f64::INFINITY] {
            let config = Config {
                tolerance: *tolerance,
                ..Config::default()
            };
            assert!(matches!(
                config.validate(),
                Err(Error::InvalidTolerance(_))
            ));
        }
    }

    #[test]
    fn dissolve_needs_key_fields() {
        let config = Config {
            key_fields: vec![],
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidInput(_))));

        let config = Config {
            dissolve: false,
            ..config
        };
        assert!(config.validate().is_ok());
    }
}

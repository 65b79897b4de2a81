//! Sizing policy: initial capacity, growth factor and load-factor bounds.

use core::fmt;

/// Capacity of a freshly allocated set.
pub const INITIAL_CAPACITY: usize = 16;
/// Factor applied to the capacity on growth, and divided out on shrink.
pub const GROWTH_FACTOR: usize = 2;
/// An insert that brings the load factor to this value or above grows the table.
pub const MAX_LOAD_FACTOR: f64 = 0.75;
/// An erase that brings the load factor to this value or below shrinks the table.
pub const MIN_LOAD_FACTOR: f64 = 0.25;

/// Resize policy of a [`HashSet`](crate::HashSet).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Config {
    pub initial_capacity: usize,
    pub growth_factor: usize,
    pub max_load_factor: f64,
    pub min_load_factor: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: INITIAL_CAPACITY,
            growth_factor: GROWTH_FACTOR,
            max_load_factor: MAX_LOAD_FACTOR,
            min_load_factor: MIN_LOAD_FACTOR,
        }
    }
}

/// Reason a [`Config`] was rejected.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Initial capacity is zero or not a power of two.
    InitialCapacity(usize),
    /// Growth factor is below 2 or not a power of two.
    GrowthFactor(usize),
    /// Max load factor is outside `(0, 1]`.
    MaxLoadFactor(f64),
    /// Min load factor is negative, or not below `max_load_factor / growth_factor`.
    MinLoadFactor(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InitialCapacity(c) => {
                write!(f, "initial capacity {} is not a non-zero power of two", c)
            }
            ConfigError::GrowthFactor(g) => {
                write!(f, "growth factor {} is not a power of two >= 2", g)
            }
            ConfigError::MaxLoadFactor(l) => {
                write!(f, "max load factor {} is outside (0, 1]", l)
            }
            ConfigError::MinLoadFactor(l) => write!(
                f,
                "min load factor {} must be >= 0 and below max load factor / growth factor",
                l
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Checks the invariants the table relies on.
    ///
    /// Capacities must stay powers of two because probe positions are
    /// reduced with a bitmask, so both the initial capacity and the growth
    /// factor must be powers of two. The min bound sits below
    /// `max / growth` so that a shrink can never land at or above the grow
    /// threshold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.initial_capacity.is_power_of_two() {
            return Err(ConfigError::InitialCapacity(self.initial_capacity));
        }
        if self.growth_factor < 2 || !self.growth_factor.is_power_of_two() {
            return Err(ConfigError::GrowthFactor(self.growth_factor));
        }
        // Negated comparisons also reject NaN.
        if !(self.max_load_factor > 0.0 && self.max_load_factor <= 1.0) {
            return Err(ConfigError::MaxLoadFactor(self.max_load_factor));
        }
        let ceiling = self.max_load_factor / self.growth_factor as f64;
        if !(self.min_load_factor >= 0.0 && self.min_load_factor < ceiling) {
            return Err(ConfigError::MinLoadFactor(self.min_load_factor));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_non_power_of_two_capacity() {
        for cap in [0, 3, 12, 100] {
            let c = Config {
                initial_capacity: cap,
                ..Config::default()
            };
            assert_eq!(c.validate(), Err(ConfigError::InitialCapacity(cap)));
        }
        let c = Config {
            initial_capacity: 1,
            ..Config::default()
        };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_bad_growth_factor() {
        for g in [0, 1, 3, 6] {
            let c = Config {
                growth_factor: g,
                ..Config::default()
            };
            assert_eq!(c.validate(), Err(ConfigError::GrowthFactor(g)));
        }
        let c = Config {
            growth_factor: 4,
            min_load_factor: 0.1,
            ..Config::default()
        };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_max_load_factor() {
        for l in [0.0, -0.5, 1.5, f64::NAN] {
            let c = Config {
                max_load_factor: l,
                ..Config::default()
            };
            assert!(matches!(c.validate(), Err(ConfigError::MaxLoadFactor(_))));
        }
    }

    /// Invariant: min must stay strictly below max / growth to avoid
    /// grow/shrink thrash.
    #[test]
    fn rejects_min_load_factor_that_would_thrash() {
        let c = Config {
            min_load_factor: 0.375,
            ..Config::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::MinLoadFactor(0.375)));

        let c = Config {
            min_load_factor: -0.1,
            ..Config::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::MinLoadFactor(-0.1)));

        let c = Config {
            min_load_factor: 0.0,
            ..Config::default()
        };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn display_names_the_offending_value() {
        let msg = ConfigError::GrowthFactor(3).to_string();
        assert!(msg.contains('3'), "{}", msg);
    }
}

use inventory::ActivityIdx;
use util::HashSet;

use crate::{Error, Strategy};

/// Configuration of a [`crate::GraphTraversal`], fixed at construction.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Identify nodes by activity/flow key rather than by solver index.
    pub use_keys: bool,
    /// Give elementary flows their own nodes and edges. When false, their
    /// impact is folded into the `ind` of the activity that emits them.
    pub include_biosphere: bool,
    pub strategy: Strategy,
    /// Edges whose |impact| is below `cutoff * |total score|` are dropped.
    pub cutoff: f64,
    /// Upper bound on realized edges; exceeding it is an error.
    pub max_visits: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_keys: true,
            include_biosphere: true,
            strategy: Strategy::ImportanceFirst,
            cutoff: 0.0,
            max_visits: 100_000,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), Error> {
        validate_cutoff(self.cutoff)?;
        if self.max_visits == 0 {
            return Err(Error::InvalidSetting("max_visits must be at least 1".into()));
        }
        Ok(())
    }
}

/// Configuration of a [`crate::NewNodeEachVisitTraversal`].
#[derive(Debug, Clone)]
pub struct VisitSettings {
    /// Visits whose |cumulative score| is below `cutoff * |total score|` are not materialized.
    pub cutoff: f64,
    /// Upper bound on cumulative-score calculations; exceeding it is an error.
    pub max_calc: usize,
    /// Activities that get a node when visited, but are never expanded.
    pub static_activities: HashSet<ActivityIdx>,
}

impl Default for VisitSettings {
    fn default() -> Self {
        Self {
            cutoff: 5e-3,
            max_calc: 10_000,
            static_activities: HashSet::default(),
        }
    }
}

impl VisitSettings {
    pub fn with_cutoff(cutoff: f64) -> Self {
        Self {
            cutoff,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        validate_cutoff(self.cutoff)?;
        if self.max_calc == 0 {
            return Err(Error::InvalidSetting("max_calc must be at least 1".into()));
        }
        Ok(())
    }
}

fn validate_cutoff(cutoff: f64) -> Result<(), Error> {
    if cutoff.is_finite() && cutoff >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidSetting(format!(
            "cutoff must be a finite, non-negative fraction of the total score (got {cutoff})"
        )))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
        assert!(VisitSettings::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_cutoff() {
        for cutoff in [-0.1, f64::NAN, f64::INFINITY] {
            let settings = Settings {
                cutoff,
                ..Settings::default()
            };
            assert!(matches!(settings.validate(), Err(Error::InvalidSetting(_))));
            assert!(VisitSettings::with_cutoff(cutoff).validate().is_err());
        }
    }

    #[test]
    fn test_rejects_zero_caps() {
        let settings = Settings {
            max_visits: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
        let settings = VisitSettings {
            max_calc: 0,
            ..VisitSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}

use serde::{Deserialize, Serialize};

use crate::error::{ShieldError, ShieldResult};

/// Tuning knobs for the permission engine and its components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seconds a pending confirmation waits for a human answer before
    /// auto-denying.
    pub confirmation_timeout_secs: u64,
    /// Width of the request-frequency window in seconds.
    pub frequency_window_secs: u64,
    /// Requests per (app, permission) within the window before the detector
    /// rejects.
    pub frequency_threshold: u32,
    /// Maximum ledger entries retained; oldest drop silently past this.
    pub ledger_capacity: usize,
    /// Synthetic records pre-generated per data category at construction.
    pub pregen_batch: usize,
    /// Records returned per granted or simulated request.
    pub sample_size: usize,
    /// Trailing span (seconds) inspected by the harvesting-pattern analyzer.
    pub harvest_window_secs: u64,
    /// Distinct sensitive permission types within the span that flag
    /// harvesting.
    pub harvest_distinct_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confirmation_timeout_secs: 20,
            frequency_window_secs: 60,
            frequency_threshold: 5,
            ledger_capacity: 100,
            pregen_batch: 20,
            sample_size: 5,
            harvest_window_secs: 300,
            harvest_distinct_threshold: 3,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> ShieldResult<()> {
        if self.ledger_capacity == 0 {
            return Err(ShieldError::Config("ledger_capacity must be at least 1".into()));
        }
        if self.frequency_threshold == 0 {
            return Err(ShieldError::Config("frequency_threshold must be at least 1".into()));
        }
        if self.sample_size == 0 {
            return Err(ShieldError::Config("sample_size must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = EngineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.confirmation_timeout_secs, 20);
        assert_eq!(cfg.ledger_capacity, 100);
        assert_eq!(cfg.frequency_threshold, 5);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let cfg = EngineConfig { ledger_capacity: 0, ..Default::default() };
        assert!(cfg.validate().is_err());
    }
}

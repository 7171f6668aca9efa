use crate::error::ConfigError;

pub const DEFAULT_QUANTUM_MS: u64 = 100;
pub const DEFAULT_ADMISSION_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_ADMISSION_CAPACITY: usize = 10;

/// Timing and capacity knobs for one simulation run. All times are in
/// simulated milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    pub quantum_ms: u64,
    pub admission_interval_ms: u64,
    pub admission_capacity: usize,
}

impl SimulationConfig {
    pub fn new(quantum_ms: u64) -> SimulationConfig {
        SimulationConfig {
            quantum_ms,
            ..SimulationConfig::default()
        }
    }

    pub fn with_admission_interval_ms(mut self, admission_interval_ms: u64) -> SimulationConfig {
        self.admission_interval_ms = admission_interval_ms;
        self
    }

    pub fn with_admission_capacity(mut self, admission_capacity: usize) -> SimulationConfig {
        self.admission_capacity = admission_capacity;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quantum_ms == 0 {
            return Err(ConfigError::ZeroQuantum);
        }
        if self.admission_interval_ms == 0 {
            return Err(ConfigError::ZeroAdmissionInterval);
        }
        if self.admission_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> SimulationConfig {
        SimulationConfig {
            quantum_ms: DEFAULT_QUANTUM_MS,
            admission_interval_ms: DEFAULT_ADMISSION_INTERVAL_MS,
            admission_capacity: DEFAULT_ADMISSION_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SimulationConfig::new(50);

        assert_eq!(config.quantum_ms, 50);
        assert_eq!(config.admission_interval_ms, 1000);
        assert_eq!(config.admission_capacity, 10);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_config_validate_rejects_zeroes() {
        assert_eq!(SimulationConfig::new(0).validate(), Err(ConfigError::ZeroQuantum));
        assert_eq!(
            SimulationConfig::new(10).with_admission_interval_ms(0).validate(),
            Err(ConfigError::ZeroAdmissionInterval)
        );
        assert_eq!(
            SimulationConfig::new(10).with_admission_capacity(0).validate(),
            Err(ConfigError::ZeroCapacity)
        );
    }
}

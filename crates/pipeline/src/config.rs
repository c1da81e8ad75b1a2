use {
    crate::PipelineError,
    serde::Deserialize,
};

/// What a per-frame failure does to the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Render everything before the failing frame, then abort with its index.
    #[default]
    FailFast,
    /// Log the failure, count the frame as dropped and keep going.
    SkipAndContinue,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Number of slots, the bound on concurrently submitted requests.
    pub max_in_flight: usize,
    pub error_policy: ErrorPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 2,
            error_policy: ErrorPolicy::FailFast,
        }
    }
}

impl PipelineConfig {
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }

    pub fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.max_in_flight == 0 {
            return Err(PipelineError::Config(
                "max_in_flight must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

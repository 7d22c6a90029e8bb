use speedgate_types::Threshold;

/// A score below the configured minimum. This is a policy result, not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Threshold of {threshold} not met with score of {score}")]
pub struct ThresholdNotMet {
    pub score: u8,
    pub threshold: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    Pending,
    Passed,
    Failed,
}

impl GateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GateStatus::Pending => "pending",
            GateStatus::Passed => "passed",
            GateStatus::Failed => "failed",
        }
    }
}

/// Compares the final performance score against the threshold.
///
/// Starts `Pending`; `evaluate` moves it to `Passed` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdGate {
    threshold: Threshold,
    status: GateStatus,
}

impl ThresholdGate {
    pub fn new(threshold: Threshold) -> Self {
        Self {
            threshold,
            status: GateStatus::Pending,
        }
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn status(&self) -> GateStatus {
        self.status
    }

    /// `score < threshold` fails; anything else passes.
    pub fn evaluate(&mut self, score: u8) -> Result<(), ThresholdNotMet> {
        let threshold = self.threshold.get();
        if score < threshold {
            self.status = GateStatus::Failed;
            return Err(ThresholdNotMet { score, threshold });
        }
        self.status = GateStatus::Passed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(threshold: u32) -> ThresholdGate {
        ThresholdGate::new(Threshold::new(threshold).unwrap())
    }

    #[test]
    fn starts_pending() {
        assert_eq!(gate(87).status(), GateStatus::Pending);
    }

    #[test]
    fn below_threshold_fails_with_message() {
        let mut g = gate(87);
        let err = g.evaluate(86).unwrap_err();
        assert_eq!(
            err,
            ThresholdNotMet {
                score: 86,
                threshold: 87
            }
        );
        assert_eq!(err.to_string(), "Threshold of 87 not met with score of 86");
        assert_eq!(g.status(), GateStatus::Failed);
    }

    #[test]
    fn at_or_above_threshold_passes() {
        let mut g = gate(87);
        assert_eq!(g.evaluate(90), Ok(()));
        assert_eq!(g.status(), GateStatus::Passed);

        let mut g = gate(87);
        assert_eq!(g.evaluate(87), Ok(()));
    }

    #[test]
    fn zero_threshold_always_passes() {
        let mut g = gate(0);
        assert_eq!(g.evaluate(0), Ok(()));
    }

    #[test]
    fn status_labels() {
        assert_eq!(GateStatus::Pending.as_str(), "pending");
        assert_eq!(GateStatus::Passed.as_str(), "passed");
        assert_eq!(GateStatus::Failed.as_str(), "failed");
    }
}

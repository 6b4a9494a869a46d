use std::time::{Duration, Instant};

use anyhow::bail;
use marginfill::Cancel;

/// Cancels a margin once a point in time has passed. A deadline without a
/// point in time never cancels.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    pub fn never() -> Self {
        Self { at: None }
    }

    /// A deadline `duration` from now. Durations too long to land on an
    /// `Instant` never cancel.
    pub fn after(duration: Duration) -> Self {
        Self {
            at: Instant::now().checked_add(duration),
        }
    }

    /// Starts a deadline from a `--timeout` value in seconds.
    pub fn from_timeout(timeout: Option<f64>) -> anyhow::Result<Self> {
        match timeout {
            None => Ok(Self::never()),
            Some(seconds) if seconds.is_finite() && seconds >= 0.0 => {
                match Duration::try_from_secs_f64(seconds) {
                    Ok(duration) => Ok(Self::after(duration)),
                    Err(_) => Ok(Self::never()),
                }
            }
            Some(seconds) => bail!("Timeout must be a positive number of seconds, got {}", seconds),
        }
    }
}

impl Cancel for Deadline {
    fn is_cancelled(&self) -> bool {
        match self.at {
            Some(at) => Instant::now() >= at,
            None => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn never_cancels() {
        assert!(!Deadline::never().is_cancelled());
        assert!(!Deadline::from_timeout(None).unwrap().is_cancelled());
    }

    #[test]
    fn zero_timeout_cancels_immediately() {
        assert!(Deadline::from_timeout(Some(0.0)).unwrap().is_cancelled());
    }

    #[test]
    fn far_deadline() {
        assert!(!Deadline::after(Duration::from_secs(3600)).is_cancelled());
    }

    #[test]
    fn huge_timeouts_never_cancel() {
        for &seconds in &[1e19, 1e20, f64::MAX] {
            let deadline = Deadline::from_timeout(Some(seconds)).unwrap();
            assert!(!deadline.is_cancelled());
        }

        assert!(!Deadline::after(Duration::MAX).is_cancelled());
    }

    #[test]
    fn invalid_timeouts() {
        assert!(Deadline::from_timeout(Some(-1.0)).is_err());
        assert!(Deadline::from_timeout(Some(f64::NAN)).is_err());
    }
}

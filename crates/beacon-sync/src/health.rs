//! Health-probe collaborator seam.
//!
//! The probe reports overall backend gateway reachability, independent of
//! any channel. The collaborator refreshes on its own fixed cadence
//! (`health.refresh_interval_ms` in config); the hub samples the latest
//! snapshot on every sweep tick.

use serde::Serialize;

/// Backend reachability as reported by the health-probe collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HealthSnapshot {
    /// The gateway answered its last health check.
    pub ok: bool,
    /// The first health check has not completed yet.
    pub loading: bool,
    /// The last health check failed.
    pub error: bool,
}

impl HealthSnapshot {
    /// Gateway reachable.
    pub fn healthy() -> Self {
        Self {
            ok: true,
            loading: false,
            error: false,
        }
    }

    /// First check still in flight.
    pub fn pending() -> Self {
        Self {
            ok: false,
            loading: true,
            error: false,
        }
    }

    /// Last check failed.
    pub fn failing() -> Self {
        Self {
            ok: false,
            loading: false,
            error: true,
        }
    }
}

/// Source of [`HealthSnapshot`]s.
///
/// `snapshot` is called on every sweep tick and must be cheap and
/// non-blocking - return the latest cached result, never perform the check
/// inline.
pub trait HealthProbe: Send + Sync {
    fn snapshot(&self) -> HealthSnapshot;
}

/// Probe that always reports a fixed snapshot.
///
/// Useful in tests and for embedders that have no gateway health endpoint.
pub struct StaticProbe {
    snapshot: HealthSnapshot,
}

impl StaticProbe {
    pub fn new(snapshot: HealthSnapshot) -> Self {
        Self { snapshot }
    }
}

impl HealthProbe for StaticProbe {
    fn snapshot(&self) -> HealthSnapshot {
        self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_constructors_are_mutually_exclusive() {
        let healthy = HealthSnapshot::healthy();
        assert!(healthy.ok && !healthy.loading && !healthy.error);

        let pending = HealthSnapshot::pending();
        assert!(!pending.ok && pending.loading && !pending.error);

        let failing = HealthSnapshot::failing();
        assert!(!failing.ok && !failing.loading && failing.error);
    }

    #[test]
    fn test_static_probe_reports_fixed_snapshot() {
        let probe = StaticProbe::new(HealthSnapshot::failing());
        assert_eq!(probe.snapshot(), HealthSnapshot::failing());
        assert_eq!(probe.snapshot(), HealthSnapshot::failing());
    }
}

//! Non-fatal reporting for lock anomalies.
//!
//! Advisory locks depend on the host and filesystem (network mounts in
//! particular). When a lock cannot be taken or released the store carries on
//! and reports the condition here instead of failing the operation.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockPhase {
  Acquire,
  Release,
}

impl fmt::Display for LockPhase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LockPhase::Acquire => f.write_str("acquire"),
      LockPhase::Release => f.write_str("release"),
    }
  }
}

/// A lock operation that did not behave. The operation it guarded still ran,
/// but without inter-process exclusion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockAnomaly {
  pub phase: LockPhase,
  pub lock_path: PathBuf,
  pub reason: String,
}

impl fmt::Display for LockAnomaly {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "lock {} failed on {}: {}",
      self.phase,
      self.lock_path.display(),
      self.reason
    )
  }
}

/// Receives lock anomalies. Implementations must not panic.
pub trait Diagnostics: Send + Sync {
  fn lock_anomaly(&self, anomaly: &LockAnomaly);
}

/// Reports anomalies as `tracing` warnings. This is the default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
  fn lock_anomaly(&self, anomaly: &LockAnomaly) {
    warn!(
      phase = %anomaly.phase,
      lock = %anomaly.lock_path.display(),
      reason = %anomaly.reason,
      "advisory lock anomaly, continuing without exclusion"
    );
  }
}

/// Collects anomalies so callers can check whether guarantees were degraded.
///
/// Clones share the same record, so keep one clone and hand another to the
/// store.
#[derive(Debug, Clone, Default)]
pub struct RecordingDiagnostics {
  anomalies: Arc<Mutex<Vec<LockAnomaly>>>,
}

impl RecordingDiagnostics {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn anomalies(&self) -> Vec<LockAnomaly> {
    match self.anomalies.lock() {
      Ok(guard) => guard.clone(),
      Err(poisoned) => poisoned.into_inner().clone(),
    }
  }

  pub fn is_degraded(&self) -> bool {
    !self.anomalies().is_empty()
  }
}

impl Diagnostics for RecordingDiagnostics {
  fn lock_anomaly(&self, anomaly: &LockAnomaly) {
    TracingDiagnostics.lock_anomaly(anomaly);
    match self.anomalies.lock() {
      Ok(mut guard) => guard.push(anomaly.clone()),
      Err(poisoned) => poisoned.into_inner().push(anomaly.clone()),
    }
  }
}

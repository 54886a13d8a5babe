//! Operational notifications.
//!
//! The orchestrator emits events through [`Notifier`]; deployments plug in
//! whatever transport they have. The default implementation writes
//! structured log lines.

use crate::pipeline::JobStep;

/// Something an operator may want to hear about.
#[derive(Debug, Clone)]
pub enum NotifyEvent {
  RunCompleted { teams_processed: u32 },
  RunFailed { step: JobStep, detail: String },
  /// Validation blocked promotion; a human must apply or reject via the
  /// admin surface.
  ValidationFailed { issues: Vec<String> },
}

pub trait Notifier: Send + Sync {
  fn notify(&self, event: &NotifyEvent);
}

/// Logs every event via `tracing`.
pub struct LogNotifier;

impl Notifier for LogNotifier {
  fn notify(&self, event: &NotifyEvent) {
    match event {
      NotifyEvent::RunCompleted { teams_processed } => {
        tracing::info!(teams_processed, "daily run completed");
      }
      NotifyEvent::RunFailed { step, detail } => {
        tracing::error!(step = %step, %detail, "daily run failed");
      }
      NotifyEvent::ValidationFailed { issues } => {
        tracing::warn!(
          issue_count = issues.len(),
          issues = ?issues,
          "validation failed - admin intervention required",
        );
      }
    }
  }
}

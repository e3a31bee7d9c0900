//! Background install runs.
//!
//! `Installer::install` blocks, so the caller's interactive path hands it to
//! the blocking pool and follows progress over a channel.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{InstallError, InstallReport, Installer, Milestone};

/// A running install: milestones as they happen, then the final result.
pub struct InstallHandle {
  milestones: mpsc::UnboundedReceiver<Milestone>,
  task: JoinHandle<Result<InstallReport, InstallError>>,
}

impl InstallHandle {
  /// Next milestone, or `None` once the run has finished reporting.
  pub async fn next_milestone(&mut self) -> Option<Milestone> {
    self.milestones.recv().await
  }

  /// Wait for the terminal result, dropping milestones not yet received.
  pub async fn wait(self) -> Result<InstallReport, InstallError> {
    match self.task.await {
      Ok(result) => result,
      Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
      Err(e) => Err(InstallError::Aborted(e.to_string())),
    }
  }
}

/// Run `installer` on tokio's blocking pool.
///
/// Must be called from within a tokio runtime. A second spawn while a run is
/// active resolves to [`InstallError::AlreadyRunning`].
pub fn spawn_install(installer: Arc<Installer>) -> InstallHandle {
  let (tx, rx) = mpsc::unbounded_channel();

  let task = tokio::task::spawn_blocking(move || {
    installer.install(|milestone| {
      // The receiver may be gone if the caller only waits for the result.
      let _ = tx.send(milestone);
    })
  });

  InstallHandle { milestones: rx, task }
}

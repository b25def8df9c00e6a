//! Background totals recompute
//!
//! Sleeps until the editor's recompute deadline and polls it. Every value
//! edit notifies the worker so a moved deadline is picked up; the deadline
//! itself stays a single slot inside the editor.

use super::editor::OfferEditor;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Editor shared between the UI owner and background tasks
pub type SharedEditor = Arc<Mutex<OfferEditor>>;

pub struct RecalcWorker {
    editor: SharedEditor,
    wake: Arc<Notify>,
    shutdown: CancellationToken,
}

impl RecalcWorker {
    pub fn new(editor: SharedEditor, shutdown: CancellationToken) -> Self {
        let wake = editor.lock().wake_handle();
        Self {
            editor,
            wake,
            shutdown,
        }
    }

    /// Spawn on the current runtime
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(self) {
        tracing::info!("RecalcWorker started");

        loop {
            let deadline = self.editor.lock().next_recalc_deadline();
            let sleep_until =
                deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("RecalcWorker shutting down");
                    self.editor.lock().flush_recalc();
                    break;
                }

                _ = tokio::time::sleep_until(sleep_until), if deadline.is_some() => {
                    self.editor.lock().poll_recalc();
                }

                // deadline moved, re-read it
                _ = self.wake.notified() => {}
            }
        }

        tracing::info!("RecalcWorker stopped");
    }
}

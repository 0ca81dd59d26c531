use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;

/// One step of a recorded reading session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReplayStep {
    /// Move the viewport to this vertical offset, then fire a scroll event.
    ScrollTo(f64),
    /// Tear the page down.
    Unload,
}

/// Spawn a background Tokio task that emits one [`ReplayStep::ScrollTo`] per
/// offset, `interval` apart, followed by a final [`ReplayStep::Unload`].
///
/// The task stops early when the receiver is dropped.  A zero interval is
/// raised to one millisecond.
pub fn spawn_replay(offsets: Vec<f64>, interval: Duration) -> mpsc::Receiver<ReplayStep> {
    let (tx, rx) = mpsc::channel(4);
    let interval = interval.max(Duration::from_millis(1));

    tokio::spawn(async move {
        let mut ticker = time::interval(interval);

        for offset in offsets {
            ticker.tick().await;
            if tx.send(ReplayStep::ScrollTo(offset)).await.is_err() {
                return; // receiver dropped
            }
        }

        let _ = tx.send(ReplayStep::Unload).await;
    });

    rx
}

use core::time::Duration;
use tokio_util::sync::CancellationToken;

/// Coalesces bursts of edits into one notification after a quiet window.
///
/// Every [`schedule`](Self::schedule) cancels the previous timer and bumps a
/// ticket counter. The timer posts its ticket when it expires; only
/// [`fire`](Self::fire) with the current ticket is accepted, so a timer that
/// lost the race with a cancellation is still ignored.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    ticket: u64,
    pending: Option<CancellationToken>,
}

impl Debouncer {
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            ticket: 0,
            pending: None,
        }
    }

    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Restarts the quiet window. `notify` runs with the new ticket once the
    /// window elapses without another call.
    pub fn schedule<N>(&mut self, notify: N) -> u64
    where
        N: FnOnce(u64) + Send + 'static,
    {
        self.cancel();
        self.ticket += 1;

        let ticket = self.ticket;
        let token = CancellationToken::new();
        self.pending = Some(token.clone());

        let window = self.window;
        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(window) => notify(ticket),
            }
        });

        ticket
    }

    /// Drops the pending timer, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }

    /// Accepts an expired timer's ticket. Returns `true` only for the latest
    /// uncancelled one.
    pub fn fire(&mut self, ticket: u64) -> bool {
        if self.pending.is_some() && ticket == self.ticket {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn only_the_last_edit_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(600));

        for _ in 0..3 {
            let tx = tx.clone();
            debouncer.schedule(move |ticket| {
                let _ = tx.send(ticket);
            });
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(600)).await;
        let ticket = rx.recv().await.unwrap();
        assert_eq!(ticket, 3);
        assert!(debouncer.fire(ticket));
        assert!(!debouncer.is_pending());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_window_never_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(50));

        let ticket = debouncer.schedule(move |ticket| {
            let _ = tx.send(ticket);
        });
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(rx.try_recv().is_err());
        assert!(!debouncer.fire(ticket));
    }
}

//! Status page lifecycle
//!
//! Mounting builds the view from the initial load and starts the refresh loop;
//! unmounting stops the loop first and only then tears the view down.

use fanpanel_core::{CurveSet, StatusView};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tracing::debug;

use crate::client::InitialLoad;
use crate::poll::{PollHandle, PollStats, RefreshLoop, SharedView, StatusSource};

pub struct StatusPage {
    view: SharedView,
    curves: CurveSet,
    poll: PollHandle,
}

impl StatusPage {
    pub fn mount<S>(load: InitialLoad, source: Arc<S>, interval: Duration) -> Self
    where
        S: StatusSource + 'static,
    {
        let view = Arc::new(Mutex::new(StatusView::build(&load.status)));
        let poll = RefreshLoop::new(source, Arc::clone(&view), interval).start();
        debug!("Status page mounted");

        Self {
            view,
            curves: load.curves,
            poll,
        }
    }

    pub fn view(&self) -> SharedView {
        Arc::clone(&self.view)
    }

    /// Curves from the initial load; the refresh loop never touches them.
    pub fn curves(&self) -> &CurveSet {
        &self.curves
    }

    pub fn poll_stats(&self) -> PollStats {
        self.poll.stats()
    }

    pub fn subscribe(&self) -> watch::Receiver<PollStats> {
        self.poll.subscribe()
    }

    /// Stop polling, then remove every node.
    pub async fn unmount(self) {
        self.poll.cancel().await;
        self.view.lock().await.teardown();
        debug!("Status page unmounted");
    }
}

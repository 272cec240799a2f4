//! Loader indicator that gives way to the content once it is ready.
//!
//! `Loading -> Revealed`, exactly once. The reveal is triggered either by a
//! fixed delay after page load or by a readiness signal from whatever loads
//! the content.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::page::{Display, Toggle};

/// Default delay between page load and reveal
pub const DEFAULT_DELAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    Loading,
    Revealed,
}

/// What the reveal waits for
pub enum Reveal {
    Delay(Duration),
    Signal(oneshot::Receiver<()>),
}

/// Held by the content-loading operation; resolving or dropping it
/// reveals the content.
pub struct ReadySignal(oneshot::Sender<()>);

impl ReadySignal {
    pub fn ready(self) {
        let _ = self.0.send(());
    }
}

/// A readiness signal and the matching reveal trigger
pub fn readiness() -> (ReadySignal, Reveal) {
    let (tx, rx) = oneshot::channel();
    (ReadySignal(tx), Reveal::Signal(rx))
}

pub struct LoaderTimer {
    loader: Option<Arc<dyn Toggle>>,
    content: Option<Arc<dyn Toggle>>,
    state: LoaderState,
}

impl LoaderTimer {
    /// Either element may be missing from the page; that is only reported
    /// when the reveal fires.
    pub fn new(loader: Option<Arc<dyn Toggle>>, content: Option<Arc<dyn Toggle>>) -> Self {
        LoaderTimer {
            loader,
            content,
            state: LoaderState::Loading,
        }
    }

    /// Wait for the trigger, then reveal.
    pub async fn run(mut self, reveal: Reveal) -> LoaderState {
        match reveal {
            Reveal::Delay(delay) => {
                debug!("Loader waits {}ms", delay.as_millis());
                tokio::time::sleep(delay).await;
            }
            Reveal::Signal(rx) => {
                // a dropped sender still means the loading side is done
                let _ = rx.await;
            }
        }
        self.reveal();
        self.state
    }

    /// Schedule the one-shot reveal on page load.
    pub fn on_page_load(self, reveal: Reveal) -> JoinHandle<LoaderState> {
        tokio::spawn(self.run(reveal))
    }

    fn reveal(&mut self) {
        match (&self.loader, &self.content) {
            (Some(loader), Some(content)) => {
                loader.set_display(Display::None);
                content.set_display(Display::Block);
            }
            _ => error!("Elements not found: #loader or #content"),
        }
        self.state = LoaderState::Revealed;
    }
}

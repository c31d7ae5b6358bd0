//! FileSystem Actor
//!
//! Watches one page on disk and feeds new versions to the PageActor as
//! host content swaps.
//!
//! Architecture:
//! ```text
//! Watcher → Debouncer (pure timing) → Router (read + diff body) → PageMsg
//! ```
//!
//! The parent directory is watched rather than the file itself so editors
//! that save by rename keep delivering events.

use std::path::PathBuf;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::messages::PageMsg;
use crate::utils::fs::normalize_path;

// Pure timing and deduplication.
mod debouncer;
// Changes -> PageMsg.
mod router;
// Shared fs event types.
mod types;


use debouncer::Debouncer;
use router::changes_to_messages;

/// FileSystem Actor - watches the source page for changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    _watcher: RecommendedWatcher,
    /// Normalized path of the watched page
    page: PathBuf,
    /// Channel to send messages to PageActor
    page_tx: mpsc::Sender<PageMsg>,
    debouncer: Debouncer,
}

impl FsActor {
    /// Start watching immediately; events buffer until [`FsActor::run`].
    pub fn new(page: PathBuf, page_tx: mpsc::Sender<PageMsg>) -> notify::Result<Self> {
        let page = normalize_path(&page);
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        let dir = page
            .parent()
            .map_or_else(|| PathBuf::from("."), |p| p.to_path_buf());
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        crate::debug!("watch"; "watching {}", dir.display());

        Ok(Self {
            notify_rx,
            _watcher: watcher,
            page,
            page_tx,
            debouncer: Debouncer::new(),
        })
    }

    /// Run the actor event loop until the PageActor goes away
    pub async fn run(self) {
        let Self {
            notify_rx,
            _watcher,
            page,
            page_tx,
            mut debouncer,
        } = self;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        // Spawn a thread to poll notify events and send to async channel
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break; // Receiver dropped
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        loop {
            tokio::select! {
                biased;
                event = async_rx.recv() => {
                    let Some(event) = event else { break };
                    debouncer.add_event(&event);
                }
                _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                    let Some(changes) = debouncer.take_if_ready() else {
                        continue;
                    };
                    for msg in changes_to_messages(&changes, &page) {
                        if page_tx.send(msg).await.is_err() {
                            return;
                        }
                    }
                }
            }
        }
    }
}

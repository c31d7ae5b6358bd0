//! Startup wiring for one page.
//!
//! A thin orchestrator like a coordinator: resolves the overlay capability,
//! compiles the engine, spawns the [`PageActor`] and hands back its channels.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::messages::{DomEdit, PageMsg, PassReport};
use super::page::PageActor;
use crate::config::LightboxConfig;
use crate::dom::Document;
use crate::engine::{EngineError, LinkEngine};
use crate::host::HostContext;
use crate::overlay::Overlay;
use crate::{debug, log};

const CHANNEL_BUFFER: usize = 32;

/// Handle to a running page actor.
pub struct Lightbox {
    tx: mpsc::Sender<PageMsg>,
    reports: mpsc::UnboundedReceiver<PassReport>,
    task: JoinHandle<()>,
    host: HostContext,
}

impl Lightbox {
    /// Start observing `doc`. Must be called inside a tokio runtime.
    ///
    /// Returns `Ok(None)` without touching the document when there is no
    /// configuration. `library` is the overlay the page could use; whether
    /// it is actually bound depends on `config.overlay.mode`.
    pub fn init(
        config: Option<LightboxConfig>,
        doc: Document,
        library: Option<Arc<dyn Overlay>>,
    ) -> Result<Option<Self>, EngineError> {
        let Some(config) = config else {
            log!("warning"; "lightbox configuration missing, links left untouched");
            return Ok(None);
        };

        let engine = LinkEngine::new(&config)?;
        let host = HostContext::detect(&doc);
        let overlay = library.filter(|_| config.overlay.mode.is_available(host.overlay_available));

        debug!(
            "observer";
            "runtime ready: {}, builder preview: {}, overlay: {}",
            host.runtime_ready,
            host.builder_preview,
            overlay.as_ref().map_or("none", |o| o.name())
        );

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER);
        let (report_tx, reports) = mpsc::unbounded_channel();
        let actor =
            PageActor::new(rx, doc, engine, overlay, config.observer).with_reports(report_tx);
        let task = tokio::spawn(actor.run());

        Ok(Some(Self {
            tx,
            reports,
            task,
            host,
        }))
    }

    pub fn host(&self) -> HostContext {
        self.host
    }

    /// Sender for producers living elsewhere (file watcher, signal handler).
    pub fn sender(&self) -> mpsc::Sender<PageMsg> {
        self.tx.clone()
    }

    /// Returns `false` if the actor has stopped.
    pub async fn send(&self, msg: PageMsg) -> bool {
        self.tx.send(msg).await.is_ok()
    }

    pub async fn edit(&self, edit: DomEdit) -> bool {
        self.send(PageMsg::Edit(edit)).await
    }

    pub async fn load_complete(&self) -> bool {
        self.send(PageMsg::LoadComplete).await
    }

    pub async fn lifecycle(&self, name: &str) -> bool {
        self.send(PageMsg::Lifecycle(name.to_string())).await
    }

    /// Wait for the next completed pass.
    pub async fn next_report(&mut self) -> Option<PassReport> {
        self.reports.recv().await
    }

    /// Rendered HTML of the current document.
    pub async fn snapshot(&self) -> Option<String> {
        let (reply, rx) = oneshot::channel();
        if !self.send(PageMsg::Snapshot(reply)).await {
            return None;
        }
        rx.await.ok()
    }

    /// Stop the actor and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.tx.send(PageMsg::Shutdown).await;
        let _ = self.task.await;
    }
}

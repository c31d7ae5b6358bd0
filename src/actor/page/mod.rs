//! Page Actor
//!
//! Owns the live document and keeps it processed as the host changes it.
//!
//! ```text
//!                 runtime ready?
//!                ┌──── yes ────► pass(startup) ──┐
//!   start ───────┤                               ├──► Observing
//!                └── no ─► Pending ─LoadComplete─► Settling ─settle─► pass(startup)
//!
//!   Observing:  Edit adding <a> ─┐
//!               content loaded ──┼──► Debouncer ──debounce after first──► pass(trigger)
//!               builder update ──┘     (builder events only in preview)
//! ```
//!
//! Signals that arrive before the first pass are dropped: the first pass
//! covers everything present at that moment.

mod debouncer;
mod edit;
mod trigger;


pub use trigger::{Trigger, mutation_adds_anchor};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use super::messages::{DomEdit, PageMsg, PassReport};
use crate::config::ObserverConfig;
use crate::dom::{self, Document};
use crate::engine::LinkEngine;
use crate::host::{HostContext, Lifecycle};
use crate::overlay::Overlay;
use crate::{debug, log};
use debouncer::Debouncer;

/// Startup phase of the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting for the page load signal
    Pending,
    /// Load seen; first pass runs at the deadline
    Settling(Instant),
    /// First pass done; re-scans on triggers
    Observing,
}

/// Page Actor - owns the document and runs processing passes
pub struct PageActor {
    rx: mpsc::Receiver<PageMsg>,
    doc: Document,
    engine: LinkEngine,
    overlay: Option<Arc<dyn Overlay>>,
    host: HostContext,
    settle: Duration,
    reports: Option<mpsc::UnboundedSender<PassReport>>,
    debouncer: Debouncer,
    phase: Phase,
    passes: usize,
}

impl PageActor {
    pub fn new(
        rx: mpsc::Receiver<PageMsg>,
        doc: Document,
        engine: LinkEngine,
        overlay: Option<Arc<dyn Overlay>>,
        observer: ObserverConfig,
    ) -> Self {
        let host = HostContext::detect(&doc);
        Self {
            rx,
            doc,
            engine,
            overlay,
            host,
            settle: observer.settle(),
            reports: None,
            debouncer: Debouncer::new(observer.debounce()),
            phase: Phase::Pending,
            passes: 0,
        }
    }

    /// Publish a [`PassReport`] after every pass.
    pub fn with_reports(mut self, tx: mpsc::UnboundedSender<PassReport>) -> Self {
        self.reports = Some(tx);
        self
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        // Parsing queued nothing, but a caller may have edited the document.
        self.doc.take_records();

        if self.host.runtime_ready {
            self.first_pass();
        } else {
            debug!("observer"; "runtime not ready, waiting for page load");
        }

        loop {
            let sleep = self.sleep_duration();
            tokio::select! {
                biased;
                msg = self.rx.recv() => {
                    let Some(msg) = msg else { break };
                    if !self.handle(msg) {
                        break;
                    }
                }
                _ = tokio::time::sleep(sleep) => self.tick(),
            }
        }

        debug!("observer"; "stopped after {} passes", self.passes);
    }

    /// Returns `false` to stop the loop.
    fn handle(&mut self, msg: PageMsg) -> bool {
        match msg {
            PageMsg::Edit(edit) => self.on_edit(&edit),
            PageMsg::LoadComplete => self.on_load(),
            PageMsg::Lifecycle(name) => self.on_lifecycle(&name),
            PageMsg::Snapshot(reply) => {
                let _ = reply.send(dom::render(&self.doc));
            }
            PageMsg::Shutdown => return false,
        }
        true
    }

    fn on_edit(&mut self, edit: &DomEdit) {
        if let Err(e) = edit::apply_edit(&mut self.doc, edit) {
            log!("observer"; "{} `{}` failed: {}", edit.label(), edit.target(), e);
            return;
        }

        let records = self.doc.take_records();
        if self.phase == Phase::Observing {
            if mutation_adds_anchor(&self.doc, &records) {
                self.debouncer.add(Trigger::Mutation);
            } else {
                debug!("observer"; "ignore {} records without links", records.len());
            }
        }

        // Node ids do not outlive a message, so replaced content can go now.
        let dropped = self.doc.reclaim();
        if dropped > 0 {
            debug!("observer"; "reclaimed {} detached nodes", dropped);
        }
    }

    fn on_load(&mut self) {
        if self.phase == Phase::Pending {
            debug!("observer"; "page loaded, settling for {:?}", self.settle);
            self.phase = Phase::Settling(Instant::now() + self.settle);
        }
    }

    fn on_lifecycle(&mut self, name: &str) {
        let Some(event) = Lifecycle::from_event(name) else {
            debug!("observer"; "ignore event `{}`", name);
            return;
        };
        if self.phase != Phase::Observing {
            return;
        }

        match event {
            Lifecycle::ContentLoaded => self.debouncer.add(Trigger::ContentLoaded),
            Lifecycle::BuilderUpdate if self.host.builder_preview => {
                self.debouncer.add(Trigger::BuilderUpdate)
            }
            Lifecycle::BuilderUpdate => {
                debug!("observer"; "ignore `{}` outside builder preview", name);
            }
        }
    }

    fn sleep_duration(&self) -> Duration {
        match self.phase {
            Phase::Settling(deadline) => deadline
                .saturating_duration_since(Instant::now())
                .max(Duration::from_millis(1)),
            _ => self.debouncer.sleep_duration(),
        }
    }

    fn tick(&mut self) {
        match self.phase {
            Phase::Settling(deadline) if Instant::now() >= deadline => self.first_pass(),
            Phase::Observing => {
                if let Some(batch) = self.debouncer.take_if_ready() {
                    debug!("observer"; "re-scan after {} triggers", batch.total());
                    self.run_pass(batch.first);
                }
            }
            _ => {}
        }
    }

    fn first_pass(&mut self) {
        self.run_pass(Trigger::Startup);
        self.phase = Phase::Observing;
    }

    fn run_pass(&mut self, trigger: Trigger) {
        let body = self.doc.body();
        let counts = self
            .engine
            .process(&mut self.doc, body, self.overlay.as_deref());
        // The engine's own marker writes are not host changes.
        self.doc.take_records();
        self.passes += 1;

        debug!("observer"; "pass {} ({}): {}", self.passes, trigger, counts);
        if let Some(tx) = &self.reports {
            let _ = tx.send(PassReport {
                pass: self.passes,
                trigger,
                counts,
            });
        }
    }
}

//! `watch`: keep one page processed while its source changes.
//!
//! ```text
//! source.html ──notify──► FsActor ──body swap──► PageActor ──pass──► output.html
//! ```
//!
//! Startup mirrors a browser: the page is loaded into the actor, then the
//! load-complete signal fires. Pages without the framework runtime get
//! their first pass after the settle delay.

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use super::WatchArgs;
use crate::actor::Lightbox;
use crate::actor::fs::FsActor;
use crate::config::LightboxConfig;
use crate::dom;
use crate::logger::{status_error, status_success};
use crate::overlay::Overlay;
use crate::utils::fs::write_if_changed;
use crate::{debug, log};

pub fn watch(
    args: &WatchArgs,
    config: Option<LightboxConfig>,
    library: Option<Arc<dyn Overlay>>,
) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(run(args, config, library))
}

async fn run(
    args: &WatchArgs,
    config: Option<LightboxConfig>,
    library: Option<Arc<dyn Overlay>>,
) -> Result<()> {
    let source = fs::read_to_string(&args.page)
        .with_context(|| format!("failed to read {}", args.page.display()))?;
    let doc = dom::parse(&source);

    let Some(mut lightbox) = Lightbox::init(config, doc, library)? else {
        return Ok(());
    };
    if !lightbox.host().runtime_ready {
        debug!("watch"; "page has no Divi runtime, first pass waits for load");
    }

    let (stop_tx, mut stop_rx) = mpsc::unbounded_channel();
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(());
    })
    .context("failed to set Ctrl+C handler")?;

    let fs_actor = FsActor::new(args.page.clone(), lightbox.sender())
        .with_context(|| format!("failed to watch {}", args.page.display()))?;
    let fs_task = tokio::spawn(fs_actor.run());

    log!(
        "watch";
        "{} -> {}",
        args.page.display(),
        args.output.display()
    );
    lightbox.load_complete().await;

    loop {
        tokio::select! {
            report = lightbox.next_report() => {
                let Some(report) = report else { break };
                let Some(html) = lightbox.snapshot().await else { break };

                match write_if_changed(&args.output, html.as_bytes()) {
                    Ok(written) => {
                        debug!("watch"; "pass {} written: {}", report.pass, written);
                        status_success(&format!(
                            "pass {} ({}): {}",
                            report.pass, report.trigger, report.counts
                        ));
                    }
                    Err(e) => status_error(
                        &format!("failed to write {}", args.output.display()),
                        &e.to_string(),
                    ),
                }
            }
            _ = stop_rx.recv() => {
                log!("watch"; "shutting down...");
                break;
            }
        }
    }

    fs_task.abort();
    lightbox.shutdown().await;
    Ok(())
}

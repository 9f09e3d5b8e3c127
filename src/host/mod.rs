//! Stand-in browser tab: an in-memory Gmail page served over the tab bridge.

use anyhow::Result;
use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use crate::domain::RecipientKind;
use crate::inject::{ComposeNodes, Locator, MemoryPage};
use crate::tab::TabInfo;
use crate::tab::bridge::{HostedTab, serve};

pub struct HostConfig {
    pub url: String,
    pub socket: PathBuf,
    pub locator: Locator,
    /// Open a compose window at startup.
    pub compose: bool,
    /// How long the compose window stays a skeleton before its Send
    /// button appears.
    pub compose_delay: Duration,
}

/// Field values of a compose window, labelled for display.
pub fn compose_fields(page: &MemoryPage, nodes: &ComposeNodes) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = RecipientKind::ALL
        .iter()
        .map(|k| (k.to_string(), page.value_of(nodes.recipient(*k))))
        .collect();
    out.push(("Subject".into(), page.value_of(nodes.subject)));
    out.push(("Body".into(), page.text_of(nodes.body)));
    out
}

pub fn run_host(cfg: HostConfig) -> Result<()> {
    let page = MemoryPage::new();

    let renderer = cfg.compose.then(|| {
        let mut nodes = page.add_compose_dialog(false);
        let page = page.clone();
        let delay = cfg.compose_delay;
        thread::spawn(move || {
            thread::sleep(delay);
            page.finish_compose(&mut nodes);
            log::info!("compose window ready");
            nodes
        })
    });

    let hosted = HostedTab {
        tab: TabInfo {
            id: 1,
            url: cfg.url.clone(),
        },
        page: page.clone(),
        locator: cfg.locator,
    };

    let running = Arc::new(AtomicBool::new(true));
    let r2 = running.clone();
    ctrlc::set_handler(move || {
        r2.store(false, Ordering::SeqCst);
    })?;

    log::info!("hosting tab {} at {}", hosted.tab.id, hosted.tab.url);
    serve(&cfg.socket, &hosted, &running)?;

    if let Some(handle) = renderer {
        match handle.join() {
            Ok(nodes) => {
                for (label, value) in compose_fields(&page, &nodes) {
                    println!("{label}: {value}");
                }
            }
            Err(_) => log::warn!("compose renderer panicked"),
        }
    }
    Ok(())
}

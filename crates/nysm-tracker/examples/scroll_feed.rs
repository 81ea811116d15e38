//! Scroll a feed of cards and log as each one enters and leaves view.
//!
//! Run with `RUST_LOG=debug` to see every tracker pass.

use std::rc::Rc;
use std::time::Duration;

use nysm_dom::{DOMRect, Document, Window};
use nysm_tracker::{Page, Threshold, TrackOptions, Tracker, TrackerConfig};
use tracing_subscriber::EnvFilter;

const CARD_HEIGHT: f64 = 240.0;
const CARDS: usize = 8;

fn build_feed() -> anyhow::Result<Window> {
    let mut doc = Document::new();
    let body = doc.body();
    doc.set_layout_rect(body, DOMRect::from_xywh(0.0, 0.0, 400.0, CARD_HEIGHT * CARDS as f64))?;

    for i in 0..CARDS {
        let card = doc.create_element("article");
        doc.set_id(card, &format!("card-{i}"))?;
        doc.add_class(card, "card")?;
        doc.append_child(body, card)?;
        doc.set_layout_rect(card, DOMRect::from_xywh(20.0, CARD_HEIGHT * i as f64, 360.0, CARD_HEIGHT - 20.0))?;
    }
    Ok(Window::new(doc, 400.0, 600.0))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let page = Rc::new(Page::new(build_feed()?));
    let config = TrackerConfig::default().with_interval(Duration::from_millis(50));
    let tracker = Tracker::new(page.clone(), config);

    for i in 0..CARDS {
        tracker.track(
            TrackOptions::new(format!("#card-{i}"))
                .with_threshold(Threshold::new(60.0)?)
                .on_viewable(move |el| tracing::info!(card = i, ?el, "card in view"))
                .on_not_viewable(move |el| tracing::info!(card = i, ?el, "card out of view")),
        )?;
    }

    smol::block_on(async {
        for _ in 0..12 {
            page.event_loop().run_for(Duration::from_millis(100)).await;
            page.window_mut().scroll_by(0.0, 120.0);
        }
    });

    tracker.untrack_all();
    tracing::info!(still_running = tracker.is_running(), "done");
    Ok(())
}

use crate::output::print_json;
use anyhow::Context;
use correios_core::{
    config::TrackerConfig,
    format::format_labeled,
    store::CodeStore,
    tracker::Tracker,
    types::{Order, TrackingCode},
};
use std::path::Path;

pub fn run(
    store_path: &Path,
    config: TrackerConfig,
    args: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let store = CodeStore::open(store_path).context("failed to open storage file")?;

    let codes = if args.is_empty() {
        store.codes()
    } else {
        args.iter()
            .map(|a| TrackingCode::parse(a))
            .collect::<Result<Vec<_>, _>>()?
    };

    if codes.is_empty() {
        if json {
            print_json(&Vec::<Order>::new())?;
        } else {
            println!("No tracking codes stored");
        }
        return Ok(());
    }

    let tracker = Tracker::new(config).context("failed to build HTTP client")?;
    let orders = tracker
        .fetch_statuses(&codes)
        .context("failed to check order status")?;
    tracing::debug!(codes = codes.len(), orders = orders.len(), "check finished");

    if json {
        print_json(&orders)?;
    } else {
        println!("{}", format_labeled(&orders, store.list()));
    }
    Ok(())
}

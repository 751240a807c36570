use crate::output::{print_json, print_table};
use anyhow::Context;
use correios_core::store::CodeStore;
use std::path::Path;

pub fn run(store_path: &Path, json: bool) -> anyhow::Result<()> {
    let store = CodeStore::open(store_path).context("failed to open storage file")?;

    if json {
        print_json(&store.list())?;
        return Ok(());
    }

    if store.is_empty() {
        println!("No tracking codes stored");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = store
        .list()
        .iter()
        .map(|r| vec![r.code.to_string(), r.label.clone().unwrap_or_default()])
        .collect();
    print_table(&["CODE", "LABEL"], rows);
    Ok(())
}

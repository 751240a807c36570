use crate::output::print_json;
use anyhow::Context;
use correios_core::{
    store::{CodeStore, RemoveOutcome},
    CorreiosError,
};
use std::path::Path;

pub fn run(store_path: &Path, identifier: &str, json: bool) -> anyhow::Result<()> {
    let mut store = CodeStore::open(store_path).context("failed to open storage file")?;

    let removed = match store.remove(identifier)? {
        RemoveOutcome::Removed(record) => record,
        RemoveOutcome::NotFound => {
            return Err(CorreiosError::NotFound(identifier.trim().to_string()).into())
        }
    };

    if json {
        print_json(&removed)?;
    } else {
        println!("Removed {}", removed.code);
    }
    Ok(())
}

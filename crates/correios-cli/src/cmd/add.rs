use crate::output::print_json;
use anyhow::Context;
use correios_core::{
    store::{AddOutcome, CodeStore},
    CorreiosError,
};
use std::path::Path;

pub fn run(
    store_path: &Path,
    code: &str,
    label_words: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let label = label_words.join(" ");
    let label = (!label.trim().is_empty()).then_some(label.as_str());

    let mut store = CodeStore::open(store_path).context("failed to open storage file")?;
    let outcome = store.add(code, label)?;
    if outcome == AddOutcome::AlreadyExists {
        return Err(CorreiosError::AlreadyExists(code.trim().to_string()).into());
    }

    let record = store
        .get(code.trim())
        .context("added code missing from store")?;
    if json {
        print_json(record)?;
    } else {
        match record.label {
            Some(ref label) => println!("Added {} ({label})", record.code),
            None => println!("Added {}", record.code),
        }
    }
    Ok(())
}

use crate::error::{CorreiosError, Result};
use crate::paths;
use crate::types::{normalize_label, CodeRecord, TrackingCode};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyExists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(CodeRecord),
    NotFound,
}

// ---------------------------------------------------------------------------
// StoreFormat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    /// One record per line: `CODE` or `CODE label text`. Insertion ordered.
    Lines,
    /// YAML mapping of code to label (or null). Sorted by code.
    Yaml,
}

impl StoreFormat {
    pub fn for_path(path: &Path) -> Self {
        if paths::is_yaml_store(path) {
            StoreFormat::Yaml
        } else {
            StoreFormat::Lines
        }
    }
}

// ---------------------------------------------------------------------------
// CodeStore
// ---------------------------------------------------------------------------

/// The persisted collection of tracking codes. Construct one per invocation
/// with [`CodeStore::open`] and pass it to whatever needs it.
#[derive(Debug)]
pub struct CodeStore {
    path: PathBuf,
    format: StoreFormat,
    records: Vec<CodeRecord>,
}

impl CodeStore {
    /// Load the store at `path`. A missing file is an empty store; it is
    /// created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = StoreFormat::for_path(&path);
        let records = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            match format {
                StoreFormat::Lines => decode_lines(&path, &data)?,
                StoreFormat::Yaml => decode_yaml(&path, &data)?,
            }
        } else {
            Vec::new()
        };
        tracing::debug!(path = %path.display(), records = records.len(), "opened code store");
        Ok(Self {
            path,
            format,
            records,
        })
    }

    pub fn format(&self) -> StoreFormat {
        self.format
    }

    pub fn exists(&self, code: &str) -> bool {
        self.records.iter().any(|r| r.code.as_str() == code)
    }

    pub fn get(&self, code: &str) -> Option<&CodeRecord> {
        self.records.iter().find(|r| r.code.as_str() == code)
    }

    pub fn list(&self) -> &[CodeRecord] {
        &self.records
    }

    pub fn codes(&self) -> Vec<TrackingCode> {
        self.records.iter().map(|r| r.code.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Validate and append a record. An existing code is left untouched and
    /// nothing is written.
    pub fn add(&mut self, code: &str, label: Option<&str>) -> Result<AddOutcome> {
        let code = TrackingCode::parse(code)?;
        let record = CodeRecord::new(code, label)?;
        if self.exists(record.code.as_str()) {
            return Ok(AddOutcome::AlreadyExists);
        }

        let previous = self.records.clone();
        self.records.push(record);
        if self.format == StoreFormat::Yaml {
            self.records.sort_by(|a, b| a.code.cmp(&b.code));
        }
        if let Err(e) = self.save() {
            self.records = previous;
            return Err(e);
        }
        Ok(AddOutcome::Added)
    }

    /// Remove the record whose code equals `identifier`, or failing that the
    /// single record whose label equals it. No match leaves the file untouched.
    pub fn remove(&mut self, identifier: &str) -> Result<RemoveOutcome> {
        let Some(index) = self.resolve(identifier.trim())? else {
            return Ok(RemoveOutcome::NotFound);
        };

        let removed = self.records.remove(index);
        if let Err(e) = self.save() {
            self.records.insert(index, removed);
            return Err(e);
        }
        tracing::debug!(code = %removed.code, "removed tracking code");
        Ok(RemoveOutcome::Removed(removed))
    }

    fn resolve(&self, identifier: &str) -> Result<Option<usize>> {
        if let Some(i) = self.records.iter().position(|r| r.code.as_str() == identifier) {
            return Ok(Some(i));
        }
        let by_label: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.label.as_deref() == Some(identifier))
            .map(|(i, _)| i)
            .collect();
        match by_label.as_slice() {
            [] => Ok(None),
            [i] => Ok(Some(*i)),
            many => Err(CorreiosError::AmbiguousLabel {
                label: identifier.to_string(),
                codes: many
                    .iter()
                    .map(|&i| self.records[i].code.to_string())
                    .collect(),
            }),
        }
    }

    fn save(&self) -> Result<()> {
        let created = !self.path.exists();
        let data = match self.format {
            StoreFormat::Lines => encode_lines(&self.records),
            StoreFormat::Yaml => encode_yaml(&self.records)?,
        };
        crate::io::atomic_write(&self.path, data.as_bytes())?;
        if created {
            tracing::info!(path = %self.path.display(), "created storage file");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Line format
// ---------------------------------------------------------------------------

fn encode_lines(records: &[CodeRecord]) -> String {
    let mut out = String::new();
    for r in records {
        out.push_str(r.code.as_str());
        if let Some(ref label) = r.label {
            out.push(' ');
            out.push_str(label);
        }
        out.push('\n');
    }
    out
}

fn decode_lines(path: &Path, data: &str) -> Result<Vec<CodeRecord>> {
    let corrupt = |line: usize, reason: String| CorreiosError::CorruptStore {
        path: path.to_path_buf(),
        line: Some(line),
        reason,
    };

    let mut records: Vec<CodeRecord> = Vec::new();
    for (i, line) in data.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (code, label) = match line.split_once(char::is_whitespace) {
            Some((code, rest)) => (code, Some(rest)),
            None => (line, None),
        };
        let code = TrackingCode::parse(code).map_err(|e| corrupt(i + 1, e.to_string()))?;
        if records.iter().any(|r| r.code == code) {
            return Err(corrupt(i + 1, format!("duplicate tracking code {code}")));
        }
        let label = normalize_label(label).map_err(|e| corrupt(i + 1, e.to_string()))?;
        records.push(CodeRecord { code, label });
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// YAML format
// ---------------------------------------------------------------------------

fn encode_yaml(records: &[CodeRecord]) -> Result<String> {
    let map: BTreeMap<&TrackingCode, Option<&str>> = records
        .iter()
        .map(|r| (&r.code, r.label.as_deref()))
        .collect();
    Ok(serde_yaml::to_string(&map)?)
}

fn decode_yaml(path: &Path, data: &str) -> Result<Vec<CodeRecord>> {
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }
    let map: BTreeMap<TrackingCode, Option<String>> = serde_yaml::from_str(data)?;
    map.into_iter()
        .map(|(code, label)| {
            let label = normalize_label(label.as_deref()).map_err(|e| {
                CorreiosError::CorruptStore {
                    path: path.to_path_buf(),
                    line: None,
                    reason: format!("{code}: {e}"),
                }
            })?;
            Ok(CodeRecord { code, label })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

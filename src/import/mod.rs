use crate::matcher::rank::top_matches;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Quantity multiset keyed by canonical item name. Duplicate inserts
/// accumulate counts, never overwrite. BTreeMap keeps iteration order
/// deterministic so runs and logs are reproducible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WantList {
    counts: BTreeMap<String, u32>,
}

impl WantList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str) {
        *self.counts.entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn count(&self, name: &str) -> u32 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &u32)> {
        self.counts.iter()
    }
}

/// Resolves each raw line to its single best catalog match and accumulates
/// quantities per canonical name.
///
/// Lines that resolve to nothing (empty catalog, blank query) contribute no
/// entry. The result does not depend on processing order, only on per-line
/// resolution.
pub fn aggregate<I, S>(lines: I, catalog: &[String]) -> WantList
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut want = WantList::new();
    for line in lines {
        if let Some(best) = top_matches(line.as_ref(), catalog, 1).into_iter().next() {
            want.add(&best.candidate);
        }
    }
    want
}

/// Reads a want-list file: one item name per line, trimmed, blank lines
/// dropped.
pub fn read_want_file(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading want list {}", path.display()))?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

//! # Reference Metadata
//!
//! CSV-backed index constituent metadata: one file per index under a
//! snapshot directory, with `Symbol` / `Security` / `GICS Sector`
//! columns. A missing snapshot is "no metadata", not an error, so
//! holdings still display with blank fields.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;

use crate::error::Result;
use crate::market::provider::ReferenceMetadata;
use crate::market::provider::SecurityInfo;

#[derive(Debug, Deserialize)]
struct ConstituentRow {
  #[serde(rename = "Symbol")]
  symbol: String,
  #[serde(rename = "Security", default)]
  security: Option<String>,
  #[serde(rename = "GICS Sector", default)]
  sector: Option<String>,
}

/// Reads constituent snapshots from `<dir>/<INDEX>.csv`.
#[derive(Clone, Debug)]
pub struct CsvMetadataSource {
  dir: PathBuf,
}

impl CsvMetadataSource {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }
}

impl ReferenceMetadata for CsvMetadataSource {
  fn load_security_metadata(&self, index_name: &str) -> Result<BTreeMap<String, SecurityInfo>> {
    let path = self.dir.join(format!("{index_name}.csv"));
    if !path.exists() {
      warn!(index = %index_name, path = %path.display(), "no metadata snapshot, continuing without");
      return Ok(BTreeMap::new());
    }

    let mut reader = csv::Reader::from_path(&path)?;
    let mut out = BTreeMap::new();

    for row in reader.deserialize::<ConstituentRow>() {
      let row = row?;
      let symbol = row.symbol.trim().to_string();
      if symbol.is_empty() {
        continue;
      }
      out.insert(
        symbol,
        SecurityInfo {
          name: row.security.unwrap_or_default().trim().to_string(),
          sector: row.sector.unwrap_or_default().trim().to_string(),
        },
      );
    }

    Ok(out)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn missing_snapshot_is_empty_not_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = CsvMetadataSource::new(dir.path());
    let meta = source.load_security_metadata("SPX").unwrap();
    assert!(meta.is_empty());
  }

  #[test]
  fn parses_constituent_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("SPX.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "Symbol,Security,GICS Sector").unwrap();
    writeln!(file, "JPM,JPMorgan Chase,Financials").unwrap();
    writeln!(file, "MS,Morgan Stanley,Financials").unwrap();
    drop(file);

    let source = CsvMetadataSource::new(dir.path());
    let meta = source.load_security_metadata("SPX").unwrap();

    assert_eq!(meta.len(), 2);
    assert_eq!(meta["JPM"].name, "JPMorgan Chase");
    assert_eq!(meta["MS"].sector, "Financials");
  }
}

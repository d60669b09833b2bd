use csv::{ReaderBuilder, StringRecord};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{EngineError, Result};

/// Display names for asset codes, read once at startup from a `code,name` CSV.
#[derive(Debug, Clone, Default)]
pub struct AssetDirectory {
    by_code: BTreeMap<String, String>,
}

impl AssetDirectory {
    // CSV Header: code,name
    // Example Row: XXBT,Bitcoin
    pub fn load_from_csv(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            EngineError::ConfigError(format!("Failed to open asset names file '{}': {}", path.display(), e))
        })?;
        let directory = Self::from_reader(BufReader::new(file))?;
        tracing::info!(path = %path.display(), assets = directory.len(), "Loaded asset names");
        Ok(directory)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(reader);
        let headers = rdr.headers()?.clone();
        let code_idx = Self::column(&headers, "code")?;
        let name_idx = Self::column(&headers, "name")?;

        let mut by_code = BTreeMap::new();
        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record = result?;
            let code = record.get(code_idx).unwrap_or_default();
            let name = record.get(name_idx).unwrap_or_default();
            if code.is_empty() || name.is_empty() {
                return Err(EngineError::ConfigError(format!(
                    "Asset names row at line {} needs both a code and a name",
                    line
                )));
            }
            by_code.insert(code.to_string(), name.to_string());
        }

        if by_code.is_empty() {
            return Err(EngineError::ConfigError("Asset names file has no rows".to_string()));
        }
        Ok(AssetDirectory { by_code })
    }

    fn column(headers: &StringRecord, name: &str) -> Result<usize> {
        headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| EngineError::ConfigError(format!("Asset names file is missing the '{}' column", name)))
    }

    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.by_code.get(code).map(String::as_str)
    }

    pub fn code_of(&self, name: &str) -> Option<&str> {
        self.by_code
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(code, _)| code.as_str())
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

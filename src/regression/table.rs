// Performance CSV tables
//
// Header row with at least `profile`, `pps` and `cycles_per_symbol` in any
// order; extra columns are ignored. Row order is kept because the
// regression report follows the candidate's order.

use crate::error::{HarnessError, Result};
use std::collections::HashMap;
use std::path::Path;

/// One benchmark profile measurement
#[derive(Debug, Clone, PartialEq)]
pub struct PerfRow {
    pub profile: String,
    /// Packets per second (higher is better)
    pub pps: f64,
    /// CPU cycles per symbol (lower is better)
    pub cycles_per_symbol: f64,
}

impl PerfRow {
    pub fn new(profile: impl Into<String>, pps: f64, cycles_per_symbol: f64) -> Self {
        Self {
            profile: profile.into(),
            pps,
            cycles_per_symbol,
        }
    }
}

/// Profiles keyed by name, in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerfTable {
    rows: Vec<PerfRow>,
    index: HashMap<String, usize>,
}

impl PerfTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from rows; profile names must be unique
    pub fn from_rows(rows: impl IntoIterator<Item = PerfRow>) -> Result<Self> {
        let mut table = Self::new();
        for (i, row) in rows.into_iter().enumerate() {
            table.insert(row, i + 1)?;
        }
        Ok(table)
    }

    /// Load a performance CSV file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
        Self::from_csv_str(&text)
    }

    /// Parse performance CSV text
    pub fn from_csv_str(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l))
            .filter(|(_, l)| !l.trim().is_empty());

        let Some((header_line, header)) = lines.next() else {
            return Err(HarnessError::PerfCsv {
                line: 1,
                reason: "missing header row".to_string(),
            });
        };
        let header = split_record(header);
        let column = |name: &str| {
            header
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| HarnessError::PerfCsv {
                    line: header_line,
                    reason: format!("missing column `{}`", name),
                })
        };
        let profile_col = column("profile")?;
        let pps_col = column("pps")?;
        let cps_col = column("cycles_per_symbol")?;

        let mut table = Self::new();
        for (line_no, line) in lines {
            let fields = split_record(line);
            let field = |col: usize, name: &str| {
                fields
                    .get(col)
                    .map(|f| f.trim())
                    .ok_or_else(|| HarnessError::PerfCsv {
                        line: line_no,
                        reason: format!("missing `{}` field", name),
                    })
            };
            let number = |col: usize, name: &str| -> Result<f64> {
                let raw = field(col, name)?;
                raw.parse::<f64>().map_err(|e| HarnessError::PerfCsv {
                    line: line_no,
                    reason: format!("`{}` value {:?}: {}", name, raw, e),
                })
            };

            let row = PerfRow {
                profile: field(profile_col, "profile")?.to_string(),
                pps: number(pps_col, "pps")?,
                cycles_per_symbol: number(cps_col, "cycles_per_symbol")?,
            };
            table.insert(row, line_no)?;
        }
        Ok(table)
    }

    fn insert(&mut self, row: PerfRow, line: usize) -> Result<()> {
        if self.index.contains_key(&row.profile) {
            return Err(HarnessError::PerfCsv {
                line,
                reason: format!("duplicate profile `{}`", row.profile),
            });
        }
        self.index.insert(row.profile.clone(), self.rows.len());
        self.rows.push(row);
        Ok(())
    }

    pub fn get(&self, profile: &str) -> Option<&PerfRow> {
        self.index.get(profile).map(|&i| &self.rows[i])
    }

    /// Rows in source order
    pub fn iter(&self) -> impl Iterator<Item = &PerfRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Split one CSV record, honouring double-quoted fields
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

//! Vector manifests
//!
//! One `manifest.json` per generation output directory records the
//! parameters of the run and the SHA-256 of every transport-encoded file.
//! A manifest is built once, written once and never mutated; later
//! comparisons treat it as ground truth.
//!
//! The JSON layout is flat: parameter fields, `seed` and `files` share the
//! top-level object, in the same key order as the manifests already checked
//! in under `vectors/`:
//!
//! ```text
//! legacy:  sf, cr, snr, seed, files
//! phy:     sf, seed, bytes, osr, bw, files
//! ```
//!
//! Readers ignore unknown keys and pick the parameter variant from the keys
//! that are present.

use crate::error::{HarnessError, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::path::Path;

/// File name of the manifest inside a vector directory
pub const MANIFEST_NAME: &str = "manifest.json";

/// Digest record for one encoded artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub name: String,
    pub sha256: String,
}

impl FileRecord {
    pub fn new(name: impl Into<String>, sha256: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sha256: sha256.into(),
        }
    }
}

/// Parameters of a generation run, one case per generation path
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterSet {
    /// Reference LoRa-SDR AWGN simulation
    Legacy { sf: u32, cr: String, snr: f64 },
    /// `lora_phy` vector dump
    Phy { sf: u32, bytes: u32, osr: u32, bw: u32 },
}

/// Immutable record of one generation run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawManifest")]
pub struct Manifest {
    parameters: ParameterSet,
    seed: u64,
    files: Vec<FileRecord>,
}

impl Manifest {
    /// Build a manifest; files are sorted by name and names must be unique
    pub fn build(parameters: ParameterSet, seed: u64, mut files: Vec<FileRecord>) -> Result<Self> {
        if let ParameterSet::Legacy { snr, .. } = &parameters {
            if !snr.is_finite() {
                return Err(HarnessError::Manifest(format!(
                    "snr must be finite, got {}",
                    snr
                )));
            }
        }

        let mut seen = HashSet::new();
        for record in &files {
            if !seen.insert(record.name.as_str()) {
                return Err(HarnessError::Manifest(format!(
                    "duplicate file name: {}",
                    record.name
                )));
            }
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Self {
            parameters,
            seed,
            files,
        })
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// File records, sorted by name
    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    /// Serialize to pretty-printed JSON
    pub fn serialize(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| HarnessError::Manifest(e.to_string()))
    }

    /// Parse a manifest from JSON text
    pub fn deserialize(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| HarnessError::Manifest(e.to_string()))
    }

    /// Write `manifest.json` into `dir`
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        let path = dir.join(MANIFEST_NAME);
        let text = self.serialize()?;
        std::fs::write(&path, text).map_err(|e| HarnessError::io(&path, e))
    }

    /// Read `manifest.json` from `dir`
    pub fn read_from(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_NAME);
        let text = std::fs::read_to_string(&path).map_err(|e| HarnessError::io(&path, e))?;
        Self::deserialize(&text)
    }
}

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match &self.parameters {
            ParameterSet::Legacy { sf, cr, snr } => {
                map.serialize_entry("sf", sf)?;
                map.serialize_entry("cr", cr)?;
                map.serialize_entry("snr", snr)?;
                map.serialize_entry("seed", &self.seed)?;
            }
            ParameterSet::Phy { sf, bytes, osr, bw } => {
                map.serialize_entry("sf", sf)?;
                map.serialize_entry("seed", &self.seed)?;
                map.serialize_entry("bytes", bytes)?;
                map.serialize_entry("osr", osr)?;
                map.serialize_entry("bw", bw)?;
            }
        }
        map.serialize_entry("files", &self.files)?;
        map.end()
    }
}

/// Wire shape of a manifest before the parameter variant is chosen
#[derive(Deserialize)]
struct RawManifest {
    sf: u32,
    cr: Option<String>,
    snr: Option<f64>,
    bytes: Option<u32>,
    osr: Option<u32>,
    bw: Option<u32>,
    seed: u64,
    files: Vec<FileRecord>,
}

impl TryFrom<RawManifest> for Manifest {
    type Error = HarnessError;

    fn try_from(raw: RawManifest) -> Result<Self> {
        let parameters = match raw {
            RawManifest {
                cr: Some(cr),
                snr: Some(snr),
                ..
            } => ParameterSet::Legacy { sf: raw.sf, cr, snr },
            RawManifest {
                bytes: Some(bytes),
                osr: Some(osr),
                bw: Some(bw),
                ..
            } => ParameterSet::Phy {
                sf: raw.sf,
                bytes,
                osr,
                bw,
            },
            _ => {
                return Err(HarnessError::Manifest(
                    "parameter fields match neither the legacy (cr, snr) nor the phy (bytes, osr, bw) layout"
                        .to_string(),
                ))
            }
        };
        Manifest::build(parameters, raw.seed, raw.files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn phy_manifest() -> Manifest {
        Manifest::build(
            ParameterSet::Phy {
                sf: 7,
                bytes: 16,
                osr: 1,
                bw: 125_000,
            },
            1,
            vec![
                FileRecord::new("payload.bin.b64", "bb"),
                FileRecord::new("iq_samples.csv.b64", "aa"),
                FileRecord::new("demod_symbols.csv.b64", "cc"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_build_sorts_files() {
        let m = phy_manifest();
        let names: Vec<&str> = m.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["demod_symbols.csv.b64", "iq_samples.csv.b64", "payload.bin.b64"]
        );
    }

    #[test]
    fn test_build_rejects_duplicate_names() {
        let err = Manifest::build(
            ParameterSet::Phy {
                sf: 7,
                bytes: 16,
                osr: 1,
                bw: 125_000,
            },
            0,
            vec![FileRecord::new("a", "1"), FileRecord::new("a", "2")],
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate file name: a"));
    }

    #[test]
    fn test_build_rejects_non_finite_snr() {
        let params = ParameterSet::Legacy {
            sf: 7,
            cr: "4/5".to_string(),
            snr: f64::NAN,
        };
        assert!(Manifest::build(params, 0, vec![]).is_err());
    }

    #[test]
    fn test_phy_round_trip() {
        let m = phy_manifest();
        let text = m.serialize().unwrap();
        assert_eq!(Manifest::deserialize(&text).unwrap(), m);
    }

    #[test]
    fn test_legacy_round_trip() {
        let m = Manifest::build(
            ParameterSet::Legacy {
                sf: 9,
                cr: "4/5".to_string(),
                snr: -7.5,
            },
            42,
            vec![FileRecord::new("rx.bin.b64", "ff")],
        )
        .unwrap();
        let text = m.serialize().unwrap();
        assert_eq!(Manifest::deserialize(&text).unwrap(), m);
    }

    #[test]
    fn test_legacy_key_order() {
        let m = Manifest::build(
            ParameterSet::Legacy {
                sf: 7,
                cr: "4/5".to_string(),
                snr: 10.0,
            },
            0,
            vec![],
        )
        .unwrap();
        let text = m.serialize().unwrap();
        assert_eq!(
            text,
            "{\n  \"sf\": 7,\n  \"cr\": \"4/5\",\n  \"snr\": 10.0,\n  \"seed\": 0,\n  \"files\": []\n}"
        );
    }

    #[test]
    fn test_phy_key_order() {
        let text = phy_manifest().serialize().unwrap();
        let keys: Vec<usize> = ["\"sf\"", "\"seed\"", "\"bytes\"", "\"osr\"", "\"bw\"", "\"files\""]
            .iter()
            .map(|k| text.find(k).unwrap())
            .collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]), "{}", text);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let text = r#"{
            "sf": 8, "seed": 3, "bytes": 32, "osr": 2, "bw": 250000,
            "generator_version": "1.4.0",
            "files": [{"name": "payload.bin.b64", "sha256": "ab", "size": 44}]
        }"#;
        let m = Manifest::deserialize(text).unwrap();
        assert_eq!(
            m.parameters(),
            &ParameterSet::Phy {
                sf: 8,
                bytes: 32,
                osr: 2,
                bw: 250_000
            }
        );
        assert_eq!(m.seed(), 3);
        assert_eq!(m.files(), &[FileRecord::new("payload.bin.b64", "ab")]);
    }

    #[test]
    fn test_unsorted_input_is_sorted_on_read() {
        let text = r#"{"sf": 7, "cr": "4/8", "snr": 0.0, "seed": 0,
            "files": [{"name": "b", "sha256": "2"}, {"name": "a", "sha256": "1"}]}"#;
        let m = Manifest::deserialize(text).unwrap();
        assert_eq!(m.files()[0].name, "a");
    }

    #[test]
    fn test_ambiguous_parameters_rejected() {
        let text = r#"{"sf": 7, "seed": 0, "bytes": 16, "files": []}"#;
        assert!(matches!(
            Manifest::deserialize(text),
            Err(HarnessError::Manifest(_))
        ));
    }

    #[test]
    fn test_write_and_read_dir() {
        let dir = TempDir::new().unwrap();
        let m = phy_manifest();
        m.write_to(dir.path()).unwrap();
        assert!(dir.path().join(MANIFEST_NAME).is_file());
        assert_eq!(Manifest::read_from(dir.path()).unwrap(), m);
    }
}

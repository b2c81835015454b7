//! Vector directory comparison
//!
//! Two vector directories are compared by content digest: every file name
//! in either listing is classified as matched, mismatched, missing from the
//! candidate, or extra in the candidate. The manifest itself is never part
//! of the listing. Once digests are loaded the comparison is a pure map
//! operation and every discrepancy is collected before reporting.

use crate::checksum;
use crate::error::{HarnessError, Result};
use crate::manifest::{Manifest, MANIFEST_NAME};
use std::collections::BTreeMap;
use std::path::Path;

/// File name to hex digest
pub type DigestListing = BTreeMap<String, String>;

/// Digest every regular file in `dir`, excluding the manifest
pub fn load_checksums(dir: &Path) -> Result<DigestListing> {
    let entries = std::fs::read_dir(dir).map_err(|e| HarnessError::io(dir, e))?;

    let mut listing = DigestListing::new();
    for entry in entries {
        let entry = entry.map_err(|e| HarnessError::io(dir, e))?;
        let path = entry.path();
        let name = entry
            .file_name()
            .into_string()
            .map_err(|_| HarnessError::InvalidFileName(path.clone()))?;
        if name == MANIFEST_NAME || !path.is_file() {
            continue;
        }
        let digest = checksum::digest(&path)?;
        tracing::debug!("{} {}", digest, path.display());
        listing.insert(name, digest);
    }
    Ok(listing)
}

/// Listing recorded in a manifest
pub fn manifest_listing(manifest: &Manifest) -> DigestListing {
    manifest
        .files()
        .iter()
        .map(|f| (f.name.clone(), f.sha256.clone()))
        .collect()
}

/// Classification of every file name across two listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonResult {
    pub matched: Vec<String>,
    pub mismatched: Vec<String>,
    /// In the reference but not the candidate
    pub missing: Vec<String>,
    /// In the candidate but not the reference
    pub extra: Vec<String>,
}

impl ComparisonResult {
    pub fn passed(&self) -> bool {
        self.mismatched.is_empty() && self.missing.is_empty() && self.extra.is_empty()
    }

    /// Findings as report lines, in missing / mismatch / extra order
    pub fn findings(&self) -> Vec<String> {
        let mut lines = Vec::new();
        lines.extend(self.missing.iter().map(|n| format!("missing: {}", n)));
        lines.extend(self.mismatched.iter().map(|n| format!("mismatch: {}", n)));
        lines.extend(self.extra.iter().map(|n| format!("extra file: {}", n)));
        lines
    }

    /// Human-readable report
    pub fn to_report_string(&self) -> String {
        if self.passed() {
            return "vectors match\n".to_string();
        }

        let mut report = String::new();
        for line in self.findings() {
            report.push_str(&line);
            report.push('\n');
        }
        report.push_str(&format!(
            "{} matched, {} mismatched, {} missing, {} extra\n",
            self.matched.len(),
            self.mismatched.len(),
            self.missing.len(),
            self.extra.len()
        ));
        report
    }
}

/// Compare a candidate listing against a reference listing
pub fn compare(reference: &DigestListing, candidate: &DigestListing) -> ComparisonResult {
    let mut result = ComparisonResult::default();

    for (name, digest) in reference {
        match candidate.get(name) {
            None => result.missing.push(name.clone()),
            Some(other) if other != digest => result.mismatched.push(name.clone()),
            Some(_) => result.matched.push(name.clone()),
        }
    }

    result.extra = candidate
        .keys()
        .filter(|name| !reference.contains_key(*name))
        .cloned()
        .collect();

    result
}

/// Compare two vector directories
pub fn compare_dirs(reference: &Path, candidate: &Path) -> Result<ComparisonResult> {
    let reference = load_checksums(reference)?;
    let candidate = load_checksums(candidate)?;
    Ok(compare(&reference, &candidate))
}

/// Re-digest `dir` and check it against its own manifest
pub fn verify_manifest(dir: &Path) -> Result<ComparisonResult> {
    let manifest = Manifest::read_from(dir)?;
    let recorded = manifest_listing(&manifest);
    let actual = load_checksums(dir)?;
    Ok(compare(&recorded, &actual))
}

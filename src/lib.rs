//! loravec - regression harness for LoRa PHY test vectors
//!
//! Generated vectors (payload bytes, interleaver codewords, demodulated
//! symbols, IQ captures) are stored base64-encoded next to a SHA-256
//! manifest, so vector sets from the legacy LoRa-SDR reference and from
//! `lora_phy` can be compared bit for bit. The crate also synthesizes
//! channel-impaired IQ captures and checks benchmark CSVs for performance
//! regressions against a recorded baseline.

pub mod checksum;
pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod generate;
pub mod impairment;
pub mod iq;
pub mod manifest;
pub mod regression;
pub mod transport;

pub use error::{HarnessError, Result};

// Integration test utilities
//
// Fake generator binaries and vector directory fixtures

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Shell preamble that extracts `--out=DIR` and logs all arguments
const SCRIPT_PREAMBLE: &str = r#"#!/bin/sh
out=""
for arg in "$@"; do
  case "$arg" in
    --out=*) out="${arg#--out=}" ;;
  esac
done
if [ -n "$FAKE_ARGS_LOG" ]; then
  echo "$@" > "$FAKE_ARGS_LOG"
fi
"#;

/// Write an executable shell script under `dir`
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("{}{}", SCRIPT_PREAMBLE, body)).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// Fake vector dump: payload, demod symbols and a 256-sample IQ capture
pub fn fake_vector_dump(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "lora_phy_vector_dump",
        r#"printf 'LoRa' > "$out/payload.bin"
printf '12\n99\n7\n' > "$out/demod_symbols.csv"
i=0
while [ $i -lt 256 ]; do
  echo "1,0" >> "$out/iq_samples.csv"
  i=$((i+1))
done
"#,
    )
}

/// Fake AWGN simulation writing one binary file
pub fn fake_awgn_sim(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "lora_awgn_sim",
        r#"printf 'rx' > "$out/rx_symbols.bin"
"#,
    )
}

/// Generator that exits non-zero after writing output
pub fn failing_generator(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "broken_dump",
        r#"printf 'x' > "$out/payload.bin"
exit 3
"#,
    )
}

/// Populate a vector directory with `(name, content)` files
pub fn write_vectors(dir: &Path, files: &[(&str, &[u8])]) {
    fs::create_dir_all(dir).unwrap();
    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
}

//! IQ sample files
//!
//! One complex sample per line as `real,imag` decimal text, in time order.
//! Floats are written in shortest round-trip form using the same notation
//! as the recorded vectors (`1.0`, `-0.0`, `1e-05`, `1.5e+16`), so an
//! impaired stream regenerated from the same input is byte-identical to the
//! recorded one.

use crate::error::{HarnessError, Result};
use num_complex::Complex64;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Parse IQ samples from text
pub fn parse_iq(text: &str) -> Result<Vec<Complex64>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_line(line, idx + 1))
        .collect()
}

/// Read an IQ sample file
pub fn read_iq(path: &Path) -> Result<Vec<Complex64>> {
    let file = File::open(path).map_err(|e| HarnessError::io(path, e))?;
    let reader = BufReader::new(file);

    let mut samples = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| HarnessError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        samples.push(parse_line(&line, idx + 1)?);
    }
    Ok(samples)
}

/// Write samples as `real,imag` lines
pub fn write_iq(path: &Path, samples: &[Complex64]) -> Result<()> {
    let file = File::create(path).map_err(|e| HarnessError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for s in samples {
        writeln!(writer, "{},{}", format_float(s.re), format_float(s.im))
            .map_err(|e| HarnessError::io(path, e))?;
    }
    writer.flush().map_err(|e| HarnessError::io(path, e))
}

fn parse_line(line: &str, line_no: usize) -> Result<Complex64> {
    let mut parts = line.split(',');
    let (Some(re), Some(im), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(HarnessError::IqFormat {
            line: line_no,
            reason: format!("expected `real,imag`, got {:?}", line),
        });
    };

    let parse = |field: &str| {
        field.trim().parse::<f64>().map_err(|e| HarnessError::IqFormat {
            line: line_no,
            reason: format!("{:?}: {}", field, e),
        })
    };

    Ok(Complex64::new(parse(re)?, parse(im)?))
}

/// Shortest round-trip decimal form of `x`
///
/// Fixed notation for decimal exponents in `[-4, 16)`, always with a
/// fractional part; scientific notation otherwise with a signed exponent of
/// at least two digits.
pub fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "-1.2345e-5"
    let sci = format!("{:e}", x);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let body = if (-4..16).contains(&exp) {
        if exp >= 0 {
            let int_len = exp as usize + 1;
            if digits.len() <= int_len {
                format!("{}{}.0", digits, "0".repeat(int_len - digits.len()))
            } else {
                format!("{}.{}", &digits[..int_len], &digits[int_len..])
            }
        } else {
            format!("0.{}{}", "0".repeat((-exp - 1) as usize), digits)
        }
    } else {
        let (lead, rest) = digits.split_at(1);
        let frac = if rest.is_empty() {
            String::new()
        } else {
            format!(".{}", rest)
        };
        let exp_sign = if exp < 0 { '-' } else { '+' };
        format!("{}{}e{}{:02}", lead, frac, exp_sign, exp.abs())
    };

    format!("{}{}", sign, body)
}

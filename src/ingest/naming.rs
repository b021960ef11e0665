use std::path::{Path, PathBuf};

/// Zeros prepended to a step index, looked up by its digit count.
/// Indices with four or more digits are written bare, so names past 9999
/// grow wider instead of staying fixed-width.
const PAD_BY_DIGITS: [&str; 4] = ["", "000", "00", "0"];

fn digit_count(mut index: usize) -> usize {
    let mut digits = 1;
    while index >= 10 {
        index /= 10;
        digits += 1;
    }
    digits
}

/// Numeric file-name suffix the solver writes for output `index`.
pub fn step_suffix(index: usize) -> String {
    let pad = PAD_BY_DIGITS.get(digit_count(index)).copied().unwrap_or("");
    format!("{pad}{index}")
}

/// `<dir>/<prefix><suffix>` for output `index`.
pub fn step_path(dir: &Path, prefix: &str, index: usize) -> PathBuf {
    dir.join(format!("{prefix}{}", step_suffix(index)))
}

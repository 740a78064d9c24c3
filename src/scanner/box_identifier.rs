use std::path::Path;

/// Box number encoded in a file name: `000013.xls` is box 13.
///
/// Leading zeros are stripped from the stem and the rest parsed as an
/// integer, with an all-zero stem meaning box 0. Stems that are not purely
/// decimal digits have no box number; reports render that as a blank cell.
pub fn box_number(file_name: &str) -> Option<u64> {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    numeric_stem(stem)
}

pub fn numeric_stem(stem: &str) -> Option<u64> {
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = stem.trim_start_matches('0');
    if digits.is_empty() {
        return Some(0);
    }

    // Overlong digit runs fall back to "not numeric" instead of wrapping.
    digits.parse().ok()
}

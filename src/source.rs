use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Reads the label list, one label per line. Both LF and CRLF endings are
/// accepted; trailing whitespace at the end of the file and blank lines are
/// dropped.
pub fn read_labels(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|source| Error::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_labels(&content))
}

pub fn parse_labels(content: &str) -> Vec<String> {
    content
        .trim_end()
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            if line.trim().is_empty() {
                debug!("Skipping blank line {}", i + 1);
                None
            } else {
                Some(line.to_string())
            }
        })
        .collect()
}

//! Shared fixtures for integration tests.

use std::path::{Path, PathBuf};

/// Write a tick file with the standard header and the given data lines.
pub fn write_tick_file(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut content = String::from("time,id,price\n");
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    std::fs::write(&path, content).expect("failed to write tick fixture");
    path
}

/// Read an output series back as (timestamp column, value column) pairs.
pub fn read_output(path: &Path) -> Vec<(String, String)> {
    std::fs::read_to_string(path)
        .expect("failed to read output series")
        .lines()
        .map(|line| {
            let mut fields = line.splitn(2, ',');
            (
                fields.next().unwrap_or_default().to_string(),
                fields.next().unwrap_or_default().to_string(),
            )
        })
        .collect()
}

//! Property file parser
//!
//! Reads `key = value` files. `#` starts a comment that runs to the end of
//! the line, both at line start and after a value. Keys keep their case;
//! keys and values are trimmed.

use std::fs;
use std::io;
use std::path::Path;

use tracing::warn;

/// Parse property file content, invoking `handler` with each `(key, value)`
/// pair in file order. Malformed lines are logged and skipped.
pub fn parse_propfile(data: &str, handler: &mut dyn FnMut(&str, &str)) {
    for (index, raw_line) in data.lines().enumerate() {
        let line_no = index + 1;
        let line = match raw_line.find('#') {
            Some(hash) => &raw_line[..hash],
            None => raw_line,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            warn!(line = line_no, "Key without value");
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            warn!(line = line_no, "Value without key");
            continue;
        }
        handler(key, value.trim());
    }
}

/// Read and parse a property file into ordered pairs
pub fn load_propfile(path: impl AsRef<Path>) -> io::Result<Vec<(String, String)>> {
    let data = fs::read_to_string(path)?;
    let mut pairs = Vec::new();
    parse_propfile(&data, &mut |key, value| {
        pairs.push((key.to_string(), value.to_string()));
    });
    Ok(pairs)
}

pub mod due;
pub mod list;
pub mod rate;
pub mod review;
pub mod stats;
pub mod study;

use std::io::BufRead;

use anyhow::Result;

/// Read one trimmed, lowercased line; `None` at end of input
pub fn read_key<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_lowercase()))
}

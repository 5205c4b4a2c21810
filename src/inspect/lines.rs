//! Line counting

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::FsError;

const BUFFER_SIZE: usize = 8192;

/// Counts `\n` terminators in the file at `path` without loading it whole.
pub fn count_lines(path: &Path) -> Result<u64, FsError> {
    let mut file = File::open(path).map_err(|e| FsError::from_io(path, e))?;
    let mut buffer = [0u8; BUFFER_SIZE];
    let mut lines = 0u64;

    loop {
        let n = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(FsError::from_io(path, e)),
        };
        lines += buffer[..n].iter().filter(|&&b| b == b'\n').count() as u64;
    }

    Ok(lines)
}

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{HuffError, Result};

/// Read a whole file into memory
pub fn read_all(path: &Path) -> Result<Vec<u8>> {
    let unavailable = |source| HuffError::InputUnavailable {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(unavailable)?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).map_err(unavailable)?;
    debug!("read {} bytes from {}", buf.len(), path.display());
    Ok(buf)
}

/// Write all bytes to a file, replacing it, or fail
pub fn write_all(path: &Path, buf: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|source| HuffError::OutputUnwritable {
        path: path.to_path_buf(),
        source,
    })?;

    if let Err(source) = file.write_all(buf).and_then(|_| file.flush()) {
        warn!("output {} is incomplete", path.display());
        return Err(HuffError::OutputUnwritable {
            path: path.to_path_buf(),
            source,
        });
    }

    debug!("wrote {} bytes to {}", buf.len(), path.display());
    Ok(())
}

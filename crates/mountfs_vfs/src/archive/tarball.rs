use std::io::{self, Read};

use flate2::read::GzDecoder;
use log::{debug, warn};
use tar::EntryType;

use super::memory::MemoryArchive;
use crate::Result;

/// Unpacks a tar archive into memory
///
/// # Errors
///
/// Will return an error if the archive is corrupted
pub fn read_tar<R: Read>(reader: R) -> Result<MemoryArchive> {
    let mut archive = tar::Archive::new(reader);
    let mut memory = MemoryArchive::new();
    for entry in archive.entries()? {
        let mut entry = entry?;
        let entry_path = entry.path()?.to_string_lossy().into_owned();
        let entry_path = entry_path.trim_start_matches("./");
        if entry_path.is_empty() || entry_path == "." {
            continue;
        }

        let modified = entry
            .header()
            .mtime()
            .ok()
            .and_then(|mtime| i64::try_from(mtime).ok());
        let inserted = match entry.header().entry_type() {
            EntryType::Directory => memory.insert_dir(entry_path, modified),
            EntryType::Regular | EntryType::Continuous => {
                let mut data = Vec::new();
                entry.read_to_end(&mut data)?;
                if data.len() as u64 != entry.size() {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("tar entry '{entry_path}' is truncated"),
                    )
                    .into());
                }
                memory.insert_file(entry_path, data, modified)
            }
            entry_type => {
                debug!("Skipping tar entry '{entry_path}' of type {entry_type:?}");
                Ok(())
            }
        };

        if let Err(e) = inserted {
            warn!("Skipping tar entry '{entry_path}': {e}");
        }
    }

    Ok(memory)
}

/// Unpacks a gzip-compressed tar archive into memory
///
/// # Errors
///
/// Will return an error if the archive is corrupted
pub fn read_tar_gz<R: Read>(reader: R) -> Result<MemoryArchive> {
    read_tar(GzDecoder::new(reader))
}

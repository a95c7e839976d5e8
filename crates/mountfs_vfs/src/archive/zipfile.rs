use std::io::{Cursor, Read};

use log::warn;
use zip::{DateTime, ZipArchive};

use super::memory::MemoryArchive;
use crate::Result;

/// Unpacks a zip archive into memory
///
/// # Errors
///
/// Will return an error if the archive is corrupted
pub fn read_zip(data: &[u8]) -> Result<MemoryArchive> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;
    let mut memory = MemoryArchive::new();
    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        let Some(entry_path) = file.enclosed_name() else {
            warn!("Skipping zip entry '{}' escaping the archive", file.name());
            continue;
        };
        let entry_path = entry_path.to_string_lossy().into_owned();
        let modified = file.last_modified().map(unix_time);

        let inserted = if file.is_dir() {
            memory.insert_dir(&entry_path, modified)
        } else {
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            memory.insert_file(&entry_path, data, modified)
        };

        if let Err(e) = inserted {
            warn!("Skipping zip entry '{entry_path}': {e}");
        }
    }

    Ok(memory)
}

/// Zip timestamps carry no time zone, they are read as UTC
fn unix_time(time: DateTime) -> i64 {
    let days = days_from_civil(
        i64::from(time.year()),
        i64::from(time.month()),
        i64::from(time.day()),
    );
    days * 86_400
        + i64::from(time.hour()) * 3_600
        + i64::from(time.minute()) * 60
        + i64::from(time.second())
}

/// Days between 1970-01-01 and the given proleptic Gregorian date
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    let day_of_year = (153 * ((month + 9) % 12) + 2) / 5 + day - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}

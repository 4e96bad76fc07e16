use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::{BinRecord, RecordError, RecordResult};

/// Loads a record from a file.
pub fn load_record<T: BinRecord, P: AsRef<Path>>(path: P) -> RecordResult<T> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| RecordError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let item = T::read_record(&mut BufReader::new(file))?;
    log::debug!("Loaded {} from {}", T::NAME, path.display());

    Ok(item)
}

/// Saves a record to a file, replacing its content.
pub fn save_record<T: BinRecord, P: AsRef<Path>>(item: &T, path: P) -> RecordResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| RecordError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = BufWriter::new(file);
    item.write_record(&mut writer)?;
    writer.flush()?;
    log::debug!("Saved {} to {}", T::NAME, path.display());

    Ok(())
}

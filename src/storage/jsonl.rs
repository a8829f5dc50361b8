//! JSONL (JSON Lines) files for bulk import and export.
//!
//! Each line is a valid JSON object representing one record.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use super::StorageError;

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Create a new JSONL writer for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Ensure the parent directory exists.
    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    /// Write records, replacing the entire file.
    pub fn write_all(&self, records: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        let mut count = 0;

        for record in records {
            let json = serde_json::to_string(record)?;
            writeln!(writer, "{}", json)?;
            count += 1;
        }

        writer.flush()?;
        info!("Wrote {} records to {:?}", count, self.path);

        Ok(count)
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Create a new JSONL reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Iterate over the file, yielding the 1-based line number with each record.
    ///
    /// Blank lines are skipped. A line that fails to parse yields an error
    /// without ending the iteration.
    pub fn iter(&self) -> Result<JsonlIterator<T>, StorageError> {
        if !self.path.exists() {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", self.path.display()),
            )));
        }

        let file = File::open(&self.path)?;
        debug!("Reading records from {:?}", self.path);

        Ok(JsonlIterator {
            reader: BufReader::new(file),
            line_num: 0,
            _marker: PhantomData,
        })
    }
}

/// Iterator over JSONL file entries.
pub struct JsonlIterator<T> {
    reader: BufReader<File>,
    line_num: usize,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> Iterator for JsonlIterator<T> {
    type Item = (usize, Result<T, StorageError>);

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();

        loop {
            line.clear();
            self.line_num += 1;
            match self.reader.read_line(&mut line) {
                Ok(0) => return None, // EOF
                Ok(_) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let record = serde_json::from_str(&line).map_err(StorageError::Json);
                    return Some((self.line_num, record));
                }
                Err(e) => return Some((self.line_num, Err(StorageError::Io(e)))),
            }
        }
    }
}

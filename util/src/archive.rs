//! CSV archiving functionality
//!
//! An [`Archiver`] writes a stream of flat, serializable records into a CSV file in the session's
//! archive directory, one row per record, with a header row taken from the first record's field
//! names.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::fs::File;
use std::io::Write;
use std::path::Path;
use csv::WriterBuilder;
use serde::Serialize;
use thiserror::Error;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
pub struct Archiver<W: Write = File> {
    writer: csv::Writer<W>,

    num_records: u64
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while archiving.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Cannot create the archive file: {0}")]
    CreateError(std::io::Error),

    #[error("Cannot write the record to the archive: {0}")]
    WriteError(csv::Error),

    #[error("Cannot flush the archive: {0}")]
    FlushError(std::io::Error)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver<File> {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root.
    ///
    /// Any existing file at that path is truncated.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session, path: P
    ) -> Result<Self, ArchiveError> {
        let session_path = session.arch_root.join(path);

        if let Some(parent) = session_path.parent() {
            std::fs::create_dir_all(parent).map_err(ArchiveError::CreateError)?;
        }

        let file = File::create(session_path).map_err(ArchiveError::CreateError)?;

        Ok(Self::from_writer(file))
    }
}

impl<W: Write> Archiver<W> {
    /// Create an archiver writing into any writer.
    pub fn from_writer(writer: W) -> Self {
        let writer = WriterBuilder::new()
            .has_headers(true)
            .from_writer(writer);

        Self {
            writer,
            num_records: 0
        }
    }

    /// Serialise a record into the archive.
    pub fn serialise<T: Serialize>(&mut self, record: T) -> Result<(), ArchiveError> {
        self.writer.serialize(record).map_err(ArchiveError::WriteError)?;
        self.num_records += 1;

        Ok(())
    }

    /// Flush any buffered records to the underlying writer.
    pub fn flush(&mut self) -> Result<(), ArchiveError> {
        self.writer.flush().map_err(ArchiveError::FlushError)
    }

    /// Number of records written so far.
    pub fn num_records(&self) -> u64 {
        self.num_records
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W, ArchiveError> {
        self.writer
            .into_inner()
            .map_err(|e| ArchiveError::FlushError(
                std::io::Error::new(e.error().kind(), e.error().to_string())
            ))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        time_s: f64,
        alt_m: f64
    }

    #[test]
    fn test_archiver_writes_header_and_rows() {
        let mut arch = Archiver::from_writer(Vec::new());

        arch.serialise(Row { time_s: 0.0, alt_m: 0.5 }).unwrap();
        arch.serialise(Row { time_s: 0.1, alt_m: 0.6 }).unwrap();

        assert_eq!(arch.num_records(), 2);

        let out = String::from_utf8(arch.into_inner().unwrap()).unwrap();
        assert_eq!(out, "time_s,alt_m\n0.0,0.5\n0.1,0.6\n");
    }
}

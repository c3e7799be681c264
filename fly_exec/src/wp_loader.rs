//! # Waypoint loader
//!
//! Reads waypoints from delimited text, one waypoint per line as `x, y, z, hover_time`. There is
//! no header. Blank lines and lines starting with `#` are ignored.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::debug;

use crate::plan::Waypoint;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

const NUM_FIELDS: usize = 4;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum WpLoadError {
    #[error("Waypoint file {0:?} not found")]
    FileNotFound(PathBuf),

    #[error("Could not read the waypoint file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed waypoint on line {line}: {reason}")]
    MalformedWaypoint { line: u64, reason: String },

    #[error("The waypoint file contains no waypoints")]
    Empty,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load the waypoints in the given file.
pub fn load_waypoints<P: AsRef<Path>>(path: P) -> Result<Vec<Waypoint>, WpLoadError> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => WpLoadError::FileNotFound(path.to_path_buf()),
        _ => WpLoadError::Io(e)
    })?;

    let waypoints = parse_waypoints(file)?;

    debug!("Loaded {} waypoints from {:?}", waypoints.len(), path);

    Ok(waypoints)
}

/// Parse waypoints from a reader.
pub fn parse_waypoints<R: Read>(reader: R) -> Result<Vec<Waypoint>, WpLoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut waypoints = Vec::new();

    for result in csv_reader.records() {
        let record = result.map_err(from_csv_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        // Whitespace only lines trim down to a single empty field
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }

        if record.len() != NUM_FIELDS {
            return Err(WpLoadError::MalformedWaypoint {
                line,
                reason: format!("expected {} fields, found {}", NUM_FIELDS, record.len())
            });
        }

        let (x_m, y_m, z_m, hover_s): (f64, f64, f64, f64) = record
            .deserialize(None)
            .map_err(|e| WpLoadError::MalformedWaypoint {
                line,
                reason: e.to_string()
            })?;

        waypoints.push(Waypoint::new(x_m, y_m, z_m, hover_s));
    }

    if waypoints.is_empty() {
        return Err(WpLoadError::Empty);
    }

    Ok(waypoints)
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn from_csv_error(e: csv::Error) -> WpLoadError {
    let line = e.position().map(|p| p.line()).unwrap_or(0);

    match e.into_kind() {
        csv::ErrorKind::Io(io) => WpLoadError::Io(io),
        kind => WpLoadError::MalformedWaypoint {
            line,
            reason: format!("{:?}", kind)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse() {
        let text = "0, 0, 0.5, 1\n\n  0,1,0.5,0  \n# comment\n1.0, 1.0, 1.0, 0.5\n";
        let wps = parse_waypoints(text.as_bytes()).unwrap();

        assert_eq!(
            wps,
            vec![
                Waypoint::new(0.0, 0.0, 0.5, 1.0),
                Waypoint::new(0.0, 1.0, 0.5, 0.0),
                Waypoint::new(1.0, 1.0, 1.0, 0.5),
            ]
        );
    }

    #[test]
    fn test_malformed() {
        match parse_waypoints("0,0,0,0\n1,2,3\n".as_bytes()) {
            Err(WpLoadError::MalformedWaypoint { line, .. }) => assert_eq!(line, 2),
            r => panic!("Expected malformed waypoint, got {:?}", r),
        }

        match parse_waypoints("0,0,zero,0\n".as_bytes()) {
            Err(WpLoadError::MalformedWaypoint { line, .. }) => assert_eq!(line, 1),
            r => panic!("Expected malformed waypoint, got {:?}", r),
        }
    }

    #[test]
    fn test_empty() {
        assert!(matches!(parse_waypoints("".as_bytes()), Err(WpLoadError::Empty)));
        assert!(matches!(parse_waypoints("\n\n".as_bytes()), Err(WpLoadError::Empty)));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_waypoints("definitely/not/a/waypoint/file.txt"),
            Err(WpLoadError::FileNotFound(_))
        ));
    }
}

//! # Dry run and archiving sinks
//!
//! [`DryRunSink`] stands in for the flight controller when no vehicle is connected.
//! [`ArchivedSink`] records every demand sent to any other sink into a CSV archive.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fs::File;
use std::io::Write;

use comms_if::eqpt::fc::HoverSetpoint;
use log::{trace, warn};
use serde::Serialize;
use util::archive::{Archiver, ArchiveError};
use util::session::{self, Session};

use crate::seq::{SetpointSink, SinkError};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Archive file name, relative to the session's archive directory.
pub const SETPOINTS_ARCHIVE: &str = "setpoints.csv";

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Sink which accepts everything and sends nothing.
#[derive(Debug, Default)]
pub struct DryRunSink {
    pub num_setpoints: u64,

    pub num_stops: u64,
}

/// Decorator which archives each demand before forwarding it to the inner sink.
///
/// Archive failures are logged once and don't interrupt the flight.
pub struct ArchivedSink<S, W: Write = File> {
    inner: S,

    archiver: Archiver<W>,

    archive_failed: bool,
}

#[derive(Serialize)]
struct SetpointRecord {
    elapsed_s: f64,
    stop: bool,
    fwd_vel_ms: f64,
    side_vel_ms: f64,
    yaw_rate_degs: f64,
    alt_m: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl DryRunSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SetpointSink for DryRunSink {
    fn send_setpoint(&mut self, setpoint: &HoverSetpoint) -> Result<(), SinkError> {
        trace!("Dry run setpoint {}: {:?}", self.num_setpoints, setpoint);
        self.num_setpoints += 1;
        Ok(())
    }

    fn send_stop(&mut self) -> Result<(), SinkError> {
        trace!("Dry run stop");
        self.num_stops += 1;
        Ok(())
    }
}

impl<S: SetpointSink> ArchivedSink<S, File> {
    /// Archive into the session's setpoints archive.
    pub fn new(inner: S, session: &Session) -> Result<Self, ArchiveError> {
        Ok(Self::with_archiver(inner, Archiver::from_path(session, SETPOINTS_ARCHIVE)?))
    }
}

impl<S: SetpointSink, W: Write> ArchivedSink<S, W> {
    pub fn with_archiver(inner: S, archiver: Archiver<W>) -> Self {
        Self {
            inner,
            archiver,
            archive_failed: false,
        }
    }

    pub fn num_records(&self) -> u64 {
        self.archiver.num_records()
    }

    /// Flush the archive and return the inner sink.
    pub fn into_inner(mut self) -> Result<S, ArchiveError> {
        self.archiver.flush()?;
        Ok(self.inner)
    }

    fn archive(&mut self, setpoint: &HoverSetpoint, stop: bool) {
        let record = SetpointRecord {
            elapsed_s: session::get_elapsed_seconds(),
            stop,
            fwd_vel_ms: setpoint.fwd_vel_ms,
            side_vel_ms: setpoint.side_vel_ms,
            yaw_rate_degs: setpoint.yaw_rate_degs,
            alt_m: setpoint.alt_m,
        };

        if let Err(e) = self.archiver.serialise(record) {
            if !self.archive_failed {
                warn!("Could not archive setpoint, further failures won't be logged: {}", e);
                self.archive_failed = true;
            }
        }
    }
}

impl<S: SetpointSink, W: Write> SetpointSink for ArchivedSink<S, W> {
    fn send_setpoint(&mut self, setpoint: &HoverSetpoint) -> Result<(), SinkError> {
        self.archive(setpoint, false);
        self.inner.send_setpoint(setpoint)
    }

    fn send_stop(&mut self) -> Result<(), SinkError> {
        self.archive(&HoverSetpoint::default(), true);
        self.inner.send_stop()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::plan::{plan, PlanParams, Waypoint};
    use crate::seq::{Sequencer, SeqParams, VirtualClock};

    #[test]
    fn test_dry_run_flight() {
        let plan = plan(
            vec![Waypoint::new(0.0, 0.0, 0.5, 0.0), Waypoint::new(1.0, 0.0, 0.5, 0.0)],
            &PlanParams::default()
        ).unwrap();

        let mut sink = ArchivedSink::with_archiver(
            DryRunSink::new(),
            Archiver::from_writer(Vec::new())
        );
        let mut clock = VirtualClock::new();
        let mut seq = Sequencer::new(SeqParams::default()).unwrap();

        let report = seq.execute(&plan, &mut sink, &mut clock).unwrap();

        // One record per setpoint plus the stop
        assert_eq!(sink.num_records(), report.num_setpoints + 1);

        let dry = sink.into_inner().unwrap();
        assert_eq!(dry.num_setpoints, report.num_setpoints);
        assert_eq!(dry.num_stops, 1);
    }
}

//! # Sequencer module
//!
//! Executes a [`FlightPlan`] by emitting a stream of hover setpoints at a fixed tick period. The
//! Sequencer is a one-shot state machine: it takes off, flies each leg in order, returns to the
//! end heading, lands and stops the motors. Any failure to deliver a setpoint aborts the flight.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod motion;
mod params;
mod sink;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, error, info};
use serde::Serialize;

use crate::plan::{FlightPlan, Leg};

pub use params::*;
pub use sink::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Executes a single flight plan.
#[derive(Debug)]
pub struct Sequencer {
    params: SeqParams,

    state: SeqState,

    /// Every state entered, in order, starting with `Idle`.
    history: Vec<SeqState>,

    /// Altitude the vehicle is currently commanded to.
    ///
    /// Units: meters
    current_alt_m: f64,

    num_setpoints: u64,

    /// Set once a stop has been sent, successfully or not.
    stop_attempted: bool,
}

/// Summary of a completed flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeqReport {
    /// Total number of setpoints sent.
    pub num_setpoints: u64,

    /// Time spent in flight, as the number of ticks multiplied by the tick period.
    ///
    /// Units: seconds
    pub flight_time_s: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// States of the Sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeqState {
    Idle,
    Hovering(HoverKind),
    Rotating(RotateKind),
    Translating { leg: usize },
    Stopped,
    Aborted,
}

/// Reason for a hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HoverKind {
    TakeOff,

    /// Dwell at the given waypoint.
    Waypoint(usize),

    /// Settle after a rotation.
    Settle,

    Land,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RotateKind {
    /// Turn to face the given leg.
    Leg(usize),

    /// Turn back to the end heading after the last leg.
    Return,
}

/// Errors that can occur during sequencing.
#[derive(Debug, thiserror::Error)]
pub enum SeqError {
    #[error("The sequencer has already executed a plan (state {0:?})")]
    AlreadyExecuted(SeqState),

    #[error("Invalid sequencer parameters: {0}")]
    InvalidParams(&'static str),

    #[error("Setpoint sink failure, flight aborted: {0}")]
    SinkFailure(#[from] SinkError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Sequencer {
    /// Create a new sequencer in the `Idle` state.
    pub fn new(params: SeqParams) -> Result<Self, SeqError> {
        params.validate()?;

        Ok(Self {
            params,
            state: SeqState::Idle,
            history: vec![SeqState::Idle],
            current_alt_m: 0.0,
            num_setpoints: 0,
            stop_attempted: false,
        })
    }

    pub fn state(&self) -> SeqState {
        self.state
    }

    /// Every state the sequencer has been in, oldest first.
    pub fn history(&self) -> &[SeqState] {
        &self.history
    }

    pub fn params(&self) -> &SeqParams {
        &self.params
    }

    /// Fly the plan, blocking until the vehicle has stopped or the flight is aborted.
    ///
    /// May only be called once.
    pub fn execute<S, C>(
        &mut self,
        plan: &FlightPlan,
        sink: &mut S,
        clock: &mut C
    ) -> Result<SeqReport, SeqError>
    where
        S: SetpointSink,
        C: Clock
    {
        if self.state != SeqState::Idle {
            return Err(SeqError::AlreadyExecuted(self.state));
        }

        info!("Executing flight plan with {} legs", plan.legs().len());

        match self.run(plan, sink, clock) {
            Ok(()) => {
                let report = self.report();
                info!(
                    "Flight complete, {} setpoints sent over {:.1} s",
                    report.num_setpoints,
                    report.flight_time_s
                );
                Ok(report)
            },
            Err(e) => {
                error!("Flight aborted in state {:?}: {}", self.state, e);
                self.transition(SeqState::Aborted);

                // One attempt to stop the motors, unless the failure was the stop itself
                if !self.stop_attempted {
                    self.stop_attempted = true;
                    match sink.send_stop() {
                        Ok(()) => info!("Vehicle stopped after abort"),
                        Err(stop_err) => error!(
                            "Could not stop the vehicle after abort: {}", stop_err
                        )
                    }
                }

                Err(e)
            }
        }
    }

    fn run<S, C>(&mut self, plan: &FlightPlan, sink: &mut S, clock: &mut C) -> Result<(), SeqError>
    where
        S: SetpointSink,
        C: Clock
    {
        // ---- TAKE OFF ----

        self.transition(SeqState::Hovering(HoverKind::TakeOff));
        self.hover(sink, clock, self.params.std_hover_height_m, self.params.std_hover_time_s)?;

        if let Some(first) = plan.waypoints().first() {
            self.current_alt_m = self.params.alt_of(first.z_m);
        }

        // ---- LEGS ----

        for leg in plan.legs() {
            self.fly_leg(leg, sink, clock)?;
        }

        // ---- RETURN ----

        let final_index = plan.waypoints().len().saturating_sub(1);
        self.current_alt_m = self.params.alt_of(plan.final_z_m());

        if let Some(hover_s) = plan.final_hover_s() {
            self.transition(SeqState::Hovering(HoverKind::Waypoint(final_index)));
            self.hover(sink, clock, self.current_alt_m, hover_s)?;
        }

        if let Some(angle_deg) = plan.return_rotation_deg() {
            self.transition(SeqState::Rotating(RotateKind::Return));
            self.rotate(sink, clock, angle_deg)?;
            self.settle(sink, clock)?;
        }

        // ---- LAND ----

        self.transition(SeqState::Hovering(HoverKind::Land));
        self.hover(sink, clock, self.params.land_height_m, self.params.land_time_s)?;

        self.stop_attempted = true;
        sink.send_stop()?;
        self.transition(SeqState::Stopped);

        Ok(())
    }

    fn fly_leg<S, C>(&mut self, leg: &Leg, sink: &mut S, clock: &mut C) -> Result<(), SeqError>
    where
        S: SetpointSink,
        C: Clock
    {
        debug!(
            "Leg {}: {:.3} m at heading {} deg",
            leg.index,
            leg.distance_m,
            leg.heading_deg
        );

        if let Some(hover_s) = leg.hover_s {
            self.transition(SeqState::Hovering(HoverKind::Waypoint(leg.index)));
            self.hover(sink, clock, self.current_alt_m, hover_s)?;
        }

        if let Some(angle_deg) = leg.rotation_deg {
            self.transition(SeqState::Rotating(RotateKind::Leg(leg.index)));
            self.rotate(sink, clock, angle_deg)?;
            self.settle(sink, clock)?;
        }

        let dest_alt_m = self.params.alt_of(leg.dest_z_m);

        if let Some(translation) = leg.translation {
            self.transition(SeqState::Translating { leg: leg.index });
            info!(
                "Translating at {:.3} m/s for {} s",
                translation.fwd_velocity_ms,
                translation.travel_time_s
            );
            self.num_setpoints += motion::translate(
                &self.params,
                sink,
                clock,
                translation.fwd_velocity_ms,
                translation.travel_time_s,
                self.current_alt_m,
                dest_alt_m
            )? as u64;
        }

        self.current_alt_m = dest_alt_m;

        Ok(())
    }

    fn hover<S, C>(
        &mut self,
        sink: &mut S,
        clock: &mut C,
        alt_m: f64,
        duration_s: f64
    ) -> Result<(), SeqError>
    where
        S: SetpointSink,
        C: Clock
    {
        info!("Hovering at {:.2} m for {:.1} s", alt_m, duration_s);
        self.num_setpoints += motion::hover(&self.params, sink, clock, alt_m, duration_s)? as u64;
        Ok(())
    }

    fn rotate<S, C>(&mut self, sink: &mut S, clock: &mut C, angle_deg: f64) -> Result<(), SeqError>
    where
        S: SetpointSink,
        C: Clock
    {
        info!("Rotating {:.1} deg", angle_deg);
        self.num_setpoints += motion::rotate(
            &self.params,
            sink,
            clock,
            angle_deg,
            self.current_alt_m
        )? as u64;
        Ok(())
    }

    fn settle<S, C>(&mut self, sink: &mut S, clock: &mut C) -> Result<(), SeqError>
    where
        S: SetpointSink,
        C: Clock
    {
        self.transition(SeqState::Hovering(HoverKind::Settle));
        self.hover(sink, clock, self.current_alt_m, self.params.std_hover_time_s)
    }

    fn transition(&mut self, new_state: SeqState) {
        debug!("{:?} -> {:?}", self.state, new_state);
        self.state = new_state;
        self.history.push(new_state);
    }

    fn report(&self) -> SeqReport {
        SeqReport {
            num_setpoints: self.num_setpoints,
            flight_time_s: self.num_setpoints as f64 * self.params.tick_period_s,
        }
    }
}

// ---------------------------------------------------------------------------
// TEST SUPPORT
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod test_sink {
    use super::*;
    use comms_if::eqpt::fc::HoverSetpoint;

    /// Sink which records everything it's sent, optionally failing after a number of setpoints.
    ///
    /// Stops are counted whether or not they fail.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub setpoints: Vec<HoverSetpoint>,
        pub num_stops: usize,
        pub fail_after: Option<usize>,
        pub fail_stop: bool,
    }

    impl SetpointSink for RecordingSink {
        fn send_setpoint(&mut self, setpoint: &HoverSetpoint) -> Result<(), SinkError> {
            if let Some(n) = self.fail_after {
                if self.setpoints.len() >= n {
                    return Err(SinkError::NotConnected);
                }
            }
            self.setpoints.push(*setpoint);
            Ok(())
        }

        fn send_stop(&mut self) -> Result<(), SinkError> {
            self.num_stops += 1;
            if self.fail_stop {
                return Err(SinkError::Rejected(String::from("stop refused")));
            }
            Ok(())
        }
    }
}

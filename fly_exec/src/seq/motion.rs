//! Primitive motions
//!
//! Each primitive emits a run of identical (or linearly varying) setpoints, one per tick, waiting
//! one tick period after each. They return the number of setpoints emitted.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::fc::HoverSetpoint;
use log::trace;
use util::time::{ticks_covering, ticks_in};

use super::{Clock, SeqParams, SetpointSink, SinkError};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Hold position at `alt_m` for `duration_s`.
///
/// The number of ticks is the smallest that covers the duration, so a zero duration emits
/// nothing.
pub fn hover<S, C>(
    params: &SeqParams,
    sink: &mut S,
    clock: &mut C,
    alt_m: f64,
    duration_s: f64
) -> Result<u32, SinkError>
where
    S: SetpointSink,
    C: Clock
{
    let ticks = ticks_covering(duration_s, params.tick_period_s);
    let setpoint = HoverSetpoint::hold(alt_m);

    for _ in 0..ticks {
        emit(params, sink, clock, &setpoint)?;
    }

    Ok(ticks)
}

/// Rotate on the spot by `angle_deg` (positive anti-clockwise), taking `rotate_time_s`.
pub fn rotate<S, C>(
    params: &SeqParams,
    sink: &mut S,
    clock: &mut C,
    angle_deg: f64,
    alt_m: f64
) -> Result<u32, SinkError>
where
    S: SetpointSink,
    C: Clock
{
    let ticks = ticks_in(params.rotate_time_s, params.tick_period_s);
    let setpoint = HoverSetpoint {
        yaw_rate_degs: angle_deg / params.rotate_time_s,
        alt_m,
        ..Default::default()
    };

    for _ in 0..ticks {
        emit(params, sink, clock, &setpoint)?;
    }

    Ok(ticks)
}

/// Fly forwards at `fwd_vel_ms` for `travel_time_s`, climbing linearly from `start_alt_m` to
/// `end_alt_m`.
///
/// The first setpoint is already one climb step above the start, the last one is at the end
/// altitude.
pub fn translate<S, C>(
    params: &SeqParams,
    sink: &mut S,
    clock: &mut C,
    fwd_vel_ms: f64,
    travel_time_s: u32,
    start_alt_m: f64,
    end_alt_m: f64
) -> Result<u32, SinkError>
where
    S: SetpointSink,
    C: Clock
{
    let ticks = ticks_in(travel_time_s as f64, params.tick_period_s);

    if ticks == 0 {
        return Ok(0);
    }

    let climb_m = (end_alt_m - start_alt_m) / ticks as f64;
    let mut setpoint = HoverSetpoint {
        fwd_vel_ms,
        alt_m: start_alt_m,
        ..Default::default()
    };

    for _ in 0..ticks {
        setpoint.alt_m += climb_m;
        emit(params, sink, clock, &setpoint)?;
    }

    Ok(ticks)
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn emit<S, C>(
    params: &SeqParams,
    sink: &mut S,
    clock: &mut C,
    setpoint: &HoverSetpoint
) -> Result<(), SinkError>
where
    S: SetpointSink,
    C: Clock
{
    trace!("{:?}", setpoint);
    sink.send_setpoint(setpoint)?;
    clock.wait(params.tick_period_s);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::seq::test_sink::RecordingSink;
    use crate::seq::VirtualClock;
    use proptest::prelude::*;

    #[test]
    fn test_hover_ticks() {
        let params = SeqParams::default();
        let mut sink = RecordingSink::default();
        let mut clock = VirtualClock::new();

        assert_eq!(hover(&params, &mut sink, &mut clock, 0.5, 0.0).unwrap(), 0);
        assert!(sink.setpoints.is_empty());

        assert_eq!(hover(&params, &mut sink, &mut clock, 0.5, 0.35).unwrap(), 4);
        assert_eq!(sink.setpoints.len(), 4);
        assert!(sink.setpoints.iter().all(|sp| *sp == HoverSetpoint::hold(0.5)));
        assert_eq!(clock.num_waits, 4);

        assert_eq!(hover(&params, &mut sink, &mut clock, 0.5, 1.1).unwrap(), 11);
    }

    #[test]
    fn test_rotate() {
        let params = SeqParams::default();
        let mut sink = RecordingSink::default();
        let mut clock = VirtualClock::new();

        assert_eq!(rotate(&params, &mut sink, &mut clock, 90.0, 0.7).unwrap(), 20);
        assert_eq!(sink.setpoints.len(), 20);

        for sp in sink.setpoints.iter() {
            assert_eq!(sp.yaw_rate_degs, 45.0);
            assert_eq!(sp.fwd_vel_ms, 0.0);
            assert_eq!(sp.alt_m, 0.7);
        }

        assert!((clock.elapsed_s - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_translate_climb() {
        let params = SeqParams::default();
        let mut sink = RecordingSink::default();
        let mut clock = VirtualClock::new();

        let ticks = translate(&params, &mut sink, &mut clock, 0.5, 2, 0.0, 1.0).unwrap();
        assert_eq!(ticks, 20);

        assert!((sink.setpoints[0].alt_m - 0.05).abs() < 1e-9);
        assert!((sink.setpoints[19].alt_m - 1.0).abs() < 1e-6);
        assert!(sink.setpoints.iter().all(|sp| sp.fwd_vel_ms == 0.5));
    }

    #[test]
    fn test_translate_zero_time() {
        let params = SeqParams::default();
        let mut sink = RecordingSink::default();
        let mut clock = VirtualClock::new();

        assert_eq!(translate(&params, &mut sink, &mut clock, 0.5, 0, 0.0, 1.0).unwrap(), 0);
        assert!(sink.setpoints.is_empty());
    }

    proptest! {
        #[test]
        fn translate_ends_at_target(
            travel_time_s in 1u32..60,
            start in -5.0f64..5.0,
            end in -5.0f64..5.0
        ) {
            let params = SeqParams::default();
            let mut sink = RecordingSink::default();
            let mut clock = VirtualClock::new();

            translate(&params, &mut sink, &mut clock, 0.5, travel_time_s, start, end).unwrap();

            let last = sink.setpoints.last().unwrap();
            prop_assert!((last.alt_m - end).abs() < 1e-6);
            prop_assert!(sink.setpoints.iter().all(|sp| sp.is_finite()));
        }
    }
}

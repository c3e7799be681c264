//! Capabilities the Sequencer depends on: somewhere to send setpoints, and a way to wait.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::thread;
use std::time::{Duration, Instant};

use comms_if::eqpt::fc::HoverSetpoint;
use log::warn;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A consumer of hover setpoints, normally the vehicle's flight controller.
///
/// Every call either delivers the demand or returns an error. Implementations must not retry
/// internally, the Sequencer treats any error as fatal.
pub trait SetpointSink {
    /// Send a single setpoint to the vehicle.
    fn send_setpoint(&mut self, setpoint: &HoverSetpoint) -> Result<(), SinkError>;

    /// Command the vehicle to cut its motors.
    fn send_stop(&mut self) -> Result<(), SinkError>;
}

/// A blocking source of time.
pub trait Clock {
    /// Block for one tick of `dt_s` seconds.
    fn wait(&mut self, dt_s: f64);
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Real time clock which sleeps the calling thread.
///
/// Consecutive waits are scheduled against a fixed-period deadline, so time spent sending a
/// setpoint doesn't stretch the tick. If a deadline has already passed the schedule is reset to
/// the current time.
#[derive(Debug, Default)]
pub struct SleepClock {
    deadline: Option<Instant>,

    num_overruns: u64,
}

/// Clock which advances instantly, accumulating the time it would have waited.
#[derive(Debug, Default, Clone)]
pub struct VirtualClock {
    /// Total time waited.
    ///
    /// Units: seconds
    pub elapsed_s: f64,

    /// Number of calls to `wait`.
    pub num_waits: u64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors a setpoint sink can raise.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("The link to the vehicle is not connected")]
    NotConnected,

    #[error("The vehicle rejected the demand: {0}")]
    Rejected(String),

    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SleepClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ticks which started after their deadline had already passed.
    pub fn num_overruns(&self) -> u64 {
        self.num_overruns
    }
}

impl Clock for SleepClock {
    fn wait(&mut self, dt_s: f64) {
        if !dt_s.is_finite() || dt_s <= 0.0 {
            return;
        }

        let period = Duration::from_secs_f64(dt_s);
        let now = Instant::now();

        let deadline = match self.deadline {
            Some(d) => d + period,
            None => now + period
        };

        let deadline = match deadline.checked_duration_since(now) {
            Some(d) => {
                thread::sleep(d);
                deadline
            },
            None => {
                warn!(
                    "Tick overran by {:.06} s",
                    now.duration_since(deadline).as_secs_f64()
                );
                self.num_overruns += 1;
                now
            }
        };

        self.deadline = Some(deadline);
    }
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for VirtualClock {
    fn wait(&mut self, dt_s: f64) {
        self.elapsed_s += dt_s;
        self.num_waits += 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_virtual_clock_accumulates() {
        let mut clock = VirtualClock::new();

        for _ in 0..10 {
            clock.wait(0.1);
        }

        assert_eq!(clock.num_waits, 10);
        assert!((clock.elapsed_s - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sleep_clock_keeps_period() {
        let mut clock = SleepClock::new();
        let start = Instant::now();

        for _ in 0..5 {
            clock.wait(0.01);
        }

        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_sleep_clock_ignores_bad_period() {
        let mut clock = SleepClock::new();
        clock.wait(-1.0);
        clock.wait(std::f64::NAN);
        assert_eq!(clock.num_overruns(), 0);
    }
}

//! Main flight executable entry point.
//!
//! # Architecture
//!
//! The flight is executed once, start to finish:
//!
//!     - Load parameters and the waypoint file
//!     - Plan the flight and save the plan into the session
//!     - Connect to the flight controller and reset its estimator (skipped for dry runs)
//!     - Sequence the flight, archiving every setpoint
//!     - Disconnect

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::path::PathBuf;
use log::{info, warn};
use color_eyre::{Report, eyre::WrapErr};
use structopt::StructOpt;

// Internal
use comms_if::net::zmq;
use fly_lib::{
    dry_run::{ArchivedSink, DryRunSink},
    fc_client::FcClient,
    params::FlyExecParams,
    plan::{self, PlanParams},
    seq::{Sequencer, SeqParams, SleepClock, VirtualClock},
    wp_loader
};
use util::{
    logger::{logger_init, LevelFilter},
    session::Session
};

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

/// Fly a vehicle through a list of waypoints.
#[derive(Debug, StructOpt)]
#[structopt(name = "fly_exec")]
struct Opt {
    /// Waypoint file, one `x, y, z, hover_time` waypoint per line.
    #[structopt(parse(from_os_str))]
    waypoints: PathBuf,

    /// Sequence the flight without connecting to a vehicle.
    #[structopt(long)]
    dry_run: bool,

    /// Minimum log level, must be at least as verbose as info.
    #[structopt(long, default_value = "debug")]
    log_level: LevelFilter,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    // ---- EARLY INITIALISATION ----

    color_eyre::install()?;

    let opt = Opt::from_args();

    // Initialise session
    let session = Session::new(
        "fly_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(opt.log_level, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Waypoint Flight Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: FlyExecParams = util::params::load("fly_exec.toml")
        .wrap_err("Could not load exec params")?;
    let plan_params: PlanParams = util::params::load("plan.toml")
        .wrap_err("Could not load planner params")?;
    let seq_params: SeqParams = util::params::load("seq.toml")
        .wrap_err("Could not load sequencer params")?;

    info!("Exec parameters loaded");

    // ---- PLAN ----

    let waypoints = wp_loader::load_waypoints(&opt.waypoints)
        .wrap_err("Could not load the waypoints")?;

    let plan = plan::plan(waypoints, &plan_params)
        .wrap_err("Could not plan the flight")?;

    info!("Flight plan:\n{}", plan);

    session.save("plan.json", &plan)
        .wrap_err("Could not save the flight plan")?;

    let mut sequencer = Sequencer::new(seq_params)
        .wrap_err("Could not create the sequencer")?;

    // ---- FLY ----

    let result = if opt.dry_run {
        warn!("Dry run, no demands will be sent to the vehicle");

        let mut sink = ArchivedSink::new(DryRunSink::new(), &session)
            .wrap_err("Could not create the setpoints archive")?;
        let mut clock = VirtualClock::new();

        let result = sequencer.execute(&plan, &mut sink, &mut clock);

        let dry = sink.into_inner().wrap_err("Could not flush the setpoints archive")?;
        info!(
            "Dry run sent {} setpoints over {:.1} virtual seconds",
            dry.num_setpoints,
            clock.elapsed_s
        );

        result
    }
    else {
        let ctx = zmq::Context::new();
        let mut clock = SleepClock::new();

        let mut client = FcClient::connect(&ctx, &exec_params)
            .wrap_err("Could not connect to the flight controller")?;

        client.reset_estimator(&mut clock)
            .wrap_err("Could not reset the flight controller's estimator")?;

        let mut sink = ArchivedSink::new(client, &session)
            .wrap_err("Could not create the setpoints archive")?;

        let result = sequencer.execute(&plan, &mut sink, &mut clock);

        let client = sink.into_inner().wrap_err("Could not flush the setpoints archive")?;
        client.disconnect();

        if clock.num_overruns() > 0 {
            warn!("{} ticks overran their deadline", clock.num_overruns());
        }

        result
    };

    let report = result.wrap_err("Flight failed")?;

    session.save("report.json", &report)
        .wrap_err("Could not save the flight report")?;

    info!("End of execution");

    session.exit();

    Ok(())
}

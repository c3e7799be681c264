//! # Simulated Flight Controller Executable
//!
//! Stands in for the vehicle's flight controller. Demands from the flight executable are
//! acknowledged and integrated into a simple kinematic model of the vehicle, whose pose is
//! logged as the flight progresses.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Flight controller server abstraction.
mod fc_server;

/// Parameters for the simulated flight controller.
mod params;

/// Kinematic vehicle model.
mod vehicle;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use comms_if::{eqpt::fc::FcDemsResponse, net::zmq};
use log::{info, warn, trace};
use color_eyre::{Result, eyre::WrapErr};

// Internal
use fc_server::{FcServer, DemsRecv};
use params::FcSimExecParams;
use vehicle::SimVehicle;
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "fc_sim_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Simulated Flight Controller Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let params: FcSimExecParams = util::params::load("fc_sim_exec.toml")
        .wrap_err("Could not load parameters")?;

    info!("Parameters loaded");

    // ---- SERVER INITIALISATION ----

    let ctx = zmq::Context::new();
    let mut server = FcServer::new(&ctx, &params)
        .wrap_err("Failed to initialise server")?;
    let mut vehicle = SimVehicle::new(params.setpoint_period_s);

    info!("Server listening on {}", params.demands_endpoint);

    // ---- MAIN LOOP ----

    info!("Initialisation complete, entering main loop in safe mode");

    let mut safe_mode = true;

    loop {
        let response = match server.get_demands() {
            DemsRecv::Dems(d) => {
                if safe_mode {
                    info!("Recieved valid demand, exiting safe mode");
                    safe_mode = false;
                }
                trace!("Demands: {:?}", d);
                vehicle.apply(&d)
            },
            DemsRecv::Malformed => FcDemsResponse::DemsInvalid,
            DemsRecv::Timeout => {
                if !safe_mode {
                    warn!("No demands recieved, entering safe mode");
                    safe_mode = true;
                }
                continue
            }
        };

        if let Err(e) = server.send_dems_response(&response) {
            warn!("Couldn't send response to client, entering safe mode: {}", e);
            safe_mode = true;
        }
    }
}

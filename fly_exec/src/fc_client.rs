//! # Flight Controller Client
//!
//! This module provides the link to the vehicle's flight controller. Demands are sent over a REQ
//! socket and every demand must be acknowledged before the next one is sent.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    net::{zmq, LinkSocket, SocketOptions, LinkSocketError},
    eqpt::fc::{FcDems, FcDemsResponse, HoverSetpoint}
};
use log::{debug, info};

use crate::params::FlyExecParams;
use crate::seq::{Clock, SetpointSink, SinkError};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Flight controller parameter which resets the state estimator when set to "1".
const ESTIMATOR_RESET_PARAM: &str = "kalman.resetEstimation";

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct FcClient {
    dems_socket: LinkSocket,

    estimator_reset_pulse_s: f64,

    estimator_settle_s: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum FcClientError {

    #[error("Socket error: {0}")]
    SocketError(LinkSocketError),

    #[error("The client is not connected to the flight controller")]
    NotConnected,

    #[error("Could not send demands to the flight controller: {0}")]
    SendError(zmq::Error),

    #[error("Could not recieve a message from the flight controller: {0}")]
    RecvError(zmq::Error),

    #[error("Could not serialize the demands: {0}")]
    SerializationError(serde_json::Error),

    #[error("Could not deserialize the response from the flight controller: {0}")]
    DeserializeError(serde_json::Error),

    #[error("The flight controller did not accept the demands: {0:?}")]
    DemsRejected(FcDemsResponse),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl FcClient {
    /// Connect to the flight controller.
    ///
    /// Blocks until the link is up, or returns an error once the connect timeout expires.
    pub fn connect(ctx: &zmq::Context, params: &FlyExecParams) -> Result<Self, FcClientError> {

        let dems_socket_options = SocketOptions {
            block_on_first_connect: true,
            connect_timeout: params.connect_timeout_ms,
            heartbeat_ivl: 500,
            heartbeat_timeout: 1000,
            linger: 1,
            recv_timeout: params.recv_timeout_ms,
            send_timeout: params.send_timeout_ms,
            req_correlate: true,
            req_relaxed: true,
            ..Default::default()
        };

        let dems_socket = LinkSocket::new(
            ctx,
            zmq::REQ,
            dems_socket_options,
            &params.fc_endpoint
        ).map_err(FcClientError::SocketError)?;

        info!("Connected to flight controller at {}", params.fc_endpoint);

        Ok(Self {
            dems_socket,
            estimator_reset_pulse_s: params.estimator_reset_pulse_s,
            estimator_settle_s: params.estimator_settle_s,
        })
    }

    /// Reset the flight controller's state estimator and wait for it to settle.
    pub fn reset_estimator<C: Clock>(&mut self, clock: &mut C) -> Result<(), FcClientError> {
        info!("Resetting state estimator");

        self.set_param(ESTIMATOR_RESET_PARAM, "1")?;
        clock.wait(self.estimator_reset_pulse_s);
        self.set_param(ESTIMATOR_RESET_PARAM, "0")?;
        clock.wait(self.estimator_settle_s);

        debug!("Estimator settled");

        Ok(())
    }

    /// Send demands to the flight controller.
    ///
    /// If the flight controller acknowledges the demands within the configured timeout its
    /// response is returned.
    pub fn send_demands(&mut self, demands: &FcDems) -> Result<FcDemsResponse, FcClientError> {
        if !self.dems_socket.connected() {
            return Err(FcClientError::NotConnected)
        }

        let dems_str = serde_json::to_string(demands)
            .map_err(FcClientError::SerializationError)?;

        self.dems_socket.send(&dems_str, 0)
            .map_err(FcClientError::SendError)?;

        let msg = self.dems_socket.recv_msg(0)
            .map_err(FcClientError::RecvError)?;

        serde_json::from_str(msg.as_str().unwrap_or(""))
            .map_err(FcClientError::DeserializeError)
    }

    /// Close the link.
    pub fn disconnect(self) {
        info!("Disconnecting from flight controller");
    }

    fn set_param(&mut self, name: &str, value: &str) -> Result<(), FcClientError> {
        let dems = FcDems::SetParam {
            name: name.into(),
            value: value.into()
        };

        self.send_ok(&dems)
    }

    fn send_ok(&mut self, demands: &FcDems) -> Result<(), FcClientError> {
        match self.send_demands(demands)? {
            FcDemsResponse::DemsOk => Ok(()),
            r => Err(FcClientError::DemsRejected(r))
        }
    }
}

impl SetpointSink for FcClient {
    fn send_setpoint(&mut self, setpoint: &HoverSetpoint) -> Result<(), SinkError> {
        self.send_ok(&FcDems::Hover(*setpoint)).map_err(SinkError::from)
    }

    fn send_stop(&mut self) -> Result<(), SinkError> {
        self.send_ok(&FcDems::Stop).map_err(SinkError::from)
    }
}

impl From<FcClientError> for SinkError {
    fn from(e: FcClientError) -> Self {
        match e {
            FcClientError::NotConnected => SinkError::NotConnected,
            FcClientError::DemsRejected(r) => SinkError::Rejected(format!("{:?}", r)),
            e => SinkError::Transport(Box::new(e))
        }
    }
}

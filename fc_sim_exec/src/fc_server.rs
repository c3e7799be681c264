//! # Flight Controller Server Module
//!
//! This module abstracts over the networking side of the simulated flight controller. The server
//! accepts a connection from the client in the flight executable and answers every demand it
//! receives.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    net::{zmq, LinkSocket, SocketOptions, LinkSocketError},
    eqpt::fc::{FcDems, FcDemsResponse}
};
use log::warn;

use crate::params::FcSimExecParams;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct FcServer {

    /// REP socket which accepts demands from the client
    dems_socket: LinkSocket,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Outcome of waiting for a demand.
#[derive(Debug)]
pub enum DemsRecv {
    /// A valid demand, which must be answered.
    Dems(FcDems),

    /// A message was received but couldn't be understood. It must still be answered.
    Malformed,

    /// Nothing arrived within the receive timeout.
    Timeout,
}

/// Errors which can occur in the [`FcServer`]
#[derive(thiserror::Error, Debug)]
pub enum FcServerError {
    #[error("Socket error: {0}")]
    SocketError(#[from] LinkSocketError),

    #[error("Could not serialize the response: {0}")]
    SerializationError(serde_json::Error),

    #[error("Could not send data to the client: {0}")]
    SendError(zmq::Error)
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl FcServer {

    /// Create a new server bound to the demands endpoint.
    ///
    /// This function will not wait for a connection from the client before returning.
    pub fn new(ctx: &zmq::Context, params: &FcSimExecParams) -> Result<Self, FcServerError> {

        let dems_socket_options = SocketOptions {
            bind: true,
            block_on_first_connect: false,
            recv_timeout: params.recv_timeout_ms,
            send_timeout: 10,
            ..Default::default()
        };

        let dems_socket = LinkSocket::new(
            ctx,
            zmq::REP,
            dems_socket_options,
            &params.demands_endpoint
        )?;

        Ok(Self { dems_socket })
    }

    /// Wait for a demand from the client.
    ///
    /// Unless `Timeout` is returned the caller MUST call [`FcServer::send_dems_response`] before
    /// the next call.
    pub fn get_demands(&mut self) -> DemsRecv {
        match self.dems_socket.recv_msg(0) {
            Ok(m) => match serde_json::from_str(m.as_str().unwrap_or("")) {
                Ok(d) => DemsRecv::Dems(d),
                Err(e) => {
                    warn!("Could not deserialize demands: {}", e);
                    DemsRecv::Malformed
                }
            },
            Err(_) => DemsRecv::Timeout
        }
    }

    /// Send a response to the client based on the received demands.
    pub fn send_dems_response(
        &mut self,
        response: &FcDemsResponse
    ) -> Result<(), FcServerError> {
        let resp_str = serde_json::to_string(response)
            .map_err(FcServerError::SerializationError)?;

        self.dems_socket.send(&resp_str, 0)
            .map_err(FcServerError::SendError)
    }
}

//! Simulation gateway
//!
//! Thin pass-through from agents to the external swarm simulator. The
//! backend is a trait so tests and in-process demos can stand in for the
//! HTTP simulator.

mod client;
mod commands;
mod error;

pub use client::{HttpSimulationClient, SimulationBackend};
pub use commands::{
    CommandGateway, CommandStatus, SCOUT_LANE_SPACING, SCOUT_LANES, SCOUT_START_X, SCOUT_START_Y, params_from_pairs,
    parse_param, scout_lane, scout_launch_slot,
};
pub use error::GatewayError;

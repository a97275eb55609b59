//! Managed resources
//!
//! Create and delete requests return before the object settles; both wait on
//! the object's status code with the same state sets.

pub mod nat_gateway;
pub mod vpc;

pub use nat_gateway::{NatGatewayArgs, NatGatewayRecord, NatGatewayResource};
pub use vpc::{VpcArgs, VpcRecord, VpcResource};

use crate::config::Timeouts;
use ncflow_cloud::{Result, WaitConfig};

/// Status reported while a delete is in progress
pub const TERMINATING: &str = "TERMTING";

const CREATE_PENDING: [&str; 2] = ["INIT", "CREATING"];
const CREATE_TARGET: [&str; 1] = ["RUN"];
const DELETE_PENDING: [&str; 2] = ["RUN", TERMINATING];
const DELETE_TARGET: [&str; 1] = ["TERMINATED"];

pub(crate) fn creation_wait(timeouts: &Timeouts) -> Result<WaitConfig> {
    Ok(WaitConfig::new(CREATE_PENDING, CREATE_TARGET)?
        .with_timeout(timeouts.create)
        .with_delay(timeouts.delay)
        .with_min_interval(timeouts.min_interval))
}

pub(crate) fn deletion_wait(timeouts: &Timeouts) -> Result<WaitConfig> {
    Ok(WaitConfig::new(DELETE_PENDING, DELETE_TARGET)?
        .with_timeout(timeouts.delete)
        .with_delay(timeouts.delay)
        .with_min_interval(timeouts.min_interval))
}

//! Typed client for the local API of BWT Perla water softeners
//!
//! The Perla exposes a JSON-over-HTTP API on the local network once it is
//! enabled on the device. This crate wraps that API in a typed client:
//! one [`BwtClient::get_current_data`] call returns a [`CurrentData`]
//! reading with hardness, flow, regenerant, regeneration and service
//! telemetry already decoded.
//!
//! Connection failures and rejected login codes surface as distinct
//! [`ApiError`] variants so callers can retry the former and abort on the
//! latter.

mod client;
mod data;
mod error;
mod hardness;

pub use client::{BwtClient, DEFAULT_API_PORT};
pub use data::{CurrentData, DeviceError, SoftenerState};
pub use error::{ApiError, Result};
pub use hardness::{blended_capacity, treated_to_blended, Hardness};

// The transport layer is re-exported for callers that need to tune it.
pub use rest_client::{RestClient, RestError};

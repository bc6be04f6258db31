//! Saved-search alerting core for a rental listing marketplace.
//!
//! Landlords publish listings; premium tenants store search criteria and get
//! an email whenever a new listing matches. The [`marketplace`] module holds
//! the listing intake surface and the matching/notification pipeline.

pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;

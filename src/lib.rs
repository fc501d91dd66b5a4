//! `attachguard` — decides whether an email attachment may be viewed or saved.
//!
//! The policy combines static configuration (MIME allow/deny lists, blocked
//! and installable extensions, a download size limit) with a snapshot of
//! device state (network class, installed handlers, sideload setting)
//! supplied through the traits in [`platform`].

pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod platform;
pub mod policy;
pub mod provider;

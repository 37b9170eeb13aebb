//! # I/O Layer
//!
//! Inbound interfaces of the backend. Currently only the REST API.

pub mod rest;

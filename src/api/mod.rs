//! # API Layer
//!
//! Network surface of the monitor.

pub mod rest;

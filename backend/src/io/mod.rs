//! # IO Module
//!
//! Interface layer between HTTP clients and the domain logic. Handlers
//! translate requests into service calls and service errors into status
//! codes; no business rules live here.

pub mod rest;

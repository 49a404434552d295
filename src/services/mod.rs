//! Consumers of the verse engine.
//!
//! Everything here takes a [`Canon`](crate::bible::Canon) plus plain data
//! from the journal and returns fresh values for the front end to render.

pub mod import;
pub mod links;
pub mod recommendations;
pub mod stats;

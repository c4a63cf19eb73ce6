//! Access audit service library crate.
//!
//! # Purpose
//! Loads a permission snapshot (an actor's entries, the reference catalogs and
//! one record) and explains every access decision the contact screen would
//! make for it.
//!
//! # Notes
//! The binary wires these modules to the environment; tests use them directly.
pub mod config;
pub mod report;
pub mod snapshot;

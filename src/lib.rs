//! Hearthside - Resilient Dialogue Engine
//!
//! This crate implements the dialogue core of a reflective journaling
//! companion: a tiered response pipeline that never fails visibly to the
//! user, and a branchable conversation chain that preserves every prompt
//! and response for downstream analysis.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

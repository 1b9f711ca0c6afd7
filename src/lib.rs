//! Marketplace API - procurement frameworks, suppliers and their services.
//!
//! Suppliers register interest in a framework, prepare draft services
//! against it, and publish those drafts as live services once the framework
//! allows. Every change is recorded in an append-only audit log and every
//! change to a live service leaves an archived snapshot behind.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Public API - controller, data types and export functions
pub mod catalog;
pub mod controller;
pub mod destinations;
pub mod error;
pub mod export;
pub mod reconcile;
pub mod runner;
pub mod state;

// Front-end plumbing shared with the binary
pub mod cli;
pub mod config;
pub mod prefs;
pub mod tui;

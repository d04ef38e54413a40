//! Lotus API library.
//!
//! This crate provides the backend functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod uploads;

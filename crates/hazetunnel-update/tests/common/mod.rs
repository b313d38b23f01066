//! Common test infrastructure for hazetunnel-update tests
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Modules
//!
//! - `constants`: File names, versions and test payloads
//! - `builders`: Fluent builders for releases and a configured updater
//! - `mock_server`: Wiremock setup helpers for the release feed and downloads

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod builders;
pub mod constants;
pub mod mock_server;

pub use builders::*;
pub use constants::*;
pub use mock_server::*;

//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Intent-aware link-state routing daemon.
//!
//! Data flow: interfaces -> HELLO exchange -> neighbor liveness -> LSA
//! generation -> flooding -> LSDB update -> path engine -> RIB installer.
//! An inbound INTENT message mutates the intent store, which triggers a
//! path-engine recomputation for affected destinations only.

pub mod collections;
pub mod config;
pub mod daemon;
pub mod debug;
pub mod endpoint;
pub mod error;
pub mod flood;
pub mod instance;
pub mod intent;
pub mod interface;
pub mod lsdb;
pub mod neighbor;
pub mod packet;
pub mod route;
pub mod router_id;
pub mod southbound;
pub mod spf;

//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Log Surface events (spec §6): HELLO_TX/RX, NEIGHBOR_UP/DOWN,
//! LSA_ORIGINATE, LSA_FLOOD_TX/RX/IGNORE, SPF_RUN, INTENT_APPLY/FALLBACK,
//! RIB_INSTALL/REMOVE/FAIL. Each variant logs at the level appropriate to
//! how often it fires and how interesting it is to an operator, mirroring
//! the teacher's `Debug` enum convention of one log call site per event
//! kind rather than inline `tracing::` calls scattered through the code.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::router_id::RouterId;

#[derive(Debug)]
pub enum Event<'a> {
    HelloTx(&'a str),
    HelloRx(&'a str, &'a RouterId),
    NeighborUp(&'a RouterId, &'a str),
    NeighborDown(&'a RouterId, &'a str),
    LsaOriginate(&'a RouterId, u64),
    LsaFloodTx(&'a RouterId, u64, &'a str),
    LsaFloodRx(&'a RouterId, u64, &'a str),
    LsaFloodIgnore(&'a RouterId, u64),
    LsaAntiEntropyReply(&'a RouterId, u64),
    SpfRun {
        vertices: usize,
        edges: usize,
        duration: Duration,
    },
    IntentApply(&'a str, &'a str),
    IntentFallback(&'a str, &'a str),
    IntentMalformed,
    /// An `INTENT` arrived with an empty constraint set: the data model's
    /// defined no-op/delete case (spec "Intent"), not malformed input.
    IntentCleared(&'a str, &'a str),
    RibInstall(&'a ipnetwork::Ipv4Network),
    RibRemove(&'a ipnetwork::Ipv4Network),
    RibInstallFail(&'a ipnetwork::Ipv4Network),
}

impl Event<'_> {
    pub fn log(&self) {
        match self {
            Event::HelloTx(iface) => {
                debug!(%iface, "HELLO_TX");
            }
            Event::HelloRx(iface, router_id) => {
                debug!(%iface, %router_id, "HELLO_RX");
            }
            Event::NeighborUp(router_id, iface) => {
                info!(%router_id, %iface, "NEIGHBOR_UP");
            }
            Event::NeighborDown(router_id, iface) => {
                info!(%router_id, %iface, "NEIGHBOR_DOWN");
            }
            Event::LsaOriginate(router_id, seq) => {
                info!(%router_id, %seq, "LSA_ORIGINATE");
            }
            Event::LsaFloodTx(origin, seq, iface) => {
                debug!(%origin, %seq, %iface, "LSA_FLOOD_TX");
            }
            Event::LsaFloodRx(origin, seq, iface) => {
                debug!(%origin, %seq, %iface, "LSA_FLOOD_RX");
            }
            Event::LsaFloodIgnore(origin, seq) => {
                debug!(%origin, %seq, "LSA_FLOOD_IGNORE");
            }
            Event::LsaAntiEntropyReply(origin, seq) => {
                debug!(%origin, %seq, "LSA_ANTI_ENTROPY_REPLY");
            }
            Event::SpfRun {
                vertices,
                edges,
                duration,
            } => {
                info!(%vertices, %edges, ?duration, "SPF_RUN");
            }
            Event::IntentApply(src, dst) => {
                info!(%src, %dst, "INTENT_APPLY");
            }
            Event::IntentFallback(src, dst) => {
                warn!(%src, %dst, "INTENT_FALLBACK");
            }
            Event::IntentMalformed => {
                warn!("INTENT_MALFORMED");
            }
            Event::IntentCleared(src, dst) => {
                info!(%src, %dst, "INTENT_CLEAR");
            }
            Event::RibInstall(prefix) => {
                info!(%prefix, "RIB_INSTALL");
            }
            Event::RibRemove(prefix) => {
                info!(%prefix, "RIB_REMOVE");
            }
            Event::RibInstallFail(prefix) => {
                warn!(%prefix, "RIB_INSTALL_FAIL");
            }
        }
    }
}

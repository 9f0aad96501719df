//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Flooding (spec §4.3): reliable, bounded propagation of LSAs across
//! every TWO-WAY interface other than the one they arrived on.

use itertools::Itertools;

use crate::collections::{InterfaceId, Interfaces};
use crate::debug::Event as DebugEvent;
use crate::lsdb::{Accept, Lsdb};
use crate::packet::LsaMsg as Lsa;

/// What the caller (the instance event loop) must do as a result of
/// offering an incoming LSA to the database.
#[derive(Debug, Default)]
pub struct FloodAction {
    /// Interfaces the LSA (or, for anti-entropy, the stored LSA) must be
    /// sent out on, paired with the LSA to send.
    pub sends: Vec<(InterfaceId, Lsa)>,
    /// Whether this LSA changed the LSDB in a way that requires an SPF
    /// recomputation.
    pub recompute: bool,
}

/// Processes an LSA arriving over `rx_iface` (or `None` for a
/// self-originated LSA handed directly to the flooder), updating `lsdb`
/// and deciding what to flood or anti-entropy reply.
pub fn receive(
    lsdb: &mut Lsdb,
    ifaces: &Interfaces,
    rx_iface: Option<InterfaceId>,
    lsa: Lsa,
) -> FloodAction {
    let origin = lsa.origin.clone();
    let seq = lsa.seq;

    match lsdb.offer(lsa.clone()) {
        Accept::Accepted => {
            if let Some(rx_iface) = rx_iface {
                if let Some(iface) = ifaces.get(rx_iface) {
                    DebugEvent::LsaFloodRx(&origin, seq, &iface.name).log();
                }
            } else {
                DebugEvent::LsaOriginate(&origin, seq).log();
            }

            // Sorted by interface name so flood order (and the resulting
            // log sequence) is deterministic regardless of arena slot
            // order, matching the stability invariant the path engine
            // also has to uphold.
            let sends = ifaces
                .iter()
                .filter(|(id, iface)| Some(*id) != rx_iface && iface.is_two_way())
                .sorted_by_key(|(_, iface)| iface.name.clone())
                .map(|(id, iface)| {
                    DebugEvent::LsaFloodTx(&origin, seq, &iface.name).log();
                    (id, lsa.clone())
                })
                .collect();

            FloodAction {
                sends,
                recompute: true,
            }
        }
        Accept::Ignored => {
            DebugEvent::LsaFloodIgnore(&origin, seq).log();
            FloodAction::default()
        }
        Accept::Stale(stored) => {
            DebugEvent::LsaAntiEntropyReply(&stored.origin, stored.seq).log();
            let sends = match rx_iface {
                Some(id) => vec![(id, stored)],
                None => vec![],
            };
            FloodAction {
                sends,
                recompute: false,
            }
        }
    }
}

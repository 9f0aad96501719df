//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Per-node protocol state (spec §3 "Ownership", §4 component design).
//! This is deliberately free of sockets and kernel calls: every method
//! here is a pure state transition over the LSDB, neighbor table, intent
//! store, and RIB shadow, so it can be driven directly by tests as well
//! as by the real event loop in [`crate::daemon`].

use std::collections::HashMap;
use std::time::Instant;

use crate::collections::{InterfaceId, Interfaces};
use crate::config::Config;
use crate::debug::Event as DebugEvent;
use crate::endpoint::EndpointTable;
use crate::error::Error;
use crate::interface::Interface;
use crate::intent::IntentStore;
use crate::lsdb::Lsdb;
use crate::neighbor::nsm;
use crate::packet::{Hello, LsaLinkMsg, LsaMsg, Message};
use crate::route::{Rib, RibDiff, RouteEntry};
use crate::router_id::RouterId;
use crate::spf;

/// Instructs the caller (the daemon's socket loop) what to do as a
/// result of a state transition: which outbound messages to send on
/// which interfaces, and whether the path engine must be rerun.
#[derive(Debug, Default)]
pub struct Outcome {
    pub sends: Vec<(InterfaceId, Message)>,
    pub recompute: bool,
}

impl Outcome {
    fn merge(&mut self, other: Outcome) {
        self.sends.extend(other.sends);
        self.recompute |= other.recompute;
    }
}

pub struct Instance {
    pub local_router_id: RouterId,
    pub ifaces: Interfaces,
    pub lsdb: Lsdb,
    pub intents: IntentStore,
    pub endpoints: EndpointTable,
    pub rib: Rib,
    stubs: Vec<ipnetwork::Ipv4Network>,
    own_seq: u64,
}

impl Instance {
    pub fn new(config: &Config) -> Instance {
        let mut ifaces = Interfaces::default();
        for iface_config in &config.interfaces {
            ifaces.insert(Interface::new(iface_config));
        }

        Instance {
            local_router_id: config.router_id.clone(),
            ifaces,
            lsdb: Lsdb::default(),
            intents: IntentStore::default(),
            endpoints: EndpointTable::new(config.endpoints.clone()),
            rib: Rib::default(),
            stubs: config.stubs.clone(),
            own_seq: 0,
        }
    }

    /// Router-ids this node currently has live HELLOs from, on any
    /// interface (spec §6 HELLO `seen` field) -- anything not DEAD.
    fn seen_list(&self) -> Vec<RouterId> {
        self.ifaces
            .iter()
            .filter_map(|(_, iface)| match &iface.neighbor {
                Some(nbr) if nbr.state != nsm::State::Dead => Some(nbr.router_id.clone()),
                _ => None,
            })
            .collect()
    }

    /// Builds the HELLOs this node should emit this tick, one per
    /// admin-up interface (spec §4.1 `tick()`).
    pub fn tick_hello(&self) -> Vec<(InterfaceId, Message)> {
        let seen = self.seen_list();
        self.ifaces
            .iter()
            .filter(|(_, iface)| iface.admin_up)
            .map(|(id, iface)| (id, iface.hello_message(&self.local_router_id, seen.clone())))
            .collect()
    }

    /// Processes an inbound message that arrived on `iface_id`.
    pub fn receive(&mut self, iface_id: InterfaceId, msg: Message) -> Result<Outcome, Error> {
        match msg {
            Message::Hello(hello) => Ok(self.on_hello(iface_id, hello)),
            Message::Lsa(lsa) => Ok(self.on_lsa(iface_id, lsa)),
            Message::Intent(_) | Message::IntentDelete(_) => Ok(self.receive_intent(msg)),
        }
    }

    /// Processes an inbound `INTENT`/`INTENT_DELETE`. Unlike HELLO/LSA,
    /// these are operator-injected control traffic (spec §4.5, §6) with
    /// no associated point-to-point neighbor, so this takes no
    /// `InterfaceId` at all.
    pub fn receive_intent(&mut self, msg: Message) -> Outcome {
        match msg {
            Message::Intent(intent) => {
                let mut outcome = Outcome::default();
                outcome.recompute = self.intents.apply(intent).is_some();
                outcome
            }
            Message::IntentDelete(msg) => {
                let mut outcome = Outcome::default();
                outcome.recompute = self.intents.apply_delete(msg).is_some();
                outcome
            }
            _ => unreachable!("receive_intent called with a non-intent message"),
        }
    }

    fn on_hello(&mut self, iface_id: InterfaceId, hello: Hello) -> Outcome {
        let Some(iface) = self.ifaces.get_mut(iface_id) else {
            Error::InterfaceIdNotFound(iface_id).log();
            return Outcome::default();
        };
        let two_way_flip = iface.on_hello(&hello, &self.local_router_id);
        self.ifaces.reindex_neighbor(iface_id, Some(hello.router_id));

        let mut outcome = Outcome::default();
        if two_way_flip {
            outcome.merge(self.originate_lsa());
        }
        outcome
    }

    fn on_lsa(&mut self, iface_id: InterfaceId, lsa: LsaMsg) -> Outcome {
        let action = crate::flood::receive(&mut self.lsdb, &self.ifaces, Some(iface_id), lsa);
        Outcome {
            sends: action
                .sends
                .into_iter()
                .map(|(id, lsa)| (id, Message::Lsa(lsa)))
                .collect(),
            recompute: action.recompute,
        }
    }

    /// Called once per `hello-interval`: expires any neighbor that has
    /// gone quiet for longer than `dead_interval`.
    pub fn sweep(&mut self, dead_interval: std::time::Duration) -> Outcome {
        let mut outcome = Outcome::default();
        let expired_ifaces: Vec<InterfaceId> = self
            .ifaces
            .indexes()
            .filter(|&id| self.ifaces[id].sweep(dead_interval))
            .collect();
        if !expired_ifaces.is_empty() {
            outcome.recompute = true;
            outcome.merge(self.originate_lsa());
        }
        outcome
    }

    /// LSA generator trigger (b): periodic refresh even without change
    /// (spec §4.2), to re-assert liveness.
    pub fn refresh_lsa(&mut self) -> Outcome {
        self.originate_lsa()
    }

    /// Builds and self-accepts a new LSA for this node, bumping the
    /// sequence number, then hands it to the flooder (spec §4.2).
    fn originate_lsa(&mut self) -> Outcome {
        self.own_seq += 1;
        let links = self
            .ifaces
            .iter()
            .filter(|(_, iface)| iface.is_two_way())
            .map(|(_, iface)| LsaLinkMsg {
                peer: iface.peer_router_id().expect("is_two_way implies a neighbor").clone(),
                bw: iface.bandwidth,
                delay: iface.delay,
            })
            .collect();

        let lsa = LsaMsg {
            origin: self.local_router_id.clone(),
            seq: self.own_seq,
            ts: chrono::Utc::now().timestamp_millis() as f64 / 1000.0,
            links,
            stubs: self.stubs.clone(),
        };

        let action = crate::flood::receive(&mut self.lsdb, &self.ifaces, None, lsa);
        Outcome {
            sends: action
                .sends
                .into_iter()
                .map(|(id, lsa)| (id, Message::Lsa(lsa)))
                .collect(),
            recompute: action.recompute,
        }
    }

    /// Reruns the path engine over the current LSDB + intent snapshot and
    /// diffs the result against the RIB shadow (spec §4.4, §4.6).
    pub fn recompute(&mut self) -> RibDiff {
        let start = Instant::now();
        let graph = spf::build_graph(&self.lsdb);
        let vertices = graph.len();
        let edges = graph.values().map(Vec::len).sum();

        let next = crate::route::compute(
            &self.lsdb,
            &self.ifaces,
            &self.local_router_id,
            &self.intents,
            &self.endpoints,
        );
        let diff = self.rib.diff(&next);

        DebugEvent::SpfRun {
            vertices,
            edges,
            duration: start.elapsed(),
        }
        .log();

        diff
    }

    pub fn neighbors(&self) -> HashMap<RouterId, nsm::State> {
        self.ifaces
            .iter()
            .filter_map(|(_, iface)| iface.neighbor.as_ref().map(|n| (n.router_id.clone(), n.state)))
            .collect()
    }
}

pub fn log_route_install(entry: &RouteEntry) {
    DebugEvent::RibInstall(&entry.prefix).log();
}

pub fn log_route_remove(prefix: &ipnetwork::Ipv4Network) {
    DebugEvent::RibRemove(prefix).log();
}

pub fn log_route_install_fail(prefix: &ipnetwork::Ipv4Network) {
    DebugEvent::RibInstallFail(prefix).log();
}

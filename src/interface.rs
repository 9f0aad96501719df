//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Point-to-point link / neighbor manager (spec §4.1). Each [`Interface`]
//! owns at most one [`Neighbor`], since the protocol has no multi-access
//! DR/BDR election (spec §4.1 Non-goals).

use std::net::Ipv4Addr;
use std::time::Duration;

use crate::config::InterfaceConfig;
use crate::debug::Event as DebugEvent;
use crate::error::Error;
use crate::neighbor::{nsm, Neighbor};
use crate::packet::{Hello, Message};
use crate::router_id::RouterId;

#[derive(Debug)]
pub struct Interface {
    pub name: String,
    pub local_addr: Ipv4Addr,
    pub peer_addr: Ipv4Addr,
    pub bandwidth: f64,
    pub delay: f64,
    pub admin_up: bool,
    pub neighbor: Option<Neighbor>,
}

impl Interface {
    pub fn new(config: &InterfaceConfig) -> Interface {
        Interface {
            name: config.name.clone(),
            local_addr: config.local_addr,
            peer_addr: config.peer_addr,
            bandwidth: config.bandwidth,
            delay: config.delay,
            admin_up: true,
            neighbor: None,
        }
    }

    /// Builds the HELLO this interface should emit on its next `tick()`.
    /// `seen` is the set of router-ids this node currently has live HELLOs
    /// from, across every interface (spec §6 wire format).
    pub fn hello_message(&self, local_router_id: &RouterId, seen: Vec<RouterId>) -> Message {
        DebugEvent::HelloTx(&self.name).log();
        Message::Hello(Hello {
            router_id: local_router_id.clone(),
            iface: self.name.clone(),
            bw: self.bandwidth,
            delay: self.delay,
            seen,
        })
    }

    /// Applies an inbound HELLO to this interface's neighbor state machine.
    /// Returns whether the neighbor's two-way-ness flipped, i.e. whether
    /// the caller must regenerate and reflood this node's own LSA.
    pub fn on_hello(&mut self, hello: &Hello, local_router_id: &RouterId) -> bool {
        DebugEvent::HelloRx(&self.name, &hello.router_id).log();
        let two_way = hello.seen.iter().any(|id| *id == *local_router_id);

        match &mut self.neighbor {
            Some(nbr) if nbr.router_id == hello.router_id => {
                nbr.fsm(&self.name, nsm::Event::HelloRcvd { two_way })
            }
            // A HELLO from a different router-id than the one already
            // bound to this interface (spec §7 "Internal invariant
            // violation: duplicate neighbor on same iface"): fatal log,
            // then reset the neighbor state to the newly-claiming peer.
            Some(_) => {
                Error::DuplicateNeighborOnInterface(self.name.clone()).log();
                let mut nbr = Neighbor::new(hello.router_id.clone());
                let triggered = nbr.fsm(&self.name, nsm::Event::HelloRcvd { two_way });
                self.neighbor = Some(nbr);
                triggered
            }
            // First HELLO ever seen on this link.
            None => {
                let mut nbr = Neighbor::new(hello.router_id.clone());
                let triggered = nbr.fsm(&self.name, nsm::Event::HelloRcvd { two_way });
                self.neighbor = Some(nbr);
                triggered
            }
        }
    }

    /// Called once per `hello-interval`: expires the neighbor if it has
    /// been silent longer than `dead_interval`. Returns whether this
    /// flipped two-way-ness.
    pub fn sweep(&mut self, dead_interval: Duration) -> bool {
        if !self.admin_up {
            return false;
        }
        let expired = self
            .neighbor
            .as_ref()
            .is_some_and(|nbr| nbr.state != nsm::State::Dead && nbr.last_heard.elapsed() > dead_interval);
        if expired {
            self.neighbor
                .as_mut()
                .expect("checked Some above")
                .fsm(&self.name, nsm::Event::DeadTimerExpired)
        } else {
            false
        }
    }

    /// Administrative up/down. Going down is equivalent to an immediate
    /// DEAD transition for the neighbor (spec §4.1 edge policy).
    pub fn set_admin_up(&mut self, up: bool) -> bool {
        self.admin_up = up;
        if up {
            return false;
        }
        match &mut self.neighbor {
            Some(nbr) if nbr.state != nsm::State::Dead => {
                nbr.fsm(&self.name, nsm::Event::DeadTimerExpired)
            }
            _ => false,
        }
    }

    pub fn is_two_way(&self) -> bool {
        self.neighbor.as_ref().is_some_and(Neighbor::is_two_way)
    }

    pub fn peer_router_id(&self) -> Option<&RouterId> {
        self.neighbor.as_ref().map(|nbr| &nbr.router_id)
    }
}

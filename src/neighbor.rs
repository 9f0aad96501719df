//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::time::Instant;

use crate::debug::Event as DebugEvent;
use crate::router_id::RouterId;

/// Neighbor state machine (spec §3, §4.1).
pub mod nsm {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub enum State {
        #[default]
        Init,
        TwoWay,
        Dead,
    }

    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum Event {
        /// A HELLO was received; `two_way` reports whether it acknowledged
        /// our own router-id in its `seen` list.
        HelloRcvd { two_way: bool },
        /// `dead-interval` elapsed without a HELLO, or the interface went
        /// administratively down.
        DeadTimerExpired,
    }
}

#[derive(Debug)]
pub struct Neighbor {
    pub router_id: RouterId,
    pub state: nsm::State,
    pub last_heard: Instant,
}

impl Neighbor {
    pub fn new(router_id: RouterId) -> Neighbor {
        Neighbor {
            router_id,
            state: nsm::State::Init,
            last_heard: Instant::now(),
        }
    }

    /// Returns whether the neighbor is eligible to be used as an SPF edge
    /// and to receive flooded LSAs.
    pub fn is_two_way(&self) -> bool {
        self.state == nsm::State::TwoWay
    }

    /// Applies `event`, returning whether this transition flips the
    /// neighbor's two-way-ness (the trigger condition spec §4.2 uses to
    /// regenerate this node's own LSA).
    pub fn fsm(&mut self, iface_name: &str, event: nsm::Event) -> bool {
        let was_two_way = self.is_two_way();

        self.state = match (self.state, event) {
            (nsm::State::Dead, nsm::Event::HelloRcvd { two_way }) => {
                // A HELLO arriving for a dead neighbor resurrects it; there
                // is no administrative gate on recovery (spec is silent
                // here, see SPEC_FULL.md §4.1).
                self.last_heard = Instant::now();
                if two_way {
                    nsm::State::TwoWay
                } else {
                    nsm::State::Init
                }
            }
            (_, nsm::Event::HelloRcvd { two_way }) => {
                self.last_heard = Instant::now();
                if two_way {
                    nsm::State::TwoWay
                } else {
                    nsm::State::Init
                }
            }
            (_, nsm::Event::DeadTimerExpired) => nsm::State::Dead,
        };

        let is_two_way = self.is_two_way();
        if was_two_way != is_two_way {
            if is_two_way {
                DebugEvent::NeighborUp(&self.router_id, iface_name).log();
            } else {
                DebugEvent::NeighborDown(&self.router_id, iface_name).log();
            }
        }
        was_two_way != is_two_way
    }
}

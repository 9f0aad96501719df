//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Path engine (spec §4.4): builds a bidirectionally-confirmed graph from
//! the LSDB and runs Dijkstra from the local router, optionally under an
//! intent's bandwidth/latency constraints.

use std::collections::{BTreeSet, HashMap, HashSet};

use derive_new::new;

use crate::lsdb::Lsdb;
use crate::router_id::{Cost, RouterId};

#[derive(Clone, Debug, new)]
pub struct Edge {
    pub to: RouterId,
    pub bandwidth: f64,
    pub delay: f64,
}

pub type Graph = HashMap<RouterId, Vec<Edge>>;

/// An intent's constraints, applied while computing SPF (spec §4.4
/// "Intent filtering").
#[derive(Clone, Copy, Debug, Default)]
pub struct Constraint {
    pub min_bandwidth: Option<f64>,
    pub max_latency: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub cost: Cost,
    pub next_hop: RouterId,
    pub iface: String,
}

/// Builds the directed graph: an edge u->v exists only if both u's and
/// v's LSAs list each other as a neighbor, preventing a one-sided stale
/// adjacency from being used for forwarding.
pub fn build_graph(lsdb: &Lsdb) -> Graph {
    let mut graph: Graph = HashMap::new();
    for lsa in lsdb.iter() {
        for link in &lsa.links {
            let Some(peer_lsa) = lsdb.get(&link.peer) else {
                continue;
            };
            if peer_lsa.links.iter().any(|back| back.peer == lsa.origin) {
                graph
                    .entry(lsa.origin.clone())
                    .or_default()
                    .push(Edge::new(link.peer.clone(), link.bw, link.delay));
            }
        }
    }
    graph
}

/// Runs single-source Dijkstra from `root`. `root_neighbors` maps each of
/// the root's direct, two-way neighbors to the local outbound interface
/// name used to reach them — needed because `graph` alone carries no
/// notion of "my own interfaces."
///
/// Ties are broken deterministically by (next-hop router-id, outbound
/// interface name), per spec §4.4, so the result is stable under a
/// no-op recomputation regardless of HashMap/BTreeSet iteration order.
pub fn compute(
    graph: &Graph,
    root: &RouterId,
    root_neighbors: &HashMap<RouterId, String>,
    constraint: Option<&Constraint>,
) -> HashMap<RouterId, Route> {
    let mut best: HashMap<RouterId, (Cost, RouterId, String)> = HashMap::new();
    let mut frontier: BTreeSet<(Cost, RouterId)> = BTreeSet::new();
    let mut visited: HashSet<RouterId> = HashSet::new();

    best.insert(root.clone(), (Cost::ZERO, root.clone(), String::new()));
    frontier.insert((Cost::ZERO, root.clone()));

    while let Some(entry) = frontier.iter().next().cloned() {
        let (cost, u) = entry;
        frontier.remove(&(cost, u.clone()));
        if !visited.insert(u.clone()) {
            continue;
        }

        let Some(edges) = graph.get(&u) else {
            continue;
        };
        for edge in edges {
            if let Some(min_bw) = constraint.and_then(|c| c.min_bandwidth) {
                if edge.bandwidth < min_bw {
                    continue;
                }
            }

            let new_cost = cost.saturating_add(Cost::new(edge.delay));
            if let Some(max_latency) = constraint.and_then(|c| c.max_latency) {
                if new_cost.get() > max_latency {
                    continue;
                }
            }

            let (new_next_hop, new_iface) = if u == *root {
                (
                    edge.to.clone(),
                    root_neighbors.get(&edge.to).cloned().unwrap_or_default(),
                )
            } else {
                let (_, next_hop, iface) = &best[&u];
                (next_hop.clone(), iface.clone())
            };

            let better = match best.get(&edge.to) {
                None => true,
                Some((existing_cost, existing_next_hop, existing_iface)) => {
                    (new_cost, &new_next_hop, &new_iface)
                        < (*existing_cost, existing_next_hop, existing_iface)
                }
            };

            if better {
                best.insert(edge.to.clone(), (new_cost, new_next_hop.clone(), new_iface.clone()));
                frontier.insert((new_cost, edge.to.clone()));
            }
        }
    }

    best.remove(root);
    best.into_iter()
        .map(|(dest, (cost, next_hop, iface))| {
            (
                dest,
                Route {
                    cost,
                    next_hop,
                    iface,
                },
            )
        })
        .collect()
}

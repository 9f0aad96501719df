//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! RIB shadow (spec data model "Route entry", §4.4 fallback policy):
//! turns an LSDB + intent store snapshot into a per-prefix route table,
//! and diffs it against what is currently installed so the southbound
//! layer only touches the kernel for what actually changed.

use std::collections::{BTreeMap, HashMap};
use std::net::Ipv4Addr;

use ipnetwork::Ipv4Network;

use crate::collections::Interfaces;
use crate::debug::Event as DebugEvent;
use crate::endpoint::EndpointTable;
use crate::intent::IntentStore;
use crate::lsdb::Lsdb;
use crate::router_id::{Cost, RouterId};
use crate::spf;

#[derive(Clone, Debug, PartialEq)]
pub struct RouteEntry {
    pub prefix: Ipv4Network,
    pub next_hop: Ipv4Addr,
    pub iface: String,
    pub cost: Cost,
    /// False only when this route is a fallback-to-unconstrained path
    /// after an intent for this destination could not be satisfied
    /// (spec §4.4 "Fallback policy").
    pub intent_satisfied: bool,
}

/// Recomputes the full destination-prefix table from an LSDB + intent
/// snapshot. Never includes this node's own directly-attached stubs —
/// those are local, not routed.
pub fn compute(
    lsdb: &Lsdb,
    ifaces: &Interfaces,
    local_router_id: &RouterId,
    intents: &IntentStore,
    endpoints: &EndpointTable,
) -> BTreeMap<Ipv4Network, RouteEntry> {
    let graph = spf::build_graph(lsdb);
    let root_neighbors: HashMap<RouterId, String> = ifaces
        .iter()
        .filter_map(|(_, iface)| {
            iface
                .peer_router_id()
                .map(|router_id| (router_id.clone(), iface.name.clone()))
        })
        .collect();

    let default_routes = spf::compute(&graph, local_router_id, &root_neighbors, None);
    let overrides = intent_overrides(&graph, local_router_id, &root_neighbors, &default_routes, intents, endpoints);

    let mut prefixes = BTreeMap::new();
    for lsa in lsdb.iter() {
        if lsa.origin == *local_router_id {
            continue;
        }
        let (route, intent_satisfied) = match overrides.get(&lsa.origin) {
            Some((route, satisfied)) => (route, *satisfied),
            None => match default_routes.get(&lsa.origin) {
                Some(route) => (route, true),
                None => continue,
            },
        };
        let Some(next_hop_iface) = ifaces.get_by_name(&route.iface) else {
            continue;
        };
        let next_hop = ifaces[next_hop_iface].peer_addr;
        for stub in &lsa.stubs {
            prefixes.insert(
                *stub,
                RouteEntry {
                    prefix: *stub,
                    next_hop,
                    iface: route.iface.clone(),
                    cost: route.cost,
                    intent_satisfied,
                },
            );
        }
    }
    prefixes
}

/// Per spec design notes: intent scope is local-only, so only intents
/// whose `src` resolves to this node are applied here. For each such
/// intent's destination, recompute SPF under its constraint; if that
/// yields no path, fall back to the unconstrained route and flag it.
fn intent_overrides(
    graph: &spf::Graph,
    local_router_id: &RouterId,
    root_neighbors: &HashMap<RouterId, String>,
    default_routes: &HashMap<RouterId, spf::Route>,
    intents: &IntentStore,
    endpoints: &EndpointTable,
) -> HashMap<RouterId, (spf::Route, bool)> {
    let mut overrides = HashMap::new();
    for intent in intents.iter() {
        if endpoints.resolve(&intent.src) != *local_router_id {
            continue;
        }
        let dst = endpoints.resolve(&intent.dst);
        let constraint = spf::Constraint {
            min_bandwidth: intent.min_bandwidth,
            max_latency: intent.max_latency,
        };
        let constrained = spf::compute(graph, local_router_id, root_neighbors, Some(&constraint));
        match constrained.get(&dst) {
            Some(route) => {
                DebugEvent::IntentApply(&intent.src, &intent.dst).log();
                overrides.insert(dst, (route.clone(), true));
            }
            None => {
                if let Some(route) = default_routes.get(&dst) {
                    DebugEvent::IntentFallback(&intent.src, &intent.dst).log();
                    overrides.insert(dst, (route.clone(), false));
                }
            }
        }
    }
    overrides
}

#[derive(Debug, Default)]
pub struct RibDiff {
    pub install: Vec<RouteEntry>,
    pub remove: Vec<Ipv4Network>,
}

/// The RIB shadow: the last table this node actually installed into the
/// kernel, so the next recomputation only touches what changed.
#[derive(Debug, Default)]
pub struct Rib {
    installed: BTreeMap<Ipv4Network, RouteEntry>,
}

impl Rib {
    pub fn diff(&self, next: &BTreeMap<Ipv4Network, RouteEntry>) -> RibDiff {
        let mut diff = RibDiff::default();
        for (prefix, entry) in next {
            if self.installed.get(prefix) != Some(entry) {
                diff.install.push(entry.clone());
            }
        }
        for prefix in self.installed.keys() {
            if !next.contains_key(prefix) {
                diff.remove.push(*prefix);
            }
        }
        diff
    }

    /// Records that `entry` is now actually installed. Called only after
    /// the southbound install call itself succeeded, so a failed install
    /// leaves the shadow showing the old (or absent) state and the next
    /// `diff()` naturally retries it (spec §4.6 "Failure handling").
    pub fn mark_installed(&mut self, entry: RouteEntry) {
        self.installed.insert(entry.prefix, entry);
    }

    /// Records that `prefix` is no longer installed. Same retry-on-failure
    /// reasoning as [`Rib::mark_installed`] applies to removal.
    pub fn mark_removed(&mut self, prefix: &Ipv4Network) {
        self.installed.remove(prefix);
    }

    pub fn get(&self, prefix: &Ipv4Network) -> Option<&RouteEntry> {
        self.installed.get(prefix)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ipv4Network, &RouteEntry)> {
        self.installed.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InterfaceConfig;
    use crate::interface::Interface;
    use crate::packet::{Hello, IntentMsg, LsaLinkMsg, LsaMsg};

    fn two_way_iface(name: &str, peer_addr: &str, peer_id: &str) -> Interface {
        let mut iface = Interface::new(&InterfaceConfig {
            name: name.to_string(),
            local_addr: "10.0.0.1".parse().unwrap(),
            peer_addr: peer_addr.parse().unwrap(),
            bandwidth: 20.0,
            delay: 5.0,
        });
        iface.on_hello(
            &Hello {
                router_id: RouterId::from(peer_id),
                iface: "peer-eth0".to_string(),
                bw: 20.0,
                delay: 5.0,
                seen: vec![RouterId::from("r1")],
            },
            &RouterId::from("r1"),
        );
        iface
    }

    fn lsa(origin: &str, links: &[(&str, f64, f64)], stubs: &[&str]) -> LsaMsg {
        LsaMsg {
            origin: RouterId::from(origin),
            seq: 1,
            ts: 0.0,
            links: links
                .iter()
                .map(|(peer, bw, delay)| LsaLinkMsg {
                    peer: RouterId::from(*peer),
                    bw: *bw,
                    delay: *delay,
                })
                .collect(),
            stubs: stubs.iter().map(|s| s.parse().unwrap()).collect(),
        }
    }

    fn reference_lsdb() -> Lsdb {
        let mut lsdb = Lsdb::default();
        lsdb.offer(lsa("r1", &[("r2", 20.0, 5.0), ("r3", 40.0, 2.0)], &[]));
        lsdb.offer(lsa(
            "r2",
            &[("r1", 20.0, 5.0), ("r3", 50.0, 5.0), ("r5", 80.0, 7.0)],
            &[],
        ));
        lsdb.offer(lsa(
            "r3",
            &[("r1", 40.0, 2.0), ("r2", 50.0, 5.0), ("r4", 200.0, 1.0)],
            &[],
        ));
        lsdb.offer(lsa("r4", &[("r3", 200.0, 1.0), ("r5", 150.0, 3.0)], &[]));
        lsdb.offer(lsa(
            "r5",
            &[("r2", 80.0, 7.0), ("r4", 150.0, 3.0)],
            &["10.0.5.0/24"],
        ));
        lsdb
    }

    fn reference_ifaces() -> Interfaces {
        let mut ifaces = Interfaces::default();
        ifaces.insert(two_way_iface("r1-eth0", "10.0.12.2", "r2"));
        ifaces.insert(two_way_iface("r1-eth1", "10.0.13.2", "r3"));
        ifaces
    }

    #[test]
    fn stub_prefix_routed_via_shortest_path() {
        let lsdb = reference_lsdb();
        let ifaces = reference_ifaces();
        let intents = IntentStore::default();
        let endpoints = EndpointTable::default();

        let table = compute(&lsdb, &ifaces, &RouterId::from("r1"), &intents, &endpoints);
        let entry = table.get(&"10.0.5.0/24".parse().unwrap()).unwrap();
        assert_eq!(entry.iface, "r1-eth1");
        assert_eq!(entry.next_hop, "10.0.13.2".parse::<Ipv4Addr>().unwrap());
        assert!(entry.intent_satisfied);
    }

    #[test]
    fn satisfiable_intent_overrides_default_path() {
        let lsdb = reference_lsdb();
        let ifaces = reference_ifaces();
        let mut intents = IntentStore::default();
        intents.apply(IntentMsg {
            src: "r1".to_string(),
            dst: "r5".to_string(),
            min_bandwidth: None,
            max_latency: Some(100.0),
        });
        let endpoints = EndpointTable::default();

        let table = compute(&lsdb, &ifaces, &RouterId::from("r1"), &intents, &endpoints);
        let entry = table.get(&"10.0.5.0/24".parse().unwrap()).unwrap();
        assert!(entry.intent_satisfied);
    }

    #[test]
    fn unsatisfiable_intent_falls_back_and_is_flagged() {
        let lsdb = reference_lsdb();
        let ifaces = reference_ifaces();
        let mut intents = IntentStore::default();
        intents.apply(IntentMsg {
            src: "r1".to_string(),
            dst: "r5".to_string(),
            min_bandwidth: Some(1000.0),
            max_latency: None,
        });
        let endpoints = EndpointTable::default();

        let table = compute(&lsdb, &ifaces, &RouterId::from("r1"), &intents, &endpoints);
        let entry = table.get(&"10.0.5.0/24".parse().unwrap()).unwrap();
        assert!(!entry.intent_satisfied);
    }

    #[test]
    fn rib_diff_only_reports_changed_and_removed_prefixes() {
        let mut rib = Rib::default();
        let mut first = BTreeMap::new();
        let p1: Ipv4Network = "10.0.5.0/24".parse().unwrap();
        first.insert(
            p1,
            RouteEntry {
                prefix: p1,
                next_hop: "10.0.13.2".parse().unwrap(),
                iface: "r1-eth1".to_string(),
                cost: Cost::new(3.0),
                intent_satisfied: true,
            },
        );
        let diff = rib.diff(&first);
        assert_eq!(diff.install.len(), 1);
        assert!(diff.remove.is_empty());
        rib.mark_installed(first.remove(&p1).unwrap());

        let diff = rib.diff(&BTreeMap::new());
        assert!(diff.install.is_empty());
        assert_eq!(diff.remove, vec![p1]);
    }
}

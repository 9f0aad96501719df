//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Link-State Database (spec §4.2, §4.3): one LSA per originator, keyed by
//! router-id, always holding the highest sequence number seen for that
//! originator.

use std::collections::HashMap;

use crate::packet::LsaMsg as Lsa;
use crate::router_id::RouterId;

/// Outcome of offering an incoming LSA to the database, per the spec §4.3
/// reception rule.
#[derive(Debug)]
pub enum Accept {
    /// Strictly newer than what was stored (or first-ever for this
    /// originator): installed, and the caller must flood it onward.
    Accepted,
    /// Same sequence as what is stored: a duplicate, drop silently.
    Ignored,
    /// Older than what is stored: the caller should anti-entropy reply
    /// with the LSA returned here rather than forward the incoming one.
    Stale(Lsa),
}

#[derive(Debug, Default)]
pub struct Lsdb {
    entries: HashMap<RouterId, Lsa>,
}

impl Lsdb {
    /// Applies the spec §4.3 reception rule for an LSA arriving from the
    /// network (or being self-originated, which always takes the
    /// `Accepted` branch since there is never a prior entry with an equal
    /// or higher sequence for this node's own router-id until this call).
    pub fn offer(&mut self, lsa: Lsa) -> Accept {
        match self.entries.get(&lsa.origin) {
            Some(stored) if lsa.seq == stored.seq => Accept::Ignored,
            Some(stored) if lsa.seq < stored.seq => Accept::Stale(stored.clone()),
            _ => {
                self.entries.insert(lsa.origin.clone(), lsa);
                Accept::Accepted
            }
        }
    }

    pub fn get(&self, origin: &RouterId) -> Option<&Lsa> {
        self.entries.get(origin)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lsa> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::LsaLinkMsg;

    fn lsa(origin: &str, seq: u64) -> Lsa {
        Lsa {
            origin: RouterId::from(origin),
            seq,
            ts: 0.0,
            links: vec![LsaLinkMsg {
                peer: RouterId::from("r1"),
                bw: 20.0,
                delay: 5.0,
            }],
            stubs: vec![],
        }
    }

    #[test]
    fn first_lsa_for_an_origin_is_accepted() {
        let mut lsdb = Lsdb::default();
        assert!(matches!(lsdb.offer(lsa("r2", 1)), Accept::Accepted));
        assert_eq!(lsdb.get(&RouterId::from("r2")).unwrap().seq, 1);
    }

    #[test]
    fn higher_sequence_replaces_and_is_accepted() {
        let mut lsdb = Lsdb::default();
        lsdb.offer(lsa("r2", 1));
        assert!(matches!(lsdb.offer(lsa("r2", 2)), Accept::Accepted));
        assert_eq!(lsdb.get(&RouterId::from("r2")).unwrap().seq, 2);
    }

    #[test]
    fn equal_sequence_is_ignored() {
        let mut lsdb = Lsdb::default();
        lsdb.offer(lsa("r2", 5));
        assert!(matches!(lsdb.offer(lsa("r2", 5)), Accept::Ignored));
    }

    #[test]
    fn lower_sequence_returns_stale_for_anti_entropy() {
        let mut lsdb = Lsdb::default();
        lsdb.offer(lsa("r2", 5));
        match lsdb.offer(lsa("r2", 3)) {
            Accept::Stale(stored) => assert_eq!(stored.seq, 5),
            other => panic!("expected Stale, got {other:?}"),
        }
        // the stale offer must not have replaced the stored entry
        assert_eq!(lsdb.get(&RouterId::from("r2")).unwrap().seq, 5);
    }
}

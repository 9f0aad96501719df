//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Flat, index-keyed tables for interfaces. Per the design notes, records
//! refer to each other by key (a generational [`Index`]) rather than by
//! pointer, so there is no possibility of a reference cycle between an
//! interface and the neighbor it carries.

use std::collections::HashMap;

use generational_arena::{Arena, Index};

use crate::interface::Interface;
use crate::router_id::RouterId;

pub type InterfaceId = Index;
pub type NeighborId = Index;

#[derive(Debug, Default)]
pub struct Interfaces {
    arena: Arena<Interface>,
    name_tree: HashMap<String, InterfaceId>,
    // Reverse lookup: peer router-id -> interface connecting to it. Only
    // populated once a neighbor has sent at least one HELLO.
    router_id_tree: HashMap<RouterId, InterfaceId>,
}

impl Interfaces {
    pub fn insert(&mut self, iface: Interface) -> InterfaceId {
        let name = iface.name.clone();
        let id = self.arena.insert(iface);
        self.name_tree.insert(name, id);
        id
    }

    pub fn get_by_name(&self, name: &str) -> Option<InterfaceId> {
        self.name_tree.get(name).copied()
    }

    pub fn get_by_router_id(&self, router_id: &RouterId) -> Option<InterfaceId> {
        self.router_id_tree.get(router_id).copied()
    }

    // Must be called whenever a neighbor's router-id becomes known or
    // changes, to keep the reverse-lookup table consistent.
    pub fn reindex_neighbor(&mut self, id: InterfaceId, router_id: Option<RouterId>) {
        self.router_id_tree.retain(|_, v| *v != id);
        if let Some(router_id) = router_id {
            self.router_id_tree.insert(router_id, id);
        }
    }

    pub fn get(&self, id: InterfaceId) -> Option<&Interface> {
        self.arena.get(id)
    }

    pub fn get_mut(&mut self, id: InterfaceId) -> Option<&mut Interface> {
        self.arena.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (InterfaceId, &Interface)> {
        self.arena.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (InterfaceId, &mut Interface)> {
        self.arena.iter_mut()
    }

    pub fn indexes(&self) -> impl Iterator<Item = InterfaceId> + '_ {
        self.arena.iter().map(|(id, _)| id)
    }
}

impl std::ops::Index<InterfaceId> for Interfaces {
    type Output = Interface;

    fn index(&self, id: InterfaceId) -> &Interface {
        &self.arena[id]
    }
}

impl std::ops::IndexMut<InterfaceId> for Interfaces {
    fn index_mut(&mut self, id: InterfaceId) -> &mut Interface {
        &mut self.arena[id]
    }
}

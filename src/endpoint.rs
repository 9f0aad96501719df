//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Intent endpoint resolution. The wire protocol names intent endpoints
//! with free-form strings (`"pc1"`, `"pc5"`) that have no distribution
//! mechanism of their own (see SPEC_FULL.md's Open Questions). This table
//! is the operator-supplied binding from such a name to the router-id that
//! originates it; a name with no binding is assumed to already be a
//! router-id.

use std::collections::HashMap;

use crate::router_id::RouterId;

#[derive(Clone, Debug, Default)]
pub struct EndpointTable {
    bindings: HashMap<String, RouterId>,
}

impl EndpointTable {
    pub fn new(bindings: impl IntoIterator<Item = (String, RouterId)>) -> EndpointTable {
        EndpointTable {
            bindings: bindings.into_iter().collect(),
        }
    }

    pub fn resolve(&self, name: &str) -> RouterId {
        self.bindings
            .get(name)
            .cloned()
            .unwrap_or_else(|| RouterId::from(name))
    }
}

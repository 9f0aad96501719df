//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::fmt;
use std::str::FromStr;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// A stable opaque identifier for a node, unique within the routing domain
/// (e.g. "r3"). Carries no further structure; equality and ordering are
/// plain string comparison.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub struct RouterId(Box<str>);

impl RouterId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RouterId {
    fn from(s: &str) -> RouterId {
        RouterId(s.into())
    }
}

impl From<String> for RouterId {
    fn from(s: String) -> RouterId {
        RouterId(s.into_boxed_str())
    }
}

impl FromStr for RouterId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<RouterId, Self::Err> {
        Ok(RouterId::from(s))
    }
}

impl fmt::Display for RouterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::borrow::Borrow<str> for RouterId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A non-negative path or edge cost. Wraps an `f64` in [`OrderedFloat`] so it
/// can key the SPF candidate list (`BTreeMap`), which plain `f64` cannot do
/// since it isn't `Ord`.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub struct Cost(OrderedFloat<f64>);

impl Cost {
    pub const ZERO: Cost = Cost(OrderedFloat(0.0));

    pub fn new(value: f64) -> Cost {
        Cost(OrderedFloat(value))
    }

    pub fn get(self) -> f64 {
        self.0.0
    }

    pub fn saturating_add(self, other: Cost) -> Cost {
        Cost::new(self.get() + other.get())
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Southbound: installs the RIB shadow into the kernel forwarding table.
//! Abstracted behind [`RibInstaller`] so the instance event loop can run
//! against a recording fake in tests without touching the real kernel.

pub mod netlink;

use std::future::Future;
use std::pin::Pin;

use ipnetwork::Ipv4Network;

use crate::error::Error;
use crate::route::RouteEntry;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait RibInstaller: Send {
    fn install<'a>(&'a mut self, entry: &'a RouteEntry) -> BoxFuture<'a, Result<(), Error>>;
    fn remove<'a>(&'a mut self, prefix: &'a Ipv4Network) -> BoxFuture<'a, Result<(), Error>>;
}

/// Test double that records what it was asked to do instead of touching
/// the kernel. Used by the instance's own integration tests.
#[derive(Debug, Default)]
pub struct RecordingInstaller {
    pub installed: Vec<RouteEntry>,
    pub removed: Vec<Ipv4Network>,
}

impl RibInstaller for RecordingInstaller {
    fn install<'a>(&'a mut self, entry: &'a RouteEntry) -> BoxFuture<'a, Result<(), Error>> {
        Box::pin(async move {
            self.installed.push(entry.clone());
            Ok(())
        })
    }

    fn remove<'a>(&'a mut self, prefix: &'a Ipv4Network) -> BoxFuture<'a, Result<(), Error>> {
        Box::pin(async move {
            self.removed.push(*prefix);
            Ok(())
        })
    }
}

//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Concrete kernel installer, built on `rtnetlink` the same way the
//! routing RIB southbound does it: one connection handle, `RTPROT_*`
//! tagging so installed routes are attributable back to this daemon.

use std::collections::HashMap;

use futures::TryStreamExt;
use ipnetwork::Ipv4Network;
use rtnetlink::Handle;

use crate::error::Error;
use crate::route::RouteEntry;
use crate::southbound::{BoxFuture, RibInstaller};

/// Locally assigned per rt_protos(5); IARP has no IANA-registered
/// `RTPROT_*` value of its own.
const RTPROT_IARP: u8 = 200;

pub struct NetlinkInstaller {
    handle: Handle,
    ifindex_cache: HashMap<String, u32>,
}

impl NetlinkInstaller {
    pub fn new(handle: Handle) -> NetlinkInstaller {
        NetlinkInstaller {
            handle,
            ifindex_cache: HashMap::new(),
        }
    }

    async fn ifindex(&mut self, iface: &str) -> Result<u32, Error> {
        if let Some(index) = self.ifindex_cache.get(iface) {
            return Ok(*index);
        }
        let mut links = self.handle.link().get().match_name(iface.to_string()).execute();
        let link = links
            .try_next()
            .await
            .map_err(Error::Netlink)?
            .ok_or_else(|| Error::IfindexNotFound(iface.to_string()))?;
        let index = link.header.index;
        self.ifindex_cache.insert(iface.to_string(), index);
        Ok(index)
    }
}

impl RibInstaller for NetlinkInstaller {
    fn install<'a>(&'a mut self, entry: &'a RouteEntry) -> BoxFuture<'a, Result<(), Error>> {
        Box::pin(async move {
            let ifindex = self.ifindex(&entry.iface).await?;
            self.handle
                .route()
                .add()
                .protocol(RTPROT_IARP)
                .v4()
                .replace()
                .destination_prefix(entry.prefix.ip(), entry.prefix.prefix())
                .gateway(entry.next_hop)
                .output_interface(ifindex)
                .execute()
                .await
                .map_err(Error::Netlink)
        })
    }

    fn remove<'a>(&'a mut self, prefix: &'a Ipv4Network) -> BoxFuture<'a, Result<(), Error>> {
        Box::pin(async move {
            let mut request = self.handle.route().add().protocol(RTPROT_IARP).v4();
            request = request.destination_prefix(prefix.ip(), prefix.prefix());
            self.handle
                .route()
                .del(request.message_mut().clone())
                .execute()
                .await
                .map_err(Error::Netlink)
        })
    }
}

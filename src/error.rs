//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use tracing::warn;

use crate::collections::{InterfaceId, NeighborId};
use crate::router_id::RouterId;

/// Daemon-wide error taxonomy. Every variant is handled at the component
/// that produces it (its `.log()` is called and the event loop continues);
/// none of these propagate out to `main`.
#[derive(Debug)]
pub enum Error {
    Io(IoError),
    InterfaceIdNotFound(InterfaceId),
    NeighborIdNotFound(NeighborId),
    WireDecodeError(serde_json::Error),
    UnknownMessageSource(std::net::SocketAddr),
    SpfRootNotFound(RouterId),
    DuplicateNeighborOnInterface(String),
    Netlink(rtnetlink::Error),
    IfindexNotFound(String),
}

#[derive(Debug)]
pub enum IoError {
    SocketBind(std::io::Error),
    Send(std::io::Error),
    Recv(std::io::Error),
}

impl Error {
    pub fn log(&self) {
        match self {
            Error::Io(error) => error.log(),
            Error::InterfaceIdNotFound(id) => {
                warn!(?id, "{}", self);
            }
            Error::NeighborIdNotFound(id) => {
                warn!(?id, "{}", self);
            }
            Error::WireDecodeError(error) => {
                warn!(%error, "{}", self);
            }
            Error::UnknownMessageSource(addr) => {
                warn!(%addr, "{}", self);
            }
            Error::SpfRootNotFound(router_id) => {
                warn!(%router_id, "{}", self);
            }
            Error::DuplicateNeighborOnInterface(iface) => {
                warn!(%iface, "{}", self);
            }
            Error::Netlink(error) => {
                warn!(%error, "{}", self);
            }
            Error::IfindexNotFound(name) => {
                warn!(%name, "{}", self);
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(error) => error.fmt(f),
            Error::InterfaceIdNotFound(..) => write!(f, "interface ID not found"),
            Error::NeighborIdNotFound(..) => write!(f, "neighbor ID not found"),
            Error::WireDecodeError(..) => write!(f, "failed to decode wire message"),
            Error::UnknownMessageSource(..) => write!(f, "message from unrecognized source"),
            Error::SpfRootNotFound(..) => write!(f, "SPF root not found in LSDB"),
            Error::DuplicateNeighborOnInterface(iface) => {
                write!(f, "duplicate neighbor observed on interface '{iface}'")
            }
            Error::Netlink(..) => write!(f, "netlink request failed"),
            Error::IfindexNotFound(name) => write!(f, "no ifindex found for interface '{name}'"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(error) => Some(error),
            Error::WireDecodeError(error) => Some(error),
            Error::Netlink(error) => Some(error),
            _ => None,
        }
    }
}

impl From<IoError> for Error {
    fn from(error: IoError) -> Error {
        Error::Io(error)
    }
}

impl IoError {
    pub fn log(&self) {
        match self {
            IoError::SocketBind(error) => {
                warn!(%error, "{}", self);
            }
            IoError::Send(error) => {
                warn!(%error, "{}", self);
            }
            IoError::Recv(error) => {
                warn!(%error, "{}", self);
            }
        }
    }
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoError::SocketBind(..) => write!(f, "failed to bind control-plane socket"),
            IoError::Send(..) => write!(f, "failed to send UDP datagram"),
            IoError::Recv(..) => write!(f, "failed to receive UDP datagram"),
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IoError::SocketBind(error) | IoError::Send(error) | IoError::Recv(error) => {
                Some(error)
            }
        }
    }
}

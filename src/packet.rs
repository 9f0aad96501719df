//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Wire messages. One JSON object per UDP datagram, tagged by `"type"`.
//!
//! This is the closed union the design notes ask for in place of ad hoc
//! dynamic JSON: each variant has explicit, typed fields, and unknown
//! `"type"` values or malformed JSON fail to deserialize rather than being
//! silently accepted.

use enum_as_inner::EnumAsInner;
use ipnetwork::Ipv4Network;
use serde::{Deserialize, Serialize};

use crate::router_id::RouterId;

#[derive(Clone, Debug, Deserialize, Serialize, EnumAsInner)]
#[serde(tag = "type")]
pub enum Message {
    #[serde(rename = "HELLO")]
    Hello(Hello),
    #[serde(rename = "LSA")]
    Lsa(LsaMsg),
    #[serde(rename = "INTENT")]
    Intent(IntentMsg),
    #[serde(rename = "INTENT_DELETE")]
    IntentDelete(IntentDeleteMsg),
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Hello {
    pub router_id: RouterId,
    pub iface: String,
    pub bw: f64,
    pub delay: f64,
    #[serde(default)]
    pub seen: Vec<RouterId>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LsaMsg {
    pub origin: RouterId,
    pub seq: u64,
    pub ts: f64,
    pub links: Vec<LsaLinkMsg>,
    #[serde(default)]
    pub stubs: Vec<Ipv4Network>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LsaLinkMsg {
    pub peer: RouterId,
    pub bw: f64,
    pub delay: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IntentMsg {
    pub src: String,
    pub dst: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_bandwidth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_latency: Option<f64>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IntentDeleteMsg {
    pub src: String,
    pub dst: String,
}

/// Maximum size reserved for a single LSA datagram (spec: "< 1200 bytes
/// reserved"); there is no fragmentation across datagrams, so an LSA that
/// would serialize larger than this is a configuration error rather than
/// something the flooder can recover from.
pub const MAX_LSA_DATAGRAM: usize = 1200;

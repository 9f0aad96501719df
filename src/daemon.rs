//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! The control-plane loop (spec §4.7, §5): a single cooperative
//! `tokio::select!` multiplexing UDP receive, the HELLO/dead-sweep tick,
//! the LSA refresh tick, and the recompute-coalesce timer. All mutation
//! of [`Instance`] happens between suspension points, so nothing here
//! needs locking.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::Instant as TokioInstant;

use crate::collections::InterfaceId;
use crate::config::Config;
use crate::error::{Error, IoError};
use crate::instance::{self, Instance, Outcome};
use crate::packet::Message;
use crate::southbound::RibInstaller;

pub struct Daemon {
    instance: Instance,
    socket: UdpSocket,
    installer: Box<dyn RibInstaller>,
    control_port: u16,
    hello_interval: Duration,
    dead_interval: Duration,
    lsa_refresh_interval: Duration,
    recompute_coalesce: Duration,
    recompute_deadline: Option<TokioInstant>,
}

impl Daemon {
    pub async fn bind(config: Config, installer: Box<dyn RibInstaller>) -> Result<Daemon, Error> {
        let socket = UdpSocket::bind(("0.0.0.0", config.control_port))
            .await
            .map_err(IoError::SocketBind)?;

        Ok(Daemon {
            instance: Instance::new(&config),
            socket,
            installer,
            control_port: config.control_port,
            hello_interval: config.hello_interval,
            dead_interval: config.dead_interval,
            lsa_refresh_interval: config.lsa_refresh_interval,
            recompute_coalesce: config.recompute_coalesce,
            recompute_deadline: None,
        })
    }

    /// Runs until `shutdown` resolves. There is no graceful-goodbye LSA
    /// (spec §5 "Cancellation"): the loop simply stops.
    pub async fn run(mut self, shutdown: impl std::future::Future<Output = ()>) {
        tokio::pin!(shutdown);
        let mut hello_tick = tokio::time::interval(self.hello_interval);
        let mut lsa_refresh_tick = tokio::time::interval(self.lsa_refresh_interval);
        let mut buf = [0u8; crate::packet::MAX_LSA_DATAGRAM];

        loop {
            let recompute_sleep = async {
                match self.recompute_deadline {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                biased;

                () = &mut shutdown => {
                    break;
                }

                recv = self.socket.recv_from(&mut buf) => {
                    match recv {
                        Ok((n, addr)) => self.handle_datagram(&buf[..n], addr).await,
                        Err(error) => Error::Io(IoError::Recv(error)).log(),
                    }
                }

                _ = hello_tick.tick() => {
                    self.send_hellos().await;
                }

                _ = lsa_refresh_tick.tick() => {
                    let outcome = self.instance.refresh_lsa();
                    self.dispatch(outcome).await;
                }

                () = recompute_sleep => {
                    self.recompute_deadline = None;
                    self.apply_recompute().await;
                }
            }
        }
    }

    async fn send_hellos(&mut self) {
        let hellos = self.instance.tick_hello();
        for (iface_id, msg) in hellos {
            self.send_to_iface(iface_id, &msg).await;
        }
        let outcome = self.instance.sweep(self.dead_interval);
        self.dispatch(outcome).await;
    }

    async fn handle_datagram(&mut self, data: &[u8], addr: SocketAddr) {
        let msg: Message = match serde_json::from_slice(data) {
            Ok(msg) => msg,
            Err(error) => {
                Error::WireDecodeError(error).log();
                return;
            }
        };

        // INTENT/INTENT_DELETE are operator-injected control traffic
        // (spec §4.5, §6), not neighbor traffic: the source may be a
        // stub host with no configured point-to-point adjacency to this
        // node at all. Only HELLO/LSA need a resolved neighbor iface.
        if matches!(msg, Message::Intent(_) | Message::IntentDelete(_)) {
            let outcome = self.instance.receive_intent(msg);
            self.dispatch(outcome).await;
            return;
        }

        let Some(iface_id) = self.resolve_iface(addr.ip()) else {
            Error::UnknownMessageSource(addr).log();
            return;
        };

        match self.instance.receive(iface_id, msg) {
            Ok(outcome) => self.dispatch(outcome).await,
            Err(error) => error.log(),
        }
    }

    fn resolve_iface(&self, addr: IpAddr) -> Option<InterfaceId> {
        let IpAddr::V4(addr) = addr else {
            return None;
        };
        self.instance
            .ifaces
            .iter()
            .find(|(_, iface)| iface.peer_addr == addr)
            .map(|(id, _)| id)
    }

    async fn dispatch(&mut self, outcome: Outcome) {
        for (iface_id, msg) in outcome.sends {
            self.send_to_iface(iface_id, &msg).await;
        }
        if outcome.recompute && self.recompute_deadline.is_none() {
            self.recompute_deadline = Some(TokioInstant::now() + self.recompute_coalesce);
        }
    }

    async fn send_to_iface(&self, iface_id: InterfaceId, msg: &Message) {
        let Some(iface) = self.instance.ifaces.get(iface_id) else {
            Error::InterfaceIdNotFound(iface_id).log();
            return;
        };
        let addr = SocketAddr::new(IpAddr::V4(iface.peer_addr), self.control_port);
        self.send_msg(addr, msg).await;
    }

    async fn send_msg(&self, addr: SocketAddr, msg: &Message) {
        let bytes = serde_json::to_vec(msg).expect("wire messages always serialize to JSON");
        if let Err(error) = self.socket.send_to(&bytes, addr).await {
            Error::Io(IoError::Send(error)).log();
        }
    }

    async fn apply_recompute(&mut self) {
        let diff = self.instance.recompute();

        for entry in diff.install {
            match self.installer.install(&entry).await {
                Ok(()) => {
                    instance::log_route_install(&entry);
                    self.instance.rib.mark_installed(entry);
                }
                Err(error) => {
                    error.log();
                    instance::log_route_install_fail(&entry.prefix);
                }
            }
        }

        for prefix in diff.remove {
            match self.installer.remove(&prefix).await {
                Ok(()) => {
                    instance::log_route_remove(&prefix);
                    self.instance.rib.mark_removed(&prefix);
                }
                Err(error) => {
                    error.log();
                    instance::log_route_install_fail(&prefix);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InterfaceConfig;
    use crate::packet::{Hello, IntentMsg};
    use crate::router_id::RouterId;
    use crate::southbound::RecordingInstaller;

    fn config() -> Config {
        Config {
            router_id: RouterId::from("r1"),
            interfaces: vec![InterfaceConfig {
                name: "r1-eth0".to_string(),
                local_addr: "10.0.12.1".parse().unwrap(),
                peer_addr: "10.0.12.2".parse().unwrap(),
                bandwidth: 20.0,
                delay: 5.0,
            }],
            stubs: vec![],
            endpoints: vec![
                ("pc1".to_string(), RouterId::from("r1")),
                ("pc5".to_string(), RouterId::from("r5")),
            ],
            // Bind to an ephemeral port; these tests drive handle_datagram
            // directly rather than going over the real network.
            control_port: 0,
            hello_interval: Duration::from_secs(2),
            dead_interval: Duration::from_secs(8),
            lsa_refresh_interval: Duration::from_secs(30),
            recompute_coalesce: Duration::from_millis(100),
        }
    }

    async fn daemon() -> Daemon {
        Daemon::bind(config(), Box::new(RecordingInstaller::default()))
            .await
            .unwrap()
    }

    // An unrecognized source address -- e.g. a stub host injecting an
    // intent, not a configured point-to-point neighbor (spec §4.5, §6).
    fn stub_host_addr() -> SocketAddr {
        "192.0.2.9:40000".parse().unwrap()
    }

    #[tokio::test]
    async fn intent_from_unrecognized_source_is_still_applied() {
        let mut daemon = daemon().await;
        let payload = serde_json::to_vec(&Message::Intent(IntentMsg {
            src: "pc1".to_string(),
            dst: "pc5".to_string(),
            min_bandwidth: Some(30.0),
            max_latency: None,
        }))
        .unwrap();

        daemon.handle_datagram(&payload, stub_host_addr()).await;

        assert!(daemon.instance.intents.get("pc1", "pc5").is_some());
    }

    #[tokio::test]
    async fn intent_delete_from_unrecognized_source_is_still_applied() {
        let mut daemon = daemon().await;
        daemon.instance.receive_intent(Message::Intent(IntentMsg {
            src: "pc1".to_string(),
            dst: "pc5".to_string(),
            min_bandwidth: Some(30.0),
            max_latency: None,
        }));

        let payload = serde_json::to_vec(&Message::IntentDelete(crate::packet::IntentDeleteMsg {
            src: "pc1".to_string(),
            dst: "pc5".to_string(),
        }))
        .unwrap();
        daemon.handle_datagram(&payload, stub_host_addr()).await;

        assert!(daemon.instance.intents.get("pc1", "pc5").is_none());
    }

    #[tokio::test]
    async fn hello_from_unrecognized_source_is_dropped() {
        let mut daemon = daemon().await;
        let payload = serde_json::to_vec(&Message::Hello(Hello {
            router_id: RouterId::from("rX"),
            iface: "rX-eth0".to_string(),
            bw: 20.0,
            delay: 5.0,
            seen: vec![],
        }))
        .unwrap();

        daemon.handle_datagram(&payload, stub_host_addr()).await;

        assert!(daemon.instance.neighbors().is_empty());
    }
}

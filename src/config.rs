//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;
use std::time::Duration;

use clap::{App, Arg};
use ipnetwork::Ipv4Network;

use crate::router_id::RouterId;

/// Statically configured point-to-point interface.
#[derive(Clone, Debug)]
pub struct InterfaceConfig {
    pub name: String,
    pub local_addr: Ipv4Addr,
    pub peer_addr: Ipv4Addr,
    pub bandwidth: f64,
    pub delay: f64,
}

/// Process-wide configuration, built once at startup from the command line.
#[derive(Clone, Debug)]
pub struct Config {
    pub router_id: RouterId,
    pub interfaces: Vec<InterfaceConfig>,
    pub stubs: Vec<Ipv4Network>,
    pub endpoints: Vec<(String, RouterId)>,
    pub control_port: u16,
    pub hello_interval: Duration,
    pub dead_interval: Duration,
    pub lsa_refresh_interval: Duration,
    pub recompute_coalesce: Duration,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingRouterId,
    InvalidInterface(String),
    InvalidStub(String),
    InvalidEndpoint(String),
    InvalidPort(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingRouterId => write!(f, "missing --router-id"),
            ConfigError::InvalidInterface(s) => {
                write!(f, "invalid --iface value '{s}' (expected name:local_ip:peer_ip:bw:delay)")
            }
            ConfigError::InvalidStub(s) => {
                write!(f, "invalid --stub prefix '{s}'")
            }
            ConfigError::InvalidEndpoint(s) => {
                write!(f, "invalid --endpoint binding '{s}' (expected name=router_id)")
            }
            ConfigError::InvalidPort(s) => {
                write!(f, "invalid --control-port value '{s}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn parse_args<I, T>(args: I) -> Result<Config, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = App::new("iarpd")
            .version(clap::crate_version!())
            .about("Intent-aware link-state routing daemon")
            .arg(
                Arg::with_name("router-id")
                    .long("router-id")
                    .value_name("id")
                    .required(true)
                    .help("This node's stable router identifier, e.g. r1"),
            )
            .arg(
                Arg::with_name("iface")
                    .long("iface")
                    .value_name("name:local_ip:peer_ip:bw:delay")
                    .multiple(true)
                    .number_of_values(1)
                    .help("Point-to-point interface, repeatable"),
            )
            .arg(
                Arg::with_name("stub")
                    .long("stub")
                    .value_name("prefix")
                    .multiple(true)
                    .number_of_values(1)
                    .help("Locally attached stub prefix, repeatable"),
            )
            .arg(
                Arg::with_name("endpoint")
                    .long("endpoint")
                    .value_name("name=router_id")
                    .multiple(true)
                    .number_of_values(1)
                    .help("Static intent endpoint binding, repeatable"),
            )
            .arg(
                Arg::with_name("control-port")
                    .long("control-port")
                    .value_name("port")
                    .default_value("20001"),
            )
            .arg(
                Arg::with_name("hello-interval")
                    .long("hello-interval")
                    .value_name("seconds")
                    .default_value("2"),
            )
            .arg(
                Arg::with_name("dead-interval")
                    .long("dead-interval")
                    .value_name("seconds")
                    .default_value("8"),
            )
            .arg(
                Arg::with_name("lsa-refresh-interval")
                    .long("lsa-refresh-interval")
                    .value_name("seconds")
                    .default_value("30"),
            )
            .arg(
                Arg::with_name("recompute-coalesce-ms")
                    .long("recompute-coalesce-ms")
                    .value_name("milliseconds")
                    .default_value("100"),
            )
            .get_matches_from(args);

        let router_id = RouterId::from(
            matches.value_of("router-id").ok_or(ConfigError::MissingRouterId)?,
        );

        let interfaces = matches
            .values_of("iface")
            .into_iter()
            .flatten()
            .map(parse_iface)
            .collect::<Result<Vec<_>, _>>()?;

        let stubs = matches
            .values_of("stub")
            .into_iter()
            .flatten()
            .map(|s| {
                s.parse::<Ipv4Network>()
                    .map_err(|_| ConfigError::InvalidStub(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let endpoints = matches
            .values_of("endpoint")
            .into_iter()
            .flatten()
            .map(parse_endpoint)
            .collect::<Result<Vec<_>, _>>()?;

        let control_port = matches
            .value_of("control-port")
            .unwrap()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(matches.value_of("control-port").unwrap().to_string()))?;

        let hello_interval = Duration::from_secs_f64(
            matches.value_of("hello-interval").unwrap().parse().unwrap_or(2.0),
        );
        let dead_interval = Duration::from_secs_f64(
            matches.value_of("dead-interval").unwrap().parse().unwrap_or(8.0),
        );
        let lsa_refresh_interval = Duration::from_secs_f64(
            matches
                .value_of("lsa-refresh-interval")
                .unwrap()
                .parse()
                .unwrap_or(30.0),
        );
        let recompute_coalesce = Duration::from_millis(
            matches
                .value_of("recompute-coalesce-ms")
                .unwrap()
                .parse()
                .unwrap_or(100),
        );

        Ok(Config {
            router_id,
            interfaces,
            stubs,
            endpoints,
            control_port,
            hello_interval,
            dead_interval,
            lsa_refresh_interval,
            recompute_coalesce,
        })
    }
}

fn parse_iface(raw: &str) -> Result<InterfaceConfig, ConfigError> {
    let parts: Vec<&str> = raw.split(':').collect();
    let [name, local_ip, peer_ip, bw, delay] = parts.as_slice() else {
        return Err(ConfigError::InvalidInterface(raw.to_string()));
    };
    let local_addr = local_ip
        .parse::<Ipv4Addr>()
        .map_err(|_| ConfigError::InvalidInterface(raw.to_string()))?;
    let peer_addr = peer_ip
        .parse::<Ipv4Addr>()
        .map_err(|_| ConfigError::InvalidInterface(raw.to_string()))?;
    let bandwidth = bw
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidInterface(raw.to_string()))?;
    let delay = delay
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidInterface(raw.to_string()))?;

    Ok(InterfaceConfig {
        name: (*name).to_string(),
        local_addr,
        peer_addr,
        bandwidth,
        delay,
    })
}

fn parse_endpoint(raw: &str) -> Result<(String, RouterId), ConfigError> {
    let (name, router_id) = raw
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidEndpoint(raw.to_string()))?;
    if name.is_empty() || router_id.is_empty() {
        return Err(ConfigError::InvalidEndpoint(raw.to_string()));
    }
    Ok((name.to_string(), RouterId::from(router_id)))
}

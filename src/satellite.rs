//! Best-effort forwarding of rendered colors to satellite devices over UDP.
//!
//! Satellites are small auxiliary fixtures (typically ESP8266 boards) that mirror
//! the main strip. Each rendered color is sent to every satellite as the decimal
//! string of its packed `0xRRGGBB` value. Sends never block and failures are only
//! logged.

use std::io;
use std::net::{IpAddr, SocketAddr, UdpSocket};

use log::{debug, warn};

use crate::color::Color;
use crate::config::ConfigError;

/// Port used for satellite entries given without one.
pub const DEFAULT_SATELLITE_PORT: u16 = 4210;

/// Parses a comma-separated list of `ip` or `ip:port` entries.
///
/// Blank input yields an empty list; surrounding whitespace is ignored.
pub fn parse_satellites(list: &str) -> Result<Vec<SocketAddr>, ConfigError> {
    let list = list.trim();
    if list.is_empty() {
        return Ok(Vec::new());
    }

    list.split(',')
        .map(str::trim)
        .enumerate()
        .map(|(index, entry)| {
            parse_satellite(entry).ok_or(ConfigError::InvalidSatelliteAddress { index })
        })
        .collect()
}

fn parse_satellite(entry: &str) -> Option<SocketAddr> {
    if let Ok(addr) = entry.parse::<SocketAddr>() {
        return Some(addr);
    }
    entry
        .parse::<IpAddr>()
        .ok()
        .map(|ip| SocketAddr::new(ip, DEFAULT_SATELLITE_PORT))
}

/// A UDP socket and the satellites it forwards to.
#[derive(Debug)]
pub struct SatelliteLink {
    socket: Option<UdpSocket>,
    targets: Vec<SocketAddr>,
}

impl SatelliteLink {
    /// A link with no satellites. Binds nothing.
    pub fn none() -> Self {
        Self {
            socket: None,
            targets: Vec::new(),
        }
    }

    /// Binds a non-blocking socket on an ephemeral port for `targets`.
    ///
    /// An empty target list binds nothing.
    pub fn bind(targets: Vec<SocketAddr>) -> io::Result<Self> {
        if targets.is_empty() {
            return Ok(Self::none());
        }
        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        socket.set_nonblocking(true)?;
        debug!("satellite link bound to {:?} for {} targets", socket.local_addr(), targets.len());
        Ok(Self {
            socket: Some(socket),
            targets,
        })
    }

    pub fn targets(&self) -> &[SocketAddr] {
        &self.targets
    }

    /// Sends `color` to every satellite, ignoring failures.
    pub fn broadcast(&self, color: Color) {
        let Some(socket) = &self.socket else {
            return;
        };
        let payload = color.packed().to_string();
        for target in &self.targets {
            if let Err(e) = socket.send_to(payload.as_bytes(), target) {
                warn!("satellite {} unreachable: {}", target, e);
            }
        }
    }
}

impl Default for SatelliteLink {
    fn default() -> Self {
        Self::none()
    }
}

use std::net::{IpAddr, SocketAddr, ToSocketAddrs, UdpSocket};

use tracing::debug;

use crate::error::{ProvisionError, Result};

/// Destination used to pick the private-network interface; never contacted
const PRIVATE_PROBE: &str = "10.255.255.255:1";
/// Host used to pick the internet-facing interface
const PUBLIC_PROBE: (&str, u16) = ("www.google.com", 80);

/// Address the server should bind to.
///
/// * `local = true` - the host's private address
/// * `local = false` - the address of the internet-facing interface
pub fn bind_address(local: bool) -> Result<IpAddr> {
    if local {
        let probe: SocketAddr = PRIVATE_PROBE
            .parse()
            .map_err(|e| ProvisionError::network(format!("bad probe address: {}", e)))?;
        source_address_for(probe)
            .map_err(|e| ProvisionError::network(format!("Was not able to get private IP: {}", e)))
    } else {
        let probe = PUBLIC_PROBE
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.find(SocketAddr::is_ipv4))
            .ok_or_else(|| {
                ProvisionError::network(format!(
                    "Was not able to get global IP: could not resolve {}",
                    PUBLIC_PROBE.0
                ))
            })?;
        source_address_for(probe)
            .map_err(|e| ProvisionError::network(format!("Was not able to get global IP: {}", e)))
    }
}

/// Local address the OS routes traffic to `destination` from.
///
/// Connecting a UDP socket only selects a route; no packet is sent.
fn source_address_for(destination: SocketAddr) -> std::io::Result<IpAddr> {
    let socket = UdpSocket::bind(("0.0.0.0", 0))?;
    socket.connect(destination)?;
    let ip = socket.local_addr()?.ip();
    debug!(%destination, %ip, "selected source address");
    Ok(ip)
}

//! Point-in-time hardware snapshot for node registration.
//!
//! Captured once at worker startup and upserted into the node registry.
//! Advisory metadata only; the claim protocol never consults it.

use std::net::UdpSocket;

/// Hostname, address, and capacity of the machine a worker runs on.
#[derive(Debug, Clone, PartialEq)]
pub struct HardwareSnapshot {
    pub hostname: String,
    pub ip_address: String,
    pub cpu_cores: i32,
    pub memory_gb: f64,
}

/// Capture the local machine's snapshot.
///
/// Falls back to `"unknown"` / `0` fields rather than failing: registration
/// is observability metadata and must never stop a worker from starting.
pub fn capture() -> HardwareSnapshot {
    HardwareSnapshot {
        hostname: hostname(),
        ip_address: local_ip().unwrap_or_else(|| "127.0.0.1".to_string()),
        cpu_cores: cpu_cores(),
        memory_gb: memory_gb(),
    }
}

/// Read the system hostname.
fn hostname() -> String {
    let mut buf = [0u8; 256];
    // Safety: buf is a valid, writable buffer of the length passed in;
    // gethostname NUL-terminates on success.
    let ret = unsafe { libc::gethostname(buf.as_mut_ptr() as *mut libc::c_char, buf.len()) };
    if ret != 0 {
        return "unknown".to_string();
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).to_string()
}

/// Number of logical CPU cores.
fn cpu_cores() -> i32 {
    // Safety: sysconf with a valid name constant has no preconditions.
    let n = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
    if n > 0 {
        n as i32
    } else {
        0
    }
}

/// Total physical memory in GB, rounded to two decimal places.
fn memory_gb() -> f64 {
    // Safety: sysconf with a valid name constant has no preconditions.
    let pages = unsafe { libc::sysconf(libc::_SC_PHYS_PAGES) };
    let page_size = unsafe { libc::sysconf(libc::_SC_PAGE_SIZE) };
    if pages <= 0 || page_size <= 0 {
        return 0.0;
    }
    let bytes = pages as f64 * page_size as f64;
    (bytes / (1024.0 * 1024.0 * 1024.0) * 100.0).round() / 100.0
}

/// Determine the primary outbound IP address.
///
/// Connecting a UDP socket sends no packets; it only asks the kernel which
/// local address would route toward the target.
fn local_ip() -> Option<String> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    Some(socket.local_addr().ok()?.ip().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_reports_plausible_values() {
        let snap = capture();
        assert!(!snap.hostname.is_empty());
        assert!(!snap.ip_address.is_empty());
        assert!(snap.cpu_cores >= 1);
        assert!(snap.memory_gb > 0.0);
    }

    #[test]
    fn memory_is_rounded_to_two_decimals() {
        let snap = capture();
        let scaled = snap.memory_gb * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-9);
    }
}

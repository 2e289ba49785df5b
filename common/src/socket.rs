//! Well-known rendezvous point for the coordinator's RPC socket.

use std::path::PathBuf;

/// The default Unix socket path, derived from the current user so that
/// concurrent users on one machine do not collide.
pub fn coordinator_sock() -> PathBuf {
    // getuid can never fail.
    let uid = unsafe { libc::getuid() };
    PathBuf::from(format!("/var/tmp/mr-{uid}"))
}

//! # Endpoint Rewrite
//!
//! Steers a descriptor at different servers: a shard's replica set to bypass
//! the routing tier, or one of several routers to spread load.

use crate::domain::{ConnectionUri, SplitError};

/// Replace the host list of `original` with `new_hosts`
/// (`server1:port1[,server2:port2,...]`), keeping scheme, credentials, path
/// and options verbatim.
pub fn rewrite_uri(
    original: &ConnectionUri,
    new_hosts: &str,
) -> Result<ConnectionUri, SplitError> {
    if new_hosts.is_empty() || new_hosts.contains(['/', '?', '@']) {
        return Err(SplitError::MalformedDescriptor(format!(
            "'{}' is not a host list",
            new_hosts
        )));
    }

    let rewritten = format!("{}{}{}", original.prefix(), new_hosts, original.suffix());
    ConnectionUri::parse(&rewritten)
}

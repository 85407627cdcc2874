//! # Connection Descriptors
//!
//! `mongodb://[user:pass@]host1[,host2,...][/database.collection][?options]`
//!
//! Only the host-list span is interpreted structurally. Credentials, path and
//! options are kept as the exact text they were written with, so a host-list
//! rewrite never disturbs them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::SplitError;

/// Scheme prefix every descriptor must start with.
pub const MONGODB_PREFIX: &str = "mongodb://";

/// Database used for authentication when the auth descriptor names none.
pub const DEFAULT_AUTH_DATABASE: &str = "admin";

/// Fully qualified collection name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace {
    /// Database name.
    pub database: String,
    /// Collection name.
    pub collection: String,
}

impl Namespace {
    /// Create a namespace.
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}

/// Parsed connection descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConnectionUri {
    raw: String,
    /// Byte offsets of the host-list span inside `raw`.
    host_start: usize,
    host_end: usize,
}

impl ConnectionUri {
    /// Parse a descriptor.
    pub fn parse(uri: &str) -> Result<Self, SplitError> {
        let body = uri.strip_prefix(MONGODB_PREFIX).ok_or_else(|| {
            SplitError::MalformedDescriptor(format!(
                "'{}' does not start with '{}'",
                uri, MONGODB_PREFIX
            ))
        })?;

        let (start, end) = host_span(body);
        if start == end {
            return Err(SplitError::MalformedDescriptor(format!(
                "'{}' has an empty host list",
                uri
            )));
        }

        Ok(Self {
            raw: uri.to_string(),
            host_start: MONGODB_PREFIX.len() + start,
            host_end: MONGODB_PREFIX.len() + end,
        })
    }

    /// The descriptor text exactly as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The raw host-list text, e.g. `host1:27017,host2:27017`.
    pub fn host_list(&self) -> &str {
        &self.raw[self.host_start..self.host_end]
    }

    /// Individual hosts of the host list.
    pub fn hosts(&self) -> Vec<&str> {
        self.host_list()
            .split(',')
            .filter(|h| !h.is_empty())
            .collect()
    }

    /// Text before the host list (scheme plus credentials).
    pub(crate) fn prefix(&self) -> &str {
        &self.raw[..self.host_start]
    }

    /// Text after the host list (path plus options).
    pub(crate) fn suffix(&self) -> &str {
        &self.raw[self.host_end..]
    }

    fn credentials(&self) -> Option<&str> {
        self.prefix()
            .strip_prefix(MONGODB_PREFIX)
            .and_then(|c| c.strip_suffix('@'))
    }

    /// Username, if credentials are present.
    pub fn username(&self) -> Option<&str> {
        self.credentials()
            .map(|c| c.split_once(':').map_or(c, |(user, _)| user))
            .filter(|u| !u.is_empty())
    }

    /// Password, if credentials carry one.
    pub fn password(&self) -> Option<&str> {
        self.credentials()
            .and_then(|c| c.split_once(':'))
            .map(|(_, pass)| pass)
            .filter(|p| !p.is_empty())
    }

    fn path(&self) -> Option<&str> {
        let suffix = self.suffix().strip_prefix('/')?;
        let path = suffix.split_once('?').map_or(suffix, |(p, _)| p);
        if path.is_empty() {
            None
        } else {
            Some(path)
        }
    }

    /// Database named in the path.
    pub fn database(&self) -> Option<&str> {
        self.path()
            .map(|p| p.split_once('.').map_or(p, |(db, _)| db))
            .filter(|db| !db.is_empty())
    }

    /// Collection named in the path.
    pub fn collection(&self) -> Option<&str> {
        self.path()
            .and_then(|p| p.split_once('.'))
            .map(|(_, coll)| coll)
            .filter(|coll| !coll.is_empty())
    }

    /// `database.collection`, if the path names both.
    pub fn namespace(&self) -> Option<Namespace> {
        Some(Namespace::new(self.database()?, self.collection()?))
    }

    /// Option pairs in the order they were written.
    pub fn options(&self) -> Vec<(&str, &str)> {
        let Some((_, query)) = self.suffix().split_once('?') else {
            return Vec::new();
        };
        query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
            .collect()
    }
}

/// Locate the host list inside the descriptor body (text after the scheme).
///
/// The authority ends at the first `/` or `?`; the host list starts after the
/// last `@` inside it. An `@` in the path belongs to the collection name.
fn host_span(body: &str) -> (usize, usize) {
    let end = body.find(['/', '?']).unwrap_or(body.len());
    let start = body[..end].rfind('@').map(|idx| idx + 1).unwrap_or(0);
    (start, end)
}

impl fmt::Display for ConnectionUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for ConnectionUri {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ConnectionUri {
    type Error = SplitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ConnectionUri> for String {
    fn from(uri: ConnectionUri) -> Self {
        uri.raw
    }
}

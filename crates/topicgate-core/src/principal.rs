//! Principals and the per-connection context an authorization request
//! arrives with.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

/// Principal type used by brokers for authenticated users
pub const USER_TYPE: &str = "User";

/// Name the broker assigns to unauthenticated connections
pub const ANONYMOUS_NAME: &str = "ANONYMOUS";

/// An authenticated (or anonymous) identity making a request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub principal_type: String,
    pub name: String,
}

impl Principal {
    pub fn new(principal_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            principal_type: principal_type.into(),
            name: name.into(),
        }
    }

    /// A `User` principal
    pub fn user(name: impl Into<String>) -> Self {
        Self::new(USER_TYPE, name)
    }

    pub fn anonymous() -> Self {
        Self::user(ANONYMOUS_NAME)
    }

    pub fn is_anonymous(&self) -> bool {
        self.principal_type == USER_TYPE && self.name == ANONYMOUS_NAME
    }

    /// Parse a canonical `type:name` string.
    ///
    /// Only the first `:` separates type from name, so certificate subjects
    /// such as `User:CN=alice,O=acme` keep their name intact.
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((principal_type, name)) if !principal_type.is_empty() && !name.is_empty() => {
                Ok(Self::new(principal_type, name))
            }
            _ => Err(Error::InvalidPrincipal(s.to_string())),
        }
    }

    /// The `CN` attribute when the name is a distinguished name
    pub fn common_name(&self) -> Option<&str> {
        common_name(&self.name)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.principal_type, self.name)
    }
}

/// Extract the common name from an X.500 style name like `CN=alice,O=acme`.
///
/// The whole name must parse as a distinguished name: every RDN is
/// `attr=value` with a non-empty value, and `\,` does not split. Names that
/// merely contain a `CN=` fragment return `None`.
pub fn common_name(name: &str) -> Option<&str> {
    let mut cn = None;
    for rdn in split_rdns(name) {
        let (attr, value) = rdn.split_once('=')?;
        let (attr, value) = (attr.trim(), value.trim());
        if !is_attribute_type(attr) || value.is_empty() {
            return None;
        }
        if cn.is_none() && attr.eq_ignore_ascii_case("CN") {
            cn = Some(value);
        }
    }
    cn
}

/// Split on commas that are not escaped with a backslash
fn split_rdns(name: &str) -> impl Iterator<Item = &str> + '_ {
    let mut escaped = false;
    name.split(move |c: char| {
        if escaped {
            escaped = false;
            false
        } else if c == '\\' {
            escaped = true;
            false
        } else {
            c == ','
        }
    })
}

/// Attribute keyword (`CN`, `O`, `OU`) or dotted OID
fn is_attribute_type(attr: &str) -> bool {
    !attr.is_empty()
        && attr
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

/// Everything the broker knows about the connection that issued a request
#[derive(Debug, Clone)]
pub struct ConnectionContext {
    pub principal: Principal,
    pub client_address: IpAddr,
    pub listener: Option<String>,
    /// Directory key set by the host; overrides the one derived from the principal
    pub identity_key: Option<String>,
    /// Extra names the client is known by (e.g. certificate subject alternative names)
    pub alternate_names: Vec<String>,
}

impl ConnectionContext {
    pub fn new(principal: Principal, client_address: IpAddr) -> Self {
        Self {
            principal,
            client_address,
            listener: None,
            identity_key: None,
            alternate_names: Vec::new(),
        }
    }

    /// Context for a principal connecting from an unspecified address
    pub fn for_principal(principal: Principal) -> Self {
        Self::new(principal, IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    }

    pub fn with_listener(mut self, listener: impl Into<String>) -> Self {
        self.listener = Some(listener.into());
        self
    }

    pub fn with_identity_key(mut self, identity_key: impl Into<String>) -> Self {
        self.identity_key = Some(identity_key.into());
        self
    }

    pub fn with_alternate_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternate_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Composite `<project>__<user>` key used to look the user up in the
    /// directory. An explicit key wins; otherwise certificate principals
    /// carry it in their `CN` and everyone else in their name.
    pub fn identity_key(&self) -> &str {
        self.identity_key
            .as_deref()
            .or_else(|| self.principal.common_name())
            .unwrap_or(&self.principal.name)
    }

    /// Names checked against the superuser set: the canonical principal
    /// string first, then every alternate name.
    pub fn superuser_candidates(&self) -> Vec<String> {
        let mut candidates = Vec::with_capacity(1 + self.alternate_names.len());
        candidates.push(self.principal.to_string());
        candidates.extend(self.alternate_names.iter().cloned());
        candidates
    }
}

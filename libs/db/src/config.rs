//! Database configuration types.
//!
//! These are deserialized directly from the layered application configuration
//! (`database:` section). Two styles are accepted and may be mixed:
//!
//! | Style | Example |
//! |-------|---------|
//! | Full DSN | `dsn: "postgres://app:secret@db:5432/users"` |
//! | Discrete fields | `host`, `port`, `user`, `password`, `dbname` |
//!
//! When both are present the discrete fields override the matching DSN parts.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ConnectOpts;

/// Connection settings for the backing store.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DbConnConfig {
    /// Full DSN. Optional: the discrete fields below are enough for PostgreSQL.
    pub dsn: Option<String>,

    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub dbname: Option<String>,

    /// Connection pool overrides.
    #[serde(default)]
    pub pool: Option<PoolCfg>,
}

impl DbConnConfig {
    /// True when nothing beyond the pool section was configured.
    pub fn is_unset(&self) -> bool {
        self.dsn.is_none()
            && self.host.is_none()
            && self.port.is_none()
            && self.user.is_none()
            && self.password.is_none()
            && self.dbname.is_none()
    }

    /// Copy with the password replaced by `***` (for printing/logging).
    pub fn redacted(&self) -> Self {
        Self {
            dsn: self
                .dsn
                .as_deref()
                .map(|d| crate::redact_credentials_in_dsn(Some(d))),
            password: self.password.as_ref().map(|_| "***".to_string()),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PoolCfg {
    pub max_conns: Option<u32>,
    pub min_conns: Option<u32>,
    #[serde(with = "humantime_serde", default)]
    pub acquire_timeout: Option<Duration>,
    #[serde(with = "humantime_serde", default)]
    pub idle_timeout: Option<Duration>,
    #[serde(with = "humantime_serde", default)]
    pub max_lifetime: Option<Duration>,
    pub test_before_acquire: Option<bool>,
}

impl PoolCfg {
    /// Overlay these settings on top of `base`; unset fields keep the base value.
    pub fn apply_to(&self, base: ConnectOpts) -> ConnectOpts {
        ConnectOpts {
            max_conns: self.max_conns.or(base.max_conns),
            min_conns: self.min_conns.or(base.min_conns),
            acquire_timeout: self.acquire_timeout.or(base.acquire_timeout),
            idle_timeout: self.idle_timeout.or(base.idle_timeout),
            max_lifetime: self.max_lifetime.or(base.max_lifetime),
            test_before_acquire: self.test_before_acquire.unwrap_or(base.test_before_acquire),
        }
    }
}

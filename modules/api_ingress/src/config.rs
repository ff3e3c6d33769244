use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP ingress configuration (`modules.api_ingress`).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ApiIngressConfig {
    /// Overrides `server.host:server.port` when set.
    pub bind_addr: Option<String>,
    pub cors_enabled: bool,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            bind_addr: None,
            cors_enabled: false,
            request_timeout: Duration::from_secs(30),
            body_limit_bytes: 16 * 1024 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_section_keeps_defaults() {
        let cfg: ApiIngressConfig = serde_json::from_value(serde_json::json!({
            "cors_enabled": true,
            "request_timeout": "5s"
        }))
        .unwrap();
        assert!(cfg.cors_enabled);
        assert_eq!(cfg.request_timeout, Duration::from_secs(5));
        assert_eq!(cfg.body_limit_bytes, 16 * 1024 * 1024);
        assert_eq!(cfg.bind_addr, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res: Result<ApiIngressConfig, _> =
            serde_json::from_value(serde_json::json!({ "enable_docs": true }));
        assert!(res.is_err());
    }
}

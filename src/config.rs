//! Pod identity, resolved once at startup.
//!
//! Kubernetes exposes the node IP and pod name to a container through the
//! downward API. The usual pod spec fragment:
//!
//! ```yaml
//! env:
//!   - name: MY_NODE_IP
//!     valueFrom: { fieldRef: { fieldPath: status.hostIP } }
//!   - name: MY_POD_NAME
//!     valueFrom: { fieldRef: { fieldPath: metadata.name } }
//! ```
//!
//! Both are optional. Anything missing is reported as the literal `null`.

use http::HeaderValue;
use tracing::{info, warn};

/// Environment variable holding the IP of the node the pod runs on.
pub const NODE_IP_VAR: &str = "MY_NODE_IP";

/// Environment variable holding the pod's name.
pub const POD_NAME_VAR: &str = "MY_POD_NAME";

/// Placeholder reported for any value that is not available.
pub(crate) fn missing() -> HeaderValue {
    HeaderValue::from_static("null")
}

/// Node IP and pod name as ready-to-send header values.
#[derive(Clone, Debug)]
pub struct PodIdentity {
    node_ip: HeaderValue,
    pod_name: HeaderValue,
}

impl PodIdentity {
    /// Builds an identity from explicit values. `None` becomes `null`.
    pub fn new(node_ip: Option<&str>, pod_name: Option<&str>) -> Self {
        Self {
            node_ip: resolve(NODE_IP_VAR, node_ip),
            pod_name: resolve(POD_NAME_VAR, pod_name),
        }
    }

    /// Reads [`NODE_IP_VAR`] and [`POD_NAME_VAR`] from the process environment.
    ///
    /// Variables that are unset or not valid unicode count as missing.
    pub fn from_env() -> Self {
        let identity = Self::from_lookup(|key| std::env::var(key).ok());
        info!(
            node_ip = ?identity.node_ip,
            pod_name = ?identity.pod_name,
            "pod identity resolved"
        );
        identity
    }

    /// Resolves both values through `lookup`, keyed by variable name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let node_ip = lookup(NODE_IP_VAR);
        let pod_name = lookup(POD_NAME_VAR);
        Self::new(node_ip.as_deref(), pod_name.as_deref())
    }

    pub fn node_ip(&self) -> &HeaderValue { &self.node_ip }
    pub fn pod_name(&self) -> &HeaderValue { &self.pod_name }
}

impl Default for PodIdentity {
    fn default() -> Self {
        Self { node_ip: missing(), pod_name: missing() }
    }
}

fn resolve(var: &'static str, value: Option<&str>) -> HeaderValue {
    let Some(value) = value else {
        return missing();
    };
    HeaderValue::from_str(value).unwrap_or_else(|e| {
        warn!(var, error = %e, "value is not a legal header value, reporting null");
        missing()
    })
}

//! Diagnostic response headers for pods behind an application gateway.
//!
//! Every response gets three headers telling an operator which hop served it:
//!
//! | Header | Value |
//! |---|---|
//! | `AzRef-AppGwIp` | first entry of the inbound `X-Forwarded-For` |
//! | `AzRef-NodeIp` | `MY_NODE_IP` |
//! | `AzRef-PodName` | `MY_POD_NAME` |
//!
//! Anything unavailable is sent as the literal `null`. Values are appended, so
//! a header of the same name set further down the chain is kept alongside.
//!
//! ```rust,no_run
//! use azref::{Router, middleware::HeaderEnrichment};
//!
//! let app = Router::new().layer(HeaderEnrichment::from_env());
//! ```

use http::{HeaderMap, HeaderName, HeaderValue};

use crate::config::{self, PodIdentity};
use crate::error::Error;
use crate::request::Request;
use crate::response::Response;

use super::{Middleware, MiddlewareFuture, Next};

pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
pub const APP_GW_IP: HeaderName = HeaderName::from_static("azref-appgwip");
pub const NODE_IP: HeaderName = HeaderName::from_static("azref-nodeip");
pub const POD_NAME: HeaderName = HeaderName::from_static("azref-podname");

/// Appends `AzRef-AppGwIp`, `AzRef-NodeIp` and `AzRef-PodName` to every
/// response produced by the rest of the chain.
#[derive(Clone, Debug, Default)]
pub struct HeaderEnrichment {
    identity: PodIdentity,
}

impl HeaderEnrichment {
    pub fn new(identity: PodIdentity) -> Self {
        Self { identity }
    }

    /// Resolves the pod identity from the process environment.
    pub fn from_env() -> Self {
        Self::new(PodIdentity::from_env())
    }

    pub fn identity(&self) -> &PodIdentity {
        &self.identity
    }
}

impl Middleware for HeaderEnrichment {
    fn handle(&self, req: Request, next: Next) -> MiddlewareFuture {
        let stamp = Stamp {
            gateway_ip: gateway_ip(req.headers()).unwrap_or_else(config::missing),
            node_ip: self.identity.node_ip().clone(),
            pod_name: self.identity.pod_name().clone(),
        };
        Box::pin(enrich(req, next, stamp))
    }
}

/// Header values captured before the rest of the chain runs.
struct Stamp {
    gateway_ip: HeaderValue,
    node_ip: HeaderValue,
    pod_name: HeaderValue,
}

async fn enrich(req: Request, next: Next, stamp: Stamp) -> Result<Response, Error> {
    let mut res = next.run(req).await?;
    let headers = res.headers_mut();
    headers.append(APP_GW_IP, stamp.gateway_ip);
    headers.append(NODE_IP, stamp.node_ip);
    headers.append(POD_NAME, stamp.pod_name);
    Ok(res)
}

/// First entry of the first `X-Forwarded-For` line, whitespace trimmed.
///
/// The entry is not checked to be an IP address.
fn gateway_ip(headers: &HeaderMap) -> Option<HeaderValue> {
    let raw = headers.get(X_FORWARDED_FOR)?.as_bytes();
    let first = raw.split(|&b| b == b',').next()?.trim_ascii();
    if first.is_empty() {
        return None;
    }
    HeaderValue::from_bytes(first).ok()
}

//! Header translation between the inbound request, the backend call and the
//! relayed response.
//!
//! actix-web and reqwest sit on different `http` crate versions, so names and
//! values are carried across as raw bytes.

use actix_web::http::header::{
    HeaderMap as InboundHeaderMap, HeaderName as InboundHeaderName,
    HeaderValue as InboundHeaderValue, CONNECTION,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::warn;

use crate::auth::claims::SubjectId;

/// Trusted identity header set by the gateway on protected routes
pub const USER_ID_HEADER: &str = "x-user-id";
/// Gateway trace id, forwarded so backend logs can be correlated
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.contains(&name)
}

/// Header names listed as connection-scoped in a `Connection` value.
fn connection_tokens<'a>(values: impl Iterator<Item = &'a [u8]>) -> Vec<String> {
    values
        .filter_map(|v| std::str::from_utf8(v).ok())
        .flat_map(|v| v.split(','))
        .map(|token| token.trim().to_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Headers for the backend call.
///
/// Everything end-to-end is copied, including the original `Authorization`
/// header so the backend can verify the token itself. `Host`, `Content-Length`,
/// hop-by-hop headers and any client-supplied identity header are dropped; the
/// verified subject (if any) and the trace id are then set by the gateway.
pub fn upstream_request_headers(
    inbound: &InboundHeaderMap,
    subject: Option<&SubjectId>,
    trace_id: &str,
) -> HeaderMap {
    let scoped = connection_tokens(inbound.get_all(CONNECTION).map(|v| v.as_bytes()));
    let mut headers = HeaderMap::with_capacity(inbound.len() + 2);

    for (name, value) in inbound.iter() {
        let key = name.as_str();
        if is_hop_by_hop(key)
            || scoped.iter().any(|s| s == key)
            || matches!(key, "host" | "content-length" | USER_ID_HEADER | REQUEST_ID_HEADER)
        {
            continue;
        }

        match (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_bytes(value.as_bytes()),
        ) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => warn!(header = %key, "dropping untranslatable request header"),
        }
    }

    if let Some(subject) = subject {
        match HeaderValue::from_str(subject.as_str()) {
            Ok(value) => {
                headers.insert(HeaderName::from_static(USER_ID_HEADER), value);
            }
            Err(_) => warn!("verified subject is not a valid header value"),
        }
    }
    if let Ok(value) = HeaderValue::from_str(trace_id) {
        headers.insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    headers
}

/// Backend response headers to relay to the client.
///
/// Hop-by-hop headers and `Content-Length` are left to the gateway's own
/// connection handling; everything else is relayed unchanged.
pub fn relay_response_headers(upstream: &HeaderMap) -> InboundHeaderMap {
    let scoped = connection_tokens(
        upstream
            .get_all(reqwest::header::CONNECTION)
            .iter()
            .map(|v| v.as_bytes()),
    );
    let mut headers = InboundHeaderMap::with_capacity(upstream.len());

    for (name, value) in upstream.iter() {
        let key = name.as_str();
        if is_hop_by_hop(key) || scoped.iter().any(|s| s == key) || key == "content-length" {
            continue;
        }

        match (
            InboundHeaderName::from_bytes(key.as_bytes()),
            InboundHeaderValue::from_bytes(value.as_bytes()),
        ) {
            (Ok(name), Ok(value)) => headers.append(name, value),
            _ => warn!(header = %key, "dropping untranslatable response header"),
        }
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inbound(pairs: &[(&'static str, &'static str)]) -> InboundHeaderMap {
        let mut map = InboundHeaderMap::new();
        for (name, value) in pairs {
            map.append(
                InboundHeaderName::from_static(*name),
                InboundHeaderValue::from_static(*value),
            );
        }
        map
    }

    #[test]
    fn copies_end_to_end_headers_and_authorization() {
        let map = inbound(&[
            ("authorization", "Bearer abc"),
            ("content-type", "application/json"),
            ("accept", "application/json"),
            ("accept", "text/plain"),
        ]);

        let out = upstream_request_headers(&map, None, "trace-1");

        assert_eq!(out.get("authorization").unwrap(), "Bearer abc");
        assert_eq!(out.get("content-type").unwrap(), "application/json");
        assert_eq!(out.get_all("accept").iter().count(), 2);
        assert_eq!(out.get(REQUEST_ID_HEADER).unwrap(), "trace-1");
        assert!(out.get(USER_ID_HEADER).is_none());
    }

    #[test]
    fn drops_hop_by_hop_and_connection_scoped_headers() {
        let map = inbound(&[
            ("host", "gateway.local"),
            ("content-length", "12"),
            ("connection", "keep-alive, x-private-hop"),
            ("keep-alive", "timeout=5"),
            ("transfer-encoding", "chunked"),
            ("x-private-hop", "1"),
            ("x-custom", "kept"),
        ]);

        let out = upstream_request_headers(&map, None, "trace-2");

        for dropped in [
            "host",
            "content-length",
            "connection",
            "keep-alive",
            "transfer-encoding",
            "x-private-hop",
        ] {
            assert!(out.get(dropped).is_none(), "{dropped} should be dropped");
        }
        assert_eq!(out.get("x-custom").unwrap(), "kept");
    }

    #[test]
    fn client_identity_header_is_replaced_by_verified_subject() {
        let map = inbound(&[("x-user-id", "attacker"), ("x-request-id", "spoofed")]);

        let anonymous = upstream_request_headers(&map, None, "trace-3");
        assert!(anonymous.get(USER_ID_HEADER).is_none());
        assert_eq!(anonymous.get(REQUEST_ID_HEADER).unwrap(), "trace-3");

        let subject = SubjectId::new("user-42");
        let verified = upstream_request_headers(&map, Some(&subject), "trace-3");
        assert_eq!(verified.get_all(USER_ID_HEADER).iter().count(), 1);
        assert_eq!(verified.get(USER_ID_HEADER).unwrap(), "user-42");
    }

    #[test]
    fn relays_response_headers_except_framing() {
        let mut upstream = HeaderMap::new();
        upstream.insert("content-type", HeaderValue::from_static("application/json"));
        upstream.insert("content-length", HeaderValue::from_static("42"));
        upstream.insert("transfer-encoding", HeaderValue::from_static("chunked"));
        upstream.append("set-cookie", HeaderValue::from_static("a=1"));
        upstream.append("set-cookie", HeaderValue::from_static("b=2"));
        upstream.insert("location", HeaderValue::from_static("/blogs/1"));

        let relayed = relay_response_headers(&upstream);

        assert_eq!(relayed.get("content-type").unwrap(), "application/json");
        assert_eq!(relayed.get_all("set-cookie").count(), 2);
        assert_eq!(relayed.get("location").unwrap(), "/blogs/1");
        assert!(relayed.get("content-length").is_none());
        assert!(relayed.get("transfer-encoding").is_none());
    }
}

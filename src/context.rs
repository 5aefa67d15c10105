use std::fmt;

use axum::extract::Request;
use axum::http::Version;
use uuid::Uuid;

/// Per-request correlation token. Generated fresh for every request, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Whether a pass through the pipeline is the client-facing exchange or a
/// nested one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Main,
    Sub,
}

/// Route template the router matched (e.g. `/api/test`), carried on the
/// response so it is known when the request finishes.
///
/// Routes here have no names, so the template stands in for one as the
/// `http.route` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRoute(pub String);

/// One in-flight HTTP request as seen by the duration recorder.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub id: RequestId,
    pub kind: RequestKind,
    pub method: String,
    pub scheme: String,
    pub protocol_version: String,
    pub route: Option<String>,
}

impl RequestContext {
    /// Build the context for `req` and tag the request with its id.
    ///
    /// A request already carrying a [`RequestId`] was tagged by an outer
    /// pass and is treated as a sub-request.
    pub fn attach(req: &mut Request) -> Self {
        let kind = if req.extensions().get::<RequestId>().is_some() {
            RequestKind::Sub
        } else {
            RequestKind::Main
        };

        let id = RequestId::new();
        if kind == RequestKind::Main {
            req.extensions_mut().insert(id);
        }

        Self {
            id,
            kind,
            method: req.method().as_str().to_owned(),
            scheme: req.uri().scheme_str().unwrap_or("http").to_owned(),
            protocol_version: protocol_version(req.version()).to_owned(),
            route: None,
        }
    }

    pub fn is_main(&self) -> bool {
        self.kind == RequestKind::Main
    }
}

fn protocol_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_11 => "1.1",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn first_pass_is_main_and_tags_the_request() {
        let mut req = axum::http::Request::builder()
            .method("POST")
            .uri("https://example.test/api/test")
            .version(Version::HTTP_2)
            .body(Body::empty())
            .unwrap();

        let ctx = RequestContext::attach(&mut req);
        assert!(ctx.is_main());
        assert_eq!(ctx.method, "POST");
        assert_eq!(ctx.scheme, "https");
        assert_eq!(ctx.protocol_version, "2");
        assert_eq!(ctx.route, None);
        assert_eq!(req.extensions().get::<RequestId>(), Some(&ctx.id));
    }

    #[test]
    fn second_pass_is_a_sub_request() {
        let mut req = axum::http::Request::builder().uri("/health").body(Body::empty()).unwrap();
        let outer = RequestContext::attach(&mut req);
        let inner = RequestContext::attach(&mut req);

        assert_eq!(inner.kind, RequestKind::Sub);
        assert_ne!(inner.id, outer.id);
        // The outer tag is left alone.
        assert_eq!(req.extensions().get::<RequestId>(), Some(&outer.id));
        assert_eq!(inner.scheme, "http");
        assert_eq!(inner.protocol_version, "1.1");
    }

    #[test]
    fn ids_are_unique() {
        let ids: std::collections::HashSet<_> = (0..1_000).map(|_| RequestId::new()).collect();
        assert_eq!(ids.len(), 1_000);
    }
}

//! Route lookup and path rewriting.
//!
//! # Responsibilities
//! - Store compiled route rules
//! - Look up the matching rule for a request path
//! - Build the upstream URI for a matched request
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) prefix scan in declaration order; first match wins
//! - Explicit `None` on no match rather than a silent default

use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::Uri;

use crate::config::RouteConfig;
use crate::routing::matcher::PathPrefixMatcher;

/// Error compiling a route rule.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("route '{route}': invalid target '{target}': {source}")]
    InvalidTarget {
        route: String,
        target: String,
        #[source]
        source: axum::http::uri::InvalidUri,
    },

    #[error("route '{route}': target '{target}' needs a scheme and host")]
    IncompleteTarget { route: String, target: String },
}

/// A compiled forwarding rule.
#[derive(Debug, Clone)]
pub struct RouteRule {
    name: String,
    matcher: PathPrefixMatcher,
    scheme: Scheme,
    authority: Authority,
    /// Path component of the target, without trailing slash.
    base_path: String,
    rewrite: Option<String>,
}

impl RouteRule {
    /// Compile a rule from its configuration.
    pub fn from_config(config: &RouteConfig) -> Result<Self, RouteError> {
        let uri: Uri = config
            .target
            .parse()
            .map_err(|source| RouteError::InvalidTarget {
                route: config.name.clone(),
                target: config.target.clone(),
                source,
            })?;

        let parts = uri.into_parts();
        let (Some(scheme), Some(authority)) = (parts.scheme, parts.authority) else {
            return Err(RouteError::IncompleteTarget {
                route: config.name.clone(),
                target: config.target.clone(),
            });
        };

        let base_path = parts
            .path_and_query
            .as_ref()
            .map(|pq| pq.path().trim_end_matches('/').to_string())
            .unwrap_or_default();

        Ok(Self {
            name: config.name.clone(),
            matcher: PathPrefixMatcher::new(config.prefix.as_str()),
            scheme,
            authority,
            base_path,
            rewrite: config
                .rewrite
                .as_ref()
                .map(|r| r.trim_end_matches('/').to_string()),
        })
    }

    /// Route identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Upstream authority, used for the outbound `Host` header.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Returns true if the path is handled by this rule.
    pub fn matches(&self, path: &str) -> bool {
        self.matcher.matches(path)
    }

    /// Apply the rule's rewrite to a matching path.
    ///
    /// Without a rewrite the path is returned unchanged. Returns `None` if
    /// the path does not match the rule.
    pub fn rewrite_path(&self, path: &str) -> Option<String> {
        let remainder = self.matcher.remainder(path)?;
        let rewritten = match &self.rewrite {
            Some(replacement) => format!("{replacement}{remainder}"),
            None => path.to_string(),
        };

        if rewritten.is_empty() {
            Some("/".to_string())
        } else {
            Some(rewritten)
        }
    }

    /// Build the upstream URI for an incoming request URI.
    ///
    /// The query string is carried over verbatim.
    pub fn upstream_uri(&self, incoming: &Uri) -> Result<Uri, axum::http::Error> {
        let path = self
            .rewrite_path(incoming.path())
            .unwrap_or_else(|| incoming.path().to_string());

        let mut path_and_query = format!("{}{}", self.base_path, path);
        if let Some(query) = incoming.query() {
            path_and_query.push('?');
            path_and_query.push_str(query);
        }

        let path_and_query: PathAndQuery = path_and_query.parse()?;

        Ok(Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()?)
    }
}

/// Ordered set of route rules.
#[derive(Debug, Clone, Default)]
pub struct Router {
    rules: Vec<RouteRule>,
}

impl Router {
    /// Create a router from already compiled rules, keeping their order.
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    /// Compile all configured routes, in declaration order.
    pub fn from_config(routes: &[RouteConfig]) -> Result<Self, RouteError> {
        let rules = routes
            .iter()
            .map(RouteRule::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rules))
    }

    /// Find the first rule whose prefix matches the path.
    pub fn match_path(&self, path: &str) -> Option<&RouteRule> {
        self.rules.iter().find(|rule| rule.matches(path))
    }

    /// All rules, in evaluation order.
    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(name: &str, prefix: &str, target: &str, rewrite: Option<&str>) -> RouteConfig {
        RouteConfig {
            name: name.into(),
            prefix: prefix.into(),
            target: target.into(),
            rewrite: rewrite.map(Into::into),
        }
    }

    fn default_router() -> Router {
        Router::from_config(&crate::config::GatewayConfig::default().routes).unwrap()
    }

    #[test]
    fn core_prefix_is_rewritten_to_api() {
        let router = default_router();
        let rule = router.match_path("/api/core/test").unwrap();
        assert_eq!(rule.name(), "core");
        assert_eq!(rule.rewrite_path("/api/core/test").unwrap(), "/api/test");

        let uri = rule.upstream_uri(&"/api/core/test".parse().unwrap()).unwrap();
        assert_eq!(uri.to_string(), "http://localhost:3001/api/test");
    }

    #[test]
    fn auth_prefix_is_forwarded_unchanged() {
        let router = default_router();
        let rule = router.match_path("/api/auth/login").unwrap();
        assert_eq!(rule.name(), "auth");

        let uri = rule.upstream_uri(&"/api/auth/login".parse().unwrap()).unwrap();
        assert_eq!(uri.to_string(), "http://localhost:3002/api/auth/login");
        assert_eq!(rule.authority().as_str(), "localhost:3002");
    }

    #[test]
    fn unknown_path_has_no_route() {
        let router = default_router();
        assert!(router.match_path("/unknown").is_none());
        assert!(router.match_path("/api").is_none());
        assert!(router.match_path("/api/corex").is_none());
    }

    #[test]
    fn first_declared_rule_wins() {
        let router = Router::from_config(&[
            route("broad", "/api", "http://a:1", None),
            route("narrow", "/api/core", "http://b:2", Some("/api")),
        ])
        .unwrap();
        assert_eq!(router.match_path("/api/core/test").unwrap().name(), "broad");

        let router = Router::from_config(&[
            route("narrow", "/api/core", "http://b:2", Some("/api")),
            route("broad", "/api", "http://a:1", None),
        ])
        .unwrap();
        assert_eq!(router.match_path("/api/core/test").unwrap().name(), "narrow");
        assert_eq!(router.match_path("/api/other").unwrap().name(), "broad");
    }

    #[test]
    fn bare_prefix_rewrites_to_replacement() {
        let rule = RouteRule::from_config(&route("core", "/api/core", "http://c:1", Some("/api")))
            .unwrap();
        assert_eq!(rule.rewrite_path("/api/core").unwrap(), "/api");
    }

    #[test]
    fn root_rewrite_never_yields_double_slash_or_empty_path() {
        let rule = RouteRule::from_config(&route("strip", "/svc", "http://c:1", Some("/")))
            .unwrap();
        assert_eq!(rule.rewrite_path("/svc/items").unwrap(), "/items");
        assert_eq!(rule.rewrite_path("/svc").unwrap(), "/");
    }

    #[test]
    fn query_string_and_base_path_are_preserved() {
        let rule = RouteRule::from_config(&route(
            "core",
            "/api/core",
            "http://core.internal:8080/v1/",
            Some("/api"),
        ))
        .unwrap();

        let uri = rule
            .upstream_uri(&"/api/core/items?page=2&sort=asc".parse().unwrap())
            .unwrap();
        assert_eq!(
            uri.to_string(),
            "http://core.internal:8080/v1/api/items?page=2&sort=asc"
        );
    }

    #[test]
    fn target_without_host_is_rejected() {
        let err = RouteRule::from_config(&route("bad", "/x", "/relative", None)).unwrap_err();
        assert!(matches!(err, RouteError::IncompleteTarget { .. }));
    }
}

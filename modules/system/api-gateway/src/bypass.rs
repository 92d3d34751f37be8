//! Per-method route matching for middleware bypass lists.

use std::collections::HashMap;

use axum::http::Method;

use crate::config::BypassConfig;

/// Route matcher for a specific HTTP method.
#[derive(Clone)]
struct RouteMatcher {
    matcher: matchit::Router<()>,
}

impl RouteMatcher {
    fn new() -> Self {
        Self {
            matcher: matchit::Router::new(),
        }
    }

    fn insert(&mut self, path: &str) -> Result<(), matchit::InsertError> {
        self.matcher.insert(path, ())
    }

    fn find(&self, path: &str) -> bool {
        self.matcher.at(path).is_ok()
    }
}

/// Set of `(method, route)` pairs a middleware lets through unchecked.
///
/// Routes are matchit patterns (`/collections/{name}`); Axum's `:name`
/// syntax is accepted as well. Matching is exact per method: a bypassed
/// `GET /x` does not bypass `POST /x`.
#[derive(Clone, Default)]
pub struct BypassList {
    matchers: HashMap<Method, RouteMatcher>,
}

impl BypassList {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a `route → [methods]` mapping.
    ///
    /// # Errors
    /// Returns an error for an invalid method name or route pattern.
    pub fn from_config(config: &BypassConfig) -> anyhow::Result<Self> {
        let mut matchers: HashMap<Method, RouteMatcher> = HashMap::new();

        for (path, methods) in config {
            let matchit_path = convert_axum_path_to_matchit(path);
            for method in methods {
                let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                    .map_err(|e| anyhow::anyhow!("Invalid method '{method}' for '{path}': {e}"))?;
                matchers
                    .entry(method)
                    .or_insert_with(RouteMatcher::new)
                    .insert(&matchit_path)
                    .map_err(|e| anyhow::anyhow!("Failed to insert bypass pattern '{path}': {e}"))?;
            }
        }

        Ok(Self { matchers })
    }

    #[must_use]
    pub fn matches(&self, method: &Method, path: &str) -> bool {
        self.matchers
            .get(method)
            .is_some_and(|matcher| matcher.find(path))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl std::fmt::Debug for BypassList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BypassList")
            .field("methods", &self.matchers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Convert Axum path syntax `:param` to matchit syntax `{param}`.
fn convert_axum_path_to_matchit(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    let mut chars = path.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == ':' {
            result.push('{');
            while matches!(chars.peek(), Some(c) if c.is_alphanumeric() || *c == '_') {
                if let Some(c) = chars.next() {
                    result.push(c);
                }
            }
            result.push('}');
        } else {
            result.push(ch);
        }
    }

    result
}

//! Credential extraction contract between transports and providers.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::error::CredentialError;

/// Where in a request a credential lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    Header,
    Cookie,
    UrlParam,
    /// Structured transport metadata (e.g. RPC metadata). Not every transport has it.
    Metadata,
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Header => "header",
            Self::Cookie => "cookie",
            Self::UrlParam => "url_param",
            Self::Metadata => "metadata",
        })
    }
}

/// A transport's view of one inbound request, limited to credential lookup.
pub trait CredentialRequest: Send + Sync {
    /// Value of the credential `key` of the given kind, `None` when absent.
    ///
    /// Header keys are case-insensitive.
    ///
    /// # Errors
    /// [`CredentialError::UnsupportedKind`] if the transport has no such
    /// kind of credential.
    fn credential(&self, kind: CredentialKind, key: &str) -> Result<Option<String>, CredentialError>;
}

/// Configurable location of a credential, with an optional scheme prefix
/// such as `Bearer `.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialSource {
    pub kind: CredentialKind,
    pub key: String,
    /// Prefix stripped from the raw value (matched case-insensitively).
    /// A value without the prefix counts as absent.
    #[serde(default)]
    pub prefix: Option<String>,
}

impl CredentialSource {
    #[must_use]
    pub fn new(kind: CredentialKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
            prefix: None,
        }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// `Authorization: Bearer <token>`.
    #[must_use]
    pub fn bearer() -> Self {
        Self::new(CredentialKind::Header, "authorization").with_prefix("Bearer ")
    }

    /// Read the credential from `request`, strip the prefix and trim it.
    /// Empty values count as absent.
    ///
    /// # Errors
    /// Propagates the transport's [`CredentialError`].
    pub fn extract(&self, request: &dyn CredentialRequest) -> Result<Option<String>, CredentialError> {
        let Some(raw) = request.credential(self.kind, &self.key)? else {
            return Ok(None);
        };

        let value = match &self.prefix {
            Some(prefix) => match strip_prefix_ignore_case(&raw, prefix) {
                Some(rest) => rest,
                None => return Ok(None),
            },
            None => raw.as_str(),
        };

        let value = value.trim();
        Ok((!value.is_empty()).then(|| value.to_owned()))
    }
}

impl Default for CredentialSource {
    fn default() -> Self {
        Self::bearer()
    }
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &value[prefix.len()..])
}

/// Credential request backed by plain maps, for transports without an HTTP
/// request object and for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialRequest {
    headers: HashMap<String, String>,
    cookies: HashMap<String, String>,
    params: HashMap<String, String>,
    metadata: Option<HashMap<String, String>>,
}

impl InMemoryCredentialRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.insert(key.to_ascii_lowercase(), value.into());
        self
    }

    #[must_use]
    pub fn cookie(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Enable the metadata kind and add one entry to it.
    #[must_use]
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }
}

impl CredentialRequest for InMemoryCredentialRequest {
    fn credential(&self, kind: CredentialKind, key: &str) -> Result<Option<String>, CredentialError> {
        let map = match kind {
            CredentialKind::Header => {
                return Ok(self.headers.get(&key.to_ascii_lowercase()).cloned());
            }
            CredentialKind::Cookie => &self.cookies,
            CredentialKind::UrlParam => &self.params,
            CredentialKind::Metadata => self
                .metadata
                .as_ref()
                .ok_or(CredentialError::UnsupportedKind(CredentialKind::Metadata))?,
        };
        Ok(map.get(key).cloned())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn bearer_source_strips_scheme_case_insensitively() {
        let req = InMemoryCredentialRequest::new().header("Authorization", "bearer  abc ");
        assert_eq!(
            CredentialSource::bearer().extract(&req).unwrap(),
            Some("abc".to_owned())
        );
    }

    #[test]
    fn value_without_prefix_is_absent() {
        let req = InMemoryCredentialRequest::new().header("authorization", "Basic Zm9vOmJhcg==");
        assert_eq!(CredentialSource::bearer().extract(&req).unwrap(), None);
    }

    #[test]
    fn empty_value_is_absent() {
        let req = InMemoryCredentialRequest::new().header("authorization", "Bearer   ");
        assert_eq!(CredentialSource::bearer().extract(&req).unwrap(), None);
    }

    #[test]
    fn raw_header_without_prefix() {
        let source = CredentialSource::new(CredentialKind::Header, "X-Chroma-Token");
        let req = InMemoryCredentialRequest::new().header("x-chroma-token", "tok");
        assert_eq!(source.extract(&req).unwrap(), Some("tok".to_owned()));
    }

    #[test]
    fn cookie_and_param_lookups_are_exact() {
        let req = InMemoryCredentialRequest::new()
            .cookie("session", "c1")
            .param("token", "p1");
        assert_eq!(
            req.credential(CredentialKind::Cookie, "session").unwrap(),
            Some("c1".to_owned())
        );
        assert_eq!(req.credential(CredentialKind::Cookie, "SESSION").unwrap(), None);
        assert_eq!(
            req.credential(CredentialKind::UrlParam, "token").unwrap(),
            Some("p1".to_owned())
        );
    }

    #[test]
    fn metadata_is_unsupported_unless_enabled() {
        let req = InMemoryCredentialRequest::new();
        assert_eq!(
            req.credential(CredentialKind::Metadata, "x").unwrap_err(),
            CredentialError::UnsupportedKind(CredentialKind::Metadata)
        );

        let req = req.metadata("x", "1");
        assert_eq!(
            req.credential(CredentialKind::Metadata, "x").unwrap(),
            Some("1".to_owned())
        );
    }

    #[test]
    fn source_deserializes_from_config() {
        let source: CredentialSource = serde_json::from_value(serde_json::json!({
            "kind": "url_param",
            "key": "api_key"
        }))
        .unwrap();
        assert_eq!(source, CredentialSource::new(CredentialKind::UrlParam, "api_key"));
    }
}

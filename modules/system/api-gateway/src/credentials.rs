//! HTTP implementation of the credential lookup contract.

use authn_resolver_sdk::{CredentialError, CredentialKind, CredentialRequest};
use axum::http::{HeaderMap, Uri, header};

/// Credential view over an HTTP request's headers and query string.
///
/// HTTP has no structured metadata, so [`CredentialKind::Metadata`] is
/// unsupported.
pub struct HttpCredentialRequest<'a> {
    headers: &'a HeaderMap,
    uri: &'a Uri,
}

impl<'a> HttpCredentialRequest<'a> {
    #[must_use]
    pub fn new(headers: &'a HeaderMap, uri: &'a Uri) -> Self {
        Self { headers, uri }
    }

    fn header(&self, key: &str) -> Result<Option<String>, CredentialError> {
        let Some(value) = self.headers.get(key) else {
            return Ok(None);
        };
        value
            .to_str()
            .map(|v| Some(v.to_owned()))
            .map_err(|_| CredentialError::Unreadable {
                kind: CredentialKind::Header,
                key: key.to_owned(),
            })
    }

    fn cookie(&self, key: &str) -> Option<String> {
        self.headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.trim_matches('"').to_owned())
    }

    fn url_param(&self, key: &str) -> Result<Option<String>, CredentialError> {
        let Some(query) = self.uri.query() else {
            return Ok(None);
        };
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_str(query).map_err(|_| CredentialError::Unreadable {
                kind: CredentialKind::UrlParam,
                key: key.to_owned(),
            })?;
        Ok(pairs.into_iter().find(|(k, _)| k == key).map(|(_, v)| v))
    }
}

impl CredentialRequest for HttpCredentialRequest<'_> {
    fn credential(&self, kind: CredentialKind, key: &str) -> Result<Option<String>, CredentialError> {
        match kind {
            CredentialKind::Header => self.header(key),
            CredentialKind::Cookie => Ok(self.cookie(key)),
            CredentialKind::UrlParam => self.url_param(key),
            CredentialKind::Metadata => Err(CredentialError::UnsupportedKind(kind)),
        }
    }
}

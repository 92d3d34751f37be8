//! Provider implementation for the HTTP Basic authentication service.

use async_trait::async_trait;
use authn_resolver_sdk::{
    AuthNError, AuthenticationProvider, AuthenticationResult, CredentialKind, CredentialRequest,
    CredentialSource,
};

use super::service::Service;

fn basic_source() -> CredentialSource {
    CredentialSource::new(CredentialKind::Header, "authorization").with_prefix("Basic ")
}

#[async_trait]
impl AuthenticationProvider for Service {
    async fn authenticate(
        &self,
        request: &dyn CredentialRequest,
    ) -> Result<AuthenticationResult, AuthNError> {
        let Some(encoded) = basic_source().extract(request)? else {
            return Ok(AuthenticationResult::rejected());
        };
        Ok(self.verify(&encoded).into())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::{BasicAuthConfig, BasicUser};
    use authn_resolver_sdk::InMemoryCredentialRequest;

    fn service() -> Service {
        Service::from_config(&BasicAuthConfig {
            users: vec![BasicUser::new("admin", "admin")],
            credentials_file: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn basic_header_authenticates() {
        // base64("admin:admin")
        let req = InMemoryCredentialRequest::new().header("Authorization", "Basic YWRtaW46YWRtaW4=");

        let result = AuthenticationProvider::authenticate(&service(), &req)
            .await
            .unwrap();
        assert_eq!(result.identity().unwrap().user_id(), "admin");
    }

    #[tokio::test]
    async fn bearer_header_is_rejected() {
        let req = InMemoryCredentialRequest::new().header("Authorization", "Bearer YWRtaW46YWRtaW4=");

        let result = AuthenticationProvider::authenticate(&service(), &req)
            .await
            .unwrap();
        assert!(!result.success());
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let result = AuthenticationProvider::authenticate(&service(), &InMemoryCredentialRequest::new())
            .await
            .unwrap();
        assert!(!result.success());
    }
}

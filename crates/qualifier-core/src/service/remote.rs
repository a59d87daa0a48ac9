//! RemoteService trait: the two HTTP exchanges of the flow.

use secrecy::SecretString;

use qualifier_types::error::{RegistrationError, SubmissionWarning};
use qualifier_types::registration::{IdentityPayload, RegistrationResponse};
use qualifier_types::submission::SubmissionPayload;

/// Capability interface over the remote qualification service.
///
/// Uses native async fn in traits (RPITIT). The HTTP implementation is
/// `HttpRemoteService` in qualifier-infra; the registration endpoint is part of
/// the implementation's configuration, the submission target is chosen per call.
pub trait RemoteService: Send + Sync {
    /// Register the identity and receive the webhook/token pair.
    fn register(
        &self,
        payload: &IdentityPayload,
    ) -> impl std::future::Future<Output = Result<RegistrationResponse, RegistrationError>> + Send;

    /// Post the final query to `url`, returning the raw response body.
    ///
    /// `token`, when given, is sent verbatim as the `Authorization` header.
    fn submit(
        &self,
        url: &str,
        payload: &SubmissionPayload,
        token: Option<&SecretString>,
    ) -> impl std::future::Future<Output = Result<String, SubmissionWarning>> + Send;
}

//! Submission target resolution.

use qualifier_types::config::EndpointsConfig;
use qualifier_types::registration::RegistrationResponse;

/// The webhook from registration when present and non-blank, else the
/// configured fallback. Both go through [`EndpointsConfig::resolve`], so a
/// relative webhook is joined onto `base_url`.
pub fn resolve_target(
    registration: &RegistrationResponse,
    endpoints: &EndpointsConfig,
) -> String {
    registration
        .webhook()
        .map(|webhook| endpoints.resolve(webhook))
        .unwrap_or_else(|| endpoints.submit_fallback_url())
}

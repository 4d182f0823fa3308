//! Id token extraction from the request body.

use secrecy::SecretString;

use super::error::DomainError;

/// Form field carrying the raw id token.
pub const ID_TOKEN_PARAM: &str = "id_token";

/// Pulls the raw id token out of a URL-encoded request body.
///
/// Pure: no I/O, no decoding of the token itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialExtractor;

impl CredentialExtractor {
    /// Extract the `id_token` value from `body`.
    ///
    /// Trailing line terminators are ignored. If the key repeats, the last
    /// occurrence wins. Other keys are never inspected.
    ///
    /// Percent-decoding is lossy: bytes that are not valid UTF-8 become
    /// U+FFFD and the verifier sees the replaced value, which it then rejects.
    ///
    /// # Errors
    ///
    /// `MissingRequestParam` if `id_token` is absent or has an empty value.
    pub fn extract(self, body: &[u8]) -> Result<SecretString, DomainError> {
        let body = trim_line_end(body);

        let pairs: Vec<(String, String)> = match serde_urlencoded::from_bytes(body) {
            Ok(pairs) => pairs,
            Err(e) => {
                tracing::debug!(error = %e, "Request body is not valid form data");
                Vec::new()
            }
        };

        pairs
            .into_iter()
            .rev()
            .find(|(key, _)| key == ID_TOKEN_PARAM)
            .map(|(_, value)| value)
            .filter(|value| !value.is_empty())
            .map(SecretString::from)
            .ok_or_else(|| DomainError::MissingRequestParam {
                param: ID_TOKEN_PARAM.to_owned(),
            })
    }
}

fn trim_line_end(body: &[u8]) -> &[u8] {
    let end = body
        .iter()
        .rposition(|b| !matches!(b, b'\r' | b'\n'))
        .map_or(0, |i| i + 1);
    &body[..end]
}

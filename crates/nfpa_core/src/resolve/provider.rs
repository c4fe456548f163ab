//! Identifier provider contract.
//!
//! A provider turns a chemical name into a request for one remote
//! name-to-structure service and reads one identifier out of its reply.
//! Providers are stateless values; the network call itself belongs to a
//! [`Transport`](crate::resolve::transport::Transport).

use crate::model::chemical::IdentifierKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Separator after which dataset names carry qualifiers (`"Acid, fuming"`).
const QUALIFIER_SEPARATOR: &str = ", ";

/// Request descriptor for one provider call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderRequest {
    pub url: String,
}

impl ProviderRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Failure building a request or reading a response.
///
/// The resolver counts every variant as an "unavailable" vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    UnsupportedKind(IdentifierKind),
    MalformedResponse(String),
    MissingField(&'static str),
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedKind(kind) => write!(f, "identifier kind `{kind}` is unsupported"),
            Self::MalformedResponse(message) => write!(f, "malformed provider response: {message}"),
            Self::MissingField(field) => write!(f, "provider response has no `{field}` value"),
        }
    }
}

impl Error for ProviderError {}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// One remote identifier service.
pub trait IdentifierProvider: Send + Sync {
    /// Stable registry id (`[a-z0-9_-]+`).
    fn provider_id(&self) -> &str;

    /// Normalizes a raw dataset name before request building.
    fn clean_name(&self, raw_name: &str) -> String {
        clean_name(raw_name)
    }

    fn build_request(
        &self,
        cleaned_name: &str,
        kind: IdentifierKind,
    ) -> ProviderResult<ProviderRequest>;

    fn parse_response(&self, body: &str, kind: IdentifierKind) -> ProviderResult<String>;
}

/// Truncates at the first `", "` and trims surrounding whitespace.
///
/// IUPAC names never put a space after a comma, so they pass unchanged.
pub fn clean_name(raw_name: &str) -> String {
    let head = match raw_name.find(QUALIFIER_SEPARATOR) {
        Some(position) => &raw_name[..position],
        None => raw_name,
    };
    head.trim().to_string()
}

/// Replaces spaces with `space_replacement`, then percent-encodes the rest.
///
/// `space_replacement` is inserted verbatim (it may already be an escape).
pub fn encode_name_segment(name: &str, space_replacement: &str) -> String {
    name.split(' ')
        .map(|part| urlencoding::encode(part).into_owned())
        .collect::<Vec<_>>()
        .join(space_replacement)
}

/// Returns a non-empty trimmed identifier or `MissingField`.
pub(crate) fn non_empty(value: &str, field: &'static str) -> ProviderResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProviderError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{clean_name, encode_name_segment};

    #[test]
    fn clean_name_strips_qualifiers() {
        assert_eq!(clean_name("Nitric acid, fuming"), "Nitric acid");
        assert_eq!(clean_name("Acetone"), "Acetone");
        assert_eq!(clean_name("2,4-dinitrophenol"), "2,4-dinitrophenol");
        assert_eq!(clean_name("  Benzene  "), "Benzene");
    }

    #[test]
    fn encode_name_segment_substitutes_spaces() {
        assert_eq!(encode_name_segment("acetic acid", "_"), "acetic_acid");
        assert_eq!(encode_name_segment("acetic acid", "%20"), "acetic%20acid");
        assert_eq!(
            encode_name_segment("2-(dimethylamino)ethanol", "_"),
            "2-%28dimethylamino%29ethanol"
        );
    }
}

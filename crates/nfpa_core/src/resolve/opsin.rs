//! OPSIN name-to-structure provider.
//!
//! `GET <base>/<name>.json` answers with a JSON object whose `stdinchikey`
//! field carries the standard InChIKey. Only InChIKey lookups are supported.

use crate::model::chemical::IdentifierKind;
use crate::resolve::provider::{
    encode_name_segment, non_empty, IdentifierProvider, ProviderError, ProviderRequest,
    ProviderResult,
};
use serde_json::Value;

pub const OPSIN_PROVIDER_ID: &str = "opsin";
pub const OPSIN_DEFAULT_BASE_URL: &str = "https://opsin.ch.cam.ac.uk/opsin";

const FIELD_STD_INCHIKEY: &str = "stdinchikey";

#[derive(Debug, Clone)]
pub struct OpsinProvider {
    base_url: String,
}

impl OpsinProvider {
    pub fn new() -> Self {
        Self::with_base_url(OPSIN_DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for OpsinProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierProvider for OpsinProvider {
    fn provider_id(&self) -> &str {
        OPSIN_PROVIDER_ID
    }

    fn build_request(
        &self,
        cleaned_name: &str,
        kind: IdentifierKind,
    ) -> ProviderResult<ProviderRequest> {
        if kind != IdentifierKind::InchiKey {
            return Err(ProviderError::UnsupportedKind(kind));
        }
        Ok(ProviderRequest::get(format!(
            "{}/{}.json",
            self.base_url,
            encode_name_segment(cleaned_name, "%20")
        )))
    }

    fn parse_response(&self, body: &str, kind: IdentifierKind) -> ProviderResult<String> {
        if kind != IdentifierKind::InchiKey {
            return Err(ProviderError::UnsupportedKind(kind));
        }
        let document: Value = serde_json::from_str(body)
            .map_err(|err| ProviderError::MalformedResponse(err.to_string()))?;
        match document.get(FIELD_STD_INCHIKEY) {
            Some(Value::String(value)) => non_empty(value, FIELD_STD_INCHIKEY),
            Some(_) => Err(ProviderError::MalformedResponse(format!(
                "`{FIELD_STD_INCHIKEY}` is not a string"
            ))),
            None => Err(ProviderError::MissingField(FIELD_STD_INCHIKEY)),
        }
    }
}

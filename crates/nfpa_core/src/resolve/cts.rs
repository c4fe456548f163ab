//! Chemical Translation Service (Fiehn lab) provider.
//!
//! `GET <base>/Chemical%20Name/<target>/<name>` answers with
//! `[{"searchTerm": ..., "result": ["<id>", ...]}]`; the first result wins.

use crate::model::chemical::IdentifierKind;
use crate::resolve::provider::{
    encode_name_segment, non_empty, IdentifierProvider, ProviderError, ProviderRequest,
    ProviderResult,
};
use serde_json::Value;

pub const CTS_PROVIDER_ID: &str = "cts";
pub const CTS_DEFAULT_BASE_URL: &str = "https://cts.fiehnlab.ucdavis.edu/service/convert";

const FIELD_RESULT: &str = "result";

#[derive(Debug, Clone)]
pub struct CtsProvider {
    base_url: String,
}

impl CtsProvider {
    pub fn new() -> Self {
        Self::with_base_url(CTS_DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for CtsProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn target_segment(kind: IdentifierKind) -> &'static str {
    match kind {
        IdentifierKind::Casrn => "CAS",
        IdentifierKind::Cid => "PubChem%20CID",
        IdentifierKind::InchiKey => "InChIKey",
    }
}

impl IdentifierProvider for CtsProvider {
    fn provider_id(&self) -> &str {
        CTS_PROVIDER_ID
    }

    fn build_request(
        &self,
        cleaned_name: &str,
        kind: IdentifierKind,
    ) -> ProviderResult<ProviderRequest> {
        Ok(ProviderRequest::get(format!(
            "{}/Chemical%20Name/{}/{}",
            self.base_url,
            target_segment(kind),
            encode_name_segment(cleaned_name, "_")
        )))
    }

    fn parse_response(&self, body: &str, _kind: IdentifierKind) -> ProviderResult<String> {
        let document: Value = serde_json::from_str(body)
            .map_err(|err| ProviderError::MalformedResponse(err.to_string()))?;
        let entry = document
            .as_array()
            .and_then(|items| items.first())
            .ok_or_else(|| {
                ProviderError::MalformedResponse("expected a non-empty array".to_string())
            })?;
        let results = entry
            .get(FIELD_RESULT)
            .and_then(Value::as_array)
            .ok_or(ProviderError::MissingField(FIELD_RESULT))?;
        match results.first() {
            Some(Value::String(value)) => non_empty(value, FIELD_RESULT),
            Some(_) => Err(ProviderError::MalformedResponse(
                "result entry is not a string".to_string(),
            )),
            None => Err(ProviderError::MissingField(FIELD_RESULT)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CtsProvider;
    use crate::model::chemical::IdentifierKind;
    use crate::resolve::provider::{IdentifierProvider, ProviderError};

    #[test]
    fn builds_convert_url_per_kind() {
        let provider = CtsProvider::with_base_url("https://cts.test/convert");
        let inchikey = provider
            .build_request("acetic acid", IdentifierKind::InchiKey)
            .expect("request");
        assert_eq!(
            inchikey.url,
            "https://cts.test/convert/Chemical%20Name/InChIKey/acetic_acid"
        );

        let cid = provider
            .build_request("acetone", IdentifierKind::Cid)
            .expect("request");
        assert_eq!(
            cid.url,
            "https://cts.test/convert/Chemical%20Name/PubChem%20CID/acetone"
        );
    }

    #[test]
    fn parses_first_result() {
        let provider = CtsProvider::new();
        let body = r#"[{"fromIdentifier":"Chemical Name","searchTerm":"acetone",
            "toIdentifier":"InChIKey","result":["CSCPPACGZOOCGX-UHFFFAOYSA-N","OTHER"]}]"#;
        assert_eq!(
            provider.parse_response(body, IdentifierKind::InchiKey),
            Ok("CSCPPACGZOOCGX-UHFFFAOYSA-N".to_string())
        );
    }

    #[test]
    fn empty_or_unexpected_shapes_fail_explicitly() {
        let provider = CtsProvider::new();
        assert_eq!(
            provider.parse_response(r#"[{"result":[]}]"#, IdentifierKind::InchiKey),
            Err(ProviderError::MissingField("result"))
        );
        assert!(matches!(
            provider.parse_response("[]", IdentifierKind::InchiKey),
            Err(ProviderError::MalformedResponse(_))
        ));
        assert!(matches!(
            provider.parse_response(r#"{"result":["x"]}"#, IdentifierKind::InchiKey),
            Err(ProviderError::MalformedResponse(_))
        ));
    }
}

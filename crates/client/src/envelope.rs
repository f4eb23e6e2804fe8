//! Response envelope `{status, message?, data?}` shared by every endpoint.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use folio_core::constants::MAX_ERROR_BODY_LEN;

use crate::error::CatalogError;

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnvelopeStatus {
    Ok,
    Error,
}

impl EnvelopeStatus {
    fn parse(status: &str) -> Option<Self> {
        match status {
            // "success" is what the upstream library app itself answers with.
            "ok" | "success" => Some(Self::Ok),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// Validates the envelope in `body` and decodes its payload.
///
/// A missing or `null` payload decodes to `T::default()`. A payload that does
/// not match `T` is a [`CatalogError::JsonParse`], never silently dropped.
pub(crate) fn decode_envelope<T>(body: &str, context: &str) -> Result<T, CatalogError>
where
    T: DeserializeOwned + Default,
{
    let envelope: RawEnvelope = serde_json::from_str(body).map_err(|e| CatalogError::JsonParse {
        context: format!("{context} envelope (body: {})", truncate(body, MAX_ERROR_BODY_LEN)),
        source: e,
    })?;

    match EnvelopeStatus::parse(&envelope.status) {
        Some(EnvelopeStatus::Ok) => {},
        Some(EnvelopeStatus::Error) => {
            let message = envelope
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "backend reported an error without a message".to_owned());
            return Err(CatalogError::Backend(message));
        },
        None => return Err(CatalogError::UnknownStatus(envelope.status)),
    }

    match envelope.data {
        None | Some(serde_json::Value::Null) => {
            tracing::debug!(context, "response envelope carries no data, treating as empty");
            Ok(T::default())
        },
        Some(data) => serde_json::from_value(data).map_err(|e| CatalogError::JsonParse {
            context: format!("{context} payload"),
            source: e,
        }),
    }
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_with_data() {
        let items: Vec<u32> = decode_envelope(r#"{"status":"ok","data":[1,2]}"#, "t").unwrap();
        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn test_missing_or_null_data_is_empty() {
        let items: Vec<u32> = decode_envelope(r#"{"status":"ok"}"#, "t").unwrap();
        assert!(items.is_empty());
        let items: Vec<u32> = decode_envelope(r#"{"status":"success","data":null}"#, "t").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_error_status_carries_message() {
        let err = decode_envelope::<Vec<u32>>(r#"{"status":"error","message":"library closed"}"#, "t")
            .unwrap_err();
        assert!(matches!(&err, CatalogError::Backend(m) if m == "library closed"));
        assert_eq!(err.message(), "library closed");
    }

    #[test]
    fn test_unknown_status_rejected() {
        let err = decode_envelope::<Vec<u32>>(r#"{"status":"maybe","data":[]}"#, "t").unwrap_err();
        assert!(matches!(err, CatalogError::UnknownStatus(_)));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let err = decode_envelope::<Vec<u32>>(r#"{"status":"ok","data":{"a":1}}"#, "t").unwrap_err();
        assert!(matches!(err, CatalogError::JsonParse { .. }));
        let err = decode_envelope::<Vec<u32>>("<html>", "t").unwrap_err();
        assert!(matches!(err, CatalogError::JsonParse { .. }));
    }

    #[test]
    fn test_truncate_char_boundary() {
        assert_eq!(truncate("héllo", 2), "h");
        assert_eq!(truncate("abc", 10), "abc");
    }
}

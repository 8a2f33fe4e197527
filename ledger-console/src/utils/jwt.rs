use crate::models::Identity;
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialClaims {
    #[serde(default)]
    sub: serde_json::Value,
    #[serde(default)]
    roles: serde_json::Value,
    #[serde(default)]
    merchant_id: Option<serde_json::Value>,
}

/// Decode the identity carried in a credential's payload without validation.
///
/// Returns `None` for anything that is not a three-segment token with a
/// base64url JSON payload; callers treat that as "no identity".
///
/// Note: This does NOT verify the signature. The decoded identity only picks
/// which views to offer; the ledger and payout services verify the credential
/// on every call.
pub fn decode_identity(credential: &str) -> Option<Identity> {
    let parts: Vec<&str> = credential.split('.').collect();

    if parts.len() != 3 {
        tracing::debug!("Credential is not a three-segment token");
        return None;
    }

    // Issuers differ on padding; accept both.
    let payload = match general_purpose::URL_SAFE_NO_PAD.decode(parts[1].trim_end_matches('=')) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!("Failed to decode credential payload: {}", e);
            return None;
        }
    };

    let claims: CredentialClaims = match serde_json::from_slice(&payload) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("Failed to parse credential claims: {}", e);
            return None;
        }
    };

    let roles = match claims.roles {
        serde_json::Value::Array(values) => values
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Default::default(),
    };

    let merchant_affiliation = claims
        .merchant_id
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(|s| Uuid::parse_str(s).ok());

    // Issuers may send a numeric or absent subject; roles still apply.
    let subject = match claims.sub {
        serde_json::Value::String(sub) => sub,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    };

    Some(Identity {
        subject,
        roles,
        merchant_affiliation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn token_with(payload: serde_json::Value) -> String {
        let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{}.{}.signature", header, body)
    }

    #[test]
    fn test_decode_identity() {
        let merchant_id = Uuid::new_v4();
        let token = token_with(serde_json::json!({
            "sub": "merchant1",
            "roles": ["MERCHANT"],
            "merchantId": merchant_id.to_string(),
            "exp": 9999999999u64
        }));

        let identity = decode_identity(&token).unwrap();
        assert_eq!(identity.subject, "merchant1");
        assert!(identity.has_role(Role::Merchant));
        assert_eq!(identity.merchant_affiliation, Some(merchant_id));
    }

    #[test]
    fn missing_or_malformed_roles_default_to_empty() {
        let absent = decode_identity(&token_with(serde_json::json!({ "sub": "a" }))).unwrap();
        assert!(absent.roles.is_empty());
        assert!(absent.merchant_affiliation.is_none());

        let scalar =
            decode_identity(&token_with(serde_json::json!({ "sub": "a", "roles": "ADMIN" })))
                .unwrap();
        assert!(scalar.roles.is_empty());
    }

    #[test]
    fn padded_payload_is_accepted() {
        let header = general_purpose::URL_SAFE.encode(br#"{"alg":"none"}"#);
        let body = general_purpose::URL_SAFE.encode(br#"{"sub":"v1","roles":["VENDOR"]}"#);
        let identity = decode_identity(&format!("{}.{}.sig", header, body)).unwrap();
        assert!(identity.has_role(Role::Vendor));
    }

    #[test]
    fn malformed_credentials_decode_to_none() {
        assert!(decode_identity("").is_none());
        assert!(decode_identity("only.two").is_none());
        assert!(decode_identity("a.b.c.d").is_none());
        assert!(decode_identity("header.!!!not-base64!!!.sig").is_none());

        let not_json = general_purpose::URL_SAFE_NO_PAD.encode("not json");
        assert!(decode_identity(&format!("h.{}.s", not_json)).is_none());
    }

    #[test]
    fn missing_or_non_string_subject_keeps_the_roles() {
        let absent = decode_identity(&token_with(serde_json::json!({ "roles": ["MERCHANT"] })))
            .unwrap();
        assert_eq!(absent.subject, "");
        assert!(absent.has_role(Role::Merchant));

        let numeric =
            decode_identity(&token_with(serde_json::json!({ "sub": 42, "roles": ["ADMIN"] })))
                .unwrap();
        assert_eq!(numeric.subject, "42");
        assert!(numeric.has_role(Role::Admin));
    }
}

//! HMAC-SHA256 request signing.
//!
//! The signature covers a canonical string of six newline-separated lines:
//!
//! ```text
//! POST
//! /api/v1/waygpt/chat/completions
//! sha256(body)=<hex sha256 of the exact body bytes>
//! timestamp=<unix seconds>
//! nonce=<random hex>
//! project=<project id>
//! ```
//!
//! The server recomputes it from the received request and rejects
//! mismatches and stale timestamps.

use hmac::{Hmac, Mac};
use rand::RngCore;
use reqwest::RequestBuilder;
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::client::ClientError;
use crate::options::SecretString;

pub type HmacSha256 = Hmac<Sha256>;

pub const TIMESTAMP_HEADER: &str = "X-MB-Timestamp";
pub const NONCE_HEADER: &str = "X-MB-Nonce";
pub const SIGNATURE_HEADER: &str = "X-MB-Signature";

const NONCE_BYTES: usize = 16;

/// Inputs of one signature. Never persisted.
#[derive(Debug, Clone, Copy)]
pub struct SignedRequest<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub body: &'a [u8],
    pub timestamp: u64,
    pub nonce: &'a str,
}

/// Signature headers for one outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeaders {
    pub timestamp: u64,
    pub nonce: String,
    pub signature: String,
}

impl SignatureHeaders {
    /// Attach the three `X-MB-*` headers.
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(TIMESTAMP_HEADER, self.timestamp.to_string())
            .header(NONCE_HEADER, &self.nonce)
            .header(SIGNATURE_HEADER, &self.signature)
    }
}

/// Signs requests on behalf of one project.
#[derive(Clone)]
pub struct RequestSigner {
    project_id: String,
    secret: SecretString,
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("project_id", &self.project_id)
            .field("secret", &self.secret)
            .finish()
    }
}

impl RequestSigner {
    pub fn new(project_id: impl Into<String>, secret: SecretString) -> Self {
        Self {
            project_id: project_id.into(),
            secret,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Hex HMAC-SHA256 of the canonical string. Deterministic in its inputs.
    ///
    /// # Example
    /// ```
    /// use waygpt::signer::{RequestSigner, SignedRequest};
    ///
    /// let signer = RequestSigner::new("proj-123", "top-secret".into());
    /// let request = SignedRequest {
    ///     method: "GET",
    ///     path: "/api/v1/waygpt/models",
    ///     body: b"",
    ///     timestamp: 1_700_000_000,
    ///     nonce: "abc",
    /// };
    ///
    /// let signature = signer.sign(&request).unwrap();
    /// assert_eq!(signature.len(), 64);
    /// assert_eq!(signature, signer.sign(&request).unwrap());
    /// ```
    pub fn sign(&self, request: &SignedRequest<'_>) -> Result<String, ClientError> {
        let canonical = canonical_string(request, &self.project_id);
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| ClientError::Config(format!("invalid HMAC key: {}", e)))?;
        mac.update(canonical.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Sign with the current time and a fresh nonce.
    pub fn sign_now(
        &self,
        method: &str,
        path: &str,
        body: &[u8],
    ) -> Result<SignatureHeaders, ClientError> {
        let timestamp = unix_timestamp();
        let nonce = generate_nonce();
        let signature = self.sign(&SignedRequest {
            method,
            path,
            body,
            timestamp,
            nonce: &nonce,
        })?;

        Ok(SignatureHeaders {
            timestamp,
            nonce,
            signature,
        })
    }
}

/// Newline-joined canonical form of a request.
pub fn canonical_string(request: &SignedRequest<'_>, project_id: &str) -> String {
    [
        request.method.to_uppercase(),
        request.path.to_string(),
        format!("sha256(body)={}", body_hash(request.body)),
        format!("timestamp={}", request.timestamp),
        format!("nonce={}", request.nonce),
        format!("project={}", project_id),
    ]
    .join("\n")
}

/// Hex SHA-256 of the body bytes; the empty body hashes like an empty string.
pub fn body_hash(body: &[u8]) -> String {
    hex::encode(Sha256::digest(body))
}

/// 16 random bytes, hex encoded.
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Current unix time in seconds.
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &[u8] = b"{\"model\":\"auto\"}";

    fn signer() -> RequestSigner {
        RequestSigner::new("proj-123", SecretString::from("top-secret"))
    }

    fn request() -> SignedRequest<'static> {
        SignedRequest {
            method: "post",
            path: "/api/v1/waygpt/chat/completions",
            body: BODY,
            timestamp: 1_700_000_000,
            nonce: "00112233445566778899aabbccddeeff",
        }
    }

    #[test]
    fn test_canonical_string_layout() {
        let canonical = canonical_string(&request(), "proj-123");
        let lines: Vec<&str> = canonical.split('\n').collect();
        assert_eq!(
            lines,
            vec![
                "POST",
                "/api/v1/waygpt/chat/completions",
                "sha256(body)=3263355984f8b9899bb9a68783bbb9354c9592711cfec4117c2263cd758d90aa",
                "timestamp=1700000000",
                "nonce=00112233445566778899aabbccddeeff",
                "project=proj-123",
            ]
        );
    }

    #[test]
    fn test_known_signature() {
        assert_eq!(
            signer().sign(&request()).unwrap(),
            "7d84bdd4d5fdd43895369e18e8b216c98eb2b6e890c3ed5581c0464a4d8770f4"
        );
    }

    #[test]
    fn test_empty_body_signature() {
        let request = SignedRequest {
            method: "GET",
            path: "/api/v1/waygpt/models",
            body: b"",
            timestamp: 1_700_000_000,
            nonce: "abc",
        };
        assert_eq!(
            body_hash(request.body),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            signer().sign(&request).unwrap(),
            "0c68656ea03f5a9da0488cd7c65ba448ca5984b6fdb2b89995ae31bae8579b3b"
        );
    }

    #[test]
    fn test_signature_changes_with_every_input() {
        let base = signer().sign(&request()).unwrap();
        assert_eq!(base.len(), 64);
        assert!(base.chars().all(|c| c.is_ascii_hexdigit()));

        let variants = [
            SignedRequest { method: "PUT", ..request() },
            SignedRequest { path: "/api/v1/waygpt/models", ..request() },
            SignedRequest { body: b"{}", ..request() },
            SignedRequest { timestamp: 1_700_000_001, ..request() },
            SignedRequest { nonce: "ffeeddccbbaa99887766554433221100", ..request() },
        ];
        for variant in &variants {
            assert_ne!(signer().sign(variant).unwrap(), base);
        }

        let other_project = RequestSigner::new("proj-456", SecretString::from("top-secret"));
        assert_ne!(other_project.sign(&request()).unwrap(), base);

        let other_secret = RequestSigner::new("proj-123", SecretString::from("other-secret"));
        assert_ne!(other_secret.sign(&request()).unwrap(), base);
    }

    #[test]
    fn test_nonce_is_random_hex() {
        let a = generate_nonce();
        let b = generate_nonce();
        assert_eq!(a.len(), NONCE_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_sign_now_verifies() {
        let headers = signer().sign_now("POST", "/api/v1/widget/token", BODY).unwrap();
        let expected = signer()
            .sign(&SignedRequest {
                method: "POST",
                path: "/api/v1/widget/token",
                body: BODY,
                timestamp: headers.timestamp,
                nonce: &headers.nonce,
            })
            .unwrap();
        assert_eq!(headers.signature, expected);
        assert!(headers.timestamp > 1_600_000_000);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", signer());
        assert!(!debug.contains("top-secret"));
    }
}

//! OAuth token persistence in a browser cookie.
//!
//! Tokens are serialised to JSON, XORed with a SHA-256 digest of the session
//! secret and base64 encoded. This only obfuscates the cookie value; anyone
//! holding the secret (or enough ciphertext) can recover the tokens.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::config::SessionConfig;
use crate::google::OAuthTokens;

/// Symmetric XOR cipher keyed by `SHA-256(secret)`.
#[derive(Clone)]
pub struct TokenCipher {
    key: [u8; 32],
}

impl TokenCipher {
    pub fn new(secret: &str) -> Self {
        let key: [u8; 32] = Sha256::digest(secret.as_bytes()).into();
        Self { key }
    }

    fn xor(&self, data: &[u8]) -> Vec<u8> {
        data.iter()
            .enumerate()
            .map(|(i, b)| b ^ self.key[i % self.key.len()])
            .collect()
    }

    pub fn seal(&self, tokens: &OAuthTokens) -> Result<String, serde_json::Error> {
        let json = serde_json::to_vec(tokens)?;
        Ok(STANDARD.encode(self.xor(&json)))
    }

    /// Reverse of [`seal`](Self::seal). Any decode failure yields `None`.
    pub fn open(&self, value: &str) -> Option<OAuthTokens> {
        let raw = STANDARD.decode(value).ok()?;
        serde_json::from_slice(&self.xor(&raw)).ok()
    }
}

/// Cookie-backed token store for the Gmail demo.
#[derive(Clone)]
pub struct SessionStore {
    cipher: TokenCipher,
    cookie_name: String,
    max_age_secs: u64,
    secure: bool,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        if config.secret.is_empty() {
            tracing::warn!("session secret is empty; token cookies are trivially decodable");
        }
        Self {
            cipher: TokenCipher::new(&config.secret),
            cookie_name: config.cookie_name.clone(),
            max_age_secs: config.max_age_secs(),
            secure: config.secure,
        }
    }

    /// Build the `Set-Cookie` header that persists `tokens`.
    pub fn save_tokens(&self, tokens: &OAuthTokens) -> anyhow::Result<HeaderValue> {
        let value = self.cipher.seal(tokens)?;
        let cookie = self.cookie(&value, self.max_age_secs);
        Ok(HeaderValue::from_str(&cookie)?)
    }

    /// Read tokens from the request's `Cookie` headers.
    pub fn load_tokens(&self, headers: &HeaderMap) -> Option<OAuthTokens> {
        let value = find_cookie(headers, &self.cookie_name)?;
        if value.is_empty() {
            return None;
        }
        self.cipher.open(value)
    }

    /// `Set-Cookie` header that expires the token cookie immediately.
    pub fn clear_tokens(&self) -> HeaderValue {
        // cookie name comes from config; fall back to a bare expiry if it is not header-safe
        HeaderValue::from_str(&self.cookie("", 0))
            .unwrap_or_else(|_| HeaderValue::from_static("gmail_tokens=; Path=/; Max-Age=0"))
    }

    /// Append a `Set-Cookie` header to `headers`.
    pub fn attach(headers: &mut HeaderMap, cookie: HeaderValue) {
        headers.append(SET_COOKIE, cookie);
    }

    fn cookie(&self, value: &str, max_age: u64) -> String {
        let secure = if self.secure { "; Secure" } else { "" };
        format!(
            "{}={}; HttpOnly{}; SameSite=Lax; Path=/; Max-Age={}",
            self.cookie_name, value, secure, max_age
        )
    }
}

/// Find `name` among all `Cookie` request headers.
fn find_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

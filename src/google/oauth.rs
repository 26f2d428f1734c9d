//! Authorization-code flow against Google's OAuth 2.0 endpoints.

use reqwest::{Client, Url};

use super::types::{OAuthTokens, TokenResponse};
use super::{read_json, GoogleError};
use crate::config::GoogleConfig;

#[derive(Clone)]
pub struct OAuthClient {
    http: Client,
    config: GoogleConfig,
}

impl OAuthClient {
    pub fn new(http: Client, config: GoogleConfig) -> Self {
        Self { http, config }
    }

    fn require(&self, value: &str, name: &'static str) -> Result<(), GoogleError> {
        if value.is_empty() {
            return Err(GoogleError::NotConfigured(name));
        }
        Ok(())
    }

    /// Consent-screen URL. Requests offline access and forces the consent
    /// prompt so Google issues a refresh token on the first run.
    pub fn authorization_url(&self) -> Result<Url, GoogleError> {
        self.require(&self.config.client_id, "client_id")?;

        let scope = self.config.scopes.join(" ");
        Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("access_type", "offline"),
                ("prompt", "consent"),
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", scope.as_str()),
            ],
        )
        .map_err(|e| GoogleError::InvalidUrl {
            url: self.config.auth_url.clone(),
            reason: e.to_string(),
        })
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<OAuthTokens, GoogleError> {
        self.require(&self.config.client_id, "client_id")?;
        self.require(&self.config.client_secret, "client_secret")?;

        let response = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|source| GoogleError::Transport {
                endpoint: "token",
                source,
            })?;

        let body: TokenResponse = read_json("token", response).await?;
        tracing::info!(has_refresh = body.refresh_token.is_some(), "exchanged authorization code");
        Ok(body.into_tokens(chrono::Utc::now().timestamp_millis()))
    }

    /// Obtain a fresh access token. Google usually omits the refresh token on
    /// refresh, in which case the existing one is kept.
    pub async fn refresh(&self, tokens: &OAuthTokens) -> Result<OAuthTokens, GoogleError> {
        let refresh_token = tokens
            .refresh_token
            .as_deref()
            .ok_or(GoogleError::NoRefreshToken)?;
        self.require(&self.config.client_id, "client_id")?;
        self.require(&self.config.client_secret, "client_secret")?;

        let response = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|source| GoogleError::Transport {
                endpoint: "token",
                source,
            })?;

        let body: TokenResponse = read_json("token", response).await?;
        let mut fresh = body.into_tokens(chrono::Utc::now().timestamp_millis());
        if fresh.refresh_token.is_none() {
            fresh.refresh_token = tokens.refresh_token.clone();
        }
        tracing::info!("refreshed access token");
        Ok(fresh)
    }

    /// Return usable tokens, refreshing first when they have expired.
    /// The flag is `true` when a refresh happened and the cookie must be rewritten.
    pub async fn ensure_fresh(
        &self,
        tokens: OAuthTokens,
    ) -> Result<(OAuthTokens, bool), GoogleError> {
        if !tokens.is_expired() {
            return Ok((tokens, false));
        }
        let fresh = self.refresh(&tokens).await?;
        Ok((fresh, true))
    }
}

//! Social login token exchange.
//!
//! [`OAuthClient`] is the seam between the auth handlers and the three
//! providers. [`HttpOAuthClient`] performs the real authorization-code
//! exchange with [`reqwest`]; tests inject a stub.

use async_trait::async_trait;
use joba_core::identity::Provider;
use reqwest::Url;
use serde::Deserialize;

/// Client credentials registered with one provider.
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Credentials for every configured provider. A provider without a client
/// id is disabled.
#[derive(Debug, Clone, Default)]
pub struct OAuthProviders {
    pub kakao: Option<ProviderCredentials>,
    pub naver: Option<ProviderCredentials>,
    pub google: Option<ProviderCredentials>,
}

impl OAuthProviders {
    /// Read `{KAKAO,NAVER,GOOGLE}_CLIENT_ID`, `_CLIENT_SECRET` and
    /// `_REDIRECT_URI` through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |prefix: &str| {
            let client_id = lookup(&format!("{prefix}_CLIENT_ID")).filter(|v| !v.is_empty())?;
            Some(ProviderCredentials {
                client_id,
                client_secret: lookup(&format!("{prefix}_CLIENT_SECRET")).unwrap_or_default(),
                redirect_uri: lookup(&format!("{prefix}_REDIRECT_URI")).unwrap_or_default(),
            })
        };

        Self {
            kakao: read("KAKAO"),
            naver: read("NAVER"),
            google: read("GOOGLE"),
        }
    }

    pub fn get(&self, provider: Provider) -> Option<&ProviderCredentials> {
        match provider {
            Provider::Kakao => self.kakao.as_ref(),
            Provider::Naver => self.naver.as_ref(),
            Provider::Google => self.google.as_ref(),
        }
    }
}

/// Errors from the OAuth layer.
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("{0} login is not configured")]
    NotConfigured(&'static str),

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("{provider} returned {status}: {body}")]
    Provider {
        provider: &'static str,
        status: u16,
        body: String,
    },
}

#[async_trait]
pub trait OAuthClient: Send + Sync {
    /// URL the browser is sent to for the provider's consent screen.
    fn authorize_url(&self, provider: Provider, state: &str) -> Result<String, OAuthError>;

    /// Exchange an authorization code and return the raw user-info payload.
    async fn fetch_user_info(
        &self,
        provider: Provider,
        code: &str,
        state: Option<&str>,
    ) -> Result<serde_json::Value, OAuthError>;
}

struct Endpoints {
    authorize: &'static str,
    token: &'static str,
    user_info: &'static str,
    scope: Option<&'static str>,
}

fn endpoints(provider: Provider) -> Endpoints {
    match provider {
        Provider::Kakao => Endpoints {
            authorize: "https://kauth.kakao.com/oauth/authorize",
            token: "https://kauth.kakao.com/oauth/token",
            user_info: "https://kapi.kakao.com/v2/user/me",
            scope: None,
        },
        Provider::Naver => Endpoints {
            authorize: "https://nid.naver.com/oauth2.0/authorize",
            token: "https://nid.naver.com/oauth2.0/token",
            user_info: "https://openapi.naver.com/v1/nid/me",
            scope: None,
        },
        Provider::Google => Endpoints {
            authorize: "https://accounts.google.com/o/oauth2/v2/auth",
            token: "https://oauth2.googleapis.com/token",
            user_info: "https://openidconnect.googleapis.com/v1/userinfo",
            scope: Some("openid email profile"),
        },
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct HttpOAuthClient {
    client: reqwest::Client,
    providers: OAuthProviders,
}

impl HttpOAuthClient {
    pub fn new(providers: OAuthProviders) -> Self {
        Self {
            client: reqwest::Client::new(),
            providers,
        }
    }

    fn credentials(&self, provider: Provider) -> Result<&ProviderCredentials, OAuthError> {
        self.providers
            .get(provider)
            .ok_or(OAuthError::NotConfigured(provider.as_str()))
    }

    async fn parse<T: for<'de> Deserialize<'de>>(
        provider: Provider,
        response: reqwest::Response,
    ) -> Result<T, OAuthError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OAuthError::Provider {
                provider: provider.as_str(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl OAuthClient for HttpOAuthClient {
    fn authorize_url(&self, provider: Provider, state: &str) -> Result<String, OAuthError> {
        let creds = self.credentials(provider)?;
        let endpoints = endpoints(provider);

        let mut params = vec![
            ("response_type", "code"),
            ("client_id", creds.client_id.as_str()),
            ("redirect_uri", creds.redirect_uri.as_str()),
            ("state", state),
        ];
        if let Some(scope) = endpoints.scope {
            params.push(("scope", scope));
        }

        let url = Url::parse_with_params(endpoints.authorize, &params)
            .map_err(|e| OAuthError::Provider {
                provider: provider.as_str(),
                status: 0,
                body: e.to_string(),
            })?;
        Ok(url.to_string())
    }

    async fn fetch_user_info(
        &self,
        provider: Provider,
        code: &str,
        state: Option<&str>,
    ) -> Result<serde_json::Value, OAuthError> {
        let creds = self.credentials(provider)?;
        let endpoints = endpoints(provider);

        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("redirect_uri", creds.redirect_uri.as_str()),
            ("code", code),
        ];
        if let Some(state) = state {
            form.push(("state", state));
        }

        let response = self.client.post(endpoints.token).form(&form).send().await?;
        let token: TokenResponse = Self::parse(provider, response).await?;

        let response = self
            .client
            .get(endpoints.user_info)
            .bearer_auth(&token.access_token)
            .send()
            .await?;
        Self::parse(provider, response).await
    }
}

//! Social login providers and identity extraction.
//!
//! Each provider returns its user-info payload in a different shape. The
//! provider is resolved once at the HTTP boundary into a [`Provider`] and the
//! matching extraction function turns the raw payload into a
//! [`SocialIdentity`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Kakao,
    Naver,
    Google,
}

/// All supported provider names.
pub const VALID_PROVIDERS: &[&str] = &["kakao", "naver", "google"];

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kakao => "kakao",
            Self::Naver => "naver",
            Self::Google => "google",
        }
    }

    /// Parse a provider from a path segment.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "kakao" => Ok(Self::Kakao),
            "naver" => Ok(Self::Naver),
            "google" => Ok(Self::Google),
            other => Err(CoreError::Validation(format!(
                "Unknown provider '{other}'. Must be one of: {}",
                VALID_PROVIDERS.join(", ")
            ))),
        }
    }

    /// The `users` column holding this provider's user id.
    pub fn id_column(self) -> &'static str {
        match self {
            Self::Kakao => "kakao_id",
            Self::Naver => "naver_id",
            Self::Google => "google_id",
        }
    }

    /// Extract the identity from this provider's user-info payload.
    pub fn extract_identity(self, raw: &Value) -> Result<SocialIdentity, CoreError> {
        let (provider_user_id, email) = match self {
            Self::Kakao => extract_kakao(raw),
            Self::Naver => extract_naver(raw),
            Self::Google => extract_google(raw),
        };

        let provider_user_id = provider_user_id.ok_or_else(|| {
            CoreError::Validation(format!("{} did not return a user id", self.as_str()))
        })?;

        Ok(SocialIdentity {
            provider: self,
            provider_user_id,
            email: email.filter(|e| !e.trim().is_empty()),
        })
    }
}

/// A verified identity at an external provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialIdentity {
    pub provider: Provider,
    pub provider_user_id: String,
    pub email: Option<String>,
}

/// Read a scalar id field as a string. Kakao sends numbers, others strings.
fn id_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn str_field(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

fn extract_kakao(raw: &Value) -> (Option<String>, Option<String>) {
    let email = str_field(raw.get("kakao_account").and_then(|acc| acc.get("email")));
    (id_field(raw.get("id")), email)
}

fn extract_naver(raw: &Value) -> (Option<String>, Option<String>) {
    let payload = raw.get("response").unwrap_or(raw);
    (id_field(payload.get("id")), str_field(payload.get("email")))
}

fn extract_google(raw: &Value) -> (Option<String>, Option<String>) {
    let id = id_field(raw.get("sub")).or_else(|| id_field(raw.get("id")));
    (id, str_field(raw.get("email")))
}

use std::fmt;

use crate::error::{Error, Result};

/// The three secrets a session may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    Llm,
    Weather,
    Exchange,
}

impl CredentialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialKind::Llm => "groq",
            CredentialKind::Weather => "openweather",
            CredentialKind::Exchange => "exchange",
        }
    }

    /// Human-facing service name, used in prompts and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            CredentialKind::Llm => "Groq",
            CredentialKind::Weather => "OpenWeather",
            CredentialKind::Exchange => "ExchangeRate",
        }
    }

    /// Environment variable that provides the default value.
    pub fn env_var(&self) -> &'static str {
        match self {
            CredentialKind::Llm => "GROQ_API_KEY",
            CredentialKind::Weather => "OPENWEATHER_API_KEY",
            CredentialKind::Exchange => "EXCHANGE_API_KEY",
        }
    }

    pub const fn all() -> &'static [CredentialKind] {
        &[CredentialKind::Llm, CredentialKind::Weather, CredentialKind::Exchange]
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An API key. `Debug` never reveals the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for empty or whitespace-only input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() { None } else { Some(Self(trimmed.to_string())) }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Secrets for one session. Built once, then only read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    llm: Option<ApiKey>,
    weather: Option<ApiKey>,
    exchange: Option<ApiKey>,
}

impl Credentials {
    pub fn new(llm: Option<ApiKey>, weather: Option<ApiKey>, exchange: Option<ApiKey>) -> Self {
        Self { llm, weather, exchange }
    }

    pub fn get(&self, kind: CredentialKind) -> Option<&ApiKey> {
        match kind {
            CredentialKind::Llm => self.llm.as_ref(),
            CredentialKind::Weather => self.weather.as_ref(),
            CredentialKind::Exchange => self.exchange.as_ref(),
        }
    }

    pub fn is_present(&self, kind: CredentialKind) -> bool {
        self.get(kind).is_some()
    }

    /// Returns a copy with `kind` set, leaving the original untouched.
    pub fn with(&self, kind: CredentialKind, key: ApiKey) -> Self {
        let mut next = self.clone();
        match kind {
            CredentialKind::Llm => next.llm = Some(key),
            CredentialKind::Weather => next.weather = Some(key),
            CredentialKind::Exchange => next.exchange = Some(key),
        }
        next
    }

    pub fn require(&self, kind: CredentialKind) -> Result<&ApiKey> {
        self.get(kind).ok_or(Error::MissingCredential(kind))
    }
}

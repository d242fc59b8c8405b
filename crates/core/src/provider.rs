use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Missing API key for {provider_name}: {env_var} environment variable is not set")]
    MissingApiKey {
        provider_name: String,
        env_var: String,
    },
}

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

const LM_STUDIO_DEFAULT_URL: &str = "http://localhost:1234";
const LM_STUDIO_DEFAULT_MODEL: &str = "smollm-360m-instruct-v0.2";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Provider {
    /// Local LM Studio server, no API key
    #[default]
    LmStudio,
    Grok,
    Openai,
    Gemini,
}

pub struct ProviderConfig {
    /// OpenAI-compatible API root; `/chat/completions` and `/models` hang off it
    pub api_base: &'static str,
    pub model: &'static str,
    pub env_var: Option<&'static str>,
}

impl Provider {
    pub fn config(&self) -> ProviderConfig {
        match self {
            Provider::LmStudio => ProviderConfig {
                api_base: "http://localhost:1234/v1",
                model: LM_STUDIO_DEFAULT_MODEL,
                env_var: None,
            },
            Provider::Grok => ProviderConfig {
                api_base: "https://api.x.ai/v1",
                model: "grok-4-fast",
                env_var: Some("XAI_API_KEY"),
            },
            Provider::Openai => ProviderConfig {
                api_base: "https://api.openai.com/v1",
                model: "gpt-5.1",
                env_var: Some("OPENAI_API_KEY"),
            },
            Provider::Gemini => ProviderConfig {
                api_base: "https://generativelanguage.googleapis.com/v1beta/openai",
                model: "gemini-3-pro",
                env_var: Some("GEMINI_API_KEY"),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::LmStudio => "LM Studio",
            Provider::Grok => "Grok",
            Provider::Openai => "OpenAI",
            Provider::Gemini => "Gemini",
        }
    }
}

/// Everything [`crate::ChatBackend`] needs to reach a backend.
#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub api_base: String,
    pub model: String,
    pub api_key: Option<String>,
    pub request_timeout: Duration,
    pub probe_timeout: Duration,
}

impl BackendConfig {
    pub fn new(api_base: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Build from a provider preset and the process environment.
    pub fn from_provider(provider: &Provider) -> Result<Self, ProviderError> {
        Self::from_provider_with(provider, |key| std::env::var(key).ok())
    }

    /// Build from a provider preset, reading overrides through `lookup`.
    ///
    /// `LM_STUDIO_URL` (server root) and `LM_STUDIO_MODEL` apply to the local
    /// preset; `VIDSIGHT_BASE_URL` and `VIDSIGHT_MODEL` apply to any preset
    /// and win over both.
    pub fn from_provider_with<F>(provider: &Provider, lookup: F) -> Result<Self, ProviderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let preset = provider.config();

        let mut api_base = preset.api_base.to_string();
        let mut model = preset.model.to_string();

        if *provider == Provider::LmStudio {
            let root = lookup("LM_STUDIO_URL").unwrap_or_else(|| LM_STUDIO_DEFAULT_URL.to_string());
            api_base = format!("{}/v1", root.trim_end_matches('/'));
            if let Some(m) = lookup("LM_STUDIO_MODEL") {
                model = m;
            }
        }
        if let Some(base) = lookup("VIDSIGHT_BASE_URL") {
            api_base = base;
        }
        if let Some(m) = lookup("VIDSIGHT_MODEL") {
            model = m;
        }

        let api_key = match preset.env_var {
            Some(env_var) => Some(lookup(env_var).filter(|k| !k.is_empty()).ok_or_else(|| {
                ProviderError::MissingApiKey {
                    provider_name: provider.name().to_string(),
                    env_var: env_var.to_string(),
                }
            })?),
            None => None,
        };

        Ok(Self {
            api_key,
            ..Self::new(api_base, model)
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeouts(mut self, request: Duration, probe: Duration) -> Self {
        self.request_timeout = request;
        self.probe_timeout = probe;
        self
    }

    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    pub fn models_url(&self) -> String {
        format!("{}/models", self.api_base)
    }
}

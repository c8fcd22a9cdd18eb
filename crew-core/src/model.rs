//! Model identifier mapping for the external agent runtime.
//!
//! Internal model ids map to `provider/model` strings. When an AI gateway
//! credential is configured the result is routed through
//! `vercel-ai-gateway/<provider>/<model>`.

/// Environment key checked first for a gateway credential.
pub const VERCEL_GATEWAY_KEY_VAR: &str = "VERCEL_AI_GATEWAY_API_KEY";
/// Fallback environment key for a gateway credential.
pub const GATEWAY_KEY_VAR: &str = "AI_GATEWAY_API_KEY";

const GATEWAY_PREFIX: &str = "vercel-ai-gateway";

const MODEL_TABLE: &[(&str, &str)] = &[
    ("gpt-5", "openai/gpt-5"),
    ("gpt-5-mini", "openai/gpt-5-mini"),
    ("gpt-5-nano", "openai/gpt-5-nano"),
    ("gpt-4.1", "openai/gpt-4.1"),
    ("gpt-4.1-mini", "openai/gpt-4.1-mini"),
    ("gpt-4o", "openai/gpt-4o"),
    ("gpt-4o-mini", "openai/gpt-4o-mini"),
    ("o3", "openai/o3"),
    ("o4-mini", "openai/o4-mini"),
    ("claude-opus-4-1", "anthropic/claude-opus-4-1"),
    ("claude-sonnet-4-5", "anthropic/claude-sonnet-4-5"),
    ("claude-sonnet-4", "anthropic/claude-sonnet-4"),
    ("claude-haiku-4-5", "anthropic/claude-haiku-4-5"),
    ("gemini-2.5-pro", "google/gemini-2.5-pro"),
    ("gemini-2.5-flash", "google/gemini-2.5-flash"),
    ("grok-4", "xai/grok-4"),
    ("deepseek-v3", "deepseek/deepseek-v3"),
];

/// Which credential signal activated the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewaySource {
    Vercel,
    Generic,
}

/// Gateway routing derived from process configuration.
///
/// Built explicitly so mapping stays a pure function of its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GatewayConfig {
    pub source: Option<GatewaySource>,
}

impl GatewayConfig {
    /// No gateway: mapped models are returned unprefixed.
    pub fn disabled() -> Self {
        Self { source: None }
    }

    /// Derive the config from a key lookup. Blank values do not count.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).is_some_and(|v| !v.trim().is_empty());
        let source = if present(VERCEL_GATEWAY_KEY_VAR) {
            Some(GatewaySource::Vercel)
        } else if present(GATEWAY_KEY_VAR) {
            Some(GatewaySource::Generic)
        } else {
            None
        };
        Self { source }
    }

    /// `from_lookup` over the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn is_enabled(&self) -> bool {
        self.source.is_some()
    }
}

/// Map an internal model id to the runtime's `provider/model` string.
///
/// Blank and unknown ids yield `None`; the runtime then uses its default.
pub fn map_model(raw: Option<&str>, gateway: &GatewayConfig) -> Option<String> {
    let id = raw.map(str::trim).filter(|s| !s.is_empty())?;
    let (_, mapped) = MODEL_TABLE.iter().find(|(key, _)| *key == id)?;
    if gateway.is_enabled() {
        Some(format!("{GATEWAY_PREFIX}/{mapped}"))
    } else {
        Some((*mapped).to_string())
    }
}

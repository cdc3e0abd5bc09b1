//! Printer configuration.

use vizprint_transport::DEFAULT_HOST;

/// Environment variable whose presence turns on JSON output.
pub const ACTIVATION_VAR: &str = "VIZTERM";

/// Printer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Host the viewer listens on.
    pub host: String,
    /// Environment variable checked by `from_env`.
    pub activation_var: String,
    /// Emit framed JSON even without a socket channel.
    pub env_active: bool,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            activation_var: ACTIVATION_VAR.to_string(),
            env_active: false,
        }
    }
}

impl PrinterConfig {
    /// Read activation from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var_os(name).is_some())
    }

    /// Read activation through `is_set`, which reports whether a variable is
    /// present.
    #[must_use]
    pub fn from_lookup(is_set: impl Fn(&str) -> bool) -> Self {
        let config = Self::default();
        let env_active = is_set(&config.activation_var);
        Self {
            env_active,
            ..config
        }
    }

    /// Override the viewer host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Force environment activation on or off.
    #[must_use]
    pub const fn with_env_active(mut self, env_active: bool) -> Self {
        self.env_active = env_active;
        self
    }
}

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Environment variable that selects the runtime mode.
pub const MODE_ENV_VAR: &str = "PAGESTORE_ENV";

/// Runtime mode gate for the editor API.
///
/// The editor endpoints read and write the project's files, so they are only
/// served in development. Any value of [`MODE_ENV_VAR`] other than
/// `production` means development.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    #[default]
    Development,
    Production,
}

impl RuntimeMode {
    pub fn from_env_value(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }

    /// Mode from [`MODE_ENV_VAR`], or `None` if unset.
    pub fn from_env() -> Option<Self> {
        std::env::var(MODE_ENV_VAR)
            .ok()
            .map(|value| Self::from_env_value(&value))
    }

    pub fn allows_editing(self) -> bool {
        matches!(self, Self::Development)
    }

    /// Reject the request unless editing is allowed in this mode.
    pub fn ensure_editable(self) -> ServerResult<()> {
        if self.allows_editing() {
            Ok(())
        } else {
            Err(ServerError::NotAllowed)
        }
    }
}

impl std::fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

use serde::{Deserialize, Serialize};

/// Client details captured alongside a successful credential check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMetadata {
    ip_address: Option<String>,
    user_agent: Option<String>,
    device: Option<String>,
}

impl ClientMetadata {
    /// Creates client metadata from transport-level details.
    #[must_use]
    pub fn new(
        ip_address: Option<String>,
        user_agent: Option<String>,
        device: Option<String>,
    ) -> Self {
        Self {
            ip_address: non_blank(ip_address),
            user_agent: non_blank(user_agent),
            device: non_blank(device),
        }
    }

    /// Returns the caller IP address, if known.
    #[must_use]
    pub fn ip_address(&self) -> Option<&str> {
        self.ip_address.as_deref()
    }

    /// Returns the caller user-agent, if known.
    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Returns the caller device label, if known.
    #[must_use]
    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

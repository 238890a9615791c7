//! Channel operation modes and the capabilities derived from them.
//!
//! A mode gates receive/route/send behavior independently of whether the
//! underlying connection is active. Capabilities are a pure function of the
//! mode; every call site (routing gate, gateway methods, CLI) derives them
//! from the same table.

use {
    serde::{Deserialize, Serialize},
    std::{fmt, str::FromStr},
};

use crate::error::Error;

/// Operational mode of one channel account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelMode {
    Enabled,
    Dnd,
    ReadOnly,
    WriteOnly,
    Disabled,
}

/// All valid channel modes, in display order.
pub const CHANNEL_MODES: [ChannelMode; 5] = [
    ChannelMode::Enabled,
    ChannelMode::Dnd,
    ChannelMode::ReadOnly,
    ChannelMode::WriteOnly,
    ChannelMode::Disabled,
];

/// Behavior flags derived from a channel mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeCapabilities {
    /// Can receive inbound messages.
    pub can_receive: bool,
    /// Can route messages to the agent for processing.
    pub can_route: bool,
    /// Can send outbound messages/responses.
    pub can_send: bool,
    /// Should send the static DND auto-reply.
    pub send_dnd_reply: bool,
    /// Should start/maintain the connection.
    pub should_connect: bool,
}

/// Token cost implication of a mode, for operator-facing status output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCost {
    /// Routed to the agent and answered normally.
    Normal,
    /// Never routed to the agent, so no tokens are spent.
    Zero,
    /// Routed to the agent but responses are suppressed.
    ReadOnly,
}

impl ChannelMode {
    /// Wire/config string form of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Dnd => "dnd",
            Self::ReadOnly => "read-only",
            Self::WriteOnly => "write-only",
            Self::Disabled => "disabled",
        }
    }

    /// Normalize a mode string, returning `None` if it is not one of the
    /// five modes.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        CHANNEL_MODES.into_iter().find(|m| m.as_str() == value)
    }

    /// Capabilities for this mode. Total and pure.
    #[must_use]
    pub const fn capabilities(self) -> ModeCapabilities {
        match self {
            Self::Enabled => ModeCapabilities {
                can_receive: true,
                can_route: true,
                can_send: true,
                send_dnd_reply: false,
                should_connect: true,
            },
            Self::Dnd => ModeCapabilities {
                can_receive: true,
                // No agent routing, only the static DND reply.
                can_route: false,
                can_send: true,
                send_dnd_reply: true,
                should_connect: true,
            },
            Self::ReadOnly => ModeCapabilities {
                can_receive: true,
                can_route: true,
                // Routed for processing, but responses are suppressed.
                can_send: false,
                send_dnd_reply: false,
                should_connect: true,
            },
            Self::WriteOnly => ModeCapabilities {
                can_receive: false,
                can_route: false,
                // Connection stays up so outbound sends keep working.
                can_send: true,
                send_dnd_reply: false,
                should_connect: true,
            },
            Self::Disabled => ModeCapabilities {
                can_receive: false,
                can_route: false,
                can_send: false,
                send_dnd_reply: false,
                should_connect: false,
            },
        }
    }

    /// Human-readable description for status output.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Enabled => "Normal operation (receive, route, respond)",
            Self::Dnd => "Do Not Disturb (receive, auto-reply only, no agent routing)",
            Self::ReadOnly => "Read-only (receive and route to agent, but cannot send responses)",
            Self::WriteOnly => "Write-only (can send outbound messages, but doesn't receive)",
            Self::Disabled => "Disabled (fully offline)",
        }
    }

    /// Token cost class, derived from the routing/sending capabilities.
    #[must_use]
    pub const fn token_cost(self) -> TokenCost {
        let capabilities = self.capabilities();
        if !capabilities.can_route {
            TokenCost::Zero
        } else if !capabilities.can_send {
            TokenCost::ReadOnly
        } else {
            TokenCost::Normal
        }
    }
}

/// Check whether a string names one of the five channel modes.
#[must_use]
pub fn is_valid_mode(value: &str) -> bool {
    ChannelMode::parse(value).is_some()
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Error::invalid_mode(s))
    }
}

/// Runtime mode override for one `(channel, account)` pair.
///
/// Lives only in memory; re-seeded from configuration on first store touch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelModeState {
    pub mode: ChannelMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnd_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(
        can_receive: bool,
        can_route: bool,
        can_send: bool,
        send_dnd_reply: bool,
        should_connect: bool,
    ) -> ModeCapabilities {
        ModeCapabilities {
            can_receive,
            can_route,
            can_send,
            send_dnd_reply,
            should_connect,
        }
    }

    #[test]
    fn capability_table_is_exact() {
        assert_eq!(
            ChannelMode::Enabled.capabilities(),
            caps(true, true, true, false, true)
        );
        assert_eq!(
            ChannelMode::Dnd.capabilities(),
            caps(true, false, true, true, true)
        );
        assert_eq!(
            ChannelMode::ReadOnly.capabilities(),
            caps(true, true, false, false, true)
        );
        assert_eq!(
            ChannelMode::WriteOnly.capabilities(),
            caps(false, false, true, false, true)
        );
        assert_eq!(
            ChannelMode::Disabled.capabilities(),
            caps(false, false, false, false, false)
        );
    }

    #[test]
    fn parse_accepts_exactly_the_five_modes() {
        for mode in CHANNEL_MODES {
            assert_eq!(ChannelMode::parse(mode.as_str()), Some(mode));
            assert!(is_valid_mode(mode.as_str()));
        }
        assert_eq!(ChannelMode::parse("paused"), None);
        assert_eq!(ChannelMode::parse("Enabled"), None);
        assert!(!is_valid_mode(""));
    }

    #[test]
    fn from_str_reports_the_bad_value() {
        let err = "offline".parse::<ChannelMode>().unwrap_err();
        assert_eq!(err.to_string(), "invalid channel mode: offline");
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&ChannelMode::ReadOnly).unwrap();
        assert_eq!(json, "\"read-only\"");
        let mode: ChannelMode = serde_json::from_str("\"write-only\"").unwrap();
        assert_eq!(mode, ChannelMode::WriteOnly);
    }

    #[test]
    fn token_cost_tracks_routing() {
        assert_eq!(ChannelMode::Enabled.token_cost(), TokenCost::Normal);
        assert_eq!(ChannelMode::Dnd.token_cost(), TokenCost::Zero);
        assert_eq!(ChannelMode::ReadOnly.token_cost(), TokenCost::ReadOnly);
        assert_eq!(ChannelMode::WriteOnly.token_cost(), TokenCost::Zero);
        assert_eq!(ChannelMode::Disabled.token_cost(), TokenCost::Zero);
    }

    #[test]
    fn descriptions_are_nonempty() {
        for mode in CHANNEL_MODES {
            assert!(!mode.describe().is_empty());
        }
    }
}

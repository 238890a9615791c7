//! Mode routing gate for the inbound message pipeline.
//!
//! Sits between channel receipt and agent invocation: every inbound message
//! passes through [`check_channel_mode`] before any tokens are spent. The
//! gate only reads mode state through [`ChannelController`]; it never drives
//! the lifecycle.

use {
    switchboard_channels::{ChannelController, ChannelMode, ModeCapabilities},
    tracing::debug,
};

/// Auto-reply sent for DND overrides that carry no custom message.
pub const DEFAULT_DND_MESSAGE: &str =
    "I'm currently in Do Not Disturb mode. I'll respond when I'm back online.";

/// Effective mode of one channel account with its routing consequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeCheck {
    pub mode: ChannelMode,
    pub capabilities: ModeCapabilities,
    /// Custom DND message from the override, when one was set.
    pub dnd_message: Option<String>,
}

/// DND view used by callers that only auto-reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DndStatus {
    Off,
    /// DND is active; `message` is what to send back (custom or default).
    On { message: String },
}

/// Resolve the effective mode and its capabilities. No override means
/// normal operation; whether the account is connected at all is the
/// lifecycle's concern, not the gate's.
#[must_use]
pub fn check_channel_mode(
    controller: &dyn ChannelController,
    channel_id: &str,
    account_id: Option<&str>,
) -> ModeCheck {
    let state = controller.channel_mode_state(channel_id, account_id);
    let (mode, dnd_message) =
        state.map_or((ChannelMode::Enabled, None), |s| (s.mode, s.dnd_message));
    let capabilities = mode.capabilities();
    if !capabilities.can_route {
        debug!(channel_id, mode = mode.as_str(), "message gated by channel mode");
    }
    ModeCheck {
        mode,
        capabilities,
        dnd_message,
    }
}

/// Whether an inbound message on this channel reaches the agent.
#[must_use]
pub fn should_route_to_agent(
    controller: &dyn ChannelController,
    channel_id: &str,
    account_id: Option<&str>,
) -> bool {
    check_channel_mode(controller, channel_id, account_id)
        .capabilities
        .can_route
}

/// Whether a response may be sent on this channel.
#[must_use]
pub fn can_send_response(
    controller: &dyn ChannelController,
    channel_id: &str,
    account_id: Option<&str>,
) -> bool {
    check_channel_mode(controller, channel_id, account_id)
        .capabilities
        .can_send
}

/// DND status with the message to auto-reply, falling back to
/// [`DEFAULT_DND_MESSAGE`] when the override has none.
#[must_use]
pub fn dnd_status(
    controller: &dyn ChannelController,
    channel_id: &str,
    account_id: Option<&str>,
) -> DndStatus {
    let check = check_channel_mode(controller, channel_id, account_id);
    if check.mode == ChannelMode::Dnd {
        DndStatus::On {
            message: check
                .dnd_message
                .unwrap_or_else(|| DEFAULT_DND_MESSAGE.to_string()),
        }
    } else {
        DndStatus::Off
    }
}

/// Negation of the routing decision, kept for callers that predate the
/// five-mode machine. Blocks for every non-routing mode, not just DND.
#[must_use]
pub fn should_block_for_dnd(
    controller: &dyn ChannelController,
    channel_id: &str,
    account_id: Option<&str>,
) -> bool {
    !should_route_to_agent(controller, channel_id, account_id)
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Mutex};

    use async_trait::async_trait;

    use {
        super::*,
        switchboard_channels::{ChannelModeState, Result, SetModeOptions},
    };

    /// Mode-state-only controller; lifecycle calls are unreachable here.
    #[derive(Default)]
    struct StubController {
        overrides: Mutex<HashMap<String, ChannelModeState>>,
    }

    impl StubController {
        fn with_mode(channel_id: &str, mode: ChannelMode, dnd_message: Option<&str>) -> Self {
            let stub = Self::default();
            stub.overrides.lock().unwrap().insert(
                channel_id.to_string(),
                ChannelModeState {
                    mode,
                    dnd_message: dnd_message.map(str::to_string),
                },
            );
            stub
        }
    }

    #[async_trait]
    impl ChannelController for StubController {
        async fn start_channel(&self, _channel_id: &str, _account_id: Option<&str>) {}

        async fn stop_channel(&self, _channel_id: &str, _account_id: Option<&str>) {}

        async fn set_channel_mode(
            &self,
            channel_id: &str,
            mode: ChannelMode,
            options: SetModeOptions,
        ) -> Result<()> {
            self.overrides.lock().unwrap().insert(
                channel_id.to_string(),
                ChannelModeState {
                    mode,
                    dnd_message: options.dnd_message,
                },
            );
            Ok(())
        }

        fn channel_mode(&self, channel_id: &str, account_id: Option<&str>) -> Option<ChannelMode> {
            self.channel_mode_state(channel_id, account_id).map(|s| s.mode)
        }

        fn channel_mode_state(
            &self,
            channel_id: &str,
            _account_id: Option<&str>,
        ) -> Option<ChannelModeState> {
            self.overrides.lock().unwrap().get(channel_id).cloned()
        }

        fn clear_channel_mode_override(&self, channel_id: &str, _account_id: Option<&str>) {
            self.overrides.lock().unwrap().remove(channel_id);
        }

        fn mark_channel_logged_out(
            &self,
            _channel_id: &str,
            _cleared: bool,
            _account_id: Option<&str>,
        ) {
        }
    }

    #[test]
    fn no_override_routes_and_sends() {
        let controller = StubController::default();
        let check = check_channel_mode(&controller, "mail", None);
        assert_eq!(check.mode, ChannelMode::Enabled);
        assert!(check.capabilities.can_route);
        assert!(check.capabilities.can_send);
        assert!(!check.capabilities.send_dnd_reply);
        assert_eq!(dnd_status(&controller, "mail", None), DndStatus::Off);
    }

    #[test]
    fn dnd_blocks_routing_but_allows_the_auto_reply() {
        let controller = StubController::with_mode("mail", ChannelMode::Dnd, None);
        let check = check_channel_mode(&controller, "mail", None);
        assert!(!check.capabilities.can_route);
        assert!(check.capabilities.can_send);
        assert!(check.capabilities.send_dnd_reply);
        assert!(should_block_for_dnd(&controller, "mail", None));
    }

    #[test]
    fn dnd_status_prefers_the_custom_message() {
        let controller = StubController::with_mode("mail", ChannelMode::Dnd, Some("back at noon"));
        assert_eq!(
            dnd_status(&controller, "mail", None),
            DndStatus::On {
                message: "back at noon".into()
            }
        );

        let controller = StubController::with_mode("mail", ChannelMode::Dnd, None);
        assert_eq!(
            dnd_status(&controller, "mail", None),
            DndStatus::On {
                message: DEFAULT_DND_MESSAGE.into()
            }
        );
    }

    #[test]
    fn read_only_routes_without_sending() {
        let controller = StubController::with_mode("mail", ChannelMode::ReadOnly, None);
        assert!(should_route_to_agent(&controller, "mail", None));
        assert!(!can_send_response(&controller, "mail", None));
        let check = check_channel_mode(&controller, "mail", None);
        assert!(!check.capabilities.send_dnd_reply);
    }

    #[test]
    fn write_only_sends_without_routing() {
        let controller = StubController::with_mode("mail", ChannelMode::WriteOnly, None);
        assert!(!should_route_to_agent(&controller, "mail", None));
        assert!(can_send_response(&controller, "mail", None));
        // Blocked for routing even though DND is not involved.
        assert!(should_block_for_dnd(&controller, "mail", None));
        assert_eq!(dnd_status(&controller, "mail", None), DndStatus::Off);
    }

    #[test]
    fn disabled_blocks_everything_silently() {
        let controller = StubController::with_mode("mail", ChannelMode::Disabled, None);
        let check = check_channel_mode(&controller, "mail", None);
        assert!(!check.capabilities.can_route);
        assert!(!check.capabilities.can_send);
        assert!(!check.capabilities.send_dnd_reply);
        assert_eq!(dnd_status(&controller, "mail", None), DndStatus::Off);
    }

    #[test]
    fn channels_are_gated_independently() {
        let controller = StubController::with_mode("mail", ChannelMode::Dnd, None);
        assert!(!should_route_to_agent(&controller, "mail", None));
        assert!(should_route_to_agent(&controller, "sms", None));
    }
}

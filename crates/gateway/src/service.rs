//! Gateway-facing mode operations.
//!
//! Thin validation and dispatch layer between the RPC surface and the
//! [`ChannelController`]: parameters arrive as loose JSON, get validated
//! here, and results go back as JSON. Wire framing and client auth live in
//! the host, not here.

use std::sync::Arc;

use {
    serde_json::{Value, json},
    tracing::info,
};

use switchboard_channels::{
    CHANNEL_MODES, ChannelController, ChannelMode, SetModeOptions,
};

/// Error type returned by service methods.
pub type ServiceError = String;
pub type ServiceResult<T = Value> = Result<T, ServiceError>;

fn require_str<'a>(params: &'a Value, key: &str) -> Result<&'a str, ServiceError> {
    params
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("missing '{key}' parameter"))
}

fn optional_str<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(Value::as_str)
}

fn parse_mode(value: &str) -> Result<ChannelMode, ServiceError> {
    ChannelMode::parse(value).ok_or_else(|| {
        let accepted: Vec<&str> = CHANNEL_MODES.iter().map(|m| m.as_str()).collect();
        format!(
            "invalid mode '{value}' (accepted: {})",
            accepted.join(", ")
        )
    })
}

/// Mode service over the channel manager.
pub struct ChannelModeService {
    controller: Arc<dyn ChannelController>,
}

impl ChannelModeService {
    pub fn new(controller: Arc<dyn ChannelController>) -> Self {
        Self { controller }
    }

    /// `channels.mode.set {channel, mode, accountId?, dndMessage?}`.
    pub async fn mode_set(&self, params: Value) -> ServiceResult {
        let channel = require_str(&params, "channel")?;
        let mode = parse_mode(require_str(&params, "mode")?)?;
        let options = SetModeOptions {
            dnd_message: optional_str(&params, "dndMessage").map(str::to_string),
            account_id: optional_str(&params, "accountId").map(str::to_string),
        };
        let account_id = options.account_id.clone();
        self.controller
            .set_channel_mode(channel, mode, options)
            .await
            .map_err(|e| e.to_string())?;
        info!(channel, mode = mode.as_str(), "channel mode set");
        Ok(json!({
            "ok": true,
            "channel": channel,
            "accountId": account_id,
            "mode": mode,
        }))
    }

    /// `channels.mode.get {channel, accountId?}`. `mode` is `null` when no
    /// override exists (configuration decides at start time).
    pub async fn mode_get(&self, params: Value) -> ServiceResult {
        let channel = require_str(&params, "channel")?;
        let account_id = optional_str(&params, "accountId");
        let state = self.controller.channel_mode_state(channel, account_id);
        Ok(json!({
            "channel": channel,
            "mode": state.as_ref().map(|s| s.mode),
            "dndMessage": state.and_then(|s| s.dnd_message),
        }))
    }

    /// `channels.dnd.set {channel, enabled, message?, accountId?}`. Enabling
    /// installs a DND override; disabling reverts to normal operation.
    pub async fn dnd_set(&self, params: Value) -> ServiceResult {
        let channel = require_str(&params, "channel")?;
        let enabled = params
            .get("enabled")
            .and_then(Value::as_bool)
            .ok_or_else(|| "missing 'enabled' parameter".to_string())?;
        let mode = if enabled {
            ChannelMode::Dnd
        } else {
            ChannelMode::Enabled
        };
        let options = SetModeOptions {
            dnd_message: enabled
                .then(|| optional_str(&params, "message").map(str::to_string))
                .flatten(),
            account_id: optional_str(&params, "accountId").map(str::to_string),
        };
        self.controller
            .set_channel_mode(channel, mode, options)
            .await
            .map_err(|e| e.to_string())?;
        info!(channel, enabled, "channel dnd set");
        Ok(json!({ "ok": true, "channel": channel, "enabled": enabled }))
    }

    /// `channels.dnd.get {channel, accountId?}`. No override reads as
    /// `{enabled: false}`.
    pub async fn dnd_get(&self, params: Value) -> ServiceResult {
        let channel = require_str(&params, "channel")?;
        let account_id = optional_str(&params, "accountId");
        let state = self.controller.channel_mode_state(channel, account_id);
        let enabled = state
            .as_ref()
            .is_some_and(|s| s.mode == ChannelMode::Dnd);
        Ok(json!({
            "channel": channel,
            "enabled": enabled,
            "message": state.filter(|s| s.mode == ChannelMode::Dnd).and_then(|s| s.dnd_message),
        }))
    }
}

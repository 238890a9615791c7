//! Channel plugin contract.
//!
//! Each channel (Telegram, Discord, Slack, mail, etc.) implements
//! [`ChannelPlugin`] with a config adapter that resolves accounts out of the
//! gateway configuration and, for connection-oriented channels, a
//! [`ChannelLifecycle`] whose `start_account` runs for the life of the
//! connection. Plugins are owned and registered by the host; the core only
//! looks them up by id.

use std::{fmt, path::PathBuf, sync::Arc};

use {async_trait::async_trait, serde_json::Value, tokio_util::sync::CancellationToken};

use crate::{
    error::Result,
    mode::{ChannelMode, ChannelModeState},
    snapshot::{AccountSnapshot, SnapshotPatch},
};

/// Account id used when a channel has no multi-account configuration.
pub const DEFAULT_ACCOUNT_ID: &str = "default";

/// Ambient process facts handed to channel hooks.
#[derive(Debug, Clone, Default)]
pub struct RuntimeEnv {
    /// Directory for per-channel runtime state (auth caches, offsets).
    pub state_dir: Option<PathBuf>,
}

/// What the config adapter can say about one account, for status display.
#[derive(Debug, Clone, Default)]
pub struct AccountDescription {
    /// `Some(false)` marks the account as present but not usable yet.
    pub configured: Option<bool>,
}

/// Core channel plugin trait.
pub trait ChannelPlugin: Send + Sync {
    /// Channel identifier (e.g. "telegram", "mail").
    fn id(&self) -> &str;

    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Configuration accessors for this channel.
    fn config(&self) -> &dyn ChannelConfigAdapter;

    /// Lifecycle hooks. `None` means the channel has nothing to connect
    /// (start/stop become no-ops).
    fn lifecycle(&self) -> Option<&dyn ChannelLifecycle> {
        None
    }

    /// Template snapshot used before an account has any recorded state.
    fn default_snapshot(&self) -> AccountSnapshot {
        AccountSnapshot::new(DEFAULT_ACCOUNT_ID)
    }
}

/// Resolves accounts and their enabled/configured state out of the gateway
/// configuration. Configuration is an opaque JSON document; adapters know
/// their own slice of it.
#[async_trait]
pub trait ChannelConfigAdapter: Send + Sync {
    /// Account ids known to the current configuration.
    fn list_account_ids(&self, cfg: &Value) -> Vec<String>;

    /// Resolve one account record (may be `null` for unknown ids).
    fn resolve_account(&self, cfg: &Value, account_id: &str) -> Value;

    /// Whether the account is enabled. Default: enabled unless the record
    /// carries `"enabled": false`.
    fn is_enabled(&self, account: &Value, _cfg: &Value) -> bool {
        account.get("enabled").and_then(Value::as_bool) != Some(false)
    }

    /// Whether the account has everything it needs to connect. May probe
    /// (filesystem, keychain), hence async.
    async fn is_configured(&self, _account: &Value, _cfg: &Value) -> bool {
        true
    }

    fn disabled_reason(&self, _account: &Value, _cfg: &Value) -> String {
        "disabled".into()
    }

    fn unconfigured_reason(&self, _account: &Value, _cfg: &Value) -> String {
        "not configured".into()
    }

    fn describe_account(&self, _account: &Value, _cfg: &Value) -> AccountDescription {
        AccountDescription::default()
    }

    /// Preferred account when the caller gives none.
    fn default_account_id(&self, _cfg: &Value) -> Option<String> {
        None
    }
}

/// Everything a lifecycle hook gets for one account.
pub struct ChannelAccountContext {
    /// Configuration snapshot taken when the operation began.
    pub config: Arc<Value>,
    pub account_id: String,
    /// Resolved account record.
    pub account: Value,
    pub runtime: Arc<RuntimeEnv>,
    /// Cancelled when the account should unwind. Cooperative only.
    pub cancel: CancellationToken,
    /// Read/patch this account's runtime snapshot.
    pub status: AccountStatusHandle,
    /// Back-reference into the manager, for hooks that flip modes or stop
    /// themselves.
    pub controller: Arc<dyn ChannelController>,
}

/// Connection lifecycle hooks, implemented per channel.
#[async_trait]
pub trait ChannelLifecycle: Send + Sync {
    /// Connect and serve one account. Runs until the connection ends or
    /// `ctx.cancel` fires; an `Err` is recorded as the account's last error.
    async fn start_account(&self, ctx: ChannelAccountContext) -> anyhow::Result<()>;

    /// Extra teardown beyond cancellation. Best-effort; failures are logged
    /// and swallowed.
    async fn stop_account(&self, _ctx: ChannelAccountContext) -> anyhow::Result<()> {
        Ok(())
    }
}

type GetStatusFn = dyn Fn() -> AccountSnapshot + Send + Sync;
type SetStatusFn = dyn Fn(SnapshotPatch) + Send + Sync;

/// Status get/set callbacks bound to one `(channel, account)` pair. Writes
/// re-enter the manager's store; hooks never touch the store directly.
#[derive(Clone)]
pub struct AccountStatusHandle {
    get: Arc<GetStatusFn>,
    set: Arc<SetStatusFn>,
}

impl AccountStatusHandle {
    pub fn new(get: Arc<GetStatusFn>, set: Arc<SetStatusFn>) -> Self {
        Self { get, set }
    }

    #[must_use]
    pub fn get(&self) -> AccountSnapshot {
        (self.get)()
    }

    pub fn set(&self, patch: SnapshotPatch) {
        (self.set)(patch);
    }
}

impl fmt::Debug for AccountStatusHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountStatusHandle").finish_non_exhaustive()
    }
}

/// Options for a mode change.
#[derive(Debug, Clone, Default)]
pub struct SetModeOptions {
    /// Custom DND auto-reply; always overwrites the stored one.
    pub dnd_message: Option<String>,
    /// Narrow the change to one account instead of every configured one.
    pub account_id: Option<String>,
}

/// DND view of a mode override, for legacy callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DndState {
    pub enabled: bool,
    pub message: Option<String>,
}

/// Manager operations exposed to lifecycle hooks and downstream consumers
/// (routing gate, gateway methods). Implemented by the channel manager.
#[async_trait]
pub trait ChannelController: Send + Sync {
    /// Start one account, or every configured account when `account_id` is
    /// `None`. Idempotent per account; never fails once launched (hook
    /// errors land in the snapshot).
    async fn start_channel(&self, channel_id: &str, account_id: Option<&str>);

    /// Best-effort stop; waits for the supervision task to end.
    async fn stop_channel(&self, channel_id: &str, account_id: Option<&str>);

    /// Install a mode override and drive the lifecycle to match its
    /// `should_connect` capability. Errors only for an unknown channel id.
    async fn set_channel_mode(
        &self,
        channel_id: &str,
        mode: ChannelMode,
        options: SetModeOptions,
    ) -> Result<()>;

    /// Current override mode, if any. `None` means "derive from
    /// configuration", not mode `enabled`.
    fn channel_mode(&self, channel_id: &str, account_id: Option<&str>) -> Option<ChannelMode>;

    /// Current override with its DND message, if any.
    fn channel_mode_state(
        &self,
        channel_id: &str,
        account_id: Option<&str>,
    ) -> Option<ChannelModeState>;

    /// Drop the override; reads fall back to configuration-derived state.
    fn clear_channel_mode_override(&self, channel_id: &str, account_id: Option<&str>);

    /// Record that the account lost its authenticated session.
    fn mark_channel_logged_out(&self, channel_id: &str, cleared: bool, account_id: Option<&str>);
}

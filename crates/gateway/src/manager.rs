//! Channel lifecycle manager.
//!
//! Owns one runtime store per registered channel plugin: cancellation
//! tokens, supervision tasks, account snapshots, and mode overrides, all
//! keyed by account id. Lifecycle hooks (`plugin.lifecycle()`) flow through
//! this manager; hooks never touch a store directly, they mutate through
//! the status handle in their context.
//!
//! Concurrency model: fan-out across a channel's accounts is joined before
//! an operation returns; operations on different `(channel, account)` pairs
//! are independent. A start and a stop racing on the same account are
//! deliberately not serialized — start is idempotent and stop is
//! best-effort, so the pair converges without a lock held across await
//! points. Cancellation is cooperative: a hung hook stalls its stop call.

use std::{
    collections::{BTreeSet, HashMap},
    sync::{Arc, Mutex, Weak},
};

use {
    async_trait::async_trait,
    futures::future::join_all,
    serde::Serialize,
    serde_json::Value,
    tokio::task::JoinHandle,
    tokio_util::sync::CancellationToken,
    tracing::{error, warn},
};

use switchboard_channels::{
    AccountSnapshot, AccountState, AccountStatusHandle, ChannelAccountContext,
    ChannelConfigAdapter, ChannelController, ChannelMode, ChannelModeState, ChannelPlugin,
    ChannelRegistry, DEFAULT_ACCOUNT_ID, DndState, Error, Result, RuntimeEnv, SetModeOptions,
    SnapshotPatch,
};

/// Error recorded when a start is skipped because of a runtime `disabled`
/// override (as opposed to configuration-derived disablement).
const DISABLED_AT_RUNTIME: &str = "disabled at runtime";

/// Returns the current configuration document. Loading and validation live
/// outside this crate.
pub type ConfigLoader = Arc<dyn Fn() -> Value + Send + Sync>;

/// Invalidates the outbound target/directory cache for a channel (and
/// optionally one account) before that channel starts.
pub type TargetCacheReset = Arc<dyn Fn(&str, Option<&str>) + Send + Sync>;

fn unix_now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

fn cancelled_token() -> CancellationToken {
    let token = CancellationToken::new();
    token.cancel();
    token
}

/// Per-channel runtime state, keyed by account id.
#[derive(Default)]
struct ChannelRuntimeStore {
    cancels: HashMap<String, CancellationToken>,
    tasks: HashMap<String, JoinHandle<()>>,
    snapshots: HashMap<String, AccountSnapshot>,
    mode_overrides: HashMap<String, ChannelModeState>,
}

/// Consolidated runtime view: one default-account snapshot per channel plus
/// the full per-account map.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRuntimeSnapshot {
    pub channels: HashMap<String, AccountSnapshot>,
    pub channel_accounts: HashMap<String, HashMap<String, AccountSnapshot>>,
}

pub struct ChannelManagerOptions {
    pub registry: Arc<ChannelRegistry>,
    pub load_config: ConfigLoader,
    /// Per-channel runtime environment handed to lifecycle hooks.
    pub runtime_envs: HashMap<String, Arc<RuntimeEnv>>,
    /// External collaborator's cache invalidation, run before each start.
    pub reset_target_cache: Option<TargetCacheReset>,
}

/// Channel lifecycle and mode orchestration core.
pub struct ChannelManager {
    registry: Arc<ChannelRegistry>,
    load_config: ConfigLoader,
    runtime_envs: HashMap<String, Arc<RuntimeEnv>>,
    reset_target_cache: Option<TargetCacheReset>,
    stores: Mutex<HashMap<String, ChannelRuntimeStore>>,
    /// Self-reference so hook contexts can carry the manager; populated by
    /// `Arc::new_cyclic`, never observed before construction completes.
    self_ref: Weak<ChannelManager>,
}

impl ChannelManager {
    pub fn new(options: ChannelManagerOptions) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            registry: options.registry,
            load_config: options.load_config,
            runtime_envs: options.runtime_envs,
            reset_target_cache: options.reset_target_cache,
            stores: Mutex::new(HashMap::new()),
            self_ref: self_ref.clone(),
        })
    }

    fn handle(&self) -> Option<Arc<Self>> {
        self.self_ref.upgrade()
    }

    /// Run `f` against the channel's store, creating and seeding it on
    /// first touch. The lock is never held across an await point.
    fn with_store<R>(&self, channel_id: &str, f: impl FnOnce(&mut ChannelRuntimeStore) -> R) -> R {
        let mut stores = self.stores.lock().unwrap();
        let store = stores.entry(channel_id.to_string()).or_insert_with(|| {
            let mut store = ChannelRuntimeStore::default();
            if let Some(plugin) = self.registry.get(channel_id) {
                let cfg = (self.load_config)();
                seed_mode_overrides(&mut store, plugin.as_ref(), &cfg);
            }
            store
        });
        f(store)
    }

    fn runtime_env(&self, channel_id: &str) -> Arc<RuntimeEnv> {
        self.runtime_envs
            .get(channel_id)
            .cloned()
            .unwrap_or_else(|| Arc::new(RuntimeEnv::default()))
    }

    fn default_snapshot_for(&self, channel_id: &str, account_id: &str) -> AccountSnapshot {
        let mut snapshot = self
            .registry
            .get(channel_id)
            .map_or_else(|| AccountSnapshot::new(account_id), |p| p.default_snapshot());
        snapshot.account_id = account_id.to_string();
        snapshot
    }

    fn account_snapshot(&self, channel_id: &str, account_id: &str) -> AccountSnapshot {
        self.with_store(channel_id, |store| store.snapshots.get(account_id).cloned())
            .unwrap_or_else(|| self.default_snapshot_for(channel_id, account_id))
    }

    fn patch_snapshot(
        &self,
        channel_id: &str,
        account_id: &str,
        patch: SnapshotPatch,
    ) -> AccountSnapshot {
        let fallback = self.default_snapshot_for(channel_id, account_id);
        self.with_store(channel_id, |store| {
            let entry = store
                .snapshots
                .entry(account_id.to_string())
                .or_insert(fallback);
            entry.apply(patch);
            entry.account_id = account_id.to_string();
            entry.clone()
        })
    }

    fn resolve_account_id(
        &self,
        plugin: &dyn ChannelPlugin,
        cfg: &Value,
        account_id: Option<&str>,
    ) -> String {
        if let Some(id) = account_id {
            return id.to_string();
        }
        let config = plugin.config();
        config
            .default_account_id(cfg)
            .or_else(|| config.list_account_ids(cfg).into_iter().next())
            .unwrap_or_else(|| DEFAULT_ACCOUNT_ID.to_string())
    }

    fn hook_context(
        self: &Arc<Self>,
        channel_id: &str,
        account_id: &str,
        config: Arc<Value>,
        account: Value,
        cancel: CancellationToken,
    ) -> ChannelAccountContext {
        let status = {
            let get_manager = Arc::clone(self);
            let set_manager = Arc::clone(self);
            let (get_channel, get_account) = (channel_id.to_string(), account_id.to_string());
            let (set_channel, set_account) = (channel_id.to_string(), account_id.to_string());
            AccountStatusHandle::new(
                Arc::new(move || get_manager.account_snapshot(&get_channel, &get_account)),
                Arc::new(move |patch| {
                    set_manager.patch_snapshot(&set_channel, &set_account, patch);
                }),
            )
        };
        ChannelAccountContext {
            config,
            account_id: account_id.to_string(),
            account,
            runtime: self.runtime_env(channel_id),
            cancel,
            status,
            controller: Arc::clone(self) as Arc<dyn ChannelController>,
        }
    }

    // ── Lifecycle ───────────────────────────────────────────────────────────

    /// Start one account, or every configured account of the channel.
    /// Unknown channels and channels without lifecycle hooks are no-ops.
    pub async fn start_channel(&self, channel_id: &str, account_id: Option<&str>) {
        let Some(plugin) = self.registry.get(channel_id) else {
            return;
        };
        if plugin.lifecycle().is_none() {
            return;
        }
        let cfg = Arc::new((self.load_config)());
        if let Some(reset) = &self.reset_target_cache {
            reset(channel_id, account_id);
        }
        let account_ids: Vec<String> = match account_id {
            Some(id) => vec![id.to_string()],
            None => plugin.config().list_account_ids(&cfg),
        };
        if account_ids.is_empty() {
            return;
        }
        join_all(account_ids.into_iter().map(|id| {
            self.start_account(channel_id, Arc::clone(&plugin), Arc::clone(&cfg), id)
        }))
        .await;
    }

    async fn start_account(
        &self,
        channel_id: &str,
        plugin: Arc<dyn ChannelPlugin>,
        cfg: Arc<Value>,
        account_id: String,
    ) {
        // Duplicate starts are no-ops; the check and the Starting transition
        // happen under one lock so concurrent callers see each other.
        let proceed = self.with_store(channel_id, |store| {
            if store.tasks.contains_key(&account_id) {
                return false;
            }
            if let Some(snapshot) = store.snapshots.get_mut(&account_id) {
                snapshot.apply(SnapshotPatch::default().state(AccountState::Starting));
            }
            true
        });
        if !proceed {
            return;
        }

        let config = plugin.config();
        let account = config.resolve_account(&cfg, &account_id);

        // Runtime mode override wins; otherwise the config enabled-check
        // maps to enabled/disabled.
        let override_mode =
            self.with_store(channel_id, |s| s.mode_overrides.get(&account_id).map(|st| st.mode));
        let effective_mode = override_mode.unwrap_or_else(|| {
            if config.is_enabled(&account, &cfg) {
                ChannelMode::Enabled
            } else {
                ChannelMode::Disabled
            }
        });

        if !effective_mode.capabilities().should_connect {
            let reason = if override_mode == Some(ChannelMode::Disabled) {
                DISABLED_AT_RUNTIME.to_string()
            } else {
                config.disabled_reason(&account, &cfg)
            };
            self.patch_snapshot(
                channel_id,
                &account_id,
                SnapshotPatch::default()
                    .state(AccountState::Idle)
                    .last_error(reason),
            );
            return;
        }

        if !config.is_configured(&account, &cfg).await {
            self.patch_snapshot(
                channel_id,
                &account_id,
                SnapshotPatch::default()
                    .state(AccountState::Idle)
                    .last_error(config.unconfigured_reason(&account, &cfg)),
            );
            return;
        }

        let Some(manager) = self.handle() else {
            return;
        };
        let cancel = CancellationToken::new();
        let fallback = self.default_snapshot_for(channel_id, &account_id);
        let now = unix_now_ms();

        // Launch under the store lock so the task entry exists before the
        // supervision wrapper's cleanup can possibly run.
        self.with_store(channel_id, |store| {
            if store.tasks.contains_key(&account_id) {
                return;
            }
            store.cancels.insert(account_id.clone(), cancel.clone());
            let entry = store
                .snapshots
                .entry(account_id.clone())
                .or_insert(fallback);
            entry.apply(
                SnapshotPatch::default()
                    .state(AccountState::Running)
                    .last_start_at(now)
                    .clear_last_error(),
            );
            entry.account_id = account_id.clone();
            let task = tokio::spawn(Self::supervise_account(
                Arc::clone(&manager),
                Arc::clone(&plugin),
                Arc::clone(&cfg),
                account.clone(),
                cancel.clone(),
                channel_id.to_string(),
                account_id.clone(),
            ));
            store.tasks.insert(account_id.clone(), task);
        });
    }

    /// Runs the plugin's start hook and owns the cleanup when it ends,
    /// whatever the outcome. Hook failures land in the snapshot, never at
    /// the start caller.
    async fn supervise_account(
        manager: Arc<Self>,
        plugin: Arc<dyn ChannelPlugin>,
        cfg: Arc<Value>,
        account: Value,
        cancel: CancellationToken,
        channel_id: String,
        account_id: String,
    ) {
        let result = match plugin.lifecycle() {
            Some(lifecycle) => {
                let ctx =
                    manager.hook_context(&channel_id, &account_id, Arc::clone(&cfg), account, cancel);
                lifecycle.start_account(ctx).await
            },
            None => Ok(()),
        };
        let failed = result.is_err();
        if let Err(err) = result {
            let message = format!("{err:#}");
            error!(channel_id, account_id, "channel account exited: {message}");
            manager.patch_snapshot(
                &channel_id,
                &account_id,
                SnapshotPatch::default().last_error(message),
            );
        }
        let now = unix_now_ms();
        manager.with_store(&channel_id, |store| {
            store.cancels.remove(&account_id);
            store.tasks.remove(&account_id);
            if let Some(snapshot) = store.snapshots.get_mut(&account_id) {
                let next = if failed {
                    AccountState::Failed
                } else {
                    AccountState::Idle
                };
                snapshot.apply(SnapshotPatch::default().state(next).last_stop_at(now));
            }
        });
    }

    /// Stop one account, or everything live or configured for the channel.
    /// Best-effort: hook failures are logged and swallowed.
    pub async fn stop_channel(&self, channel_id: &str, account_id: Option<&str>) {
        let plugin = self.registry.get(channel_id);
        let cfg = Arc::new((self.load_config)());
        let account_ids: Vec<String> = match account_id {
            Some(id) => vec![id.to_string()],
            None => {
                let mut ids: BTreeSet<String> = self.with_store(channel_id, |store| {
                    store
                        .cancels
                        .keys()
                        .chain(store.tasks.keys())
                        .cloned()
                        .collect()
                });
                if let Some(plugin) = &plugin {
                    ids.extend(plugin.config().list_account_ids(&cfg));
                }
                ids.into_iter().collect()
            },
        };
        join_all(
            account_ids
                .into_iter()
                .map(|id| self.stop_account(channel_id, plugin.clone(), Arc::clone(&cfg), id)),
        )
        .await;
    }

    async fn stop_account(
        &self,
        channel_id: &str,
        plugin: Option<Arc<dyn ChannelPlugin>>,
        cfg: Arc<Value>,
        account_id: String,
    ) {
        let (cancel, task) = self.with_store(channel_id, |store| {
            (
                store.cancels.get(&account_id).cloned(),
                store.tasks.remove(&account_id),
            )
        });
        let has_stop_hook = plugin.as_ref().is_some_and(|p| p.lifecycle().is_some());
        if cancel.is_none() && task.is_none() && !has_stop_hook {
            return;
        }

        if cancel.is_some() || task.is_some() {
            self.patch_snapshot(
                channel_id,
                &account_id,
                SnapshotPatch::default().state(AccountState::Stopping),
            );
        }
        if let Some(cancel) = &cancel {
            cancel.cancel();
        }

        if let Some(plugin) = &plugin {
            if let Some(lifecycle) = plugin.lifecycle() {
                if let Some(manager) = self.handle() {
                    let account = plugin.config().resolve_account(&cfg, &account_id);
                    let hook_cancel = cancel.clone().unwrap_or_else(cancelled_token);
                    let ctx = manager.hook_context(
                        channel_id,
                        &account_id,
                        Arc::clone(&cfg),
                        account,
                        hook_cancel,
                    );
                    if let Err(err) = lifecycle.stop_account(ctx).await {
                        warn!(channel_id, account_id, "stop hook failed: {err:#}");
                    }
                }
            }
        }

        if let Some(task) = task {
            // Swallow join errors: the supervision task may have been
            // cancelled or have panicked; stop still completes.
            let _ = task.await;
        }

        let now = unix_now_ms();
        let fallback = self.default_snapshot_for(channel_id, &account_id);
        self.with_store(channel_id, |store| {
            store.cancels.remove(&account_id);
            store.tasks.remove(&account_id);
            let entry = store
                .snapshots
                .entry(account_id.clone())
                .or_insert(fallback);
            let next = match entry.state {
                AccountState::Failed => AccountState::Failed,
                _ => AccountState::Idle,
            };
            entry.apply(SnapshotPatch::default().state(next).last_stop_at(now));
            entry.account_id = account_id.clone();
        });
    }

    /// Start every account of every registered channel.
    pub async fn start_channels(&self) {
        for plugin in self.registry.all() {
            self.start_channel(plugin.id(), None).await;
        }
    }

    // ── Mode control ────────────────────────────────────────────────────────

    /// Install a mode override for the account(s) and drive the lifecycle:
    /// modes that should connect start the account, modes that should not
    /// stop it. A connectivity-preserving change (enabled → read-only)
    /// leaves the running connection untouched.
    pub async fn set_channel_mode(
        &self,
        channel_id: &str,
        mode: ChannelMode,
        options: SetModeOptions,
    ) -> Result<()> {
        let Some(plugin) = self.registry.get(channel_id) else {
            return Err(Error::unknown_channel(channel_id));
        };
        let cfg = (self.load_config)();
        let account_ids = match &options.account_id {
            Some(id) => vec![id.clone()],
            None => plugin.config().list_account_ids(&cfg),
        };
        for account_id in account_ids {
            self.with_store(channel_id, |store| {
                // Always overwrite, including dropping a stale DND message.
                store.mode_overrides.insert(
                    account_id.clone(),
                    ChannelModeState {
                        mode,
                        dnd_message: options.dnd_message.clone(),
                    },
                );
            });
            if mode.capabilities().should_connect {
                self.start_channel(channel_id, Some(&account_id)).await;
            } else {
                self.stop_channel(channel_id, Some(&account_id)).await;
            }
        }
        Ok(())
    }

    /// Current override mode. `None` means no override exists; callers must
    /// derive from configuration, not assume `enabled`.
    #[must_use]
    pub fn channel_mode(&self, channel_id: &str, account_id: Option<&str>) -> Option<ChannelMode> {
        self.channel_mode_state(channel_id, account_id).map(|s| s.mode)
    }

    #[must_use]
    pub fn channel_mode_state(
        &self,
        channel_id: &str,
        account_id: Option<&str>,
    ) -> Option<ChannelModeState> {
        let plugin = self.registry.get(channel_id)?;
        let cfg = (self.load_config)();
        let resolved = self.resolve_account_id(plugin.as_ref(), &cfg, account_id);
        self.with_store(channel_id, |store| store.mode_overrides.get(&resolved).cloned())
    }

    pub fn clear_channel_mode_override(&self, channel_id: &str, account_id: Option<&str>) {
        let Some(plugin) = self.registry.get(channel_id) else {
            return;
        };
        let cfg = (self.load_config)();
        let account_ids = match account_id {
            Some(id) => vec![id.to_string()],
            None => plugin.config().list_account_ids(&cfg),
        };
        self.with_store(channel_id, |store| {
            for id in &account_ids {
                store.mode_overrides.remove(id);
            }
        });
    }

    /// Record a lost authenticated session on the (default) account.
    /// `cleared` distinguishes an explicit logout from a mere disconnect.
    pub fn mark_channel_logged_out(
        &self,
        channel_id: &str,
        cleared: bool,
        account_id: Option<&str>,
    ) {
        let Some(plugin) = self.registry.get(channel_id) else {
            return;
        };
        let cfg = (self.load_config)();
        let resolved = self.resolve_account_id(plugin.as_ref(), &cfg, account_id);
        let current = self.account_snapshot(channel_id, &resolved);
        let mut patch = SnapshotPatch::default().state(AccountState::Idle);
        if cleared {
            patch = patch.last_error("logged out");
        }
        if current.connected.is_some() {
            patch = patch.connected(false);
        }
        self.patch_snapshot(channel_id, &resolved, patch);
    }

    // ── Snapshot projection ─────────────────────────────────────────────────

    /// Read-only projection of every registered channel's account state,
    /// with display-only `last_error` fallbacks for accounts that are not
    /// running because they are disabled or unconfigured.
    #[must_use]
    pub fn runtime_snapshot(&self) -> ChannelRuntimeSnapshot {
        let cfg = (self.load_config)();
        let mut out = ChannelRuntimeSnapshot::default();
        for plugin in self.registry.all() {
            let channel_id = plugin.id().to_string();
            let config = plugin.config();
            let account_ids = config.list_account_ids(&cfg);
            let default_id = config
                .default_account_id(&cfg)
                .or_else(|| account_ids.first().cloned())
                .unwrap_or_else(|| DEFAULT_ACCOUNT_ID.to_string());
            let mut accounts = HashMap::new();
            for id in &account_ids {
                let account = config.resolve_account(&cfg, id);
                let enabled = config.is_enabled(&account, &cfg);
                let configured = config.describe_account(&account, &cfg).configured;
                let (stored, override_mode) = self.with_store(&channel_id, |store| {
                    (
                        store.snapshots.get(id).cloned(),
                        store.mode_overrides.get(id).map(|st| st.mode),
                    )
                });
                let mut snapshot = stored.unwrap_or_else(|| {
                    let mut s = plugin.default_snapshot();
                    s.account_id = id.clone();
                    s
                });
                snapshot.account_id = id.clone();
                if !snapshot.running() && snapshot.last_error.is_none() {
                    let runtime_disabled = override_mode
                        .is_some_and(|mode| !mode.capabilities().should_connect);
                    if runtime_disabled {
                        snapshot.last_error = Some(DISABLED_AT_RUNTIME.to_string());
                    } else if !enabled {
                        snapshot.last_error = Some(config.disabled_reason(&account, &cfg));
                    } else if configured == Some(false) {
                        snapshot.last_error = Some(config.unconfigured_reason(&account, &cfg));
                    }
                }
                accounts.insert(id.clone(), snapshot);
            }
            let default_account = accounts.get(&default_id).cloned().unwrap_or_else(|| {
                let mut s = plugin.default_snapshot();
                s.account_id = default_id.clone();
                s
            });
            out.channels.insert(channel_id.clone(), default_account);
            out.channel_accounts.insert(channel_id, accounts);
        }
        out
    }

    // ── Legacy enabled/DND shims ────────────────────────────────────────────
    // Kept for binary-compatible callers; expressed purely via the mode
    // operations so they cannot diverge in behavior.

    pub async fn set_channel_enabled(
        &self,
        channel_id: &str,
        enabled: bool,
        account_id: Option<&str>,
    ) -> Result<()> {
        let mode = if enabled {
            ChannelMode::Enabled
        } else {
            ChannelMode::Disabled
        };
        self.set_channel_mode(
            channel_id,
            mode,
            SetModeOptions {
                account_id: account_id.map(str::to_string),
                ..SetModeOptions::default()
            },
        )
        .await
    }

    #[must_use]
    pub fn channel_enabled(&self, channel_id: &str, account_id: Option<&str>) -> Option<bool> {
        self.channel_mode(channel_id, account_id)
            .map(|mode| mode != ChannelMode::Disabled)
    }

    pub fn clear_channel_enabled_override(&self, channel_id: &str, account_id: Option<&str>) {
        self.clear_channel_mode_override(channel_id, account_id);
    }

    pub async fn set_channel_dnd(
        &self,
        channel_id: &str,
        enabled: bool,
        message: Option<&str>,
        account_id: Option<&str>,
    ) -> Result<()> {
        if enabled {
            self.set_channel_mode(
                channel_id,
                ChannelMode::Dnd,
                SetModeOptions {
                    dnd_message: message.map(str::to_string),
                    account_id: account_id.map(str::to_string),
                },
            )
            .await
        } else {
            // Disabling DND reverts to normal operation.
            self.set_channel_mode(
                channel_id,
                ChannelMode::Enabled,
                SetModeOptions {
                    account_id: account_id.map(str::to_string),
                    ..SetModeOptions::default()
                },
            )
            .await
        }
    }

    #[must_use]
    pub fn channel_dnd(&self, channel_id: &str, account_id: Option<&str>) -> Option<DndState> {
        self.channel_mode_state(channel_id, account_id)
            .map(|state| DndState {
                enabled: state.mode == ChannelMode::Dnd,
                message: state.dnd_message,
            })
    }
}

/// Seed mode overrides from configuration, once per channel store. An
/// explicit config `mode` other than `enabled` wins; otherwise a legacy
/// `dnd.enabled` block maps to DND with its message. A config `mode` that
/// does not parse is ignored (validated config is assumed upstream).
fn seed_mode_overrides(store: &mut ChannelRuntimeStore, plugin: &dyn ChannelPlugin, cfg: &Value) {
    let config = plugin.config();
    for account_id in config.list_account_ids(cfg) {
        let account = config.resolve_account(cfg, &account_id);
        let explicit = account
            .get("mode")
            .and_then(Value::as_str)
            .and_then(ChannelMode::parse);
        let dnd_message = account
            .pointer("/dnd/message")
            .and_then(Value::as_str)
            .map(str::to_string);
        if let Some(mode) = explicit.filter(|m| *m != ChannelMode::Enabled) {
            store.mode_overrides.insert(
                account_id,
                ChannelModeState {
                    mode,
                    dnd_message: (mode == ChannelMode::Dnd).then_some(dnd_message).flatten(),
                },
            );
        } else if account.pointer("/dnd/enabled").and_then(Value::as_bool) == Some(true) {
            store.mode_overrides.insert(
                account_id,
                ChannelModeState {
                    mode: ChannelMode::Dnd,
                    dnd_message,
                },
            );
        }
    }
}

#[async_trait]
impl ChannelController for ChannelManager {
    async fn start_channel(&self, channel_id: &str, account_id: Option<&str>) {
        ChannelManager::start_channel(self, channel_id, account_id).await;
    }

    async fn stop_channel(&self, channel_id: &str, account_id: Option<&str>) {
        ChannelManager::stop_channel(self, channel_id, account_id).await;
    }

    async fn set_channel_mode(
        &self,
        channel_id: &str,
        mode: ChannelMode,
        options: SetModeOptions,
    ) -> Result<()> {
        ChannelManager::set_channel_mode(self, channel_id, mode, options).await
    }

    fn channel_mode(&self, channel_id: &str, account_id: Option<&str>) -> Option<ChannelMode> {
        ChannelManager::channel_mode(self, channel_id, account_id)
    }

    fn channel_mode_state(
        &self,
        channel_id: &str,
        account_id: Option<&str>,
    ) -> Option<ChannelModeState> {
        ChannelManager::channel_mode_state(self, channel_id, account_id)
    }

    fn clear_channel_mode_override(&self, channel_id: &str, account_id: Option<&str>) {
        ChannelManager::clear_channel_mode_override(self, channel_id, account_id);
    }

    fn mark_channel_logged_out(&self, channel_id: &str, cleared: bool, account_id: Option<&str>) {
        ChannelManager::mark_channel_logged_out(self, channel_id, cleared, account_id);
    }
}

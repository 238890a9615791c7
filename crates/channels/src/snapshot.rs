//! Per-account runtime snapshots and shallow-merge patches.
//!
//! Snapshots are mutated only by the channel manager during start/stop
//! transitions. Lifecycle state is an explicit enum; the legacy `running`
//! boolean is derived from it and kept in the serialized form for
//! binary-compatible callers.

use {
    serde::{
        Deserialize, Serialize,
        ser::{SerializeMap, Serializer},
    },
    serde_json::Value,
};

/// Lifecycle state of one channel account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountState {
    /// Not connected and not trying to be (stopped, disabled, unconfigured).
    Idle,
    /// Pre-start checks in flight, connection not yet launched.
    Starting,
    /// Supervision task launched and not yet finished.
    Running,
    /// Stop requested, waiting for the connection to unwind.
    Stopping,
    /// The last connection attempt ended with an error.
    Failed,
}

impl AccountState {
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Last-known runtime status of one channel account.
///
/// Plugin-defined fields ride along in `extra` and survive patches that do
/// not mention them.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSnapshot {
    pub account_id: String,
    pub state: AccountState,
    /// Unix millis of the last successful start.
    pub last_start_at: Option<i64>,
    /// Unix millis of the last stop or task completion.
    pub last_stop_at: Option<i64>,
    pub last_error: Option<String>,
    /// Transport-level connectivity, tracked only by plugins that report it.
    pub connected: Option<bool>,
    pub extra: serde_json::Map<String, Value>,
}

impl AccountSnapshot {
    #[must_use]
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            state: AccountState::Idle,
            last_start_at: None,
            last_stop_at: None,
            last_error: None,
            connected: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Derived from [`AccountState`]; kept for callers that predate the enum.
    #[must_use]
    pub const fn running(&self) -> bool {
        self.state.is_running()
    }

    /// Shallow-merge a patch onto this snapshot. Unset patch fields are
    /// preserved, not cleared.
    pub fn apply(&mut self, patch: SnapshotPatch) {
        if let Some(state) = patch.state {
            self.state = state;
        }
        if let Some(at) = patch.last_start_at {
            self.last_start_at = Some(at);
        }
        if let Some(at) = patch.last_stop_at {
            self.last_stop_at = Some(at);
        }
        if let Some(last_error) = patch.last_error {
            self.last_error = last_error;
        }
        if let Some(connected) = patch.connected {
            self.connected = Some(connected);
        }
        for (key, value) in patch.extra {
            self.extra.insert(key, value);
        }
    }
}

impl Serialize for AccountSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("accountId", &self.account_id)?;
        map.serialize_entry("state", &self.state)?;
        map.serialize_entry("running", &self.running())?;
        if let Some(at) = self.last_start_at {
            map.serialize_entry("lastStartAt", &at)?;
        }
        if let Some(at) = self.last_stop_at {
            map.serialize_entry("lastStopAt", &at)?;
        }
        map.serialize_entry("lastError", &self.last_error)?;
        if let Some(connected) = self.connected {
            map.serialize_entry("connected", &connected)?;
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Shallow patch for [`AccountSnapshot`]. Built with the `with_*` methods;
/// anything not set is left untouched when applied.
#[derive(Debug, Clone, Default)]
pub struct SnapshotPatch {
    state: Option<AccountState>,
    last_start_at: Option<i64>,
    last_stop_at: Option<i64>,
    /// `Some(None)` clears the error, `None` preserves it.
    last_error: Option<Option<String>>,
    connected: Option<bool>,
    extra: serde_json::Map<String, Value>,
}

impl SnapshotPatch {
    #[must_use]
    pub fn state(mut self, state: AccountState) -> Self {
        self.state = Some(state);
        self
    }

    #[must_use]
    pub fn last_start_at(mut self, at: i64) -> Self {
        self.last_start_at = Some(at);
        self
    }

    #[must_use]
    pub fn last_stop_at(mut self, at: i64) -> Self {
        self.last_stop_at = Some(at);
        self
    }

    #[must_use]
    pub fn last_error(mut self, message: impl Into<String>) -> Self {
        self.last_error = Some(Some(message.into()));
        self
    }

    /// Explicitly reset `last_error` (used at successful start).
    #[must_use]
    pub fn clear_last_error(mut self) -> Self {
        self.last_error = Some(None);
        self
    }

    #[must_use]
    pub fn connected(mut self, connected: bool) -> Self {
        self.connected = Some(connected);
        self
    }

    /// Attach a plugin-defined field.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_preserves_unset_fields() {
        let mut snap = AccountSnapshot::new("work");
        snap.apply(
            SnapshotPatch::default()
                .state(AccountState::Running)
                .last_start_at(1_000)
                .clear_last_error(),
        );
        snap.apply(SnapshotPatch::default().last_error("connection reset"));

        assert_eq!(snap.state, AccountState::Running);
        assert_eq!(snap.last_start_at, Some(1_000));
        assert_eq!(snap.last_error.as_deref(), Some("connection reset"));

        // A later patch that says nothing about the error keeps it.
        snap.apply(
            SnapshotPatch::default()
                .state(AccountState::Idle)
                .last_stop_at(2_000),
        );
        assert_eq!(snap.last_error.as_deref(), Some("connection reset"));
        assert_eq!(snap.last_stop_at, Some(2_000));
    }

    #[test]
    fn clear_last_error_is_explicit() {
        let mut snap = AccountSnapshot::new("default");
        snap.apply(SnapshotPatch::default().last_error("boom"));
        snap.apply(SnapshotPatch::default().clear_last_error());
        assert_eq!(snap.last_error, None);
    }

    #[test]
    fn running_is_derived_from_state() {
        let mut snap = AccountSnapshot::new("default");
        assert!(!snap.running());
        snap.apply(SnapshotPatch::default().state(AccountState::Running));
        assert!(snap.running());
        snap.apply(SnapshotPatch::default().state(AccountState::Stopping));
        assert!(!snap.running());
    }

    #[test]
    fn plugin_fields_merge_shallowly() {
        let mut snap = AccountSnapshot::new("default");
        snap.apply(SnapshotPatch::default().field("botUsername", "bot".into()));
        snap.apply(SnapshotPatch::default().field("peerCount", 3.into()));
        assert_eq!(snap.extra["botUsername"], "bot");
        assert_eq!(snap.extra["peerCount"], 3);
    }

    #[test]
    fn serializes_camel_case_with_derived_running() {
        let mut snap = AccountSnapshot::new("work");
        snap.apply(
            SnapshotPatch::default()
                .state(AccountState::Running)
                .last_start_at(42)
                .clear_last_error()
                .field("connectedSince", 41.into()),
        );
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["accountId"], "work");
        assert_eq!(json["state"], "running");
        assert_eq!(json["running"], true);
        assert_eq!(json["lastStartAt"], 42);
        assert_eq!(json["lastError"], Value::Null);
        assert_eq!(json["connectedSince"], 41);
        assert!(json.get("lastStopAt").is_none());
    }
}

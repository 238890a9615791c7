//! Channel plugin system and mode state machine.
//!
//! Each channel (Telegram, Discord, Slack, mail, etc.) implements the
//! [`ChannelPlugin`] trait with a config adapter and optional lifecycle
//! hooks. The five-state [`ChannelMode`] machine derives the capability set
//! that the routing gate, gateway methods, and CLI all consult.

pub mod error;
pub mod mode;
pub mod plugin;
pub mod registry;
pub mod snapshot;

pub use {
    error::{Error, Result},
    mode::{CHANNEL_MODES, ChannelMode, ChannelModeState, ModeCapabilities, TokenCost},
    plugin::{
        AccountDescription, AccountStatusHandle, ChannelAccountContext, ChannelConfigAdapter,
        ChannelController, ChannelLifecycle, ChannelPlugin, DEFAULT_ACCOUNT_ID, DndState,
        RuntimeEnv, SetModeOptions,
    },
    registry::ChannelRegistry,
    snapshot::{AccountSnapshot, AccountState, SnapshotPatch},
};

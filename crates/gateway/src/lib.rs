//! Gateway core: channel lifecycle orchestration and mode dispatch.
//!
//! Lifecycle:
//! 1. Host loads + validates config and registers channel plugins
//! 2. [`manager::ChannelManager`] starts every enabled account
//! 3. Mode/DND RPC operations dispatch through [`service::ChannelModeService`]
//!
//! Per-channel transports live in their own crates behind
//! `switchboard_channels::ChannelPlugin`; this crate never knows what a
//! Telegram or mail connection looks like.

pub mod manager;
pub mod service;

pub use {
    manager::{
        ChannelManager, ChannelManagerOptions, ChannelRuntimeSnapshot, ConfigLoader,
        TargetCacheReset,
    },
    service::{ChannelModeService, ServiceError, ServiceResult},
};

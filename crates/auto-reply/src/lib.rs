//! Inbound message gating — the step between channel receipt and the agent.
//!
//! Flow: channel message → mode gate (this crate) → agent invocation →
//! response delivery. The gate consults the channel's effective mode and
//! decides route / drop / DND auto-reply before any tokens are spent.

pub mod gate;

pub use gate::{
    DEFAULT_DND_MESSAGE, DndStatus, ModeCheck, can_send_response, check_channel_mode, dnd_status,
    should_block_for_dnd, should_route_to_agent,
};

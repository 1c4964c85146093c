// Penalty kind value object

use serde::{Deserialize, Serialize};

/// Flat modifier for pin and channel metadata changes.
pub const PIN_OR_CHANNEL_MODIFIER: u64 = 5;
pub const STAR_MODIFIER: u64 = 1;
pub const REACTION_MODIFIER: u64 = 2;
pub const DELETE_OR_EDIT_MODIFIER: u64 = 15;
pub const BYTES_PER_MEGABYTE: u64 = 1_048_576;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyKind {
    Message,
    #[serde(rename = "_thread")]
    Thread,
    #[serde(rename = "_message_from_thread")]
    MessageFromThread,
    FileShare,
    MessageDeleted,
    MessageChanged,
    ChannelPurpose,
    ChannelTopic,
    PinAdded,
    PinRemoved,
    StarAdded,
    StarRemoved,
    ReactionAdded,
    ReactionRemoved,
}

impl PenaltyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PenaltyKind::Message => "message",
            PenaltyKind::Thread => "_thread",
            PenaltyKind::MessageFromThread => "_message_from_thread",
            PenaltyKind::FileShare => "file_share",
            PenaltyKind::MessageDeleted => "message_deleted",
            PenaltyKind::MessageChanged => "message_changed",
            PenaltyKind::ChannelPurpose => "channel_purpose",
            PenaltyKind::ChannelTopic => "channel_topic",
            PenaltyKind::PinAdded => "pin_added",
            PenaltyKind::PinRemoved => "pin_removed",
            PenaltyKind::StarAdded => "star_added",
            PenaltyKind::StarRemoved => "star_removed",
            PenaltyKind::ReactionAdded => "reaction_added",
            PenaltyKind::ReactionRemoved => "reaction_removed",
        }
    }

    /// Subtypes of a `message` event that carry their own penalty.
    pub fn from_message_subtype(subtype: &str) -> Option<Self> {
        match subtype {
            "file_share" => Some(PenaltyKind::FileShare),
            "message_deleted" => Some(PenaltyKind::MessageDeleted),
            "message_changed" => Some(PenaltyKind::MessageChanged),
            "channel_purpose" => Some(PenaltyKind::ChannelPurpose),
            "channel_topic" => Some(PenaltyKind::ChannelTopic),
            _ => None,
        }
    }

    /// Top-level event types penalised when they happen in the game channel.
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "message" => Some(PenaltyKind::Message),
            "star_added" => Some(PenaltyKind::StarAdded),
            "star_removed" => Some(PenaltyKind::StarRemoved),
            "pin_added" => Some(PenaltyKind::PinAdded),
            "pin_removed" => Some(PenaltyKind::PinRemoved),
            "reaction_added" => Some(PenaltyKind::ReactionAdded),
            "reaction_removed" => Some(PenaltyKind::ReactionRemoved),
            _ => None,
        }
    }

    /// Phrase used in penalty announcements.
    pub fn describe(&self) -> &'static str {
        match self {
            PenaltyKind::Message => "sending a message",
            PenaltyKind::Thread => "replying in a thread",
            PenaltyKind::MessageFromThread => "sending a thread reply to the channel",
            PenaltyKind::FileShare => "sharing a file",
            PenaltyKind::MessageDeleted => "deleting a message",
            PenaltyKind::MessageChanged => "editing a message",
            PenaltyKind::ChannelPurpose => "changing the channel purpose",
            PenaltyKind::ChannelTopic => "changing the channel topic",
            PenaltyKind::PinAdded => "pinning a message",
            PenaltyKind::PinRemoved => "unpinning a message",
            PenaltyKind::StarAdded => "starring a message",
            PenaltyKind::StarRemoved => "unstarring a message",
            PenaltyKind::ReactionAdded => "adding a reaction",
            PenaltyKind::ReactionRemoved => "removing a reaction",
        }
    }
}

/// A classified chat event: what kind of penalty it incurs and the base
/// modifier before level scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Penalty {
    pub kind: PenaltyKind,
    pub modifier: u64,
}

impl Penalty {
    pub fn new(kind: PenaltyKind, modifier: u64) -> Self {
        Self { kind, modifier }
    }
}

// Chat event entities
// Inbound webhook payloads from the chat platform

use serde::{Deserialize, Deserializer, Serialize};

pub const URL_VERIFICATION: &str = "url_verification";

/// Outer webhook body. Either a URL verification handshake or a callback
/// wrapping one chat event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventEnvelope {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub challenge: Option<String>,
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub event_time: Option<i64>,
    #[serde(default)]
    pub event: Option<ChatEvent>,
}

impl EventEnvelope {
    pub fn is_url_verification(&self) -> bool {
        self.kind.as_deref() == Some(URL_VERIFICATION)
    }

    /// Team that owns the event, preferring the envelope over the event body.
    pub fn team(&self) -> Option<&str> {
        self.team_id
            .as_deref()
            .or_else(|| self.event.as_ref().and_then(|event| event.team.as_deref()))
            .filter(|team| !team.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatEvent {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub thread_ts: Option<String>,
    #[serde(default)]
    pub event_ts: Option<String>,
    #[serde(default)]
    pub message: Option<Box<NestedMessage>>,
    /// Set on `message_deleted`, which carries no top-level `user`.
    #[serde(default)]
    pub previous_message: Option<Box<NestedMessage>>,
    #[serde(default)]
    pub item: Option<EventItem>,
    #[serde(default)]
    pub file: Option<SharedFile>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub files: Vec<SharedFile>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The message carried inside edits, broadcasts and pins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NestedMessage {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub thread_ts: Option<String>,
}

/// Target of reactions, stars and pins. The channel lives here rather than
/// on the event itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventItem {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SharedFile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

fn is_reply(thread_ts: Option<&str>, ts: Option<&str>) -> bool {
    match (thread_ts, ts) {
        (Some(thread), Some(ts)) => thread != ts,
        (Some(_), None) => true,
        _ => false,
    }
}

impl ChatEvent {
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref().filter(|kind| !kind.is_empty())
    }

    /// A thread parent carries `thread_ts == ts`; only replies differ.
    pub fn is_thread_reply(&self) -> bool {
        is_reply(self.thread_ts.as_deref(), self.ts.as_deref())
    }

    pub fn is_bot(&self) -> bool {
        self.user.is_none()
            && (self.bot_id.is_some() || self.subtype.as_deref() == Some("bot_message"))
    }

    /// The user the event should be charged to. Edits and deletions name
    /// the author only on the nested message.
    pub fn acting_user(&self) -> Option<&str> {
        self.user
            .as_deref()
            .or_else(|| self.message.as_ref().and_then(|message| message.user.as_deref()))
            .or_else(|| {
                self.previous_message
                    .as_ref()
                    .and_then(|message| message.user.as_deref())
            })
            .filter(|user| !user.is_empty())
    }

    pub fn channel(&self) -> Option<&str> {
        self.channel
            .as_deref()
            .or(self.channel_id.as_deref())
            .or_else(|| self.item.as_ref().and_then(|item| item.channel.as_deref()))
            .filter(|channel| !channel.is_empty())
    }

    pub fn text_len(&self) -> u64 {
        self.text
            .as_deref()
            .map(|text| text.chars().count() as u64)
            .unwrap_or_default()
    }

    pub fn file_size(&self) -> u64 {
        if let Some(size) = self.file.as_ref().and_then(|file| file.size) {
            return size;
        }
        self.files.iter().filter_map(|file| file.size).sum()
    }
}

impl NestedMessage {
    pub fn is_thread_reply(&self) -> bool {
        is_reply(self.thread_ts.as_deref(), self.ts.as_deref())
    }

    pub fn text_len(&self) -> u64 {
        self.text
            .as_deref()
            .map(|text| text.chars().count() as u64)
            .unwrap_or_default()
    }
}

use crate::entities::ChatEvent;
use crate::value_objects::{
    Penalty, PenaltyKind, BYTES_PER_MEGABYTE, DELETE_OR_EDIT_MODIFIER, PIN_OR_CHANNEL_MODIFIER,
    REACTION_MODIFIER, STAR_MODIFIER,
};

/// Maps a chat event onto its penalty, or `None` when the event is not
/// penalizable. Rules are checked in order and the first match wins:
///
/// 1. a `message` with subtype `pin_added` (the dedicated `pin_added`
///    event is charged instead)
/// 2. a `message` that is itself a thread reply
/// 3. a `message` whose nested message is a thread reply
/// 4. a `message` with a recognised subtype
/// 5. any recognised top-level event type
pub fn classify(event: &ChatEvent) -> Option<Penalty> {
    let kind = event.kind()?;

    if kind == "message" {
        let subtype = event.subtype.as_deref();
        if subtype == Some("pin_added") {
            return None;
        }
        if event.is_thread_reply() {
            let half = event.text_len().div_ceil(2);
            return Some(Penalty::new(PenaltyKind::Thread, half));
        }
        if let Some(original) = event.message.as_deref() {
            if original.is_thread_reply() {
                return Some(Penalty::new(
                    PenaltyKind::MessageFromThread,
                    original.text_len(),
                ));
            }
        }
        if let Some(penalty_kind) = subtype.and_then(PenaltyKind::from_message_subtype) {
            return Some(Penalty::new(penalty_kind, base_modifier(penalty_kind, event)));
        }
    }

    PenaltyKind::from_event_type(kind)
        .map(|penalty_kind| Penalty::new(penalty_kind, base_modifier(penalty_kind, event)))
}

fn base_modifier(kind: PenaltyKind, event: &ChatEvent) -> u64 {
    match kind {
        PenaltyKind::Message => event.text_len(),
        PenaltyKind::Thread => event.text_len().div_ceil(2),
        PenaltyKind::MessageFromThread => event
            .message
            .as_deref()
            .map(|message| message.text_len())
            .unwrap_or_default(),
        PenaltyKind::FileShare => event.file_size().div_ceil(BYTES_PER_MEGABYTE),
        PenaltyKind::PinAdded
        | PenaltyKind::PinRemoved
        | PenaltyKind::ChannelPurpose
        | PenaltyKind::ChannelTopic => PIN_OR_CHANNEL_MODIFIER,
        PenaltyKind::StarAdded | PenaltyKind::StarRemoved => STAR_MODIFIER,
        PenaltyKind::ReactionAdded | PenaltyKind::ReactionRemoved => REACTION_MODIFIER,
        PenaltyKind::MessageDeleted | PenaltyKind::MessageChanged => DELETE_OR_EDIT_MODIFIER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{NestedMessage, SharedFile};

    fn message(text: &str) -> ChatEvent {
        ChatEvent {
            kind: Some("message".to_string()),
            user: Some("U1".to_string()),
            channel: Some("C1".to_string()),
            text: Some(text.to_string()),
            ts: Some("100.000".to_string()),
            ..ChatEvent::default()
        }
    }

    fn event(kind: &str) -> ChatEvent {
        ChatEvent {
            kind: Some(kind.to_string()),
            user: Some("U1".to_string()),
            ..ChatEvent::default()
        }
    }

    #[test]
    fn plain_message_costs_its_length() {
        assert_eq!(
            classify(&message("hello world")),
            Some(Penalty::new(PenaltyKind::Message, 11))
        );
    }

    #[test]
    fn pin_notification_message_is_not_penalized() {
        let mut pin_message = message("pinned a message");
        pin_message.subtype = Some("pin_added".to_string());
        assert_eq!(classify(&pin_message), None);
        assert_eq!(
            classify(&event("pin_added")),
            Some(Penalty::new(PenaltyKind::PinAdded, 5))
        );
    }

    #[test]
    fn thread_reply_costs_half_rounded_up() {
        let mut reply = message("hello");
        reply.thread_ts = Some("99.000".to_string());
        assert_eq!(
            classify(&reply),
            Some(Penalty::new(PenaltyKind::Thread, 3))
        );
    }

    #[test]
    fn thread_marker_wins_over_subtype() {
        let mut reply = message("abcd");
        reply.thread_ts = Some("99.000".to_string());
        reply.subtype = Some("file_share".to_string());
        assert_eq!(
            classify(&reply),
            Some(Penalty::new(PenaltyKind::Thread, 2))
        );
    }

    #[test]
    fn broadcast_from_thread_costs_original_length() {
        let mut broadcast = message("x");
        broadcast.subtype = Some("message_changed".to_string());
        broadcast.message = Some(Box::new(NestedMessage {
            text: Some("the original reply".to_string()),
            ts: Some("101.000".to_string()),
            thread_ts: Some("99.000".to_string()),
            ..NestedMessage::default()
        }));
        assert_eq!(
            classify(&broadcast),
            Some(Penalty::new(PenaltyKind::MessageFromThread, 18))
        );
    }

    #[test]
    fn recognised_subtypes_use_flat_modifiers() {
        for (subtype, kind, modifier) in [
            ("message_deleted", PenaltyKind::MessageDeleted, 15),
            ("message_changed", PenaltyKind::MessageChanged, 15),
            ("channel_purpose", PenaltyKind::ChannelPurpose, 5),
            ("channel_topic", PenaltyKind::ChannelTopic, 5),
        ] {
            let mut msg = message("ignored text");
            msg.subtype = Some(subtype.to_string());
            assert_eq!(classify(&msg), Some(Penalty::new(kind, modifier)), "{}", subtype);
        }
    }

    #[test]
    fn file_share_costs_megabytes_rounded_up() {
        let mut share = message("");
        share.subtype = Some("file_share".to_string());
        share.files = vec![SharedFile {
            id: Some("F1".to_string()),
            size: Some(BYTES_PER_MEGABYTE * 2 + 1),
        }];
        assert_eq!(
            classify(&share),
            Some(Penalty::new(PenaltyKind::FileShare, 3))
        );
    }

    #[test]
    fn reactions_and_stars() {
        assert_eq!(
            classify(&event("reaction_added")),
            Some(Penalty::new(PenaltyKind::ReactionAdded, 2))
        );
        assert_eq!(
            classify(&event("reaction_removed")),
            Some(Penalty::new(PenaltyKind::ReactionRemoved, 2))
        );
        assert_eq!(
            classify(&event("star_added")),
            Some(Penalty::new(PenaltyKind::StarAdded, 1))
        );
        assert_eq!(
            classify(&event("pin_removed")),
            Some(Penalty::new(PenaltyKind::PinRemoved, 5))
        );
    }

    #[test]
    fn unknown_events_are_not_penalized() {
        assert_eq!(classify(&event("team_join")), None);
        assert_eq!(classify(&ChatEvent::default()), None);
    }

    #[test]
    fn unknown_message_subtype_falls_back_to_message() {
        let mut joined = message("joined");
        joined.subtype = Some("channel_join".to_string());
        assert_eq!(
            classify(&joined),
            Some(Penalty::new(PenaltyKind::Message, 6))
        );
    }
}

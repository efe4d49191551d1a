//! Integration tests for weft-common crate.

use serde::{Deserialize, Serialize};
use weft_common::{format_hex_color, ApplicationId, ChannelId, MessageId, WeftError};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Envelope {
    channel_id: ChannelId,
    message_id: Option<MessageId>,
    application_id: ApplicationId,
}

#[test]
fn test_ids_round_trip_inside_payloads() {
    let raw = r#"{"channel_id":"10","message_id":11,"application_id":"12"}"#;
    let envelope: Envelope = serde_json::from_str(raw).unwrap();

    assert_eq!(envelope.channel_id, ChannelId(10));
    assert_eq!(envelope.message_id, Some(MessageId(11)));

    let encoded = serde_json::to_value(&envelope).unwrap();
    assert_eq!(encoded["message_id"], "11");
    assert_eq!(encoded["application_id"], "12");
}

#[test]
fn test_error_helpers_compose() {
    let err = WeftError::localization_with_locale("missing tree", "fr");
    match err {
        WeftError::Localization { locale, .. } => assert_eq!(locale.as_deref(), Some("fr")),
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[test]
fn test_accent_colour_formatting() {
    assert_eq!(format_hex_color(703_487), "#0abbff");
}

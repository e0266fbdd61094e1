//! JSON serialization for live-channel messages.

use super::types::{InboundMessage, OutboundEvent};

/// Serialize an outbound event to a JSON text frame.
pub fn serialize_outbound(event: &OutboundEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(event)
}

/// Deserialize an inbound JSON text frame.
pub fn deserialize_inbound(text: &str) -> Result<InboundMessage, serde_json::Error> {
    serde_json::from_str(text)
}

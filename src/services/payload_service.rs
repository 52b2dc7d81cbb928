use tracing::{debug, trace, warn};

use crate::models::Payload;
use crate::utils::Page;

/// Read the JSON payload held by the element `slot_id`.
///
/// A missing element is `Payload::Absent` and is not logged. Text that is not
/// a JSON object is `Payload::Malformed` and logs exactly one warning naming
/// the slot. Never fails.
pub fn extract_payload(page: &Page, slot_id: &str) -> Payload {
    let text = match page.text_of(slot_id) {
        Some(text) => text,
        None => {
            trace!(slot = slot_id, "Data slot not found");
            return Payload::Absent;
        }
    };

    let payload = Payload::parse(&text);
    match &payload {
        Payload::Malformed(reason) => {
            warn!(slot = slot_id, "Failed to parse JSON for {}: {}", slot_id, reason);
        }
        Payload::Present(entries) => {
            debug!(slot = slot_id, entries = entries.len(), "Data slot parsed");
        }
        Payload::Absent => {}
    }
    payload
}

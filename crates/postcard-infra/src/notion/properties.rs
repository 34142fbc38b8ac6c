//! Notion JSON encoding of page properties.

use serde_json::{Map, Value, json};

use postcard_core::domain::{PageProperties, PropertyValue};

/// Notion rejects a single rich text object longer than this (in chars).
pub const MAX_TEXT_CHUNK: usize = 2000;

fn text_objects(content: &str) -> Value {
    if content.is_empty() {
        return json!([{ "text": { "content": "" } }]);
    }

    let chars: Vec<char> = content.chars().collect();
    let objects: Vec<Value> = chars
        .chunks(MAX_TEXT_CHUNK)
        .map(|chunk| {
            let piece: String = chunk.iter().collect();
            json!({ "text": { "content": piece } })
        })
        .collect();
    Value::Array(objects)
}

fn encode_value(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::Title(text) => json!({ "title": text_objects(text) }),
        PropertyValue::RichText(text) => json!({ "rich_text": text_objects(text) }),
        PropertyValue::Date(at) => json!({
            "date": {
                "start": at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
            }
        }),
    }
}

/// Encode properties as the `properties` object of a create-page request.
pub fn encode_properties(properties: &PageProperties) -> Value {
    let map: Map<String, Value> = properties
        .iter()
        .map(|(name, value)| (name.to_string(), encode_value(value)))
        .collect();
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_encode_title_and_rich_text() {
        let props = PageProperties::new()
            .with("Recipient Full Name", PropertyValue::Title("Bob".into()))
            .with("Sender Name", PropertyValue::RichText("N/A".into()));

        assert_eq!(
            encode_properties(&props),
            json!({
                "Recipient Full Name": { "title": [{ "text": { "content": "Bob" } }] },
                "Sender Name": { "rich_text": [{ "text": { "content": "N/A" } }] },
            })
        );
    }

    #[test]
    fn test_encode_date() {
        let at = Utc.with_ymd_and_hms(2024, 12, 24, 18, 30, 0).unwrap();
        let props = PageProperties::new().with("Submission Date", PropertyValue::Date(at));

        assert_eq!(
            encode_properties(&props)["Submission Date"],
            json!({ "date": { "start": "2024-12-24T18:30:00.000Z" } })
        );
    }

    #[test]
    fn test_long_text_is_chunked() {
        let long = "ä".repeat(MAX_TEXT_CHUNK + 5);
        let props = PageProperties::new().with("Note", PropertyValue::RichText(long));

        let encoded = encode_properties(&props);
        let chunks = encoded["Note"]["rich_text"].as_array().unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(
            chunks[1]["text"]["content"].as_str().unwrap().chars().count(),
            5
        );
    }
}

//! # Canonical JSON
//!
//! Deterministic byte encoding of a message, the input to the HMAC.
//!
//! Rules:
//! - Object keys in ascending byte-wise order, at every nesting level
//! - Compact separators (`,` and `:`), no whitespace
//! - Strings and numbers use the standard `serde_json` encoding
//!
//! The ordering is produced here rather than relying on the map type, so the
//! output stays stable even if `serde_json/preserve_order` gets unified into
//! the build by another crate.

use serde_json::{Map, Value};

/// Serialize an object to canonical JSON bytes.
pub fn canonical_json(object: &Map<String, Value>) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::with_capacity(128);
    write_object(object, &mut out)?;
    Ok(out)
}

/// Serialize any JSON value to canonical bytes.
pub fn canonical_value(value: &Value) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::with_capacity(64);
    write_value(value, &mut out)?;
    Ok(out)
}

fn write_value(value: &Value, out: &mut Vec<u8>) -> Result<(), serde_json::Error> {
    match value {
        Value::Object(map) => write_object(map, out),
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(item, out)?;
            }
            out.push(b']');
            Ok(())
        }
        scalar => serde_json::to_writer(&mut *out, scalar),
    }
}

fn write_object(map: &Map<String, Value>, out: &mut Vec<u8>) -> Result<(), serde_json::Error> {
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    out.push(b'{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }
        serde_json::to_writer(&mut *out, key)?;
        out.push(b':');
        write_value(value, out)?;
    }
    out.push(b'}');
    Ok(())
}

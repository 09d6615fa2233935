// SPDX-License-Identifier: MIT
//
// Object ids for inserted documents: 12 random bytes taken from a v4
// UUID, rendered as 24 lowercase hex digits and stored as
// `{"$oid": "..."}`.

use serde_json::{json, Value};
use uuid::Uuid;

/// Bytes in an object id.
const OID_LEN: usize = 12;

/// A fresh id as 24 hex digits.
pub fn new_hex() -> String {
    let uuid = Uuid::new_v4();
    hex::encode(&uuid.as_bytes()[..OID_LEN])
}

/// A fresh id as an extended-JSON value.
pub fn new_id() -> Value {
    json!({ "$oid": new_hex() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_24_lowercase_hex_digits() {
        let id = new_hex();
        assert_eq!(id.len(), 2 * OID_LEN);
        assert!(id.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
        assert_eq!(hex::decode(&id).unwrap().len(), OID_LEN);
    }

    #[test]
    fn ids_do_not_repeat() {
        let ids: HashSet<String> = (0..1000).map(|_| new_hex()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn id_value_is_extended_json() {
        let id = new_id();
        let hex = id.get("$oid").and_then(Value::as_str).unwrap();
        assert_eq!(hex.len(), 24);
        assert_eq!(id.as_object().unwrap().len(), 1);
    }
}

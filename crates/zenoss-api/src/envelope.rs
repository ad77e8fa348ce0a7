// JSON-RPC envelope
//
// Every call is wrapped as `{tid, type, action, method, data}`. `data` is
// whatever the caller assembled: a single object for some methods, a
// one-element array for most.

use serde::Serialize;

use crate::error::Error;
use crate::router::Router;

/// Transaction id. Calls are never multiplexed, so it is always 1.
pub const TRANSACTION_ID: u32 = 1;

/// Value of the envelope's `type` field.
pub const RPC_TYPE: &str = "rpc";

/// A single JSON-RPC request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RpcEnvelope<'a, T: Serialize> {
    pub tid: u32,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub action: Router,
    pub method: &'a str,
    pub data: T,
}

impl<'a, T: Serialize> RpcEnvelope<'a, T> {
    pub fn new(action: Router, method: &'a str, data: T) -> Self {
        Self {
            tid: TRANSACTION_ID,
            kind: RPC_TYPE,
            action,
            method,
            data,
        }
    }

    /// Encode as the request body.
    pub fn to_body(&self) -> Result<Vec<u8>, Error> {
        Ok(serde_json::to_vec(self)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::ser::Error as _;
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn fixed_fields_are_injected() {
        let env = RpcEnvelope::new(Router::DeviceRouter, "getCollectors", json!({}));
        let value: Value = serde_json::from_slice(&env.to_body().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "tid": 1,
                "type": "rpc",
                "action": "DeviceRouter",
                "method": "getCollectors",
                "data": {},
            })
        );
    }

    #[test]
    fn envelope_has_exactly_five_keys() {
        for router in [Router::EventsRouter, Router::MibRouter, Router::ZenPackRouter] {
            let env = RpcEnvelope::new(router, "anything", [json!({"uid": "/x"})]);
            let value: Value = serde_json::from_slice(&env.to_body().unwrap()).unwrap();
            let obj = value.as_object().unwrap();
            let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
            keys.sort_unstable();
            assert_eq!(keys, ["action", "data", "method", "tid", "type"]);
            assert_eq!(obj["tid"], 1);
            assert_eq!(obj["type"], "rpc");
            assert_eq!(obj["action"], router.as_ref());
        }
    }

    #[test]
    fn field_order_on_the_wire() {
        let env = RpcEnvelope::new(Router::MibRouter, "getTree", [json!({"id": "/zport/dmd/Mibs"})]);
        let body = String::from_utf8(env.to_body().unwrap()).unwrap();
        assert_eq!(
            body,
            r#"{"tid":1,"type":"rpc","action":"MibRouter","method":"getTree","data":[{"id":"/zport/dmd/Mibs"}]}"#
        );
    }

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("not representable"))
        }
    }

    #[test]
    fn unserializable_data_is_rejected() {
        let env = RpcEnvelope::new(Router::DeviceRouter, "getInfo", Unencodable);
        assert!(matches!(env.to_body(), Err(Error::Serialization(_))));
    }
}

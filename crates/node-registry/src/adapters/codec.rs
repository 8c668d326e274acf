//! # JSON Node Codec
//!
//! Self-describing textual encoding of node records.
//!
//! ```text
//! {"id":"sat-1","nodeType":"satellite","publicKey":"pk1",
//!  "createdAt":"2024-03-01 08:00:00","updatedAt":"2024-03-01 08:00:00"}
//!
//! {"id":"u1","nodeType":"user","publicKey":{"mac-A":"pkA"},
//!  "accessRecords":{"mac-A":[{"accessType":"normal",...}]},
//!  "authStatus":"uncertified","createdAt":"...","updatedAt":"..."}
//! ```

use crate::domain::entities::Node;
use crate::domain::errors::CodecError;
use crate::ports::outbound::NodeCodec;

/// Default node codec using serde_json.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonNodeCodec;

impl NodeCodec for JsonNodeCodec {
    fn encode(&self, node: &Node) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(node).map_err(|e| CodecError::new(e.to_string()))
    }

    fn decode(&self, data: &[u8]) -> Result<Node, CodecError> {
        serde_json::from_slice(data).map_err(|e| CodecError::new(e.to_string()))
    }
}

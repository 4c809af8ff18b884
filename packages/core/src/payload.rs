//! Type-tagged byte buffers exchanged with the proxy.

use prost::{Message, Name};
use prost_types::Any;

/// Prefix used for every type URL produced by this crate.
pub const TYPE_URL_PREFIX: &str = "type.googleapis.com/";

/// Type URL for a protobuf message type.
pub fn type_url_of<M: Name>() -> String {
    format!("{}{}", TYPE_URL_PREFIX, M::full_name())
}

/// An opaque byte buffer tagged with the URL of its schema.
///
/// The engine never looks inside `bytes`. It forwards them or hands them to
/// the decoder a command was registered with. Equality is structural.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TypedPayload {
    type_url: String,
    bytes: Vec<u8>,
}

impl TypedPayload {
    /// Tag raw bytes with a type URL.
    pub fn pack(type_url: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            type_url: type_url.into(),
            bytes: bytes.into(),
        }
    }

    /// The payload carried by a `Noop` invocation.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Encode a protobuf message and tag it with its type URL.
    pub fn pack_message<M: Message + Name>(message: &M) -> Self {
        Self::pack(type_url_of::<M>(), message.encode_to_vec())
    }

    /// Return the raw bytes if the payload carries `expected_type_url`.
    pub fn unpack(&self, expected_type_url: &str) -> Result<&[u8], PayloadError> {
        if self.type_url != expected_type_url {
            return Err(PayloadError::TypeMismatch {
                expected: expected_type_url.to_string(),
                actual: self.type_url.clone(),
            });
        }
        Ok(&self.bytes)
    }

    /// Decode the payload as `M`, checking the type URL first.
    pub fn unpack_message<M: Message + Name + Default>(&self) -> Result<M, PayloadError> {
        let bytes = self.unpack(&type_url_of::<M>())?;
        Ok(M::decode(bytes)?)
    }

    pub fn type_url(&self) -> &str {
        &self.type_url
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// True for the payload of a `Noop` invocation.
    pub fn is_empty(&self) -> bool {
        self.type_url.is_empty() && self.bytes.is_empty()
    }

    /// Check whether this payload carries messages of type `M`.
    pub fn is<M: Name>(&self) -> bool {
        self.type_url == type_url_of::<M>()
    }
}

impl From<Any> for TypedPayload {
    fn from(any: Any) -> Self {
        Self {
            type_url: any.type_url,
            bytes: any.value,
        }
    }
}

impl From<TypedPayload> for Any {
    fn from(payload: TypedPayload) -> Self {
        Any {
            type_url: payload.type_url,
            value: payload.bytes,
        }
    }
}

/// Errors raised when interpreting a payload.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("type mismatch: expected {expected}, got {actual:?}")]
    TypeMismatch { expected: String, actual: String },

    #[error("payload decode error: {0}")]
    Decode(#[from] prost::DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Clone, PartialEq, prost::Message)]
    struct Counter {
        #[prost(int32, tag = "1")]
        value: i32,
    }

    impl Name for Counter {
        const NAME: &'static str = "Counter";
        const PACKAGE: &'static str = "bridge.test";
    }

    #[derive(Clone, PartialEq, prost::Message)]
    struct Label {
        #[prost(string, tag = "1")]
        text: String,
    }

    impl Name for Label {
        const NAME: &'static str = "Label";
        const PACKAGE: &'static str = "bridge.test";
    }

    proptest! {
        #[test]
        fn unpack_returns_packed_bytes(type_url in ".*", bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let payload = TypedPayload::pack(type_url.clone(), bytes.clone());
            prop_assert_eq!(payload.unpack(&type_url).unwrap(), bytes.as_slice());
        }
    }

    #[test]
    fn test_unpack_rejects_other_type_url() {
        let payload = TypedPayload::pack("type.googleapis.com/a.A", vec![1, 2, 3]);
        let err = payload.unpack("type.googleapis.com/a.B").unwrap_err();
        match err {
            PayloadError::TypeMismatch { expected, actual } => {
                assert_eq!(expected, "type.googleapis.com/a.B");
                assert_eq!(actual, "type.googleapis.com/a.A");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_message_helpers() {
        let payload = TypedPayload::pack_message(&Counter { value: 7 });
        assert_eq!(payload.type_url(), "type.googleapis.com/bridge.test.Counter");
        assert!(payload.is::<Counter>());
        assert_eq!(payload.unpack_message::<Counter>().unwrap(), Counter { value: 7 });

        // Same wire shape, different schema: must not decode.
        assert!(matches!(
            payload.unpack_message::<Label>(),
            Err(PayloadError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_structural_equality_and_any_conversion() {
        let a = TypedPayload::pack("t", vec![1]);
        assert_eq!(a, TypedPayload::pack("t", vec![1]));
        assert_ne!(a, TypedPayload::pack("t", vec![2]));
        assert_ne!(a, TypedPayload::pack("u", vec![1]));

        let any: Any = a.clone().into();
        assert_eq!(TypedPayload::from(any), a);
        assert!(TypedPayload::empty().is_empty());
    }
}

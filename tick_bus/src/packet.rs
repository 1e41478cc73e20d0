//! Packets - the unit of data carried by a channel.

use serde::Serialize;
use std::any::{Any, TypeId};
use std::hash::{Hash, Hasher};

use crate::error::{BusError, Result};

/// Anything that can travel over the bus.
///
/// Payloads must be `Debug` so erased packets and channels can be printed
/// in logs without knowing their concrete type.
pub trait Payload: Any + std::fmt::Debug {}

impl<T: Any + std::fmt::Debug> Payload for T {}

/// Runtime identifier of a payload type.
///
/// Equality and hashing use the [`TypeId`] only; the name is kept for
/// messages and logs.
#[derive(Debug, Clone, Copy)]
pub struct DataType {
    id: TypeId,
    name: &'static str,
}

impl DataType {
    /// The data type of `T`.
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for DataType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DataType {}

impl Hash for DataType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Reject empty and whitespace-only sender ids.
pub(crate) fn validate_sender_id(sender_id: &str) -> Result<()> {
    if sender_id.trim().is_empty() {
        return Err(BusError::InvalidArgument(
            "sender id must not be blank".into(),
        ));
    }
    Ok(())
}

/// An immutable envelope around one payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Packet<T> {
    sender_id: String,
    payload: T,
}

impl<T> Packet<T> {
    /// Wrap `payload` as sent by `sender_id`, which must not be blank.
    pub fn new(sender_id: impl Into<String>, payload: T) -> Result<Self> {
        let sender_id = sender_id.into();
        validate_sender_id(&sender_id)?;
        Ok(Self { sender_id, payload })
    }

    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn into_payload(self) -> T {
        self.payload
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Packet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Packet {{ sender_id = {}, payload = {} }}",
            self.sender_id, self.payload
        )
    }
}

/// A packet whose payload type is only known at runtime.
pub trait DataPacket: std::fmt::Debug {
    fn sender_id(&self) -> &str;

    fn payload_any(&self) -> &dyn Any;

    fn data_type(&self) -> DataType;
}

impl<T: Payload> DataPacket for Packet<T> {
    fn sender_id(&self) -> &str {
        &self.sender_id
    }

    fn payload_any(&self) -> &dyn Any {
        &self.payload
    }

    fn data_type(&self) -> DataType {
        DataType::of::<T>()
    }
}

impl dyn DataPacket + '_ {
    /// Downcast the payload, if it is a `T`.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload_any().downcast_ref::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_creation() {
        let packet = Packet::new("alice", 42).unwrap();
        assert_eq!(packet.sender_id(), "alice");
        assert_eq!(*packet.payload(), 42);
    }

    #[test]
    fn test_blank_sender_rejected() {
        assert!(matches!(Packet::new("", 1), Err(BusError::InvalidArgument(_))));
        assert!(matches!(Packet::new("  \t", 1), Err(BusError::InvalidArgument(_))));
    }

    #[test]
    fn test_packet_equality() {
        let a = Packet::new("alice", "hi".to_string()).unwrap();
        let b = Packet::new("alice", "hi".to_string()).unwrap();
        let c = Packet::new("bob", "hi".to_string()).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_packet_hash() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(Packet::new("alice", 7).unwrap());
        set.insert(Packet::new("alice", 7).unwrap()); // Duplicate

        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_packet_display() {
        let packet = Packet::new("alice", 3).unwrap();
        assert_eq!(packet.to_string(), "Packet { sender_id = alice, payload = 3 }");
    }

    #[test]
    fn test_erased_payload_downcast() {
        let packet = Packet::new("alice", 5u8).unwrap();
        let erased: &dyn DataPacket = &packet;

        assert_eq!(erased.sender_id(), "alice");
        assert_eq!(erased.payload::<u8>(), Some(&5));
        assert_eq!(erased.payload::<i32>(), None);
        assert_eq!(erased.data_type(), DataType::of::<u8>());
    }

    #[test]
    fn test_erased_packet_debug() {
        let packet = Packet::new("alice", vec![1, 2]).unwrap();
        let erased: &dyn DataPacket = &packet;

        let printed = format!("{:?}", erased);
        assert!(printed.contains("alice"));
        assert!(printed.contains("[1, 2]"));
    }

    #[test]
    fn test_data_type_identity() {
        assert_eq!(DataType::of::<String>(), DataType::of::<String>());
        assert_ne!(DataType::of::<String>(), DataType::of::<&str>());
        assert!(DataType::of::<i32>().name().contains("i32"));
    }

    #[test]
    fn test_serialized_shape() {
        let packet = Packet::new("alice", 42).unwrap();
        let json = serde_json::to_value(&packet).unwrap();
        assert_eq!(json, serde_json::json!({ "sender_id": "alice", "payload": 42 }));
    }
}

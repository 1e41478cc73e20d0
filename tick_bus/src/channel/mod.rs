//! Channels - ordered packet sequences of a single data type.
//!
//! A [`Channel`] is a plain append-only buffer. A [`DoubleBufferChannel`]
//! pairs two of them so that reads and writes within one tick never touch
//! the same buffer.

mod double_buffer;

pub use double_buffer::*;

use std::any::Any;

use crate::error::Result;
use crate::packet::{DataPacket, DataType, Packet};

/// An append-only, insertion-ordered sequence of packets.
///
/// Multiple packets from the same sender are kept in post order; nothing is
/// deduplicated.
#[derive(Debug, Clone)]
pub struct Channel<T> {
    packets: Vec<Packet<T>>,
}

impl<T> Channel<T> {
    /// Create an empty channel.
    pub fn new() -> Self {
        Self {
            packets: Vec::new(),
        }
    }

    /// Append a packet. Fails if `sender_id` is blank.
    pub fn post(&mut self, sender_id: &str, payload: T) -> Result<()> {
        let packet = Packet::new(sender_id, payload)?;
        self.packets.push(packet);
        Ok(())
    }

    /// Drop every packet.
    pub fn clear(&mut self) {
        self.packets.clear();
    }

    /// The packets in post order.
    ///
    /// This is a live borrow: the channel cannot be posted to or cleared
    /// while the slice is held.
    pub fn packets(&self) -> &[Packet<T>] {
        &self.packets
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }
}

impl<T> Default for Channel<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniform, non-generic access to a double-buffered channel.
///
/// This is what the channel batch stores; typed access goes through
/// [`ErasedChannel::as_any`] and a single downcast.
pub(crate) trait ErasedChannel: std::fmt::Debug {
    fn data_type(&self) -> DataType;

    /// Post to the back buffer. Fails with a type mismatch when `payload` is
    /// not of the channel's type.
    fn post_erased(&mut self, sender_id: &str, payload: Box<dyn Any>) -> Result<()>;

    /// Front buffer packets.
    fn erased_packets(&self) -> Vec<&dyn DataPacket>;

    fn front_len(&self) -> usize;

    fn pending_len(&self) -> usize;

    /// Clear the back buffer.
    fn clear(&mut self);

    fn swap(&mut self);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

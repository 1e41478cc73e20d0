//! Double-buffered channels.

use std::any::Any;
use tracing::trace;

use super::{Channel, ErasedChannel};
use crate::error::{BusError, Result};
use crate::packet::{DataPacket, DataType, Packet, Payload};

/// Two channels with swappable front/back roles.
///
/// Readers only ever see the front buffer and writers only ever touch the
/// back buffer. [`swap`](Self::swap) flips which is which without moving any
/// packets.
#[derive(Debug, Clone)]
pub struct DoubleBufferChannel<T> {
    buffers: [Channel<T>; 2],
    /// Index of the front buffer in `buffers`.
    front: usize,
}

impl<T> DoubleBufferChannel<T> {
    /// Create a channel with both buffers empty.
    pub fn new() -> Self {
        Self {
            buffers: [Channel::new(), Channel::new()],
            front: 0,
        }
    }

    /// Post to the back buffer. The packet becomes readable after the next
    /// swap.
    pub fn post(&mut self, sender_id: &str, payload: T) -> Result<()> {
        self.back_mut().post(sender_id, payload)
    }

    /// Packets in the front buffer, as of the last swap.
    pub fn packets(&self) -> &[Packet<T>] {
        self.buffers[self.front].packets()
    }

    /// Clear the back buffer. The front buffer is never cleared directly.
    pub fn clear(&mut self) {
        self.back_mut().clear();
    }

    /// Exchange the front and back roles.
    pub fn swap(&mut self) {
        self.front ^= 1;
    }

    /// Number of packets waiting in the back buffer.
    pub fn pending_len(&self) -> usize {
        self.buffers[self.front ^ 1].len()
    }

    fn back_mut(&mut self) -> &mut Channel<T> {
        &mut self.buffers[self.front ^ 1]
    }
}

impl<T> Default for DoubleBufferChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Payload> ErasedChannel for DoubleBufferChannel<T> {
    fn data_type(&self) -> DataType {
        DataType::of::<T>()
    }

    fn post_erased(&mut self, sender_id: &str, payload: Box<dyn Any>) -> Result<()> {
        let payload = payload.downcast::<T>().map_err(|_| BusError::TypeMismatch {
            expected: std::any::type_name::<T>(),
        })?;
        self.post(sender_id, *payload)
    }

    fn erased_packets(&self) -> Vec<&dyn DataPacket> {
        self.packets()
            .iter()
            .map(|packet| packet as &dyn DataPacket)
            .collect()
    }

    fn front_len(&self) -> usize {
        self.packets().len()
    }

    fn pending_len(&self) -> usize {
        DoubleBufferChannel::pending_len(self)
    }

    fn clear(&mut self) {
        DoubleBufferChannel::clear(self);
    }

    fn swap(&mut self) {
        trace!(
            data_type = std::any::type_name::<T>(),
            promoted = self.pending_len(),
            "swapping channel buffers"
        );
        DoubleBufferChannel::swap(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//! Channel batch - one double-buffered channel per supported data type.
//!
//! The set of supported types is fixed when the batch is built. Readers get a
//! [`BatchView`], which only exposes front buffers; posting, swapping and
//! clearing are reserved to the communication manager.

mod view;

pub use view::*;

use std::any::Any;
use std::collections::HashMap;

use crate::channel::{DoubleBufferChannel, ErasedChannel};
use crate::error::{BusError, Result};
use crate::packet::{DataPacket, DataType, Packet, Payload};

/// Collects the data types a [`ChannelBatch`] will carry.
///
/// `build` consumes the builder, so a finished builder cannot be reused.
#[derive(Debug, Default)]
pub struct ChannelBatchBuilder {
    channels: Vec<Box<dyn ErasedChannel>>,
    index: HashMap<DataType, usize>,
}

impl ChannelBatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Support payloads of type `T`. Declaring a type twice has no effect.
    pub fn with_channel<T: Payload>(mut self) -> Self {
        let data_type = DataType::of::<T>();
        if self.index.contains_key(&data_type) {
            return self;
        }
        self.index.insert(data_type, self.channels.len());
        self.channels.push(Box::new(DoubleBufferChannel::<T>::new()));
        self
    }

    pub fn build(self) -> ChannelBatch {
        ChannelBatch {
            channels: self.channels,
            index: self.index,
        }
    }
}

/// A registry mapping each supported data type to its channel.
#[derive(Debug)]
pub struct ChannelBatch {
    /// Channels in registration order.
    channels: Vec<Box<dyn ErasedChannel>>,
    index: HashMap<DataType, usize>,
}

impl ChannelBatch {
    pub fn builder() -> ChannelBatchBuilder {
        ChannelBatchBuilder::new()
    }

    /// Supported data types, in registration order.
    pub fn data_types(&self) -> Vec<DataType> {
        self.channels.iter().map(|c| c.data_type()).collect()
    }

    pub fn supports<T: Payload>(&self) -> bool {
        self.supports_type(DataType::of::<T>())
    }

    pub fn supports_type(&self, data_type: DataType) -> bool {
        self.index.contains_key(&data_type)
    }

    /// Front buffer packets of type `T`.
    pub fn get_packets<T: Payload>(&self) -> Result<&[Packet<T>]> {
        Ok(self.channel::<T>()?.packets())
    }

    /// Front buffer packets of a type only known at runtime.
    pub fn get_packets_of(&self, data_type: DataType) -> Result<Vec<&dyn DataPacket>> {
        Ok(self.erased(data_type)?.erased_packets())
    }

    /// Total number of packets readable this tick.
    pub fn visible_count(&self) -> usize {
        self.channels.iter().map(|c| c.front_len()).sum()
    }

    /// Total number of packets waiting for the next swap.
    pub fn pending_count(&self) -> usize {
        self.channels.iter().map(|c| c.pending_len()).sum()
    }

    pub(crate) fn post<T: Payload>(&mut self, sender_id: &str, payload: T) -> Result<()> {
        self.channel_mut::<T>()?.post(sender_id, payload)
    }

    pub(crate) fn post_erased(
        &mut self,
        data_type: DataType,
        sender_id: &str,
        payload: Box<dyn Any>,
    ) -> Result<()> {
        self.erased_mut(data_type)?.post_erased(sender_id, payload)
    }

    /// Swap every channel. Runs once per tick, before [`clear_all`](Self::clear_all).
    pub(crate) fn swap_all(&mut self) {
        for channel in &mut self.channels {
            channel.swap();
        }
    }

    /// Clear every back buffer. Runs once per tick, after [`swap_all`](Self::swap_all).
    pub(crate) fn clear_all(&mut self) {
        for channel in &mut self.channels {
            channel.clear();
        }
    }

    fn erased(&self, data_type: DataType) -> Result<&dyn ErasedChannel> {
        let index = self
            .index
            .get(&data_type)
            .ok_or(BusError::UnsupportedType(data_type.name()))?;
        Ok(self.channels[*index].as_ref())
    }

    fn erased_mut(&mut self, data_type: DataType) -> Result<&mut dyn ErasedChannel> {
        let index = self
            .index
            .get(&data_type)
            .ok_or(BusError::UnsupportedType(data_type.name()))?;
        Ok(self.channels[*index].as_mut())
    }

    fn channel<T: Payload>(&self) -> Result<&DoubleBufferChannel<T>> {
        self.erased(DataType::of::<T>())?
            .as_any()
            .downcast_ref::<DoubleBufferChannel<T>>()
            .ok_or(BusError::TypeMismatch {
                expected: std::any::type_name::<T>(),
            })
    }

    fn channel_mut<T: Payload>(&mut self) -> Result<&mut DoubleBufferChannel<T>> {
        self.erased_mut(DataType::of::<T>())?
            .as_any_mut()
            .downcast_mut::<DoubleBufferChannel<T>>()
            .ok_or(BusError::TypeMismatch {
                expected: std::any::type_name::<T>(),
            })
    }
}

impl std::fmt::Display for ChannelBatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let types: Vec<_> = self.channels.iter().map(|c| c.data_type().name()).collect();
        write!(f, "ChannelBatch {{ data_types = [{}] }}", types.join(", "))
    }
}

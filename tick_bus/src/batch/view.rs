//! Read-only access to a channel batch.

use super::ChannelBatch;
use crate::error::Result;
use crate::packet::{DataPacket, DataType, Packet, Payload};

/// What agents see while perceiving: front buffers, nothing writable.
#[derive(Debug, Clone, Copy)]
pub struct BatchView<'a> {
    batch: &'a ChannelBatch,
}

impl<'a> BatchView<'a> {
    pub fn new(batch: &'a ChannelBatch) -> Self {
        Self { batch }
    }

    pub fn data_types(&self) -> Vec<DataType> {
        self.batch.data_types()
    }

    pub fn supports<T: Payload>(&self) -> bool {
        self.batch.supports::<T>()
    }

    pub fn supports_type(&self, data_type: DataType) -> bool {
        self.batch.supports_type(data_type)
    }

    pub fn get_packets<T: Payload>(&self) -> Result<&'a [Packet<T>]> {
        self.batch.get_packets::<T>()
    }

    pub fn get_packets_of(&self, data_type: DataType) -> Result<Vec<&'a dyn DataPacket>> {
        self.batch.get_packets_of(data_type)
    }

    pub fn visible_count(&self) -> usize {
        self.batch.visible_count()
    }
}

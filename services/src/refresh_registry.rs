//! Refresh id assignment (§6): ids are small non-negative integers handed
//! out sequentially as descriptors are registered at startup.

use octant_refresh::{RefreshDescriptor, RefreshDescriptorBuilder};

use crate::error::{Error, Result};

#[derive(Debug, Default)]
pub struct RefreshDescriptorRegistry {
    descriptors: Vec<RefreshDescriptor>,
}

impl RefreshDescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the next sequential id to `builder` and registers the
    /// resulting descriptor.
    pub fn register(&mut self, builder: RefreshDescriptorBuilder) -> Result<u32> {
        let id = self.descriptors.len() as u32;
        let descriptor = builder.build(id).map_err(Error::Refresh)?;
        self.descriptors.push(descriptor);
        Ok(id)
    }

    pub fn get(&self, id: u32) -> Result<&RefreshDescriptor> {
        self.descriptors
            .get(id as usize)
            .ok_or_else(|| Error::UnknownRefreshId { id, registered: self.descriptors.len() as u32 })
    }

    pub fn len(&self) -> u32 {
        self.descriptors.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

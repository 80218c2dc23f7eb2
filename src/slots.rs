//! Device slot table.
//!
//! Maps small, stable integer indices to open device handles. Downstream
//! consumers address devices by index only, so the table is bounded and an
//! index is never handed out twice within one process. A disconnected device
//! keeps its slot, but the slot's handle is dropped.

use crate::error::SlotError;

/// Default number of device slots.
pub const MAX_DEVICES: usize = 2;

/// Upper bound on the number of slots a table can hold.
pub const MAX_DEVICES_LIMIT: usize = 256;

/// One registered device. `handle` is `None` once the device disconnected.
#[derive(Debug)]
pub struct Slot<H> {
    index: usize,
    handle: Option<H>,
}

impl<H> Slot<H> {
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<&H> {
        self.handle.as_ref()
    }

    pub fn handle_mut(&mut self) -> Option<&mut H> {
        self.handle.as_mut()
    }
}

/// Fixed-capacity registry of device handles.
#[derive(Debug)]
pub struct DeviceSlots<H> {
    capacity: usize,
    slots: Vec<Slot<H>>,
}

impl<H> DeviceSlots<H> {
    /// A table with [`MAX_DEVICES`] slots.
    pub fn new() -> Self {
        Self::with_capacity(MAX_DEVICES)
    }

    /// A table with `capacity` slots, clamped to [`MAX_DEVICES_LIMIT`].
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_DEVICES_LIMIT);
        Self {
            capacity,
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Register a handle in the next free slot.
    ///
    /// On [`SlotError::CapacityExceeded`] the handle is dropped and existing
    /// slots are untouched.
    pub fn register(&mut self, handle: H) -> Result<usize, SlotError> {
        if self.is_full() {
            return Err(SlotError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let index = self.slots.len();
        self.slots.push(Slot {
            index,
            handle: Some(handle),
        });
        Ok(index)
    }

    fn slot(&self, index: usize) -> Result<&Slot<H>, SlotError> {
        self.slots.get(index).ok_or(SlotError::NotFound(index))
    }

    pub fn get(&self, index: usize) -> Result<&H, SlotError> {
        self.slot(index)?.handle().ok_or(SlotError::Inactive(index))
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut H, SlotError> {
        self.slots
            .get_mut(index)
            .ok_or(SlotError::NotFound(index))?
            .handle_mut()
            .ok_or(SlotError::Inactive(index))
    }

    /// Drop the handle of a slot and mark it inactive. The index is not reused.
    ///
    /// Returns `true` if the slot was active before the call.
    pub fn deactivate(&mut self, index: usize) -> Result<bool, SlotError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(SlotError::NotFound(index))?;
        Ok(slot.handle.take().is_some())
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.slot(index).is_ok_and(Slot::is_active)
    }

    /// Number of registered slots (active or not).
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_active()).count()
    }

    /// All registered slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Slot<H>> {
        self.slots.iter()
    }

    /// Handles of active slots with their index, in index order.
    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (usize, &mut H)> {
        self.slots.iter_mut().filter_map(|s| {
            let index = s.index;
            s.handle.as_mut().map(|h| (index, h))
        })
    }
}

impl<H> Default for DeviceSlots<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_sequential() {
        let mut t = DeviceSlots::with_capacity(3);
        assert_eq!(t.register("a"), Ok(0));
        assert_eq!(t.register("b"), Ok(1));
        assert_eq!(t.get(1), Ok(&"b"));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn overflow_leaves_existing_slots_alone() {
        let mut t = DeviceSlots::new();
        t.register(10).unwrap();
        t.register(11).unwrap();
        assert_eq!(
            t.register(12),
            Err(SlotError::CapacityExceeded {
                capacity: MAX_DEVICES
            })
        );
        assert_eq!(t.get(0), Ok(&10));
        assert_eq!(t.get(1), Ok(&11));
        assert!(t.is_active(0) && t.is_active(1));
        assert_eq!(t.len(), MAX_DEVICES);
    }

    #[test]
    fn deactivate_keeps_index() {
        let mut t = DeviceSlots::with_capacity(2);
        t.register('x').unwrap();
        assert_eq!(t.deactivate(0), Ok(true));
        assert_eq!(t.deactivate(0), Ok(false));
        assert!(!t.is_active(0));
        assert_eq!(t.get(0), Err(SlotError::Inactive(0)));
        assert_eq!(t.get_mut(0), Err(SlotError::Inactive(0)));
        assert_eq!(t.iter_active_mut().count(), 0);
        assert_eq!(t.register('y'), Ok(1));
        assert_eq!(t.active_count(), 1);
    }

    #[test]
    fn unknown_index_is_not_found() {
        let mut t: DeviceSlots<u8> = DeviceSlots::new();
        assert_eq!(t.get(0), Err(SlotError::NotFound(0)));
        assert_eq!(t.deactivate(5), Err(SlotError::NotFound(5)));
        assert!(!t.is_active(0));
    }

    #[test]
    fn zero_capacity_rejects_everything() {
        let mut t = DeviceSlots::with_capacity(0);
        assert!(matches!(
            t.register(()),
            Err(SlotError::CapacityExceeded { capacity: 0 })
        ));
    }

    #[test]
    fn deactivate_drops_the_handle() {
        use std::rc::Rc;

        let handle = Rc::new(());
        let mut t = DeviceSlots::with_capacity(1);
        t.register(Rc::clone(&handle)).unwrap();
        assert_eq!(Rc::strong_count(&handle), 2);
        t.deactivate(0).unwrap();
        assert_eq!(Rc::strong_count(&handle), 1);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn capacity_is_clamped() {
        let t: DeviceSlots<()> = DeviceSlots::with_capacity(usize::MAX);
        assert_eq!(t.capacity(), MAX_DEVICES_LIMIT);
    }
}

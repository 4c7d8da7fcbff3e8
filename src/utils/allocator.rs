use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Slot index plus generation; the generation changes every time a slot is freed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct GenerationalId {
    pub index: usize,
    pub generation: u32,
}

impl GenerationalId {
    pub fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// Stable handle to a shape stored in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ShapeHandle(pub GenerationalId);

impl ShapeHandle {
    pub fn new(index: usize, generation: u32) -> Self {
        Self(GenerationalId::new(index, generation))
    }

    pub fn index(&self) -> usize {
        self.0.index
    }

    pub fn generation(&self) -> u32 {
        self.0.generation
    }
}

impl Default for ShapeHandle {
    fn default() -> Self {
        Self(GenerationalId::new(usize::MAX, 0))
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    generation: u32,
    dense: Option<usize>,
}

/// Generational arena with dense storage.
///
/// Items live contiguously so the pairwise sweep can walk them as a slice.
/// Removal is a swap-remove: only the last item moves, and handles stay valid
/// because they resolve through the slot table rather than the dense index.
pub struct Arena<T> {
    items: Vec<T>,
    owners: Vec<ShapeHandle>,
    slots: Vec<Slot>,
    free_list: VecDeque<usize>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            owners: Vec::new(),
            slots: Vec::new(),
            free_list: VecDeque::new(),
        }
    }

    pub fn insert(&mut self, item: T) -> ShapeHandle {
        let dense = self.items.len();
        let handle = if let Some(index) = self.free_list.pop_front() {
            let slot = &mut self.slots[index];
            slot.dense = Some(dense);
            ShapeHandle::new(index, slot.generation)
        } else {
            let index = self.slots.len();
            self.slots.push(Slot {
                generation: 0,
                dense: Some(dense),
            });
            ShapeHandle::new(index, 0)
        };

        self.items.push(item);
        self.owners.push(handle);
        handle
    }

    pub fn get(&self, handle: ShapeHandle) -> Option<&T> {
        self.dense_index(handle).map(|dense| &self.items[dense])
    }

    pub fn get_mut(&mut self, handle: ShapeHandle) -> Option<&mut T> {
        self.dense_index(handle).map(move |dense| &mut self.items[dense])
    }

    pub fn contains(&self, handle: ShapeHandle) -> bool {
        self.dense_index(handle).is_some()
    }

    pub fn remove(&mut self, handle: ShapeHandle) -> Option<T> {
        let dense = self.dense_index(handle)?;

        let slot = &mut self.slots[handle.index()];
        slot.generation = slot.generation.wrapping_add(1);
        slot.dense = None;
        self.free_list.push_back(handle.index());

        let item = self.items.swap_remove(dense);
        self.owners.swap_remove(dense);
        if let Some(moved) = self.owners.get(dense) {
            self.slots[moved.index()].dense = Some(dense);
        }
        Some(item)
    }

    /// Dense view in sweep order.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Handles in the same order as [`Arena::as_slice`].
    pub fn handles(&self) -> &[ShapeHandle] {
        &self.owners
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn dense_index(&self, handle: ShapeHandle) -> Option<usize> {
        self.slots
            .get(handle.index())
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.dense)
    }
}

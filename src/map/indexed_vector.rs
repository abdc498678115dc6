/// A thin 1-indexed sparse vector: index 0 is unused, matching VGAP's
/// 1..N ship/planet numbering. Slots without an entity are `None`.
#[derive(Debug, Clone)]
pub struct IndexedVector<T> {
    slots: Vec<Option<T>>,
}

impl<T> Default for IndexedVector<T> {
    fn default() -> Self {
        Self { slots: vec![None] }
    }
}

impl<T> IndexedVector<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure(&mut self, id: usize) {
        if id >= self.slots.len() {
            self.slots.resize_with(id + 1, || None);
        }
    }

    pub fn set(&mut self, id: usize, value: T) {
        assert!(id >= 1, "entity ids are 1-based");
        self.ensure(id);
        self.slots[id] = Some(value);
    }

    pub fn remove(&mut self, id: usize) -> Option<T> {
        self.slots.get_mut(id).and_then(|slot| slot.take())
    }

    pub fn get(&self, id: usize) -> Option<&T> {
        self.slots.get(id).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, id: usize) -> Option<&mut T> {
        self.slots.get_mut(id).and_then(|slot| slot.as_mut())
    }

    pub fn iter_present(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (i, v)))
    }

    pub fn iter_present_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .skip(1)
            .filter_map(|(i, slot)| slot.as_mut().map(|v| (i, v)))
    }

    /// Smallest present index strictly greater than `after` (0 to start
    /// from the beginning), or `None` when exhausted.
    pub fn find_next_index(&self, after: usize) -> Option<usize> {
        ((after + 1)..self.slots.len()).find(|&i| self.slots[i].is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_set_and_get() {
        let mut v: IndexedVector<i32> = IndexedVector::new();
        v.set(5, 50);
        v.set(2, 20);
        assert_eq!(v.get(5), Some(&50));
        assert_eq!(v.get(3), None);
        assert_eq!(v.len(), 5);
    }

    #[test]
    fn find_next_index_skips_holes() {
        let mut v: IndexedVector<i32> = IndexedVector::new();
        v.set(3, 30);
        v.set(7, 70);
        assert_eq!(v.find_next_index(0), Some(3));
        assert_eq!(v.find_next_index(3), Some(7));
        assert_eq!(v.find_next_index(7), None);
    }

    #[test]
    fn remove_clears_slot() {
        let mut v: IndexedVector<i32> = IndexedVector::new();
        v.set(1, 10);
        assert_eq!(v.remove(1), Some(10));
        assert_eq!(v.get(1), None);
    }
}

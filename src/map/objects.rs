//! Replaces the source's `ObjectType<T>` virtual hierarchy (spec §9
//! "Inheritance over object types") with a single generic iterator over an
//! `IndexedVector<T>` plus a predicate closure. `AnyPlanetType`,
//! `PlayedShipType`, etc. are constructor functions below returning a
//! `FilteredObjects` configured with the right predicate; the container is
//! always the same entity vector.

use crate::map::indexed_vector::IndexedVector;
use crate::map::planet::Planet;
use crate::map::ship::{Playability, PlayerId, Ship};
use crate::map::universe::Universe;
use geo::Point;

/// A predicate-filtered view over an `IndexedVector<T>`. The only
/// operations the renderer (or anything else) needs are `find_next_index`
/// and `get_object_by_index`, so those are the only inherent methods.
pub struct FilteredObjects<'a, T> {
    vector: &'a IndexedVector<T>,
    predicate: Box<dyn Fn(&T) -> bool + 'a>,
}

impl<'a, T> FilteredObjects<'a, T> {
    pub fn new(vector: &'a IndexedVector<T>, predicate: impl Fn(&T) -> bool + 'a) -> Self {
        Self { vector, predicate: Box::new(predicate) }
    }

    pub fn find_next_index(&self, after: usize) -> Option<usize> {
        let mut i = after;
        while let Some(next) = self.vector.find_next_index(i) {
            if (self.predicate)(self.vector.get(next).expect("find_next_index returns a present index")) {
                return Some(next);
            }
            i = next;
        }
        None
    }

    /// Like `find_next_index`, but never wraps past the end of the
    /// underlying vector (the source's `findNextIndexNoWrap`); `marked`
    /// additionally restricts to indices flagged by the caller.
    pub fn find_next_index_no_wrap(&self, after: usize, marked: &dyn Fn(usize) -> bool) -> Option<usize> {
        let mut i = after;
        while let Some(next) = self.vector.find_next_index(i) {
            let obj = self.vector.get(next).expect("present index");
            if (self.predicate)(obj) && marked(next) {
                return Some(next);
            }
            i = next;
        }
        None
    }

    pub fn get_object_by_index(&self, index: usize) -> Option<&'a T> {
        self.vector.get(index).filter(|obj| (self.predicate)(obj))
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a T)> + '_ {
        self.vector.iter_present().filter(|(_, obj)| (self.predicate)(obj))
    }
}

impl<'a> FilteredObjects<'a, Ship> {
    pub fn find_first_object_at(&self, pt: Point) -> Option<usize> {
        self.iter().find(|(_, s)| s.position == Some(pt)).map(|(i, _)| i)
    }

    pub fn find_next_object_at(&self, pt: Point, after: usize, marked: &dyn Fn(usize) -> bool) -> Option<usize> {
        self.find_next_index_no_wrap(after, marked)
            .filter(|&i| self.vector.get(i).is_some_and(|s| s.position == Some(pt)))
    }
}

impl<'a> FilteredObjects<'a, Planet> {
    pub fn find_first_object_at(&self, pt: Point) -> Option<usize> {
        self.iter().find(|(_, p)| p.position == Some(pt)).map(|(i, _)| i)
    }
}

pub fn any_planet_type(univ: &Universe) -> FilteredObjects<'_, Planet> {
    FilteredObjects::new(&univ.planets, |p| p.is_visible)
}

pub fn any_ship_type(univ: &Universe) -> FilteredObjects<'_, Ship> {
    FilteredObjects::new(&univ.ships, |s| s.is_visible)
}

pub fn played_planet_type(univ: &Universe) -> FilteredObjects<'_, Planet> {
    FilteredObjects::new(&univ.planets, |p| p.playability == Playability::Playable)
}

pub fn played_ship_type(univ: &Universe) -> FilteredObjects<'_, Ship> {
    FilteredObjects::new(&univ.ships, |s| s.playability == Playability::Playable)
}

pub fn played_base_type(univ: &Universe) -> FilteredObjects<'_, Planet> {
    FilteredObjects::new(&univ.planets, |p| p.playability == Playability::Playable && p.has_base())
}

pub fn history_ship_type(univ: &Universe) -> FilteredObjects<'_, Ship> {
    FilteredObjects::new(&univ.ships, |s| s.is_visible && s.playability != Playability::Playable)
}

pub fn fleet_type(univ: &Universe) -> FilteredObjects<'_, Ship> {
    FilteredObjects::new(&univ.ships, |s| s.is_visible && s.is_fleet_leader)
}

pub fn ships_owned_by(univ: &Universe, owner: PlayerId) -> FilteredObjects<'_, Ship> {
    FilteredObjects::new(&univ.ships, move |s| s.is_visible && s.owner == Some(owner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::ship::Ship;

    #[test]
    fn find_next_index_skips_non_matching() {
        let mut v: IndexedVector<Ship> = IndexedVector::new();
        let mut a = Ship::new(1);
        a.is_visible = true;
        let mut b = Ship::new(2);
        b.is_visible = false;
        let mut c = Ship::new(3);
        c.is_visible = true;
        v.set(1, a);
        v.set(2, b);
        v.set(3, c);
        let filtered = FilteredObjects::new(&v, |s| s.is_visible);
        assert_eq!(filtered.find_next_index(0), Some(1));
        assert_eq!(filtered.find_next_index(1), Some(3));
        assert_eq!(filtered.find_next_index(3), None);
    }
}

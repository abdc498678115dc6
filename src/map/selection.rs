use crate::SELECTION_LAYERS;
use crate::map::universe::Universe;

/// A parallel bitset over a single object collection (invariant 5: position
/// `i` corresponds to the object at index `i` of the matching type).
#[derive(Debug, Clone, Default)]
pub struct SelectionVector {
    marks: Vec<bool>,
}

impl SelectionVector {
    pub fn resized(&mut self, len: usize) {
        self.marks.resize(len, false);
    }

    pub fn get(&self, index: usize) -> bool {
        self.marks.get(index).copied().unwrap_or(false)
    }

    pub fn set(&mut self, index: usize, value: bool) {
        if index >= self.marks.len() {
            self.marks.resize(index + 1, false);
        }
        self.marks[index] = value;
    }

    pub fn clear(&mut self) {
        self.marks.iter_mut().for_each(|m| *m = false);
    }

    pub fn count(&self) -> usize {
        self.marks.iter().filter(|m| **m).count()
    }

    fn combine(a: &SelectionVector, b: &SelectionVector, f: impl Fn(bool, bool) -> bool) -> SelectionVector {
        let len = a.marks.len().max(b.marks.len());
        let marks = (0..len).map(|i| f(a.get(i), b.get(i))).collect();
        SelectionVector { marks }
    }

    fn negate(a: &SelectionVector) -> SelectionVector {
        SelectionVector { marks: a.marks.iter().map(|m| !m).collect() }
    }
}

/// A compiled boolean expression over selection layers (spec §4.3.6).
/// Parsing the scripting grammar that produces this tree is out of scope
/// (spec §1); only the tree and its evaluator are specified.
#[derive(Debug, Clone)]
pub enum SelExpr {
    Layer(u8),
    And(Box<SelExpr>, Box<SelExpr>),
    Or(Box<SelExpr>, Box<SelExpr>),
    Not(Box<SelExpr>),
}

impl SelExpr {
    fn eval<'a>(&'a self, vectors: &'a [SelectionVector]) -> SelectionVector {
        match self {
            SelExpr::Layer(l) => vectors[*l as usize].clone(),
            SelExpr::And(a, b) => SelectionVector::combine(&a.eval(vectors), &b.eval(vectors), |x, y| x && y),
            SelExpr::Or(a, b) => SelectionVector::combine(&a.eval(vectors), &b.eval(vectors), |x, y| x || y),
            SelExpr::Not(a) => SelectionVector::negate(&a.eval(vectors)),
        }
    }
}

/// `SELECTION_LAYERS` layers, each holding one `SelectionVector` pair
/// (ships, planets).
#[derive(Debug, Clone)]
pub struct Selections {
    ship_layers: Vec<SelectionVector>,
    planet_layers: Vec<SelectionVector>,
    current_layer: u8,
}

impl Default for Selections {
    fn default() -> Self {
        Self {
            ship_layers: vec![SelectionVector::default(); SELECTION_LAYERS],
            planet_layers: vec![SelectionVector::default(); SELECTION_LAYERS],
            current_layer: 0,
        }
    }
}

impl Selections {
    pub fn current_layer(&self) -> u8 {
        self.current_layer
    }

    /// Pulls the universe's current marked-state into layer `layer`.
    pub fn copy_from(&mut self, univ: &Universe, layer: u8) {
        let l = layer as usize;
        self.ship_layers[l].resized(univ.ships.len() + 1);
        self.planet_layers[l].resized(univ.planets.len() + 1);
        for (id, ship) in univ.ships.iter_present() {
            self.ship_layers[l].set(id, ship.is_marked);
        }
        for (id, planet) in univ.planets.iter_present() {
            self.planet_layers[l].set(id, planet.is_marked);
        }
    }

    /// Pushes layer `layer` back onto the universe.
    pub fn copy_to(&self, univ: &mut Universe, layer: u8) {
        let l = layer as usize;
        for (id, ship) in univ.ships.iter_present_mut() {
            ship.is_marked = self.ship_layers[l].get(id);
        }
        for (id, planet) in univ.planets.iter_present_mut() {
            planet.is_marked = self.planet_layers[l].get(id);
        }
    }

    /// Persists the current layer's state, then switches to `new_layer`
    /// and loads its stored state back onto the universe.
    pub fn set_current_layer(&mut self, univ: &mut Universe, new_layer: u8) {
        self.copy_from(univ, self.current_layer);
        self.current_layer = new_layer;
        self.copy_to(univ, new_layer);
    }

    /// Evaluates `expr` over all layers and writes the result into
    /// `target_layer`, then limits to existing objects.
    pub fn execute_compiled_expression(&mut self, expr: &SelExpr, target_layer: u8, univ: &Universe) {
        let ships = expr.eval(&self.ship_layers);
        let planets = expr.eval(&self.planet_layers);
        self.ship_layers[target_layer as usize] = ships;
        self.planet_layers[target_layer as usize] = planets;
        self.limit_to_existing_objects(target_layer, univ);
    }

    /// Clears bits for indices the universe has no backing entity for.
    pub fn limit_to_existing_objects(&mut self, layer: u8, univ: &Universe) {
        let l = layer as usize;
        for i in 0..self.ship_layers[l].marks.len() {
            if univ.ships.get(i).is_none() {
                self.ship_layers[l].set(i, false);
            }
        }
        for i in 0..self.planet_layers[l].marks.len() {
            if univ.planets.get(i).is_none() {
                self.planet_layers[l].set(i, false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::universe::Universe;
    use geo::{MapConfiguration, MapMode, Point};

    fn empty_universe() -> Universe {
        Universe::new(MapConfiguration::new(MapMode::Flat, Point::new(0, 0), (2000, 2000)))
    }

    #[test]
    fn copy_round_trip_is_idempotent() {
        let mut univ = empty_universe();
        univ.ships.set(1, crate::map::ship::Ship::new(1));
        univ.ships.get_mut(1).unwrap().is_marked = true;

        let mut sel = Selections::default();
        sel.copy_from(&univ, 0);
        sel.copy_to(&mut univ, 0);
        assert!(univ.ships.get(1).unwrap().is_marked);

        sel.copy_from(&univ, 0);
        sel.copy_to(&mut univ, 0);
        assert!(univ.ships.get(1).unwrap().is_marked);
    }
}

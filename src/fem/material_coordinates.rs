use crate::StrError;
use gemlab::shapes::Scratchpad;
use russell_lab::Vector;

/// Holds the reference (initial) and the current nodal coordinates
pub struct MaterialCoordinates {
    /// Holds the coordinates of the reference configuration
    initial: Vec<[f64; 3]>,

    /// Holds the coordinates of the current configuration
    current: Vec<[f64; 3]>,
}

impl MaterialCoordinates {
    /// Allocates a new instance with the current configuration equal to the reference one
    pub fn new(coordinates: &[[f64; 3]]) -> Self {
        MaterialCoordinates {
            initial: coordinates.to_vec(),
            current: coordinates.to_vec(),
        }
    }

    /// Returns the number of nodes
    pub fn n_node(&self) -> usize {
        self.initial.len()
    }

    /// Returns the coordinates of the reference configuration
    pub fn initial(&self) -> &[[f64; 3]] {
        &self.initial
    }

    /// Returns the coordinates of the current configuration
    pub fn current(&self) -> &[[f64; 3]] {
        &self.current
    }

    /// Sets the nodal coordinates of an element's scratchpad
    ///
    /// Uses the current configuration if `current` is true; otherwise, the reference one.
    pub fn set_pad(&self, pad: &mut Scratchpad, nodes: &[usize], current: bool) {
        let xx = if current { &self.current } else { &self.initial };
        for (m, node) in nodes.iter().enumerate() {
            for j in 0..3 {
                pad.set_xx(m, j, xx[*node][j]);
            }
        }
    }

    /// Returns the displacement of a node
    pub fn displacement(&self, node: usize) -> [f64; 3] {
        let (x, xx) = (&self.current[node], &self.initial[node]);
        [x[0] - xx[0], x[1] - xx[1], x[2] - xx[2]]
    }

    /// Updates the current configuration given the global displacement vector
    ///
    /// The displacement vector is ordered as `(ux₀, uy₀, uz₀, ux₁, …)`.
    pub fn update(&mut self, displacement: &Vector) -> Result<(), StrError> {
        if displacement.dim() != 3 * self.initial.len() {
            return Err("displacement vector has an incorrect dimension");
        }
        for (node, x) in self.current.iter_mut().enumerate() {
            for i in 0..3 {
                x[i] = self.initial[node][i] + displacement[3 * node + i];
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::MaterialCoordinates;
    use gemlab::shapes::{GeoKind, Scratchpad};
    use russell_lab::Vector;

    #[test]
    fn update_works() {
        let mut coords = MaterialCoordinates::new(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        assert_eq!(coords.n_node(), 2);
        let d = Vector::from(&[0.1, 0.0, 0.0, 0.2, 0.3, -0.1]);
        coords.update(&d).unwrap();
        assert_eq!(coords.initial()[1], [1.0, 0.0, 0.0]);
        assert_eq!(coords.current()[1], [1.2, 0.3, -0.1]);
        assert_eq!(coords.displacement(0), [0.1, 0.0, 0.0]);
        assert_eq!(
            coords.update(&Vector::new(5)).err(),
            Some("displacement vector has an incorrect dimension")
        );
    }

    #[test]
    fn set_pad_works() {
        let mut coords = MaterialCoordinates::new(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]);
        coords
            .update(&Vector::from(&[0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0]))
            .unwrap();
        let mut pad = Scratchpad::new(3, GeoKind::Qua4).unwrap();
        coords.set_pad(&mut pad, &[0, 1, 2, 3], false);
        assert_eq!(pad.xxt.get(0, 1), 1.0);
        assert_eq!(pad.xxt.get(1, 2), 1.0);
        coords.set_pad(&mut pad, &[0, 1, 2, 3], true);
        assert_eq!(pad.xxt.get(0, 1), 1.5);
        assert_eq!(pad.xxt.get(0, 2), 1.5);
        assert_eq!(pad.xxt.get(2, 3), 0.0);
    }
}

/// Holds the integration directions and weights over the unit sphere
///
/// Only one direction of each antipodal pair is stored; the weights are doubled
/// accordingly, so that they add up to one.
pub struct UnitSphere {
    /// Holds the unit directions
    pub directions: Vec<[f64; 3]>,

    /// Holds the weights
    pub weights: Vec<f64>,
}

impl UnitSphere {
    /// Returns the 21-direction rule of Bažant and Oh (1986)
    ///
    /// The rule integrates exactly the polynomials up to the 9th degree over the sphere.
    pub fn new_bazant_oh_21() -> Self {
        let c = f64::sqrt(0.5);
        let a = 0.387907304067;
        let b = 0.836095596749;
        let w1 = 2.0 * 0.0265214244093;
        let w2 = 2.0 * 0.0199301476369;
        let w3 = 2.0 * 0.0250712367487;
        let mut directions = vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let mut weights = vec![w1; 3];
        directions.extend_from_slice(&[
            [c, c, 0.0],
            [c, -c, 0.0],
            [c, 0.0, c],
            [c, 0.0, -c],
            [0.0, c, c],
            [0.0, c, -c],
        ]);
        weights.extend_from_slice(&[w2; 6]);
        for (s1, s2) in [(1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, -1.0)] {
            directions.push([s1 * a, s2 * a, b]);
            directions.push([s1 * a, b, s2 * a]);
            directions.push([b, s1 * a, s2 * a]);
        }
        weights.extend_from_slice(&[w3; 12]);
        UnitSphere { directions, weights }
    }

    /// Returns the number of directions
    pub fn len(&self) -> usize {
        self.directions.len()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

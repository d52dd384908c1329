use super::FemMesh;

/// Holds the sparsity pattern of the global stiffness matrix
///
/// The pattern is computed once from the element DOF lists and holds all diagonal
/// entries. Each element stores the position (slot) of each of its local entries in
/// the sorted list of nonzero entries; thus, the assembly reduces to adding the local
/// values at the corresponding slots.
pub struct SparsityPattern {
    /// Holds the number of equations
    n_equation: usize,

    /// Holds the sorted (row, column) pairs of the nonzero entries
    entries: Vec<(usize, usize)>,

    /// Holds the slots of the local entries of each element of each submesh (row-major)
    slots: Vec<Vec<Vec<usize>>>,
}

impl SparsityPattern {
    /// Allocates a new instance
    pub fn new(fem: &FemMesh) -> Self {
        let n_equation = fem.n_dof();
        let mut entries: Vec<(usize, usize)> = (0..n_equation).map(|i| (i, i)).collect();
        for submesh in &fem.submeshes {
            for e in 0..submesh.n_element() {
                let dofs = submesh.dof_indices(e);
                for i in &dofs {
                    for j in &dofs {
                        entries.push((*i, *j));
                    }
                }
            }
        }
        entries.sort();
        entries.dedup();
        let slots = fem
            .submeshes
            .iter()
            .map(|submesh| {
                (0..submesh.n_element())
                    .map(|e| {
                        let dofs = submesh.dof_indices(e);
                        let mut local = Vec::with_capacity(dofs.len() * dofs.len());
                        for i in &dofs {
                            for j in &dofs {
                                // all pairs were inserted above
                                local.push(entries.binary_search(&(*i, *j)).unwrap_or_default());
                            }
                        }
                        local
                    })
                    .collect()
            })
            .collect();
        SparsityPattern {
            n_equation,
            entries,
            slots,
        }
    }

    /// Returns the number of equations
    pub fn n_equation(&self) -> usize {
        self.n_equation
    }

    /// Returns the number of nonzero entries
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Returns the sorted (row, column) pairs of the nonzero entries
    pub fn entries(&self) -> &[(usize, usize)] {
        &self.entries
    }

    /// Returns the slots of the local entries of an element (row-major)
    pub fn element_slots(&self, submesh: usize, element: usize) -> &[usize] {
        &self.slots[submesh][element]
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::SparsityPattern;
    use crate::base::{ParamPart, ParamSolid, SampleMeshes};
    use crate::fem::FemMesh;

    #[test]
    fn new_works() {
        let mesh = SampleMeshes::two_hex8();
        let parts = [ParamPart {
            name: "bulk".to_string(),
            material: ParamSolid::sample_linear_elastic(),
        }];
        let fem = FemMesh::new(&mesh, &parts, &[]).unwrap();
        let pattern = SparsityPattern::new(&fem);
        assert_eq!(pattern.n_equation(), 36);
        // 2 × 24² entries minus the 12² entries of the four shared nodes
        assert_eq!(pattern.nnz(), 2 * 576 - 144);
        let entries = pattern.entries();
        for k in 1..entries.len() {
            assert!(entries[k - 1] < entries[k]);
        }
        // element 1 starts with node 1 (equations 3, 4, 5)
        let slots = pattern.element_slots(0, 1);
        assert_eq!(slots.len(), 576);
        assert_eq!(entries[slots[0]], (3, 3));
        assert_eq!(entries[slots[1]], (3, 4));
        assert_eq!(entries[slots[3]], (3, 24));
    }
}

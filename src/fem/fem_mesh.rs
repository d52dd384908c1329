use super::{MaterialCoordinates, SolidSubmesh};
use crate::base::{BasicMesh, BcComponent, BcKind, BoundaryCondition, History, ParamPart, Topology, NDIM};
use crate::material::Variable;
use crate::StrError;
use gemlab::integ::{self, Gauss};
use gemlab::shapes::{GeoKind, Scratchpad};
use russell_lab::Vector;
use std::collections::{BTreeMap, HashSet};

/// Holds a prescribed displacement at one equation
#[derive(Clone, Debug)]
pub struct PrescribedDisplacement {
    /// Holds the equation (DOF) number
    pub equation: usize,

    /// Holds the value history
    pub history: History,
}

/// Holds a distributed load over one boundary face or one volume element
///
/// The loads are not follower loads: they are integrated over the reference configuration.
struct DistributedLoad {
    /// Holds the kind (Traction, Pressure, or BodyForce)
    kind: BcKind,

    /// Holds the components of the load
    components: Vec<BcComponent>,

    /// Holds the scratchpad with the reference coordinates of the element
    pad: Scratchpad,

    /// Holds the integration points
    gauss: Gauss,

    /// Holds the nodes of the element
    nodes: Vec<usize>,
}

/// Holds a concentrated load at one equation
struct NodalLoad {
    /// Holds the equation (DOF) number
    equation: usize,

    /// Holds the value history
    history: History,
}

/// Holds the solid submeshes, the nodal coordinates, and the boundary conditions
pub struct FemMesh {
    /// Holds the reference and current nodal coordinates
    pub coordinates: MaterialCoordinates,

    /// Holds the solid submeshes (one per part)
    pub submeshes: Vec<SolidSubmesh>,

    /// Holds the prescribed displacements sorted by equation number
    prescribed: Vec<PrescribedDisplacement>,

    /// Indicates which equations are constrained (n_dof)
    constrained: Vec<bool>,

    /// Holds the distributed loads
    distributed: Vec<DistributedLoad>,

    /// Holds the concentrated loads
    nodal: Vec<NodalLoad>,
}

impl FemMesh {
    /// Allocates a new instance
    ///
    /// # Input
    ///
    /// * `mesh` -- the mesh and its named regions
    /// * `parts` -- the material assigned to each volume submesh
    /// * `boundaries` -- the boundary conditions applied to named regions
    ///
    /// # Notes
    ///
    /// 1. Displacement conditions apply to all nodes of the named submesh; if a node
    ///    receives more than one condition for the same DOF, the last one is used
    /// 2. Traction applies to surfaces (force per unit area) or to node sets (concentrated force)
    /// 3. Pressure applies to surfaces and BodyForce to volumes
    pub fn new(mesh: &BasicMesh, parts: &[ParamPart], boundaries: &[BoundaryCondition]) -> Result<Self, StrError> {
        mesh.validate()?;
        if parts.is_empty() {
            return Err("at least one part must be given");
        }

        // submeshes
        let features = mesh.features();
        let coordinates = MaterialCoordinates::new(&mesh.coordinates());
        let mut names = HashSet::new();
        let mut submeshes = Vec::with_capacity(parts.len());
        for part in parts {
            if !names.insert(part.name.as_str()) {
                return Err("part names must be unique");
            }
            let basic = mesh.submesh(&part.name, &features)?;
            submeshes.push(SolidSubmesh::new(&basic, &part.material, &coordinates)?);
        }

        // boundary conditions
        let n_dof = 3 * mesh.n_node();
        let mut repeated = HashSet::new();
        let mut essential = BTreeMap::new();
        let mut distributed = Vec::new();
        let mut nodal = Vec::new();
        for bc in boundaries {
            bc.validate()?;
            for component in &bc.components {
                if !repeated.insert((bc.name.as_str(), bc.kind, component.dof)) {
                    return Err("boundary condition is repeated for the same submesh and DOF");
                }
            }
            let basic = mesh.submesh(&bc.name, &features)?;
            let topology = basic.topology();
            match bc.kind {
                BcKind::Displacement => {
                    for component in &bc.components {
                        let dof = component.dof.ok_or("boundary condition component must specify a DOF")?;
                        for node in basic.unique_nodes() {
                            essential.insert(dof.equation(node), component.history.clone());
                        }
                    }
                }
                BcKind::Traction => match topology {
                    Topology::Point => {
                        for component in &bc.components {
                            let dof = component.dof.ok_or("boundary condition component must specify a DOF")?;
                            for node in basic.unique_nodes() {
                                nodal.push(NodalLoad {
                                    equation: dof.equation(node),
                                    history: component.history.clone(),
                                });
                            }
                        }
                    }
                    Topology::Surface(kind) => {
                        for nodes in basic.connectivities() {
                            distributed.push(DistributedLoad::new(bc, kind, nodes, &coordinates)?);
                        }
                    }
                    Topology::Volume(_) => return Err("traction boundary conditions require a surface or a node set"),
                },
                BcKind::Pressure => match topology {
                    Topology::Surface(kind) => {
                        for nodes in basic.connectivities() {
                            distributed.push(DistributedLoad::new(bc, kind, nodes, &coordinates)?);
                        }
                    }
                    _ => return Err("pressure boundary conditions require a surface"),
                },
                BcKind::BodyForce => match topology {
                    Topology::Volume(kind) => {
                        for nodes in basic.connectivities() {
                            distributed.push(DistributedLoad::new(bc, kind, nodes, &coordinates)?);
                        }
                    }
                    _ => return Err("body force boundary conditions require a volume"),
                },
                BcKind::Convection => return Err("convection boundary conditions are not available for solids"),
            }
        }
        let mut constrained = vec![false; n_dof];
        let prescribed: Vec<_> = essential
            .into_iter()
            .map(|(equation, history)| {
                constrained[equation] = true;
                PrescribedDisplacement { equation, history }
            })
            .collect();
        Ok(FemMesh {
            coordinates,
            submeshes,
            prescribed,
            constrained,
            distributed,
            nodal,
        })
    }

    /// Returns the number of nodes
    pub fn n_node(&self) -> usize {
        self.coordinates.n_node()
    }

    /// Returns the total number of DOFs (equations)
    pub fn n_dof(&self) -> usize {
        3 * self.coordinates.n_node()
    }

    /// Returns the prescribed displacements sorted by equation number
    pub fn prescribed(&self) -> &[PrescribedDisplacement] {
        &self.prescribed
    }

    /// Returns the flags indicating the constrained equations
    pub fn constrained(&self) -> &[bool] {
        &self.constrained
    }

    /// Indicates whether all constitutive models yield a symmetric tangent
    pub fn is_symmetric(&self) -> bool {
        self.submeshes.iter().all(|s| s.model().actual.is_symmetric())
    }

    /// Sets the prescribed values at time t into the displacement vector
    pub fn apply_displacement_boundaries(&self, displacement: &mut Vector, t: f64) {
        for p in &self.prescribed {
            displacement[p.equation] = p.history.value(t);
        }
    }

    /// Updates the current configuration and the internal variables of all submeshes
    pub fn update_internal_variables(&mut self, displacement: &Vector, dt: f64) -> Result<(), StrError> {
        self.coordinates.update(displacement)?;
        for submesh in self.submeshes.iter_mut() {
            submesh.update_internal_variables(&self.coordinates, dt)?;
        }
        Ok(())
    }

    /// Commits (converged) or reverts (not converged) the internal variables of all submeshes
    pub fn save_internal_variables(&mut self, converged: bool) {
        for submesh in self.submeshes.iter_mut() {
            submesh.save_internal_variables(converged);
        }
    }

    /// Computes the global external force vector at time t
    pub fn external_force(&self, t: f64) -> Result<Vector, StrError> {
        let mut ff_ext = Vector::new(self.n_dof());
        for load in &self.distributed {
            load.add_to_ff_ext(&mut ff_ext, t)?;
        }
        for load in &self.nodal {
            ff_ext[load.equation] += load.history.value(t);
        }
        Ok(ff_ext)
    }

    /// Returns the nodal values of a variable averaged over the elements sharing each node
    ///
    /// Each inner vector holds the components of the variable at one node (one component
    /// for scalars, and the Mandel components for tensors). Nodes that do not belong to
    /// any solid element receive an empty vector.
    pub fn nodal_averaged(&self, variable: Variable) -> Result<Vec<Vec<f64>>, StrError> {
        let n_node = self.n_node();
        let mut sums = vec![Vec::new(); n_node];
        let mut counts = vec![0; n_node];
        for submesh in &self.submeshes {
            submesh.add_nodal_values(variable, &mut sums, &mut counts)?;
        }
        for (values, count) in sums.iter_mut().zip(&counts) {
            if *count > 0 {
                for value in values.iter_mut() {
                    *value /= *count as f64;
                }
            }
        }
        Ok(sums)
    }
}

impl DistributedLoad {
    /// Allocates a new instance
    fn new(bc: &BoundaryCondition, kind: GeoKind, nodes: &[usize], coordinates: &MaterialCoordinates) -> Result<Self, StrError> {
        let mut pad = Scratchpad::new(NDIM, kind)?;
        coordinates.set_pad(&mut pad, nodes, false);
        Ok(DistributedLoad {
            kind: bc.kind,
            components: bc.components.clone(),
            pad,
            gauss: Gauss::new(kind),
            nodes: nodes.to_vec(),
        })
    }

    /// Integrates the load at time t and adds the nodal forces to the global vector
    fn add_to_ff_ext(&self, ff_ext: &mut Vector, t: f64) -> Result<(), StrError> {
        let mut local = Vector::new(3 * self.nodes.len());
        let mut pad = self.pad.clone();
        let mut args = integ::CommonArgs::new(&mut pad, &self.gauss);
        match self.kind {
            BcKind::Pressure => {
                // positive pressure pushes against the surface
                let pressure = self.components.first().map_or(0.0, |c| c.history.value(t));
                integ::vec_02_nv_bry(&mut local, &mut args, |v, _, un, _| {
                    for i in 0..3 {
                        v[i] = -pressure * un[i];
                    }
                    Ok(())
                })?;
            }
            BcKind::Traction | BcKind::BodyForce => {
                let mut values = [0.0; 3];
                for component in &self.components {
                    let dof = component.dof.ok_or("boundary condition component must specify a DOF")?;
                    values[dof.index()] = component.history.value(t);
                }
                if self.kind == BcKind::Traction {
                    integ::vec_02_nv_bry(&mut local, &mut args, |v, _, _, _| {
                        for i in 0..3 {
                            v[i] = values[i];
                        }
                        Ok(())
                    })?;
                } else {
                    integ::vec_02_nv(&mut local, &mut args, |v, _, _| {
                        for i in 0..3 {
                            v[i] = values[i];
                        }
                        Ok(())
                    })?;
                }
            }
            BcKind::Displacement | BcKind::Convection => (),
        }
        for (m, node) in self.nodes.iter().enumerate() {
            for i in 0..3 {
                ff_ext[3 * node + i] += local[3 * m + i];
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::FemMesh;
    use crate::base::{BcKind, BoundaryCondition, Dof, History, ParamPart, ParamSolid, SampleMeshes};
    use crate::material::Variable;
    use russell_lab::{approx_eq, Vector};

    fn parts() -> Vec<ParamPart> {
        vec![ParamPart {
            name: "bulk".to_string(),
            material: ParamSolid::sample_linear_elastic(),
        }]
    }

    #[test]
    fn new_captures_errors() {
        let mesh = SampleMeshes::one_hex8();
        assert_eq!(FemMesh::new(&mesh, &[], &[]).err(), Some("at least one part must be given"));
        let mut two = parts();
        two.push(two[0].clone());
        assert_eq!(FemMesh::new(&mesh, &two, &[]).err(), Some("part names must be unique"));
        let mut wrong = parts();
        wrong[0].name = "top".to_string();
        assert_eq!(
            FemMesh::new(&mesh, &wrong, &[]).err(),
            Some("solid submesh requires a volume topology")
        );
        wrong[0].name = "unknown".to_string();
        assert_eq!(
            FemMesh::new(&mesh, &wrong, &[]).err(),
            Some("cannot find region with the given name")
        );

        let cases = [
            (
                BoundaryCondition::new("bulk", BcKind::Pressure, None, History::constant(1.0)),
                "pressure boundary conditions require a surface",
            ),
            (
                BoundaryCondition::new("corner", BcKind::Pressure, None, History::constant(1.0)),
                "pressure boundary conditions require a surface",
            ),
            (
                BoundaryCondition::new("top", BcKind::BodyForce, Some(Dof::Uz), History::constant(1.0)),
                "body force boundary conditions require a volume",
            ),
            (
                BoundaryCondition::new("bulk", BcKind::Traction, Some(Dof::Uz), History::constant(1.0)),
                "traction boundary conditions require a surface or a node set",
            ),
            (
                BoundaryCondition::new("top", BcKind::Convection, Some(Dof::Uz), History::constant(1.0)),
                "convection boundary conditions are not available for solids",
            ),
        ];
        for (bc, message) in cases {
            assert_eq!(FemMesh::new(&mesh, &parts(), &[bc]).err(), Some(message));
        }

        let bcs = [BoundaryCondition::fixed("xsym", Dof::Ux), BoundaryCondition::fixed("xsym", Dof::Ux)];
        assert_eq!(
            FemMesh::new(&mesh, &parts(), &bcs).err(),
            Some("boundary condition is repeated for the same submesh and DOF")
        );
    }

    #[test]
    fn displacement_boundaries_work() {
        let mesh = SampleMeshes::one_hex8();
        let bcs = [
            BoundaryCondition::fixed("xsym", Dof::Ux),
            BoundaryCondition::fixed("ysym", Dof::Uy),
            BoundaryCondition::new("xpos", BcKind::Displacement, Some(Dof::Ux), History::ramp(0.01)),
        ];
        let fem = FemMesh::new(&mesh, &parts(), &bcs).unwrap();
        assert_eq!(fem.n_node(), 8);
        assert_eq!(fem.n_dof(), 24);
        let equations: Vec<_> = fem.prescribed().iter().map(|p| p.equation).collect();
        // xsym: 0, 3, 4, 7 (Ux); ysym: 0, 1, 4, 5 (Uy); xpos: 1, 2, 5, 6 (Ux)
        assert_eq!(equations, &[0, 1, 3, 4, 6, 9, 12, 13, 15, 16, 18, 21]);
        assert_eq!(fem.constrained().iter().filter(|c| **c).count(), 12);
        assert!(fem.is_symmetric());
        let mut d = Vector::new(24);
        fem.apply_displacement_boundaries(&mut d, 0.5);
        approx_eq(d[3], 0.005, 1e-15);
        approx_eq(d[6], 0.005, 1e-15);
        assert_eq!(d[0], 0.0);
        assert_eq!(d[4], 0.0);
    }

    #[test]
    fn external_force_works() {
        let mesh = SampleMeshes::one_hex8();
        let bcs = [
            BoundaryCondition::new("top", BcKind::Pressure, None, History::constant(2.0)),
            BoundaryCondition::new("xpos", BcKind::Traction, Some(Dof::Ux), History::ramp(4.0)),
            BoundaryCondition::new("bulk", BcKind::BodyForce, Some(Dof::Uy), History::constant(-8.0)),
        ];
        let fem = FemMesh::new(&mesh, &parts(), &bcs).unwrap();
        let ff = fem.external_force(0.5).unwrap();
        // pressure on the top face (outward normal +z)
        for m in [4, 5, 6, 7] {
            approx_eq(ff[3 * m + 2], -0.5, 1e-14);
        }
        // traction on x = 1
        for m in [1, 2, 5, 6] {
            approx_eq(ff[3 * m], 0.5, 1e-14);
        }
        for m in [0, 3, 4, 7] {
            approx_eq(ff[3 * m], 0.0, 1e-14);
        }
        // body force
        for m in 0..8 {
            approx_eq(ff[3 * m + 1], -1.0, 1e-14);
        }
        // pressure on the bottom face (outward normal -z)
        let bcs = [BoundaryCondition::new("zsym", BcKind::Pressure, None, History::constant(1.0))];
        let fem = FemMesh::new(&mesh, &parts(), &bcs).unwrap();
        let ff = fem.external_force(0.0).unwrap();
        for m in [0, 1, 2, 3] {
            approx_eq(ff[3 * m + 2], 0.25, 1e-14);
        }
    }

    #[test]
    fn nodal_loads_work() {
        let mesh = SampleMeshes::two_hex8();
        let bcs = [BoundaryCondition::new("tip", BcKind::Traction, Some(Dof::Uz), History::ramp(-1.0))];
        let fem = FemMesh::new(&mesh, &parts(), &bcs).unwrap();
        let ff = fem.external_force(1.0).unwrap();
        let total: f64 = (0..12).map(|m| ff[3 * m + 2]).sum();
        approx_eq(total, -4.0, 1e-15);
        for m in 8..12 {
            assert_eq!(ff[3 * m + 2], -1.0);
        }
    }

    #[test]
    fn nodal_averaged_works() {
        let mesh = SampleMeshes::two_hex8();
        let mut fem = FemMesh::new(&mesh, &parts(), &[]).unwrap();
        let mut d = Vector::new(fem.n_dof());
        for (m, x) in mesh.coordinates().iter().enumerate() {
            d[3 * m] = 0.001 * x[0];
        }
        fem.update_internal_variables(&d, 1.0).unwrap();
        let sigma = fem.nodal_averaged(Variable::CauchyStress).unwrap();
        // E = 200000 and ν = 0.3 ⇒ λ + 2G = 269230.77
        let correct = 200_000.0 * 0.7 / (1.3 * 0.4) * 0.001;
        for values in &sigma {
            assert_eq!(values.len(), 6);
            approx_eq(values[0], correct, 1e-9);
            approx_eq(values[3], 0.0, 1e-9);
        }
        let vm = fem.nodal_averaged(Variable::VonMisesStress).unwrap();
        approx_eq(vm[1][0], vm[8][0], 1e-9);
        fem.save_internal_variables(false);
        let vm = fem.nodal_averaged(Variable::VonMisesStress).unwrap();
        assert_eq!(vm[1][0], 0.0);
    }
}

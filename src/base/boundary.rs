use super::History;
use crate::StrError;
use serde::{Deserialize, Serialize};

/// Defines the displacement degrees-of-freedom of a node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Dof {
    /// Displacement along x
    Ux,

    /// Displacement along y
    Uy,

    /// Displacement along z
    Uz,
}

impl Dof {
    /// Returns the local index of this DOF within a node (0, 1, or 2)
    pub fn index(&self) -> usize {
        match self {
            Dof::Ux => 0,
            Dof::Uy => 1,
            Dof::Uz => 2,
        }
    }

    /// Returns the global equation number of this DOF at a node
    pub fn equation(&self, node: usize) -> usize {
        3 * node + self.index()
    }

    /// Returns the DOF corresponding to an axis name ("x", "y", or "z")
    pub fn from_axis(axis: &str) -> Result<Self, StrError> {
        match axis {
            "x" => Ok(Dof::Ux),
            "y" => Ok(Dof::Uy),
            "z" => Ok(Dof::Uz),
            _ => Err("axis name must be x, y, or z"),
        }
    }
}

/// Defines the kind of boundary condition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum BcKind {
    /// Prescribed displacement (essential condition)
    Displacement,

    /// Distributed force per unit area on a surface, or a concentrated force on a node set
    Traction,

    /// Distributed force per unit volume
    BodyForce,

    /// Normal pressure on a surface (positive values push against the surface)
    Pressure,

    /// Heat transfer by convection (diffusion problems only)
    Convection,
}

/// Holds one component (axis) of a boundary condition
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BcComponent {
    /// Holds the DOF affected by this component (None for pressure)
    #[serde(default)]
    pub dof: Option<Dof>,

    /// Holds the time history of the prescribed value
    pub history: History,
}

/// Holds a boundary condition applied to a named submesh
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BoundaryCondition {
    /// Holds the name of the submesh (volume, surface, or node set)
    pub name: String,

    /// Holds the kind of boundary condition
    pub kind: BcKind,

    /// Holds the prescribed components
    pub components: Vec<BcComponent>,
}

impl BoundaryCondition {
    /// Allocates a new boundary condition with a single component
    pub fn new(name: &str, kind: BcKind, dof: Option<Dof>, history: History) -> Self {
        BoundaryCondition {
            name: name.to_string(),
            kind,
            components: vec![BcComponent { dof, history }],
        }
    }

    /// Returns a displacement condition fixing the given DOF (zero value at all times)
    pub fn fixed(name: &str, dof: Dof) -> Self {
        BoundaryCondition::new(name, BcKind::Displacement, Some(dof), History::constant(0.0))
    }

    /// Checks the consistency of the data
    pub fn validate(&self) -> Result<(), StrError> {
        if self.components.is_empty() {
            return Err("boundary condition must have at least one component");
        }
        if self.kind == BcKind::Convection {
            return Err("convection boundary conditions are not available for solids");
        }
        let mut dofs = Vec::new();
        for component in &self.components {
            component.history.validate()?;
            match (self.kind, component.dof) {
                (BcKind::Pressure, None) => (),
                (BcKind::Pressure, Some(_)) => return Err("pressure boundary conditions must not specify a DOF"),
                (_, None) => return Err("boundary condition component must specify a DOF"),
                (_, Some(dof)) => {
                    if dofs.contains(&dof) {
                        return Err("boundary condition has repeated DOFs");
                    }
                    dofs.push(dof);
                }
            }
        }
        if self.kind == BcKind::Pressure && self.components.len() != 1 {
            return Err("pressure boundary conditions must have exactly one component");
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

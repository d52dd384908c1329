use super::NDIM;
use crate::StrError;
use gemlab::mesh::{Features, Mesh};
use gemlab::shapes::GeoKind;
use gemlab::util::any_x;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Selects a group of entities in the mesh by marker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Region {
    /// Cells (volumes) with the given cell marker
    Cells(i32),

    /// Boundary faces with the given face marker (see [Mesh::marked_faces])
    Faces(i32),

    /// Points with the given point marker
    Points(i32),
}

/// Associates a name with a region of the mesh
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NamedRegion {
    /// Holds the name of the group (e.g., "bulk", "xsym", "top")
    pub name: String,

    /// Holds the selection
    pub region: Region,
}

/// Defines the element topology of a submesh
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Single node (used for concentrated loads and nodal constraints)
    Point,

    /// Surface elements (e.g., Qua4 faces of hexahedra)
    Surface(GeoKind),

    /// Volume elements (e.g., Hex8)
    Volume(GeoKind),
}

impl Topology {
    /// Returns the number of nodes of each element
    pub fn nodes_per_element(&self) -> usize {
        match self {
            Topology::Point => 1,
            Topology::Surface(kind) | Topology::Volume(kind) => kind.nnode(),
        }
    }

    /// Returns the geometry kind of surfaces and volumes
    pub fn kind(&self) -> Option<GeoKind> {
        match self {
            Topology::Point => None,
            Topology::Surface(kind) | Topology::Volume(kind) => Some(*kind),
        }
    }
}

/// Holds a named group of elements with the same topology
#[derive(Clone, Debug)]
pub struct BasicSubmesh {
    /// Holds the name of the group
    pub name: String,

    /// Holds the element topology
    pub topology: Topology,

    /// Holds the node indices of each element
    pub connectivity: Vec<Vec<usize>>,
}

impl BasicSubmesh {
    /// Returns the element connectivities
    pub fn connectivities(&self) -> &Vec<Vec<usize>> {
        &self.connectivity
    }

    /// Returns the element topology
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Returns the number of nodes per element
    pub fn nodes_per_element(&self) -> usize {
        self.topology.nodes_per_element()
    }

    /// Returns the number of elements
    pub fn n_element(&self) -> usize {
        self.connectivity.len()
    }

    /// Returns the sorted list of unique nodes referenced by this submesh
    pub fn unique_nodes(&self) -> Vec<usize> {
        let set: HashSet<usize> = self.connectivity.iter().flatten().copied().collect();
        let mut nodes: Vec<_> = set.into_iter().collect();
        nodes.sort();
        nodes
    }
}

/// Holds a three-dimensional mesh and the named regions used by parts and boundary conditions
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BasicMesh {
    /// Holds the points, the cells, and the marked faces
    pub mesh: Mesh,

    /// Holds the named regions
    pub regions: Vec<NamedRegion>,
}

impl BasicMesh {
    /// Returns the nodal coordinates
    pub fn coordinates(&self) -> Vec<[f64; 3]> {
        self.mesh
            .points
            .iter()
            .map(|p| {
                let mut x = [0.0; 3];
                for (i, v) in p.coords.iter().take(3).enumerate() {
                    x[i] = *v;
                }
                x
            })
            .collect()
    }

    /// Returns the number of nodes
    pub fn n_node(&self) -> usize {
        self.mesh.points.len()
    }

    /// Extracts the boundary features (faces carry the markers given in the mesh)
    pub fn features(&self) -> Features<'_> {
        Features::new(&self.mesh, false)
    }

    /// Finds a region by name
    pub fn region(&self, name: &str) -> Result<Region, StrError> {
        self.regions
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.region)
            .ok_or("cannot find region with the given name")
    }

    /// Collects the elements of a named region
    ///
    /// Volumes are the cells with the region marker; all of them must have the same kind.
    /// Surfaces are the boundary faces with the region marker, in outward-normal order.
    pub fn submesh(&self, name: &str, features: &Features) -> Result<BasicSubmesh, StrError> {
        let (topology, connectivity) = match self.region(name)? {
            Region::Cells(marker) => {
                let cells: Vec<_> = self.mesh.cells.iter().filter(|c| c.marker == marker).collect();
                if cells.is_empty() {
                    return Err("cannot find cells with the given marker");
                }
                let kind = cells[0].kind;
                if kind.ndim() != 3 {
                    return Err("cells of a region must be volumes");
                }
                if cells.iter().any(|c| c.kind != kind) {
                    return Err("cells of a region must have the same kind");
                }
                (Topology::Volume(kind), cells.iter().map(|c| c.points.clone()).collect())
            }
            Region::Faces(marker) => {
                let faces = features.search_marked_faces(marker);
                if faces.all.is_empty() {
                    return Err("cannot find faces with the given marker");
                }
                let kind = faces.all[0].kind;
                if faces.all.iter().any(|f| f.kind != kind) {
                    return Err("faces of a region must have the same kind");
                }
                (Topology::Surface(kind), faces.all.iter().map(|f| f.points.clone()).collect())
            }
            Region::Points(marker) => {
                let points = self.mesh.search_marked_points(marker, any_x)?;
                (Topology::Point, points.iter().map(|p| vec![*p]).collect())
            }
        };
        Ok(BasicSubmesh {
            name: name.to_string(),
            topology,
            connectivity,
        })
    }

    /// Checks the consistency of the mesh
    pub fn validate(&self) -> Result<(), StrError> {
        if self.mesh.ndim != NDIM {
            return Err("mesh must be three-dimensional");
        }
        if self.mesh.points.is_empty() {
            return Err("mesh must have at least one node");
        }
        self.mesh.check_all()?;
        let mut names = HashSet::new();
        for region in &self.regions {
            if !names.insert(region.name.as_str()) {
                return Err("region names must be unique");
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

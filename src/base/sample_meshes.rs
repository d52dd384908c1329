use super::{BasicMesh, NamedRegion, Region};
use gemlab::mesh::{Cell, Mesh, Point};
use gemlab::shapes::GeoKind;

/// Holds sample meshes for tests and examples
pub struct SampleMeshes {}

/// Returns a named region
fn named(name: &str, region: Region) -> NamedRegion {
    NamedRegion {
        name: name.to_string(),
        region,
    }
}

impl SampleMeshes {
    /// Returns a unit cube with one Hex8 and its six faces as named surfaces
    ///
    /// Regions: "bulk" (cell marker 1), "xsym" (x = 0), "ysym" (y = 0), "zsym" (z = 0),
    /// "xpos" (x = 1), "ypos" (y = 1), "top" (z = 1), and the point "corner" (node 6).
    #[rustfmt::skip]
    pub fn one_hex8() -> BasicMesh {
        //       7--------------6  1.0
        //      /.             /|
        //     / .            / |
        //    /  .           /  |
        //   /   .          /   |
        //  4--------------5    |
        //  |    .         |    |
        //  |    3---------|----2  1.0
        //  |   /          |   /
        //  |  /           |  /
        //  | /            | /
        //  |/             |/
        //  0--------------1   0.0
        // 0.0            1.0
        BasicMesh {
            mesh: Mesh {
                ndim: 3,
                points: vec![
                    Point { id: 0, marker: 0, coords: vec![0.0, 0.0, 0.0] },
                    Point { id: 1, marker: 0, coords: vec![1.0, 0.0, 0.0] },
                    Point { id: 2, marker: 0, coords: vec![1.0, 1.0, 0.0] },
                    Point { id: 3, marker: 0, coords: vec![0.0, 1.0, 0.0] },
                    Point { id: 4, marker: 0, coords: vec![0.0, 0.0, 1.0] },
                    Point { id: 5, marker: 0, coords: vec![1.0, 0.0, 1.0] },
                    Point { id: 6, marker: -6, coords: vec![1.0, 1.0, 1.0] },
                    Point { id: 7, marker: 0, coords: vec![0.0, 1.0, 1.0] },
                ],
                cells: vec![
                    Cell { id: 0, marker: 1, kind: GeoKind::Hex8, points: vec![0, 1, 2, 3, 4, 5, 6, 7] },
                ],
                marked_edges: Vec::new(),
                marked_faces: vec![
                    (-10, 0, 4, 7, 3),
                    (-20, 0, 1, 5, 4),
                    (-30, 0, 3, 2, 1),
                    (-40, 1, 2, 6, 5),
                    (-50, 2, 3, 7, 6),
                    (-60, 4, 5, 6, 7),
                ],
            },
            regions: vec![
                named("bulk", Region::Cells(1)),
                named("xsym", Region::Faces(-10)),
                named("ysym", Region::Faces(-20)),
                named("zsym", Region::Faces(-30)),
                named("xpos", Region::Faces(-40)),
                named("ypos", Region::Faces(-50)),
                named("top", Region::Faces(-60)),
                named("corner", Region::Points(-6)),
            ],
        }
    }

    /// Returns a 2 × 1 × 1 bar made of two Hex8 aligned with x
    ///
    /// Regions: "bulk" (cell marker 1), "xsym" (x = 0), "ysym" (y = 0), "zsym" (z = 0),
    /// "xpos" (x = 2), "top" (z = 1), and the node set "tip" (the nodes at x = 2).
    #[rustfmt::skip]
    pub fn two_hex8() -> BasicMesh {
        //       7--------------6--------------11
        //      /.             /.             /|
        //     / .            / .            / |
        //    4--------------5--------------10 |
        //    |  3-----------|--2-----------|--9
        //    | /            | /            | /
        //    |/             |/             |/
        //    0--------------1--------------8
        BasicMesh {
            mesh: Mesh {
                ndim: 3,
                points: vec![
                    Point { id: 0, marker: 0, coords: vec![0.0, 0.0, 0.0] },
                    Point { id: 1, marker: 0, coords: vec![1.0, 0.0, 0.0] },
                    Point { id: 2, marker: 0, coords: vec![1.0, 1.0, 0.0] },
                    Point { id: 3, marker: 0, coords: vec![0.0, 1.0, 0.0] },
                    Point { id: 4, marker: 0, coords: vec![0.0, 0.0, 1.0] },
                    Point { id: 5, marker: 0, coords: vec![1.0, 0.0, 1.0] },
                    Point { id: 6, marker: 0, coords: vec![1.0, 1.0, 1.0] },
                    Point { id: 7, marker: 0, coords: vec![0.0, 1.0, 1.0] },
                    Point { id: 8, marker: -1, coords: vec![2.0, 0.0, 0.0] },
                    Point { id: 9, marker: -1, coords: vec![2.0, 1.0, 0.0] },
                    Point { id: 10, marker: -1, coords: vec![2.0, 0.0, 1.0] },
                    Point { id: 11, marker: -1, coords: vec![2.0, 1.0, 1.0] },
                ],
                cells: vec![
                    Cell { id: 0, marker: 1, kind: GeoKind::Hex8, points: vec![0, 1, 2, 3, 4, 5, 6, 7] },
                    Cell { id: 1, marker: 1, kind: GeoKind::Hex8, points: vec![1, 8, 9, 2, 5, 10, 11, 6] },
                ],
                marked_edges: Vec::new(),
                marked_faces: vec![
                    (-10, 0, 4, 7, 3),
                    (-20, 0, 1, 5, 4),
                    (-20, 1, 8, 10, 5),
                    (-30, 0, 3, 2, 1),
                    (-30, 1, 2, 9, 8),
                    (-40, 8, 9, 11, 10),
                    (-60, 4, 5, 6, 7),
                    (-60, 5, 10, 11, 6),
                ],
            },
            regions: vec![
                named("bulk", Region::Cells(1)),
                named("xsym", Region::Faces(-10)),
                named("ysym", Region::Faces(-20)),
                named("zsym", Region::Faces(-30)),
                named("xpos", Region::Faces(-40)),
                named("top", Region::Faces(-60)),
                named("tip", Region::Points(-1)),
            ],
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::SampleMeshes;

    #[test]
    fn samples_are_valid() {
        let mesh = SampleMeshes::one_hex8();
        mesh.validate().unwrap();
        assert_eq!(mesh.regions.len(), 8);
        let features = mesh.features();
        for region in &mesh.regions {
            mesh.submesh(&region.name, &features).unwrap();
        }

        let mesh = SampleMeshes::two_hex8();
        mesh.validate().unwrap();
        assert_eq!(mesh.n_node(), 12);
        let features = mesh.features();
        assert_eq!(mesh.submesh("bulk", &features).unwrap().n_element(), 2);
        assert_eq!(mesh.submesh("tip", &features).unwrap().unique_nodes(), &[8, 9, 10, 11]);
        assert_eq!(mesh.submesh("top", &features).unwrap().unique_nodes(), &[4, 5, 6, 7, 10, 11]);
        assert_eq!(mesh.submesh("ysym", &features).unwrap().n_element(), 2);
    }
}

//! Scene geometry: flat-coloured triangles loaded from OBJ/MTL files.
//!
//! A [`Scene`] is an ordered, immutable list of [`Triangle`]s. It is built once
//! per load and only ever read by the render back ends.

use std::io::BufRead;
use std::path::Path;

use log::{debug, info, warn};

use crate::colors::{self, Color};
use crate::error::{Error, Result};
use crate::math::vec3::Vec3;

/// A triangle in world space with a flat surface colour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
    pub color: Color,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, color: Color) -> Self {
        Self {
            vertices: [v0, v1, v2],
            color,
        }
    }

    /// The two edges leaving `v0`: `(v1 - v0, v2 - v0)`.
    #[inline]
    pub fn edges(&self) -> (Vec3, Vec3) {
        let [v0, v1, v2] = self.vertices;
        (v1 - v0, v2 - v0)
    }

    /// Face normal, computed on demand from the edge vectors. Not normalized;
    /// zero for degenerate triangles.
    pub fn normal(&self) -> Vec3 {
        let (e0, e1) = self.edges();
        e0.cross(e1)
    }

    pub fn centroid(&self) -> Vec3 {
        let [v0, v1, v2] = self.vertices;
        (v0 + v1 + v2) / 3.0
    }
}

/// The immutable triangle list every back end renders from.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    triangles: Vec<Triangle>,
}

impl Scene {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Loads a scene from an OBJ file, resolving `mtllib`/`usemtl` against the
    /// companion material file. Every vertex position is multiplied by `scale`.
    ///
    /// Any malformed record aborts the load; there is no partial scene.
    pub fn from_obj<P: AsRef<Path>>(path: P, scale: f32) -> Result<Self> {
        let path = path.as_ref();
        let (models, materials) =
            tobj::load_obj(path, &load_options()).map_err(|source| Error::SceneLoad {
                path: path.display().to_string(),
                source,
            })?;
        let scene = Self::from_tobj(&models, materials, scale, &path.display().to_string())?;
        info!(
            "Loaded {} triangles from {:?} ({} objects)",
            scene.len(),
            path,
            models.len()
        );
        Ok(scene)
    }

    /// Loads a scene from an in-memory OBJ stream.
    ///
    /// `material_loader` receives the path named by each `mtllib` directive;
    /// [`tobj::load_mtl_buf`] turns MTL text into its result.
    pub fn from_obj_reader<R, F>(reader: &mut R, scale: f32, material_loader: F) -> Result<Self>
    where
        R: BufRead,
        F: Fn(&Path) -> tobj::MTLLoadResult,
    {
        const SOURCE: &str = "<reader>";
        let (models, materials) = tobj::load_obj_buf(reader, &load_options(), material_loader)
            .map_err(|source| Error::SceneLoad {
                path: SOURCE.to_string(),
                source,
            })?;
        Self::from_tobj(&models, materials, scale, SOURCE)
    }

    fn from_tobj(
        models: &[tobj::Model],
        materials: std::result::Result<Vec<tobj::Material>, tobj::LoadError>,
        scale: f32,
        source_name: &str,
    ) -> Result<Self> {
        let materials = materials.unwrap_or_else(|err| {
            warn!("Material library unavailable ({err}); using default surface colour");
            Vec::new()
        });
        debug!("Resolved {} materials", materials.len());

        let mut triangles = Vec::new();
        for model in models {
            let mesh = &model.mesh;
            let color = surface_color(&model.name, mesh.material_id, &materials);
            // tobj validates indices while parsing; a stray one still
            // reports as a malformed scene rather than panicking here.
            let vertex = |index: u32| -> Result<Vec3> {
                let start = index as usize * 3;
                match mesh.positions.get(start..start + 3) {
                    Some(p) => Ok(Vec3::new(p[0], p[1], p[2]) * scale),
                    None => Err(Error::SceneLoad {
                        path: source_name.to_string(),
                        source: tobj::LoadError::FaceVertexOutOfBounds,
                    }),
                }
            };

            for corners in mesh.indices.chunks_exact(3) {
                triangles.push(Triangle::new(
                    vertex(corners[0])?,
                    vertex(corners[1])?,
                    vertex(corners[2])?,
                    color,
                ));
            }
        }

        Ok(Self::new(triangles))
    }
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

fn surface_color(object: &str, material_id: Option<usize>, materials: &[tobj::Material]) -> Color {
    let Some(id) = material_id else {
        debug!("Object {object:?} has no material; using default surface colour");
        return colors::DEFAULT_SURFACE;
    };
    match materials.get(id) {
        Some(material) => match material.diffuse {
            Some(kd) => Color::from_unit_rgb(kd),
            None => {
                warn!("Material {:?} has no diffuse colour", material.name);
                colors::DEFAULT_SURFACE
            }
        },
        None => {
            warn!("Object {object:?} references unknown material #{id}");
            colors::DEFAULT_SURFACE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    const MTL: &str = "\
newmtl Red
Kd 1.0 0.0 0.0

newmtl Grey
Kd 0.5 0.5 0.5
";

    fn load(obj: &str, scale: f32) -> Result<Scene> {
        Scene::from_obj_reader(&mut Cursor::new(obj), scale, |_| {
            tobj::load_mtl_buf(&mut Cursor::new(MTL))
        })
    }

    #[test]
    fn loads_faces_with_material_colours() {
        let obj = "\
mtllib box.mtl
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
usemtl Red
f 1 2 3
usemtl Grey
f 2 4 3
";
        let scene = load(obj, 1.0).unwrap();
        assert_eq!(scene.len(), 2);
        let red = scene
            .triangles()
            .iter()
            .find(|t| t.color == Color::new(255, 0, 0))
            .unwrap();
        assert_eq!(red.vertices[1], Vec3::new(1.0, 0.0, 0.0));
        assert!(scene
            .triangles()
            .iter()
            .any(|t| t.color == Color::new(127, 127, 127)));
    }

    #[test]
    fn applies_scale_to_positions() {
        let obj = "v 2 0 0\nv 0 2 0\nv 0 0 2\nf 1 2 3\n";
        let scene = load(obj, 0.5).unwrap();
        let t = scene.triangles()[0];
        assert_relative_eq!(t.vertices[0].x, 1.0);
        assert_relative_eq!(t.vertices[2].z, 1.0);
    }

    #[test]
    fn faces_without_material_use_default_colour() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let scene = load(obj, 1.0).unwrap();
        assert_eq!(scene.triangles()[0].color, colors::DEFAULT_SURFACE);
    }

    #[test]
    fn undeclared_vertex_is_fatal() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n";
        assert!(matches!(
            load(obj, 1.0),
            Err(Error::SceneLoad {
                source: tobj::LoadError::FaceVertexOutOfBounds,
                ..
            })
        ));
    }

    #[test]
    fn non_numeric_token_is_fatal() {
        let obj = "v 0 zero 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        assert!(matches!(load(obj, 1.0), Err(Error::SceneLoad { .. })));
    }

    #[test]
    fn normal_is_edge_cross_product() {
        let t = Triangle::new(Vec3::ZERO, Vec3::RIGHT, Vec3::UP, Color::WHITE);
        assert_eq!(t.normal(), Vec3::FORWARD);
        let flat = Triangle::new(Vec3::ZERO, Vec3::RIGHT, Vec3::RIGHT * 2.0, Color::WHITE);
        assert_eq!(flat.normal(), Vec3::ZERO);
    }
}

//! Level scenes described in TOML, and the collaborators a bake needs from
//! them: direct lighting, texture colors and visibility.

use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use bounce_geom::{Aabb, Vec3};
use bounce_light::{
    COLOR_RANGE, DirectLighting, Face, Level, LightStyle, Model, StyleColors, SurfaceFlags,
    TextureColors, Visibility,
};
use bounce_octree::{Octree, make_octree};
use serde::Deserialize;

pub const DEFAULT_LIGHT_INTENSITY: f32 = 300.0;
pub const DEFAULT_VIS_RADIUS: f32 = 1024.0;

#[derive(Debug, Deserialize)]
struct ModelDef {
    #[serde(default = "yes")]
    shadow: bool,
}

#[derive(Debug, Deserialize)]
struct FaceDef {
    points: Vec<[f32; 3]>,
    #[serde(default)]
    texture: String,
    #[serde(default)]
    model: usize,
    #[serde(default = "yes")]
    lightmapped: bool,
    #[serde(default)]
    no_bounce: bool,
}

#[derive(Debug, Deserialize)]
struct LeafDef {
    mins: [f32; 3],
    maxs: [f32; 3],
}

#[derive(Debug, Deserialize)]
struct SceneFile {
    #[serde(default)]
    models: Vec<ModelDef>,
    #[serde(default)]
    faces: Vec<FaceDef>,
    #[serde(default)]
    textures: BTreeMap<String, [u8; 3]>,
    #[serde(default)]
    lights: Vec<PointLight>,
    #[serde(default)]
    leaves: Vec<LeafDef>,
    #[serde(default = "default_vis_radius")]
    vis_radius: f32,
}

fn yes() -> bool {
    true
}

fn default_vis_radius() -> f32 {
    DEFAULT_VIS_RADIUS
}

fn white() -> [u8; 3] {
    [255; 3]
}

fn default_intensity() -> f32 {
    DEFAULT_LIGHT_INTENSITY
}

/// Point light with linear falloff: full `intensity` at the origin, zero at
/// `intensity` units away.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PointLight {
    pub origin: [f32; 3],
    #[serde(default = "white")]
    pub color: [u8; 3],
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    #[serde(default)]
    pub style: LightStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    TooFewPoints { face: usize, count: usize },
    NonFinitePoint { face: usize },
    LeafInverted { leaf: usize },
    BadVisRadius(f32),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::TooFewPoints { face, count } => {
                write!(f, "face {} has {} points, need at least 3", face, count)
            }
            SceneError::NonFinitePoint { face } => write!(f, "face {} has a non-finite point", face),
            SceneError::LeafInverted { leaf } => write!(f, "leaf {} has mins above maxs", leaf),
            SceneError::BadVisRadius(r) => write!(f, "vis_radius must be positive, got {}", r),
        }
    }
}

impl Error for SceneError {}

/// A loaded scene. Faces keep their file order, which fixes face numbers.
#[derive(Debug)]
pub struct Scene {
    pub level: Level,
    pub textures: BTreeMap<String, [u8; 3]>,
    pub lights: Vec<PointLight>,
    pub leaves: Vec<Aabb>,
    pub vis_radius: f32,
    face_index: Octree<usize>,
}

impl Scene {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let file: SceneFile = toml::from_str(toml_str)?;
        Ok(Self::build(file)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    fn build(file: SceneFile) -> Result<Self, SceneError> {
        if !(file.vis_radius > 0.0 && file.vis_radius.is_finite()) {
            return Err(SceneError::BadVisRadius(file.vis_radius));
        }

        let mut faces = Vec::with_capacity(file.faces.len());
        for (i, def) in file.faces.into_iter().enumerate() {
            if def.points.len() < 3 {
                return Err(SceneError::TooFewPoints {
                    face: i,
                    count: def.points.len(),
                });
            }
            let points: Vec<Vec3> = def.points.into_iter().map(Vec3::from).collect();
            if points.iter().any(|p| !p.is_finite()) {
                return Err(SceneError::NonFinitePoint { face: i });
            }
            faces.push(Face {
                points,
                texture: def.texture,
                model: def.model,
                lightmapped: def.lightmapped,
                flags: SurfaceFlags {
                    no_bounce: def.no_bounce,
                },
            });
        }

        let mut models: Vec<Model> = file
            .models
            .into_iter()
            .map(|m| Model { shadow: m.shadow })
            .collect();
        if models.is_empty() {
            // world model only
            models.push(Model::default());
        }

        let mut leaves = Vec::with_capacity(file.leaves.len());
        for (i, leaf) in file.leaves.iter().enumerate() {
            let (mins, maxs) = (Vec3::from(leaf.mins), Vec3::from(leaf.maxs));
            if mins.x > maxs.x || mins.y > maxs.y || mins.z > maxs.z {
                return Err(SceneError::LeafInverted { leaf: i });
            }
            leaves.push(Aabb::new(mins, maxs));
        }

        let objects: Vec<(Aabb, usize)> = faces
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.bounds().map(|b| (b, i)))
            .collect();
        let face_index = make_octree(&objects);
        log::debug!(
            "scene: {} faces, {} models, {} lights, {} leaves, {} index nodes",
            faces.len(),
            models.len(),
            file.lights.len(),
            leaves.len(),
            face_index.node_count()
        );

        Ok(Self {
            level: Level { faces, models },
            textures: file.textures,
            lights: file.lights,
            leaves,
            vis_radius: file.vis_radius,
            face_index,
        })
    }

    /// Faces whose bounds touch `query`, by face number.
    pub fn faces_touching(&self, query: &Aabb) -> Vec<usize> {
        self.face_index.query_touching_bbox(query)
    }
}

impl DirectLighting for Scene {
    fn direct_lighting(&self, pos: Vec3, normal: Vec3) -> StyleColors {
        let mut out = StyleColors::new();
        for light in &self.lights {
            let to_light = Vec3::from(light.origin) - pos;
            let dist = to_light.length();
            if dist <= 0.0 {
                continue;
            }
            let angle = normal.dot(to_light / dist);
            let add = (light.intensity - dist) * angle;
            if angle <= 0.0 || add <= 0.0 {
                continue;
            }
            let [r, g, b] = light.color;
            let tint = Vec3::new(r as f32, g as f32, b as f32) / COLOR_RANGE;
            *out.entry(light.style).or_insert(Vec3::ZERO) += tint * add;
        }
        out
    }
}

impl TextureColors for Scene {
    fn average_color(&self, name: &str) -> Option<[u8; 3]> {
        self.textures.average_color(name)
    }
}

impl Visibility for Scene {
    fn point_in_leaf(&self, pos: Vec3) -> Option<usize> {
        self.leaves.iter().position(|leaf| leaf.contains_point(pos))
    }

    fn estimate_visible_bounds(&self, pos: Vec3) -> Aabb {
        let reach = Aabb::from_point(pos).grow(Vec3::splat(self.vis_radius));
        self.faces_touching(&reach)
            .into_iter()
            .filter_map(|i| self.level.faces[i].bounds())
            .fold(Aabb::from_point(pos), |acc, b| acc.union(&b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOM: &str = r#"
        vis_radius = 50.0

        [[models]]
        shadow = true

        [[models]]
        shadow = false

        [textures]
        brick = [200, 100, 50]

        [[faces]]
        points = [[0, 0, 0], [64, 0, 0], [64, 64, 0], [0, 64, 0]]
        texture = "brick"

        [[faces]]
        points = [[200, 0, 0], [264, 0, 0], [264, 64, 0]]
        texture = "door"
        model = 1

        [[lights]]
        origin = [32, 32, 100]
        intensity = 300
        style = 0

        [[lights]]
        origin = [32, 32, 150]
        color = [255, 0, 0]
        intensity = 200
        style = 2

        [[leaves]]
        mins = [-10, -10, -10]
        maxs = [300, 300, 300]
    "#;

    #[test]
    fn parses_room() {
        let scene = Scene::from_toml_str(ROOM).unwrap();
        assert_eq!(scene.level.faces.len(), 2);
        assert_eq!(scene.level.models.len(), 2);
        assert_eq!(scene.level.faces[1].model, 1);
        assert!(scene.level.faces[0].lightmapped);
        assert_eq!(scene.lights.len(), 2);
        assert_eq!(scene.lights[0].color, [255, 255, 255]);
        assert_eq!(scene.average_color("brick"), Some([200, 100, 50]));
        assert_eq!(scene.average_color("door"), None);
    }

    #[test]
    fn lambert_with_linear_falloff() {
        let scene = Scene::from_toml_str(ROOM).unwrap();
        let lit = scene.direct_lighting(Vec3::new(32.0, 32.0, 0.0), Vec3::Z);
        assert_eq!(lit[&0], Vec3::splat(200.0));
        assert_eq!(lit[&2], Vec3::new(50.0, 0.0, 0.0));

        let behind = scene.direct_lighting(Vec3::new(32.0, 32.0, 0.0), -Vec3::Z);
        assert!(behind.is_empty());
    }

    #[test]
    fn leaves_and_visible_bounds() {
        let scene = Scene::from_toml_str(ROOM).unwrap();
        assert_eq!(scene.point_in_leaf(Vec3::new(1.0, 1.0, 1.0)), Some(0));
        assert_eq!(scene.point_in_leaf(Vec3::new(1000.0, 1.0, 1.0)), None);

        let near_first = scene.estimate_visible_bounds(Vec3::new(32.0, 32.0, 1.0));
        assert_eq!(near_first.mins(), Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(near_first.maxs(), Vec3::new(64.0, 64.0, 1.0));

        let far = Vec3::new(1000.0, 1000.0, 1000.0);
        assert_eq!(scene.estimate_visible_bounds(far), Aabb::from_point(far));
    }

    #[test]
    fn rejects_bad_faces() {
        let err = Scene::from_toml_str("[[faces]]\npoints = [[0, 0, 0], [1, 0, 0]]").unwrap_err();
        assert!(err.to_string().contains("face 0 has 2 points"));

        let err = Scene::from_toml_str(
            "[[leaves]]\nmins = [1, 1, 1]\nmaxs = [0, 0, 0]",
        )
        .unwrap_err();
        assert!(err.to_string().contains("leaf 0"));

        assert!(Scene::from_toml_str("vis_radius = -1.0").is_err());
    }

    #[test]
    fn empty_scene_has_world_model() {
        let scene = Scene::from_toml_str("").unwrap();
        assert!(scene.level.faces.is_empty());
        assert_eq!(scene.level.models, vec![Model { shadow: true }]);
        assert!(scene.faces_touching(&Aabb::from_point(Vec3::ZERO)).is_empty());
    }
}

//! Scene container and nearest-hit resolution.
//!
//! A [`Scene`] is assembled and validated once by a [`SceneBuilder`] and is
//! read-only afterwards, so it can be shared freely between render threads.

use thiserror::Error;
use umbra_math::{Camera, CameraError, Hittable, Intersection, Ray};

use crate::object::{Color, Light, Object};

/// Errors that make a scene unrenderable.
///
/// These are reported when the scene is built, never mid-render.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),

    #[error("Sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f32),

    #[error("Mesh has no triangles")]
    EmptyMesh,

    #[error("Triangle {0} of mesh has zero area")]
    DegenerateTriangle(usize),

    #[error("Plane normal must be non-zero")]
    DegeneratePlane,

    #[error("Light object must be emissive")]
    NonEmissiveLight,

    #[error("Light object must be a triangle mesh")]
    LightNotMesh,

    #[error("Light mesh must lie in an axis-aligned plane")]
    LightNotAxisAligned,

    #[error("Light has zero area")]
    DegenerateLight,

    #[error("Scene has no objects or lights")]
    EmptyScene,
}

/// Result type for scene construction.
pub type SceneResult<T> = Result<T, SceneError>;

/// The entity a ray hit, with its position in the scene's lists.
#[derive(Debug, Clone, Copy)]
pub enum HitEntity<'a> {
    Object { index: usize, object: &'a Object },
    Light { index: usize, light: &'a Light },
}

impl<'a> HitEntity<'a> {
    /// Surface color of the entity (emission for lights).
    pub fn color(&self) -> Color {
        match self {
            HitEntity::Object { object, .. } => object.color,
            HitEntity::Light { light, .. } => light.color(),
        }
    }

    /// Check whether this is the light at `index`.
    pub fn is_light(&self, index: usize) -> bool {
        matches!(self, HitEntity::Light { index: i, .. } if *i == index)
    }
}

/// Nearest intersection of a ray with the scene.
#[derive(Debug, Clone, Copy)]
pub struct SceneHit<'a> {
    pub intersection: Intersection,
    pub entity: HitEntity<'a>,
}

/// A static scene: objects, area lights, camera and background color.
#[derive(Debug, Clone)]
pub struct Scene {
    objects: Vec<Object>,
    lights: Vec<Light>,
    camera: Camera,
    background: Color,
}

/// Background used when none is set (slate blue).
pub const DEFAULT_BACKGROUND: Color = Color::new(0.2, 0.3, 0.35, 1.0);

impl Scene {
    /// Start building a scene viewed through `camera`.
    pub fn builder(camera: Camera) -> SceneBuilder {
        SceneBuilder::new(camera)
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Color seen by rays that escape the scene.
    pub fn background(&self) -> Color {
        self.background
    }

    /// Find the closest entity hit by `ray`.
    ///
    /// Objects are scanned before lights, each in insertion order. A strictly
    /// smaller `t` replaces the current hit, so on ties the first one wins.
    pub fn nearest_hit(&self, ray: &Ray) -> Option<SceneHit<'_>> {
        let mut nearest: Option<SceneHit<'_>> = None;

        let objects = self
            .objects
            .iter()
            .enumerate()
            .map(|(index, object)| (object.intersect(ray), HitEntity::Object { index, object }));
        let lights = self
            .lights
            .iter()
            .enumerate()
            .map(|(index, light)| (light.intersect(ray), HitEntity::Light { index, light }));

        for (intersection, entity) in objects.chain(lights) {
            let Some(intersection) = intersection else {
                continue;
            };
            let closer = nearest
                .as_ref()
                .map_or(true, |current| intersection.t < current.intersection.t);
            if closer {
                nearest = Some(SceneHit {
                    intersection,
                    entity,
                });
            }
        }

        nearest
    }
}

/// Collects scene contents and validates them on [`SceneBuilder::build`].
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    camera: Camera,
    objects: Vec<Object>,
    lights: Vec<Light>,
    background: Color,
}

impl SceneBuilder {
    /// Create an empty builder with the default background.
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            objects: Vec::new(),
            lights: Vec::new(),
            background: DEFAULT_BACKGROUND,
        }
    }

    /// Add an object.
    pub fn object(mut self, object: Object) -> Self {
        self.objects.push(object);
        self
    }

    /// Add several objects.
    pub fn objects(mut self, objects: impl IntoIterator<Item = Object>) -> Self {
        self.objects.extend(objects);
        self
    }

    /// Add an area light.
    pub fn light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }

    /// Set the background color.
    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Validate everything and freeze the scene.
    pub fn build(self) -> SceneResult<Scene> {
        self.camera.validate()?;

        if self.objects.is_empty() && self.lights.is_empty() {
            return Err(SceneError::EmptyScene);
        }
        for object in &self.objects {
            object.shape.validate()?;
        }
        if self.lights.is_empty() {
            log::warn!("Scene has no lights; only emissive objects will contribute");
        }

        log::debug!(
            "Built scene with {} objects and {} lights",
            self.objects.len(),
            self.lights.len()
        );

        Ok(Scene {
            objects: self.objects,
            lights: self.lights,
            camera: self.camera,
            background: self.background,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_math::{Sphere, Vec3};

    fn camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 200.0), -Vec3::Z, 0.75)
    }

    fn red() -> Color {
        Color::new(1.0, 0.0, 0.0, 1.0)
    }

    fn test_scene() -> Scene {
        Scene::builder(camera())
            .object(Object::sphere(Sphere::new(Vec3::ZERO, 20.0), red()))
            .object(Object::sphere(Sphere::new(Vec3::new(0.0, 0.0, -100.0), 20.0), red()))
            .light(
                Light::rectangle(
                    Vec3::new(-10.0, -10.0, 50.0),
                    Vec3::new(10.0, 10.0, 50.0),
                    Color::ONE,
                )
                .unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_nearest_hit_prefers_closest() {
        let scene = test_scene();

        // Light at z=50 is in front of both spheres
        let ray = Ray::new(Vec3::new(5.0, 2.0, 200.0), -Vec3::Z);
        let hit = scene.nearest_hit(&ray).unwrap();
        assert!(hit.entity.is_light(0));
        assert!((hit.intersection.t - 150.0).abs() < 1e-3);

        // Beside the light, the front sphere wins
        let ray = Ray::new(Vec3::new(0.0, 15.0, 200.0), -Vec3::Z);
        let hit = scene.nearest_hit(&ray).unwrap();
        assert!(matches!(hit.entity, HitEntity::Object { index: 0, .. }));
    }

    #[test]
    fn test_nearest_hit_miss() {
        let scene = test_scene();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 200.0), Vec3::Z);

        assert!(scene.nearest_hit(&ray).is_none());
    }

    #[test]
    fn test_nearest_hit_is_idempotent() {
        let scene = test_scene();
        let ray = Ray::new(Vec3::new(1.0, 15.0, 200.0), Vec3::new(0.0, -0.05, -1.0).normalize());

        let first = scene.nearest_hit(&ray).unwrap();
        let second = scene.nearest_hit(&ray).unwrap();
        assert_eq!(first.intersection, second.intersection);
        assert_eq!(first.entity.color(), second.entity.color());
        assert_eq!(
            matches!(first.entity, HitEntity::Object { index: 0, .. }),
            matches!(second.entity, HitEntity::Object { index: 0, .. })
        );
    }

    #[test]
    fn test_tie_keeps_first_inserted() {
        let green = Color::new(0.0, 1.0, 0.0, 1.0);
        let scene = Scene::builder(camera())
            .object(Object::sphere(Sphere::new(Vec3::ZERO, 20.0), red()))
            .object(Object::sphere(Sphere::new(Vec3::ZERO, 20.0), green))
            .build()
            .unwrap();

        let ray = Ray::new(Vec3::new(0.0, 0.0, 200.0), -Vec3::Z);
        let hit = scene.nearest_hit(&ray).unwrap();
        assert!(matches!(hit.entity, HitEntity::Object { index: 0, .. }));
        assert_eq!(hit.entity.color(), red());
    }

    #[test]
    fn test_build_rejects_empty_scene() {
        let result = Scene::builder(camera()).build();
        assert_eq!(result.err(), Some(SceneError::EmptyScene));
    }

    #[test]
    fn test_build_rejects_bad_camera() {
        let result = Scene::builder(camera().with_fov(180.0))
            .object(Object::sphere(Sphere::new(Vec3::ZERO, 1.0), red()))
            .build();
        assert_eq!(
            result.err(),
            Some(SceneError::Camera(CameraError::InvalidFov(180.0)))
        );
    }

    #[test]
    fn test_build_rejects_negative_radius() {
        let result = Scene::builder(camera())
            .object(Object::sphere(Sphere::new(Vec3::ZERO, -2.0), red()))
            .build();
        assert_eq!(result.err(), Some(SceneError::InvalidRadius(-2.0)));
    }

    #[test]
    fn test_builder_defaults() {
        let scene = Scene::builder(camera())
            .objects(vec![Object::sphere(Sphere::new(Vec3::ZERO, 1.0), red())])
            .build()
            .unwrap();

        assert_eq!(scene.background(), DEFAULT_BACKGROUND);
        assert_eq!(scene.objects().len(), 1);
        assert!(scene.lights().is_empty());
        assert_eq!(scene.camera().position, Vec3::new(0.0, 0.0, 200.0));
    }
}

//! Scene objects and area lights.
//!
//! Objects carry a flat RGBA color and an emissive flag. Lights are emissive
//! planar meshes whose axis-aligned bounds double as their sampling domain.

use umbra_math::{
    intersect_mesh, Hittable, Intersection, Plane, Ray, Sphere, Triangle, Vec3, Vec4,
};

use crate::scene::{SceneError, SceneResult};

/// RGBA color, unclamped.
pub type Color = Vec4;

/// Geometry of an [`Object`].
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    /// Triangle list, intersected as one surface
    Mesh(Vec<Triangle>),
    Plane(Plane),
}

impl Shape {
    /// Check the geometric preconditions for rendering.
    pub fn validate(&self) -> SceneResult<()> {
        match self {
            Shape::Sphere(sphere) => {
                let radius_ok = sphere.radius.is_finite() && sphere.radius > 0.0;
                if !radius_ok || !sphere.origin.is_finite() {
                    return Err(SceneError::InvalidRadius(sphere.radius));
                }
            }
            Shape::Mesh(triangles) => {
                if triangles.is_empty() {
                    return Err(SceneError::EmptyMesh);
                }
                if let Some(index) = triangles.iter().position(|tri| tri.normal().is_none()) {
                    return Err(SceneError::DegenerateTriangle(index));
                }
            }
            Shape::Plane(plane) => {
                let unit_normal = (plane.normal.length_squared() - 1.0).abs() <= 1e-4;
                if !unit_normal || !plane.position.is_finite() {
                    return Err(SceneError::DegeneratePlane);
                }
            }
        }
        Ok(())
    }
}

impl Hittable for Shape {
    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        match self {
            Shape::Sphere(sphere) => sphere.intersect(ray),
            Shape::Mesh(triangles) => intersect_mesh(triangles, ray),
            Shape::Plane(plane) => plane.intersect(ray),
        }
    }
}

/// A renderable object: geometry plus a flat diffuse color.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub shape: Shape,
    pub color: Color,
    pub is_emissive: bool,
}

impl Object {
    /// Create a new non-emissive object.
    pub fn new(shape: Shape, color: Color) -> Self {
        Self {
            shape,
            color,
            is_emissive: false,
        }
    }

    pub fn sphere(sphere: Sphere, color: Color) -> Self {
        Self::new(Shape::Sphere(sphere), color)
    }

    pub fn mesh(triangles: Vec<Triangle>, color: Color) -> Self {
        Self::new(Shape::Mesh(triangles), color)
    }

    /// Create a plane object. The normal is normalized here.
    pub fn plane(position: Vec3, normal: Vec3, color: Color) -> Self {
        Self::new(
            Shape::Plane(Plane::new(position, normal.normalize_or_zero())),
            color,
        )
    }

    /// Mark the object as emitting its color.
    pub fn emissive(mut self) -> Self {
        self.is_emissive = true;
        self
    }

    /// Emitted radiance: the color for emissive objects, black otherwise.
    pub fn emission(&self) -> Color {
        if self.is_emissive {
            self.color
        } else {
            Color::ZERO
        }
    }
}

impl Hittable for Object {
    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        self.shape.intersect(ray)
    }
}

/// An area light: an emissive planar mesh bounded by an axis-aligned box.
///
/// Points are sampled uniformly inside `[min_corner, max_corner]`, which is a
/// rectangle embedded in the mesh's plane (one axis has zero extent).
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    object: Object,
    min_corner: Vec3,
    max_corner: Vec3,
    area: f32,
}

/// Extent below which an axis counts as flat.
const FLAT_EXTENT: f32 = 1e-5;

impl Light {
    /// Build a light from an emissive mesh. Bounds and area come from the triangles.
    pub fn from_mesh(triangles: Vec<Triangle>, color: Color) -> SceneResult<Self> {
        Self::new(Object::mesh(triangles, color).emissive())
    }

    /// Build a light from an existing object, which must be an emissive mesh.
    pub fn new(object: Object) -> SceneResult<Self> {
        if !object.is_emissive {
            return Err(SceneError::NonEmissiveLight);
        }
        let Shape::Mesh(triangles) = &object.shape else {
            return Err(SceneError::LightNotMesh);
        };
        object.shape.validate()?;

        let (min_corner, max_corner) = triangles.iter().map(Triangle::bounds).fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(lo, hi), (min, max)| (lo.min(min), hi.max(max)),
        );
        let extent = max_corner - min_corner;
        if extent.min_element() > FLAT_EXTENT {
            return Err(SceneError::LightNotAxisAligned);
        }

        let area: f32 = triangles.iter().map(Triangle::area).sum();
        if area <= 0.0 {
            return Err(SceneError::DegenerateLight);
        }

        Ok(Self {
            object,
            min_corner,
            max_corner,
            area,
        })
    }

    /// Build an axis-aligned rectangular light from two opposite corners.
    ///
    /// Exactly one axis must be flat. The mesh normal points along that
    /// axis in the positive direction.
    pub fn rectangle(a: Vec3, b: Vec3, color: Color) -> SceneResult<Self> {
        let min = a.min(b);
        let max = a.max(b);
        let extent = max - min;

        let flat: Vec<usize> = (0..3).filter(|&axis| extent[axis] <= FLAT_EXTENT).collect();
        let &[normal_axis] = flat.as_slice() else {
            return Err(SceneError::DegenerateLight);
        };
        let i = (normal_axis + 1) % 3;
        let j = (normal_axis + 2) % 3;

        let mut c10 = min;
        c10[i] = max[i];
        let mut c01 = min;
        c01[j] = max[j];
        let mut c11 = max;
        c11[normal_axis] = min[normal_axis];

        Self::from_mesh(
            vec![Triangle::new(min, c10, c11), Triangle::new(min, c11, c01)],
            color,
        )
    }

    /// The underlying emissive object.
    pub fn object(&self) -> &Object {
        &self.object
    }

    /// Emitted radiance.
    pub fn color(&self) -> Color {
        self.object.color
    }

    pub fn min_corner(&self) -> Vec3 {
        self.min_corner
    }

    pub fn max_corner(&self) -> Vec3 {
        self.max_corner
    }

    /// Total surface area of the emitting mesh.
    pub fn area(&self) -> f32 {
        self.area
    }

    /// Map three uniform draws in `[0,1)` to a point in the sampling rectangle.
    pub fn sample_point(&self, xi: Vec3) -> Vec3 {
        self.min_corner + (self.max_corner - self.min_corner) * xi
    }
}

impl Hittable for Light {
    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        self.object.intersect(ray)
    }
}

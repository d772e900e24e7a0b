//! The built-in demo scene: an open box with three spheres and a ceiling light.

use umbra_core::{Color, Light, Object, Scene, SceneResult};
use umbra_math::{Camera, Sphere, Triangle, Vec3};

const SPHERE_COLOR: Color = Color::new(0.8, 0.4, 0.2, 1.0);
const WALL_COLOR: Color = Color::new(0.75, 0.75, 0.75, 1.0);
const LEFT_COLOR: Color = Color::new(0.75, 0.2, 0.2, 1.0);
const RIGHT_COLOR: Color = Color::new(0.2, 0.75, 0.2, 1.0);
const LIGHT_COLOR: Color = Color::ONE;

fn tri(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Triangle {
    Triangle::new(Vec3::from(a), Vec3::from(b), Vec3::from(c))
}

/// Camera at `(0, 50, 200)` looking down `-Z` with a 60 degree field of view.
pub fn demo_camera(aspect_ratio: f32) -> Camera {
    Camera::new(Vec3::new(0.0, 50.0, 200.0), -Vec3::Z, aspect_ratio)
}

/// Build the demo box. The box spans `x ∈ [-75, 75]`, `y ∈ [0, 75]` and
/// `z ∈ [-75, 0]` and is open towards the camera.
pub fn box_scene(aspect_ratio: f32) -> SceneResult<Scene> {
    let floor = vec![
        tri([-75.0, 0.0, 0.0], [-75.0, 0.0, -75.0], [75.0, 0.0, 0.0]),
        tri([75.0, 0.0, 0.0], [-75.0, 0.0, -75.0], [75.0, 0.0, -75.0]),
    ];
    let roof = vec![
        tri([-75.0, 75.0, 0.0], [-75.0, 75.0, -75.0], [75.0, 75.0, 0.0]),
        tri([75.0, 75.0, 0.0], [-75.0, 75.0, -75.0], [75.0, 75.0, -75.0]),
    ];
    let left = vec![
        tri([-75.0, 0.0, 0.0], [-75.0, 75.0, 0.0], [-75.0, 75.0, -75.0]),
        tri([-75.0, 0.0, 0.0], [-75.0, 0.0, -75.0], [-75.0, 75.0, -75.0]),
    ];
    let right = vec![
        tri([75.0, 0.0, 0.0], [75.0, 75.0, 0.0], [75.0, 75.0, -75.0]),
        tri([75.0, 0.0, 0.0], [75.0, 0.0, -75.0], [75.0, 75.0, -75.0]),
    ];
    let back = vec![
        tri([-75.0, 0.0, -75.0], [-75.0, 75.0, -75.0], [75.0, 75.0, -75.0]),
        tri([-75.0, 0.0, -75.0], [75.0, 0.0, -75.0], [75.0, 75.0, -75.0]),
    ];
    // Hangs just below the roof
    let light = vec![
        tri([-25.0, 74.0, 0.0], [-25.0, 74.0, -25.0], [25.0, 74.0, 0.0]),
        tri([25.0, 74.0, 0.0], [-25.0, 74.0, -25.0], [25.0, 74.0, -25.0]),
    ];

    Scene::builder(demo_camera(aspect_ratio))
        .objects([
            Object::sphere(Sphere::new(Vec3::new(30.0, 15.0, -20.0), 20.0), SPHERE_COLOR),
            Object::sphere(Sphere::new(Vec3::new(-30.0, 15.0, -30.0), 20.0), SPHERE_COLOR),
            Object::sphere(Sphere::new(Vec3::new(-75.0, 75.0, -75.0), 20.0), SPHERE_COLOR),
            Object::mesh(floor, WALL_COLOR),
            Object::mesh(roof, WALL_COLOR),
            Object::mesh(left, LEFT_COLOR),
            Object::mesh(right, RIGHT_COLOR),
            Object::mesh(back, WALL_COLOR),
        ])
        .light(Light::from_mesh(light, LIGHT_COLOR)?)
        .build()
}

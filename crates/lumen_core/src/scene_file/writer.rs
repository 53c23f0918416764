//! Scene file writer.

use std::fmt::Write as _;
use std::io;

use lumen_math::Vec3;

use crate::light::Light;
use crate::material::Material;
use crate::primitive::{Primitive, Shape};
use crate::scene::Scene;

/// Write every primitive (with its material) and every light, one per line.
pub fn write_scene(scene: &Scene, out: &mut impl io::Write) -> io::Result<()> {
    out.write_all(scene_to_string(scene).as_bytes())
}

/// Serialize a scene to its text form.
pub fn scene_to_string(scene: &Scene) -> String {
    let mut text = String::new();

    for (id, primitive) in scene.primitives() {
        match scene.material(primitive.material()) {
            Some(material) => {
                write_primitive(&mut text, primitive, material);
            }
            None => log::error!("Not saving primitive {:?}: its material is missing", id),
        }
    }

    for (_, light) in scene.lights() {
        write_light(&mut text, light);
    }

    text
}

fn write_primitive(text: &mut String, primitive: &Primitive, material: &Material) {
    text.push_str(primitive.type_name());
    push_vec3(text, primitive.position());

    match primitive.shape() {
        Shape::Sphere { radius } => push_f32(text, *radius),
        Shape::Plane { normal } => push_vec3(text, *normal),
        Shape::Polygon { vertices } => {
            for vertex in vertices {
                push_vec3(text, *vertex);
            }
        }
        Shape::Cube { half_size } => push_f32(text, *half_size),
    }

    text.push(' ');
    text.push_str(material.type_name());
    for field in material.to_record() {
        push_f32(text, field);
    }
    text.push('\n');
}

fn write_light(text: &mut String, light: &Light) {
    text.push_str(light.type_name());
    for v in [light.position, light.ambient, light.diffuse, light.specular] {
        push_vec3(text, v);
    }
    push_f32(text, light.power);
    text.push('\n');
}

fn push_vec3(text: &mut String, v: Vec3) {
    push_f32(text, v.x);
    push_f32(text, v.y);
    push_f32(text, v.z);
}

// `Display` for f32 prints the shortest text that parses back to the same value
fn push_f32(text: &mut String, value: f32) {
    let _ = write!(text, " {}", value);
}

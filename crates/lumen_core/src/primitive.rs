//! Geometric primitives placed in a scene.

use lumen_math::Vec3;

use crate::scene::MaterialId;

/// Shape of a primitive together with its editable parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Sphere centered on the primitive position.
    Sphere { radius: f32 },
    /// Infinite plane through the primitive position.
    Plane { normal: Vec3 },
    /// Triangle; vertices are offsets from the primitive position.
    Polygon { vertices: [Vec3; 3] },
    /// Axis-aligned cube centered on the primitive position.
    Cube { half_size: f32 },
}

impl Shape {
    /// Every type name understood by the scene file reader.
    pub const TYPE_NAMES: [&'static str; 4] = ["Sphere", "Plane", "Polygon", "Cube"];

    pub fn type_name(&self) -> &'static str {
        match self {
            Shape::Sphere { .. } => "Sphere",
            Shape::Plane { .. } => "Plane",
            Shape::Polygon { .. } => "Polygon",
            Shape::Cube { .. } => "Cube",
        }
    }
}

/// A primitive: a shape, where it sits, and what it is made of.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    name: String,
    position: Vec3,
    shape: Shape,
    material: MaterialId,
    /// Editor selection state; ignored by rendering
    pub selected: bool,
}

impl Primitive {
    pub fn new(shape: Shape, material: MaterialId) -> Self {
        Self {
            name: String::new(),
            position: Vec3::ZERO,
            shape,
            material,
            selected: false,
        }
    }

    pub fn sphere(radius: f32, material: MaterialId) -> Self {
        Self::new(Shape::Sphere { radius }, material)
    }

    pub fn plane(normal: Vec3, material: MaterialId) -> Self {
        Self::new(Shape::Plane { normal }, material)
    }

    pub fn polygon(vertices: [Vec3; 3], material: MaterialId) -> Self {
        Self::new(Shape::Polygon { vertices }, material)
    }

    pub fn cube(half_size: f32, material: MaterialId) -> Self {
        Self::new(Shape::Cube { half_size }, material)
    }

    /// Give the primitive an explicit display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Mutable access to the shape parameter for editing.
    pub fn shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Material changes go through [`crate::Scene::set_primitive_material`]
    /// so the handle is always validated.
    pub(crate) fn set_material(&mut self, material: MaterialId) {
        self.material = material;
    }

    /// Type label ("Sphere", "Plane", ...).
    pub fn type_name(&self) -> &'static str {
        self.shape.type_name()
    }
}

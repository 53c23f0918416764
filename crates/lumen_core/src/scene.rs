//! Scene container for Lumen.
//!
//! The scene owns every material, primitive and light in slot maps and hands
//! out versioned keys. Callers keep keys instead of references, so an entity
//! removed from the scene can never be reached through a stale pointer; its
//! key simply stops resolving, even after the slot is reused.

use std::collections::HashMap;

use lumen_math::{Interval, Ray, Vec3};
use slotmap::{new_key_type, Key, SlotMap};
use thiserror::Error;

use crate::geometry::SurfaceHit;
use crate::light::Light;
use crate::material::Material;
use crate::primitive::Primitive;

new_key_type! {
    /// Key of a material owned by a [`Scene`].
    pub struct MaterialId;
    /// Key of a primitive owned by a [`Scene`].
    pub struct PrimitiveId;
    /// Key of a light owned by a [`Scene`].
    pub struct LightId;
}

/// Minimum ray parameter accepted as a hit, to avoid self-intersection acne.
pub const HIT_EPSILON: f32 = 0.001;

/// Errors from scene edits.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("material {0:?} does not exist in this scene")]
    UnknownMaterial(MaterialId),

    #[error("primitive {0:?} does not exist in this scene")]
    UnknownPrimitive(PrimitiveId),

    #[error("material {material:?} is still used by {users} primitive(s)")]
    MaterialInUse { material: MaterialId, users: usize },
}

/// Record of a ray-scene intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Surface normal at intersection (always points against the ray)
    pub normal: Vec3,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    /// Material at the intersection point
    pub material: &'a Material,
    /// Primitive that was hit
    pub primitive: PrimitiveId,
}

impl<'a> HitRecord<'a> {
    fn new(ray: &Ray, hit: SurfaceHit, material: &'a Material, primitive: PrimitiveId) -> Self {
        // If the ray and normal point in the same direction, we're inside
        let front_face = ray.direction().dot(hit.outward_normal) < 0.0;
        let normal = if front_face {
            hit.outward_normal
        } else {
            -hit.outward_normal
        };

        Self {
            t: hit.t,
            point: hit.point,
            normal,
            front_face,
            material,
            primitive,
        }
    }

    /// The surface normal pointing out of the surface, regardless of ray side.
    pub fn outward_normal(&self) -> Vec3 {
        if self.front_face {
            self.normal
        } else {
            -self.normal
        }
    }
}

/// A collection of materials, placed primitives and lights.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    materials: SlotMap<MaterialId, Material>,
    primitives: SlotMap<PrimitiveId, Primitive>,
    lights: SlotMap<LightId, Light>,
    // Insertion order, for enumeration and stable scene files
    material_order: Vec<MaterialId>,
    primitive_order: Vec<PrimitiveId>,
    light_order: Vec<LightId>,
    /// Per-type counters for generated display names
    name_counters: HashMap<&'static str, u32>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Materials
    // =========================================================================

    /// Add a material and return its handle.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = self.materials.insert(material);
        self.material_order.push(id);
        id
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    /// Remove a material that no primitive references any more.
    pub fn remove_material(&mut self, id: MaterialId) -> Result<Material, SceneError> {
        let users = self
            .primitives
            .iter()
            .filter(|(_, p)| p.material() == id)
            .count();
        if users > 0 {
            return Err(SceneError::MaterialInUse { material: id, users });
        }
        let material = self.materials.remove(id).ok_or(SceneError::UnknownMaterial(id))?;
        self.material_order.retain(|&m| m != id);
        Ok(material)
    }

    /// Materials in insertion order.
    pub fn materials(&self) -> impl Iterator<Item = (MaterialId, &Material)> + '_ {
        ordered(&self.material_order, &self.materials)
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    // =========================================================================
    // Primitives
    // =========================================================================

    /// Place a primitive at `position` and return its handle.
    ///
    /// Fails if the primitive references a material that is not in this scene.
    /// Primitives without a name get a generated one ("Sphere 1", "Cube 3", ...).
    pub fn add_primitive(&mut self, position: Vec3, mut primitive: Primitive) -> Result<PrimitiveId, SceneError> {
        if !self.materials.contains_key(primitive.material()) {
            return Err(SceneError::UnknownMaterial(primitive.material()));
        }

        primitive.set_position(position);
        if primitive.name().is_empty() {
            let name = self.next_name(primitive.type_name());
            primitive.set_name(name);
        }

        let id = self.primitives.insert(primitive);
        self.primitive_order.push(id);
        log::debug!("Added primitive {:?}", id);
        Ok(id)
    }

    pub fn remove_primitive(&mut self, id: PrimitiveId) -> Option<Primitive> {
        let primitive = self.primitives.remove(id)?;
        self.primitive_order.retain(|&p| p != id);
        Some(primitive)
    }

    pub fn primitive(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(id)
    }

    /// Mutable access for editing position, shape or selection.
    pub fn primitive_mut(&mut self, id: PrimitiveId) -> Option<&mut Primitive> {
        self.primitives.get_mut(id)
    }

    /// Point a primitive at another material.
    pub fn set_primitive_material(&mut self, id: PrimitiveId, material: MaterialId) -> Result<(), SceneError> {
        if !self.materials.contains_key(material) {
            return Err(SceneError::UnknownMaterial(material));
        }
        let primitive = self
            .primitives
            .get_mut(id)
            .ok_or(SceneError::UnknownPrimitive(id))?;
        primitive.set_material(material);
        Ok(())
    }

    /// Primitives in insertion order.
    pub fn primitives(&self) -> impl Iterator<Item = (PrimitiveId, &Primitive)> + '_ {
        ordered(&self.primitive_order, &self.primitives)
    }

    /// Primitives with their selection flag set.
    pub fn selected_primitives(&self) -> impl Iterator<Item = (PrimitiveId, &Primitive)> + '_ {
        self.primitives().filter(|(_, p)| p.selected)
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    // =========================================================================
    // Lights
    // =========================================================================

    /// Place a light at `position` and return its handle.
    pub fn add_light(&mut self, position: Vec3, mut light: Light) -> LightId {
        light.position = position;
        if light.name.is_empty() {
            light.name = self.next_name(light.type_name());
        }
        let id = self.lights.insert(light);
        self.light_order.push(id);
        id
    }

    pub fn remove_light(&mut self, id: LightId) -> Option<Light> {
        let light = self.lights.remove(id)?;
        self.light_order.retain(|&l| l != id);
        Some(light)
    }

    pub fn light(&self, id: LightId) -> Option<&Light> {
        self.lights.get(id)
    }

    pub fn light_mut(&mut self, id: LightId) -> Option<&mut Light> {
        self.lights.get_mut(id)
    }

    /// Lights in insertion order.
    pub fn lights(&self) -> impl Iterator<Item = (LightId, &Light)> + '_ {
        ordered(&self.light_order, &self.lights)
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Remove everything. Old keys stop resolving and name counters keep counting.
    pub fn clear(&mut self) {
        self.primitives.clear();
        self.lights.clear();
        self.materials.clear();
        self.primitive_order.clear();
        self.light_order.clear();
        self.material_order.clear();
    }

    fn next_name(&mut self, type_name: &'static str) -> String {
        let counter = self.name_counters.entry(type_name).or_insert(0);
        *counter += 1;
        format!("{} {}", type_name, counter)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Closest hit along the ray with t > [`HIT_EPSILON`].
    pub fn intersect(&self, ray: &Ray) -> Option<HitRecord<'_>> {
        self.intersect_in(ray, Interval::new(HIT_EPSILON, f32::INFINITY))
    }

    /// Closest hit along the ray inside `ray_t`.
    ///
    /// # Panics
    ///
    /// Panics if a primitive references a material missing from the scene.
    /// `add_primitive`, `set_primitive_material` and `remove_material` keep
    /// that from happening.
    pub fn intersect_in(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        if !ray.is_valid() {
            return None;
        }

        let mut closest: Option<(PrimitiveId, &Primitive, SurfaceHit)> = None;
        let mut closest_so_far = ray_t.max;

        for (id, primitive) in self.primitives() {
            if let Some(hit) = primitive.intersect(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = hit.t;
                closest = Some((id, primitive, hit));
            }
        }

        closest.map(|(id, primitive, hit)| {
            let material = self.materials.get(primitive.material()).unwrap_or_else(|| {
                panic!(
                    "primitive {:?} references missing material {:?}",
                    id,
                    primitive.material()
                )
            });
            HitRecord::new(ray, hit, material, id)
        })
    }
}

fn ordered<'a, K: Key, V>(order: &'a [K], map: &'a SlotMap<K, V>) -> impl Iterator<Item = (K, &'a V)> + 'a {
    order.iter().filter_map(move |&key| map.get(key).map(|value| (key, value)))
}

//! Scene file reader.

use std::str::SplitWhitespace;

use lumen_math::Vec3;

use super::{LineError, LoadReport};
use crate::light::Light;
use crate::material::Material;
use crate::primitive::{Primitive, Shape};
use crate::scene::Scene;

/// Number of fields on a light line.
const LIGHT_FIELDS: usize = 13;

/// A fully parsed line, ready to be added to a scene.
enum Entity {
    Primitive {
        position: Vec3,
        shape: Shape,
        material: Material,
    },
    Light {
        position: Vec3,
        light: Light,
    },
}

/// Parse scene text and add its entities to `scene`.
///
/// Blank lines and `#` comments are ignored. Lines that fail to parse are
/// logged, recorded in the report and skipped.
pub fn load_scene_from_str(content: &str, scene: &mut Scene) -> LoadReport {
    load_scene_from_bytes(content.as_bytes(), scene)
}

/// Like [`load_scene_from_str`], but decodes each line on its own so a line
/// that is not valid UTF-8 is skipped instead of failing the whole file.
pub fn load_scene_from_bytes(content: &[u8], scene: &mut Scene) -> LoadReport {
    let mut report = LoadReport::default();

    for (index, raw) in content.split(|&b| b == b'\n').enumerate() {
        let line = index + 1;
        let text = match std::str::from_utf8(raw) {
            Ok(text) => text,
            Err(_) => {
                let err = LineError::InvalidUtf8 { line };
                log::warn!("Skipping scene line: {}", err);
                report.skipped.push(err);
                continue;
            }
        };

        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_line(line, trimmed) {
            Ok(Entity::Primitive {
                position,
                shape,
                material,
            }) => {
                let material = scene.add_material(material);
                match scene.add_primitive(position, Primitive::new(shape, material)) {
                    Ok(id) => report.primitives.push(id),
                    // The material was created just above, so this cannot fail
                    Err(err) => log::error!("line {}: {}", line, err),
                }
            }
            Ok(Entity::Light { position, light }) => {
                report.lights.push(scene.add_light(position, light));
            }
            Err(err) => {
                log::warn!("Skipping scene line: {}", err);
                report.skipped.push(err);
            }
        }
    }

    report
}

fn parse_line(line: usize, text: &str) -> Result<Entity, LineError> {
    let mut tokens = text.split_whitespace();
    let type_token = tokens.next().unwrap_or_default();

    if type_token == "Light" {
        return parse_light(line, tokens);
    }

    let (entity, shape_fields): (&'static str, usize) = match type_token {
        "Sphere" => ("Sphere", 1),
        "Plane" => ("Plane", 3),
        "Polygon" => ("Polygon", 9),
        "Cube" => ("Cube", 1),
        other => {
            return Err(LineError::UnknownType {
                line,
                token: other.to_string(),
            })
        }
    };

    let fields = take_numbers(line, entity, &mut tokens, 3 + shape_fields)?;
    let position = vec3(&fields[0..3]);
    let params = &fields[3..];

    let shape = match entity {
        "Sphere" => Shape::Sphere { radius: params[0] },
        "Plane" => Shape::Plane {
            normal: vec3(&params[0..3]),
        },
        "Polygon" => Shape::Polygon {
            vertices: [vec3(&params[0..3]), vec3(&params[3..6]), vec3(&params[6..9])],
        },
        _ => Shape::Cube {
            half_size: params[0],
        },
    };

    let material = parse_material(line, entity, tokens)?;
    Ok(Entity::Primitive {
        position,
        shape,
        material,
    })
}

fn parse_light(line: usize, mut tokens: SplitWhitespace<'_>) -> Result<Entity, LineError> {
    let fields = take_numbers(line, "Light", &mut tokens, LIGHT_FIELDS)?;
    if let Some(extra) = tokens.next() {
        return Err(LineError::TrailingTokens {
            line,
            token: extra.to_string(),
        });
    }

    let light = Light::new(
        vec3(&fields[3..6]),
        vec3(&fields[6..9]),
        vec3(&fields[9..12]),
        fields[12],
    );
    Ok(Entity::Light {
        position: vec3(&fields[0..3]),
        light,
    })
}

fn parse_material(line: usize, entity: &'static str, mut tokens: SplitWhitespace<'_>) -> Result<Material, LineError> {
    let type_name = tokens
        .next()
        .ok_or(LineError::MissingMaterial { line, entity })?;

    let fields = tokens
        .map(|token| parse_number(line, token))
        .collect::<Result<Vec<_>, _>>()?;

    Material::from_record(type_name, &fields).map_err(|source| LineError::Material { line, source })
}

fn take_numbers(
    line: usize,
    entity: &'static str,
    tokens: &mut SplitWhitespace<'_>,
    count: usize,
) -> Result<Vec<f32>, LineError> {
    let raw: Vec<&str> = tokens.take(count).collect();
    if raw.len() < count {
        return Err(LineError::MissingFields {
            line,
            entity,
            expected: count,
            found: raw.len(),
        });
    }
    raw.into_iter().map(|token| parse_number(line, token)).collect()
}

fn parse_number(line: usize, token: &str) -> Result<f32, LineError> {
    token
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| LineError::InvalidNumber {
            line,
            token: token.to_string(),
        })
}

fn vec3(fields: &[f32]) -> Vec3 {
    Vec3::new(fields[0], fields[1], fields[2])
}

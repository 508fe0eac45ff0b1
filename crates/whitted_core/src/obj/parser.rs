//! Line-level parsing for OBJ-style scene files and MTL-style material
//! libraries.
//!
//! # Supported Syntax
//!
//! Scene files:
//!
//! - `mtllib <path>`, `usemtl <name>`
//! - `v x y z`, `vt u [v [w]]`, `vn x y z`
//! - `f a b c ...` where each entry is `v`, `v/t`, `v//n` or `v/t/n`
//! - `S cx cy cz radius` (sphere)
//! - `P px py pz r g b` (point light)
//!
//! Material libraries:
//!
//! - `newmtl <name>`
//! - `Ka`, `Kd`, `Ks`, `Ke` with three reals
//! - `Ns`, `Ni` with one real
//! - `al` with three reals (diffuse, reflective, refractive weights)
//!
//! Lines whose first token starts with `#` are comments.

use thiserror::Error;
use whitted_math::Vec3;

use crate::scene::Material;

/// Errors that can occur while parsing scene or material text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid number format at line {line}: {token:?}")]
    InvalidNumber { line: usize, token: String },

    #[error("Index {index} at line {line} is out of range ({len} elements defined)")]
    IndexOutOfRange { line: usize, index: i64, len: usize },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// A tokenized, non-empty, non-comment line.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement<'a> {
    /// 1-based line number in the source text
    pub line: usize,
    pub keyword: &'a str,
    pub args: Vec<&'a str>,
}

impl<'a> Statement<'a> {
    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::Parse {
            line: self.line,
            message: message.into(),
        }
    }

    /// Require at least `count` arguments.
    pub fn expect_args(&self, count: usize) -> ParseResult<()> {
        if self.args.len() < count {
            return Err(self.error(format!(
                "'{}' expects {} arguments, found {}",
                self.keyword,
                count,
                self.args.len()
            )));
        }
        Ok(())
    }

    /// The single name argument of `mtllib`, `usemtl` and `newmtl`.
    pub fn name(&self) -> ParseResult<&'a str> {
        self.expect_args(1)?;
        Ok(self.args[0])
    }

    /// Parse argument `index` as a real number.
    pub fn real(&self, index: usize) -> ParseResult<f64> {
        let token = self
            .args
            .get(index)
            .ok_or_else(|| {
                self.error(format!("'{}' is missing argument {}", self.keyword, index + 1))
            })?;
        parse_real(token, self.line)
    }

    /// Parse three reals starting at argument `start`.
    pub fn vector(&self, start: usize) -> ParseResult<Vec3> {
        Ok(Vec3::new(
            self.real(start)?,
            self.real(start + 1)?,
            self.real(start + 2)?,
        ))
    }

    /// Parse up to three reals, padding missing components with zero.
    pub fn padded_vector(&self) -> ParseResult<Vec3> {
        if self.args.is_empty() {
            return Err(self.error(format!("'{}' expects at least one argument", self.keyword)));
        }
        let mut components = [0.0; 3];
        for (i, token) in self.args.iter().take(3).enumerate() {
            components[i] = parse_real(token, self.line)?;
        }
        Ok(Vec3::from_array(components))
    }

    /// Parse every argument as a face vertex reference.
    pub fn face_vertices(&self) -> ParseResult<Vec<FaceVertex>> {
        self.args
            .iter()
            .map(|token| FaceVertex::parse(token, self.line))
            .collect()
    }
}

/// Split text into statements, dropping blank lines and comments.
pub fn statements(content: &str) -> impl Iterator<Item = Statement<'_>> {
    content.lines().enumerate().filter_map(|(i, line)| {
        let mut tokens = line.split([' ', '\t']).filter(|t| !t.is_empty());
        let keyword = tokens.next()?;
        if keyword.starts_with('#') {
            return None;
        }
        Some(Statement {
            line: i + 1,
            keyword,
            args: tokens.collect(),
        })
    })
}

fn parse_real(token: &str, line: usize) -> ParseResult<f64> {
    token.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
        line,
        token: token.to_string(),
    })
}

fn parse_index(token: &str, line: usize) -> ParseResult<i64> {
    if token.is_empty() {
        return Ok(0);
    }
    token.parse::<i64>().map_err(|_| ParseError::InvalidNumber {
        line,
        token: token.to_string(),
    })
}

/// One `v/t/n` entry of a face. Missing components are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaceVertex {
    pub vertex: i64,
    pub texture: i64,
    pub normal: i64,
}

impl FaceVertex {
    /// Parse `v`, `v/t`, `v//n` or `v/t/n`.
    pub fn parse(token: &str, line: usize) -> ParseResult<Self> {
        let mut parts = token.split('/');
        let vertex = parse_index(parts.next().unwrap_or(""), line)?;
        let texture = parse_index(parts.next().unwrap_or(""), line)?;
        let normal = parse_index(parts.next().unwrap_or(""), line)?;
        if parts.next().is_some() {
            return Err(ParseError::Parse {
                line,
                message: format!("face vertex {:?} has more than three components", token),
            });
        }
        Ok(Self {
            vertex,
            texture,
            normal,
        })
    }
}

/// Resolve a 1-based, possibly negative index into `items`.
///
/// `0` is the "not given" sentinel and yields the zero vector; negative
/// indices count back from the end of the list defined so far.
pub fn resolve_index(index: i64, items: &[Vec3], line: usize) -> ParseResult<Vec3> {
    let position = match index {
        0 => return Ok(Vec3::ZERO),
        i if i > 0 => i - 1,
        i => items.len() as i64 + i,
    };
    usize::try_from(position)
        .ok()
        .and_then(|p| items.get(p))
        .copied()
        .ok_or(ParseError::IndexOutOfRange {
            line,
            index,
            len: items.len(),
        })
}

/// Parse a material library.
///
/// Materials are returned in declaration order. A repeated `newmtl` name
/// continues editing the earlier material.
pub fn parse_materials(content: &str) -> ParseResult<Vec<Material>> {
    let mut materials: Vec<Material> = Vec::new();
    let mut current: Option<usize> = None;

    for statement in statements(content) {
        if statement.keyword == "newmtl" {
            let name = statement.name()?;
            let index = match materials.iter().position(|m| m.name == name) {
                Some(index) => index,
                None => {
                    materials.push(Material {
                        name: name.to_string(),
                        ..Default::default()
                    });
                    materials.len() - 1
                }
            };
            current = Some(index);
            continue;
        }

        let known = matches!(statement.keyword, "Ka" | "Kd" | "Ks" | "Ke" | "Ns" | "Ni" | "al");
        if !known {
            log::debug!(
                "Ignoring material keyword '{}' at line {}",
                statement.keyword,
                statement.line
            );
            continue;
        }

        let material = match current {
            Some(index) => &mut materials[index],
            None => {
                return Err(statement.error(format!(
                    "'{}' appears before any newmtl",
                    statement.keyword
                )))
            }
        };

        match statement.keyword {
            "Ka" => material.ambient_color = statement.vector(0)?,
            "Kd" => material.diffuse_color = statement.vector(0)?,
            "Ks" => material.specular_color = statement.vector(0)?,
            "Ke" => material.intensity = statement.vector(0)?,
            "Ns" => material.specular_exponent = statement.real(0)?,
            "Ni" => material.refraction_index = statement.real(0)?,
            "al" => material.albedo = statement.vector(0)?.to_array(),
            _ => unreachable!("filtered above"),
        }
    }

    Ok(materials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_skip_comments_and_blanks() {
        let text = "# header\n\nv 1 2 3\n  \t \n#no-space comment\nvn\t0 1  0\n";
        let parsed: Vec<_> = statements(text).collect();

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].line, 3);
        assert_eq!(parsed[0].keyword, "v");
        assert_eq!(parsed[0].args, vec!["1", "2", "3"]);
        assert_eq!(parsed[1].line, 6);
        assert_eq!(parsed[1].args, vec!["0", "1", "0"]);
    }

    #[test]
    fn test_face_vertex_forms() {
        assert_eq!(
            FaceVertex::parse("3", 1).unwrap(),
            FaceVertex { vertex: 3, texture: 0, normal: 0 }
        );
        assert_eq!(
            FaceVertex::parse("3/4", 1).unwrap(),
            FaceVertex { vertex: 3, texture: 4, normal: 0 }
        );
        assert_eq!(
            FaceVertex::parse("3//5", 1).unwrap(),
            FaceVertex { vertex: 3, texture: 0, normal: 5 }
        );
        assert_eq!(
            FaceVertex::parse("-1/-2/-3", 1).unwrap(),
            FaceVertex { vertex: -1, texture: -2, normal: -3 }
        );
        assert!(FaceVertex::parse("1/2/3/4", 7).is_err());
        assert!(matches!(
            FaceVertex::parse("x", 7),
            Err(ParseError::InvalidNumber { line: 7, .. })
        ));
    }

    #[test]
    fn test_resolve_index() {
        let items = vec![Vec3::X, Vec3::Y, Vec3::Z];

        assert_eq!(resolve_index(0, &items, 1).unwrap(), Vec3::ZERO);
        assert_eq!(resolve_index(1, &items, 1).unwrap(), Vec3::X);
        assert_eq!(resolve_index(3, &items, 1).unwrap(), Vec3::Z);
        assert_eq!(resolve_index(-1, &items, 1).unwrap(), Vec3::Z);
        assert_eq!(resolve_index(-3, &items, 1).unwrap(), Vec3::X);

        assert_eq!(
            resolve_index(4, &items, 9),
            Err(ParseError::IndexOutOfRange { line: 9, index: 4, len: 3 })
        );
        assert!(resolve_index(-4, &items, 9).is_err());
    }

    #[test]
    fn test_padded_vector() {
        let statement = statements("vt 0.5 0.25").next().unwrap();
        assert_eq!(statement.padded_vector().unwrap(), Vec3::new(0.5, 0.25, 0.0));
    }

    #[test]
    fn test_vector_requires_three_components() {
        let statement = statements("Kd 1 0").next().unwrap();
        assert!(matches!(statement.vector(0), Err(ParseError::Parse { line: 1, .. })));
    }

    #[test]
    fn test_parse_materials() {
        let text = "\
# library
newmtl glass
Ka 0 0 0
Kd 0.1 0.2 0.3
Ks 1 1 1
Ns 125
Ni 1.5
al 0 0.2 0.8

newmtl lamp
Ke 4 4 4
";
        let materials = parse_materials(text).unwrap();
        assert_eq!(materials.len(), 2);

        let glass = &materials[0];
        assert_eq!(glass.name, "glass");
        assert_eq!(glass.diffuse_color, Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(glass.specular_color, Vec3::ONE);
        assert_eq!(glass.specular_exponent, 125.0);
        assert_eq!(glass.refraction_index, 1.5);
        assert_eq!(glass.albedo, [0.0, 0.2, 0.8]);

        let lamp = &materials[1];
        assert_eq!(lamp.intensity, Vec3::splat(4.0));
        assert_eq!(lamp.albedo, [1.0, 0.0, 0.0]);
        assert!(lamp.is_emissive());
    }

    #[test]
    fn test_material_property_before_newmtl() {
        assert!(matches!(
            parse_materials("Kd 1 1 1\n"),
            Err(ParseError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_repeated_newmtl_continues_material() {
        let materials = parse_materials("newmtl a\nKd 1 0 0\nnewmtl b\nnewmtl a\nNi 2\n").unwrap();
        assert_eq!(materials.len(), 2);
        assert_eq!(materials[0].diffuse_color, Vec3::X);
        assert_eq!(materials[0].refraction_index, 2.0);
    }

    #[test]
    fn test_unknown_material_keywords_ignored() {
        let materials = parse_materials("newmtl a\nillum 2\nd 1.0\n").unwrap();
        assert_eq!(materials.len(), 1);
    }
}

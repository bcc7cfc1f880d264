//! Level description parser and writer
//!
//! The format is line oriented:
//!
//! ```text
//! #level-0,"spawn_p1"
//! 1,14,2,"ground"
//! 8,10,-1,"MovableSaw",8,4
//! 3,13,-1,"FrontPalm1",1.5
//! ```
//!
//! A header opens a level. Data lines are `grid_x,grid_y,sprite,"tag"`; a
//! negative sprite index marks a special object whose tag selects the extra
//! fields that follow. A blank line ends the description.

use std::path::Path;

use glam::Vec2;
use thiserror::Error;

use super::level::LevelTemplate;
use super::object::ObjectRegistry;
use super::tile::Tile;
use crate::settings::SessionConfig;

const HEADER_PREFIX: &str = "#level-";
const BASE_FIELDS: usize = 4;

/// Reasons a level description fails to load
#[derive(Debug, Error)]
pub enum LevelLoadError {
    #[error("failed to read level description: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: level data before any `#level-` header")]
    MissingHeader { line: usize },
    #[error("line {line}: malformed level header `{text}`")]
    MalformedHeader { line: usize, text: String },
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: field {field} is not a valid number: `{value}`")]
    InvalidNumber {
        line: usize,
        field: usize,
        value: String,
    },
    #[error("line {line}: field {field} must be a quoted string")]
    UnquotedField { line: usize, field: usize },
    #[error("line {line}: unknown object type `{tag}`")]
    UnknownObject { line: usize, tag: String },
    #[error("line {line}: movable saw destination equals its start")]
    DegeneratePath { line: usize },
    #[error("description contains no playable (non-spawn) levels")]
    EmptyCatalog,
}

/// All level templates from one description
#[derive(Debug, Clone, PartialEq)]
pub struct LevelCatalog {
    /// Random pool for streaming
    pub levels: Vec<LevelTemplate>,
    /// Round-start levels, `spawn_p<N>` per player count
    pub spawn_levels: Vec<LevelTemplate>,
}

impl LevelCatalog {
    /// Parse a level description sized for `config`
    pub fn parse(text: &str, config: &SessionConfig) -> Result<Self, LevelLoadError> {
        let tile_size = config.tile_size();
        let registry = ObjectRegistry::standard(config.scale, tile_size);
        let mut parsed: Vec<LevelTemplate> = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let raw = raw.trim_end_matches('\r');
            if raw.trim().is_empty() {
                break;
            }

            if let Some(rest) = raw.strip_prefix(HEADER_PREFIX) {
                parsed.push(parse_header(rest, raw, line)?);
                continue;
            }

            let Some(level) = parsed.last_mut() else {
                return Err(LevelLoadError::MissingHeader { line });
            };

            let fields: Vec<&str> = raw.split(',').map(str::trim).collect();
            if fields.len() < BASE_FIELDS {
                return Err(LevelLoadError::FieldCount {
                    line,
                    expected: BASE_FIELDS,
                    found: fields.len(),
                });
            }
            let grid = Vec2::new(
                parse_number(fields[0], line, 1)?,
                parse_number(fields[1], line, 2)?,
            );
            let sprite_index: i32 = parse_number(fields[2], line, 3)?;
            let tag = unquote(fields[3]).ok_or(LevelLoadError::UnquotedField { line, field: 4 })?;

            if sprite_index >= 0 {
                expect_fields(&fields, BASE_FIELDS, line)?;
                level.tiles.push(Tile::new(grid, sprite_index, tag, tile_size));
                continue;
            }

            let (Some(object), Some(extras)) =
                (registry.spawn(tag), registry.extra_field_count(tag))
            else {
                return Err(LevelLoadError::UnknownObject {
                    line,
                    tag: tag.to_string(),
                });
            };
            expect_fields(&fields, BASE_FIELDS + extras, line)?;

            let object = object.at(grid, tile_size);
            let object = match extras {
                2 => {
                    let destination = (
                        parse_number(fields[4], line, 5)?,
                        parse_number(fields[5], line, 6)?,
                    );
                    object
                        .with_path(destination, tile_size)
                        .ok_or(LevelLoadError::DegeneratePath { line })?
                }
                1 => object.with_size_multiplier(parse_number(fields[4], line, 5)?),
                _ => object,
            };
            level.objects.push(object);
        }

        log::info!("Loaded {} levels", parsed.len());

        let (spawn_levels, levels): (Vec<_>, Vec<_>) =
            parsed.into_iter().partition(LevelTemplate::is_spawn);
        if levels.is_empty() {
            return Err(LevelLoadError::EmptyCatalog);
        }
        log::debug!(
            "Catalog: {} playable levels, {} spawn levels",
            levels.len(),
            spawn_levels.len()
        );

        Ok(Self {
            levels,
            spawn_levels,
        })
    }

    /// Read and parse a level description file
    pub fn load_file(path: impl AsRef<Path>, config: &SessionConfig) -> Result<Self, LevelLoadError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, config)
    }

    /// Spawn templates for a round with `player_count` players
    pub fn spawn_templates(&self, player_count: usize) -> impl Iterator<Item = &LevelTemplate> {
        let prefix = format!("spawn_p{player_count}");
        self.spawn_levels
            .iter()
            .filter(move |template| template.params.starts_with(&prefix))
    }

    /// Serialize the catalog back into the description format
    ///
    /// Spawn levels come first, then the random pool.
    pub fn to_description(&self) -> String {
        let mut out = String::new();
        let all = self.spawn_levels.iter().chain(&self.levels);
        for (index, template) in all.enumerate() {
            out.push_str(&format!("{HEADER_PREFIX}{index},\"{}\"\n", template.params));
            for tile in &template.tiles {
                out.push_str(&format!(
                    "{},{},{},\"{}\"\n",
                    tile.grid.x, tile.grid.y, tile.sprite_index, tile.tile_type
                ));
            }
            for object in &template.objects {
                out.push_str(&format!(
                    "{},{},-1,\"{}\"",
                    object.grid.x, object.grid.y, object.tag
                ));
                for extra in object.extra_fields() {
                    out.push(',');
                    out.push_str(&extra);
                }
                out.push('\n');
            }
        }
        out
    }
}

fn parse_header(rest: &str, raw: &str, line: usize) -> Result<LevelTemplate, LevelLoadError> {
    let malformed = || LevelLoadError::MalformedHeader {
        line,
        text: raw.to_string(),
    };
    let (index, params) = rest.split_once(',').ok_or_else(malformed)?;
    index.trim().parse::<u32>().map_err(|_| malformed())?;
    let params = unquote(params.trim()).ok_or(LevelLoadError::UnquotedField { line, field: 2 })?;
    Ok(LevelTemplate::new(params))
}

fn unquote(field: &str) -> Option<&str> {
    field
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
}

fn parse_number<T: std::str::FromStr>(value: &str, line: usize, field: usize) -> Result<T, LevelLoadError> {
    value.parse().map_err(|_| LevelLoadError::InvalidNumber {
        line,
        field,
        value: value.to_string(),
    })
}

fn expect_fields(fields: &[&str], expected: usize, line: usize) -> Result<(), LevelLoadError> {
    if fields.len() == expected {
        Ok(())
    } else {
        Err(LevelLoadError::FieldCount {
            line,
            expected,
            found: fields.len(),
        })
    }
}

//! Font lookup for text rasterisation.

use crate::error::{RenderError, RenderResult};
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use polydraw_core::FontSpec;
use rusttype::Font;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FontKey {
    family: String,
    bold: bool,
    italic: bool,
}

impl From<&FontSpec> for FontKey {
    fn from(spec: &FontSpec) -> Self {
        Self {
            family: spec.family.clone(),
            bold: spec.bold,
            italic: spec.italic,
        }
    }
}

/// Where a surface gets its glyphs from.
#[derive(Default)]
pub enum FontBook {
    /// No font: text is measured with a fixed advance and not drawn.
    #[default]
    None,
    /// One face used for every [`FontSpec`].
    Fixed(Font<'static>),
    /// Installed fonts, matched by family, weight and style.
    System {
        db: Database,
        cache: RefCell<HashMap<FontKey, Option<Font<'static>>>>,
    },
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontBook::None => write!(f, "FontBook::None"),
            FontBook::Fixed(_) => write!(f, "FontBook::Fixed"),
            FontBook::System { db, .. } => write!(f, "FontBook::System({} faces)", db.len()),
        }
    }
}

impl FontBook {
    pub fn from_bytes(bytes: Vec<u8>) -> RenderResult<Self> {
        Font::try_from_vec(bytes)
            .map(FontBook::Fixed)
            .ok_or_else(|| RenderError::Font("not a TrueType or OpenType font".to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        log::info!("Loaded font {}", path.display());
        Self::from_bytes(bytes)
    }

    /// Index the fonts installed on this machine.
    pub fn system() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        log::debug!("Indexed {} system font faces", db.len());
        FontBook::System {
            db,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, FontBook::None)
    }

    /// The face to draw `spec` with, if any.
    pub fn resolve(&self, spec: &FontSpec) -> Option<Font<'static>> {
        match self {
            FontBook::None => None,
            FontBook::Fixed(font) => Some(font.clone()),
            FontBook::System { db, cache } => cache
                .borrow_mut()
                .entry(FontKey::from(spec))
                .or_insert_with(|| {
                    let found = query_system(db, spec);
                    if found.is_none() {
                        log::warn!("No installed font matches '{}'", spec.family);
                    }
                    found
                })
                .clone(),
        }
    }
}

fn query_system(db: &Database, spec: &FontSpec) -> Option<Font<'static>> {
    let families = match spec.family.trim() {
        "" | "sans-serif" | "Sans" => vec![Family::SansSerif],
        "serif" | "Serif" => vec![Family::Serif],
        "monospace" | "Monospace" => vec![Family::Monospace],
        other => vec![Family::Name(other), Family::SansSerif],
    };
    let query = Query {
        families: &families,
        weight: if spec.bold { Weight::BOLD } else { Weight::NORMAL },
        stretch: Stretch::Normal,
        style: if spec.italic { Style::Italic } else { Style::Normal },
    };
    let id = db.query(&query)?;
    db.with_face_data(id, |data, index| Font::try_from_vec_and_index(data.to_vec(), index))
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_bytes_rejected() {
        assert!(matches!(FontBook::from_bytes(vec![0; 16]), Err(RenderError::Font(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            FontBook::from_file("/definitely/not/here.ttf"),
            Err(RenderError::Io(_))
        ));
    }

    #[test]
    fn test_none_resolves_nothing() {
        let book = FontBook::default();
        assert!(book.is_none());
        assert!(book.resolve(&FontSpec::default()).is_none());
    }
}

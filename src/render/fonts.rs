use crate::config::FontsConfig;
use crate::foundation::error::{ReelError, ReelResult};
use crate::layout::measure::{FixedAdvance, FontSpec, TextMeasure};
use anyhow::Context;
use std::collections::{HashMap, HashSet};
use std::hash::Hasher;
use std::path::Path;
use std::sync::Arc;
use xxhash_rust::xxh3::Xxh3;

const SHAPE_CACHE_LIMIT: usize = 4096;

struct FontFace {
    family_key: String,
    family_name: String,
    weight: u16,
    data: vello_cpu::peniko::FontData,
}

/// Glyphs of one shaped string, positioned relative to the baseline start.
#[derive(Debug)]
pub struct ShapedText {
    pub glyphs: Vec<vello_cpu::Glyph>,
    pub width: f64,
}

/// Registered font faces plus Parley contexts for measuring and shaping.
///
/// Faces come from configured files and directories; with system fonts enabled, unknown
/// families are looked up through the system font database on first use. Requests that
/// resolve to no face measure with [`FixedAdvance`] and draw no glyphs.
pub struct FontBook {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    faces: Vec<FontFace>,
    resolved: HashMap<(String, u16), Option<usize>>,
    system: Option<usvg::fontdb::Database>,
    system_enabled: bool,
    shape_cache: HashMap<u64, Arc<ShapedText>>,
    warned: HashSet<String>,
    fallback: FixedAdvance,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl FontBook {
    /// Empty book without system font lookup.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: Vec::new(),
            resolved: HashMap::new(),
            system: None,
            system_enabled: false,
            shape_cache: HashMap::new(),
            warned: HashSet::new(),
            fallback: FixedAdvance::default(),
        }
    }

    pub fn from_config(cfg: &FontsConfig) -> ReelResult<Self> {
        let mut book = Self::new();
        book.system_enabled = cfg.system_fonts;
        for path in &cfg.files {
            book.register_file(path)?;
        }
        for dir in &cfg.dirs {
            book.register_dir(dir)?;
        }
        tracing::debug!(faces = book.faces.len(), "font book ready");
        Ok(book)
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Register every face contained in a font file's bytes.
    pub fn register_bytes(&mut self, bytes: Vec<u8>) -> ReelResult<usize> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let blob = vello_cpu::peniko::Blob::from(bytes);
        let mut added = 0usize;
        for (family_id, infos) in families {
            let family_name = self
                .font_ctx
                .collection
                .family_name(family_id)
                .ok_or_else(|| ReelError::validation("registered font family has no name"))?
                .to_string();
            for info in infos {
                self.faces.push(FontFace {
                    family_key: family_name.to_lowercase(),
                    family_name: family_name.clone(),
                    weight: info.weight().value().round().clamp(1.0, 1000.0) as u16,
                    data: vello_cpu::peniko::FontData::new(blob.clone(), info.index()),
                });
                added += 1;
            }
        }
        if added == 0 {
            return Err(ReelError::validation("no font faces found in font data"));
        }
        self.resolved.clear();
        Ok(added)
    }

    pub fn register_file(&mut self, path: &Path) -> ReelResult<usize> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        self.register_bytes(bytes)
    }

    /// Register every `.ttf`, `.otf` and `.ttc` below `dir`.
    pub fn register_dir(&mut self, dir: &Path) -> ReelResult<usize> {
        let mut added = 0usize;
        let mut stack = vec![dir.to_path_buf()];
        while let Some(d) = stack.pop() {
            let entries =
                std::fs::read_dir(&d).with_context(|| format!("read font dir '{}'", d.display()))?;
            for entry in entries {
                let path = entry.context("read font dir entry")?.path();
                if path.is_dir() {
                    stack.push(path);
                    continue;
                }
                let is_font = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"));
                if !is_font {
                    continue;
                }
                match self.register_file(&path) {
                    Ok(n) => added += n,
                    Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping font"),
                }
            }
        }
        Ok(added)
    }

    fn resolve(&mut self, spec: &FontSpec) -> Option<usize> {
        let key = (spec.family.to_lowercase(), spec.weight);
        if let Some(hit) = self.resolved.get(&key) {
            return *hit;
        }

        let mut found = nearest_face(&self.faces, Some(&key.0), spec.weight);
        if found.is_none() && self.system_enabled {
            found = self.load_system_face(spec);
        }
        if found.is_none() {
            found = nearest_face(&self.faces, None, spec.weight);
            if self.warned.insert(spec.family.clone()) {
                match found {
                    Some(i) => tracing::warn!(
                        family = %spec.family,
                        substitute = %self.faces[i].family_name,
                        "font family not registered; substituting"
                    ),
                    None => tracing::warn!(
                        family = %spec.family,
                        "no font faces available; text measured with fixed advance and not drawn"
                    ),
                }
            }
        }

        self.resolved.insert(key, found);
        found
    }

    fn load_system_face(&mut self, spec: &FontSpec) -> Option<usize> {
        let db = self.system.get_or_insert_with(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            db
        });
        let families = [usvg::fontdb::Family::Name(&spec.family)];
        let query = usvg::fontdb::Query {
            families: &families,
            weight: usvg::fontdb::Weight(spec.weight),
            ..Default::default()
        };
        let id = db.query(&query)?;
        let bytes = db.with_face_data(id, |data, _index| data.to_vec())?;
        let before = self.faces.len();
        if let Err(e) = self.register_bytes(bytes) {
            tracing::warn!(family = %spec.family, error = %e, "system font failed to load");
            return None;
        }
        let key = spec.family.to_lowercase();
        nearest_face(&self.faces[before..], Some(&key), spec.weight).map(|i| before + i)
    }

    /// Shape `text` with the face resolved for `spec`.
    ///
    /// `letter_spacing` is in em. Returns `None` when no face is available.
    pub fn shape(
        &mut self,
        spec: &FontSpec,
        text: &str,
        letter_spacing: f32,
    ) -> Option<(vello_cpu::peniko::FontData, Arc<ShapedText>)> {
        let face_i = self.resolve(spec)?;
        let spacing_px = letter_spacing * spec.size;

        let mut h = Xxh3::new();
        h.write_usize(face_i);
        h.write(text.as_bytes());
        h.write_u32(spec.size.to_bits());
        h.write_u32(spacing_px.to_bits());
        let cache_key = h.finish();

        let data = self.faces[face_i].data.clone();
        if let Some(hit) = self.shape_cache.get(&cache_key) {
            return Some((data, hit.clone()));
        }

        let face = &self.faces[face_i];
        let family_name = face.family_name.clone();
        let weight = face.weight;
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(spec.size));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(weight)),
        ));
        if spacing_px != 0.0 {
            builder.push_default(parley::style::StyleProperty::LetterSpacing(spacing_px));
        }
        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        for line in layout.lines() {
            let baseline = line.metrics().baseline;
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y - baseline,
                }));
            }
        }
        let shaped = Arc::new(ShapedText {
            glyphs,
            width: f64::from(layout.width()),
        });

        if self.shape_cache.len() >= SHAPE_CACHE_LIMIT {
            self.shape_cache.clear();
        }
        self.shape_cache.insert(cache_key, shaped.clone());
        Some((data, shaped))
    }
}

impl TextMeasure for FontBook {
    fn base_width(&mut self, text: &str, font: &FontSpec) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        match self.shape(font, text, 0.0) {
            Some((_, shaped)) => shaped.width,
            None => self.fallback.base_width(text, font),
        }
    }
}

/// Closest weight among faces of `family` (any family when `None`).
fn nearest_face(faces: &[FontFace], family: Option<&str>, weight: u16) -> Option<usize> {
    faces
        .iter()
        .enumerate()
        .filter(|(_, f)| family.is_none_or(|k| f.family_key == k))
        .min_by_key(|(_, f)| f.weight.abs_diff(weight))
        .map(|(i, _)| i)
}

#[cfg(test)]
#[path = "../../tests/unit/render/fonts.rs"]
mod tests;

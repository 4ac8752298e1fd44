use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use aster_graph::{GpuMesh, GpuTexture, GraphError, MeshData};

use crate::item::GameItem;

/// Horizontal placement of one glyph inside a single-row font atlas, in
/// pixels.
#[derive(Debug, Clone, Copy)]
pub struct GlyphInfo {
    pub start_x: f32,
    pub width: f32,
}

/// Metrics for a single-row font atlas: per-glyph columns plus the atlas
/// dimensions. Building the atlas pixels is the caller's concern; the scene
/// only needs the layout to emit geometry.
#[derive(Debug, Clone)]
pub struct FontSheet {
    glyphs: HashMap<char, GlyphInfo>,
    pub width: f32,
    pub height: f32,
}

impl FontSheet {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            glyphs: HashMap::new(),
            width,
            height,
        }
    }

    pub fn add_glyph(&mut self, ch: char, info: GlyphInfo) {
        self.glyphs.insert(ch, info);
    }

    pub fn glyph(&self, ch: char) -> Option<&GlyphInfo> {
        self.glyphs.get(&ch)
    }
}

/// Emits one textured quad per character, pen advancing left to right, the
/// baseline row at y = atlas height. Coordinates are screen pixels with a
/// top-left origin; normals are omitted since text is drawn unlit.
pub fn build_text_mesh(text: &str, sheet: &FontSheet) -> MeshData {
    let mut data = MeshData::default();
    let mut pen = 0.0f32;

    for ch in text.chars() {
        let Some(glyph) = sheet.glyph(ch) else {
            debug!("no glyph for {ch:?}, skipping");
            continue;
        };
        let base = data.vertex_count() as u32;
        let left = glyph.start_x / sheet.width;
        let right = (glyph.start_x + glyph.width) / sheet.width;

        // Top-left, bottom-left, bottom-right, top-right.
        data.positions.extend_from_slice(&[
            pen, 0.0, 0.0, //
            pen, sheet.height, 0.0, //
            pen + glyph.width, sheet.height, 0.0, //
            pen + glyph.width, 0.0, 0.0,
        ]);
        data.tex_coords.extend_from_slice(&[
            left, 0.0, //
            left, 1.0, //
            right, 1.0, //
            right, 0.0,
        ]);
        data.indices.extend_from_slice(&[base, base + 1, base + 2, base + 3, base, base + 2]);

        pen += glyph.width;
    }
    data
}

/// A font sheet together with its uploaded atlas texture. Every text mesh
/// generation shares the one texture.
#[derive(Clone)]
pub struct FontAtlas {
    sheet: FontSheet,
    texture: Arc<GpuTexture>,
}

impl FontAtlas {
    pub fn new(sheet: FontSheet, texture: Arc<GpuTexture>) -> Self {
        Self { sheet, texture }
    }

    pub fn sheet(&self) -> &FontSheet {
        &self.sheet
    }

    pub fn texture(&self) -> &Arc<GpuTexture> {
        &self.texture
    }
}

/// A HUD string. Geometry is rebuilt through the supplied closure whenever
/// the text changes; the old mesh's buffers are freed while the font atlas
/// texture, shared by every generation of the mesh, stays alive until the
/// owning HUD releases the item.
pub struct TextItem {
    item: GameItem<GpuMesh>,
    text: String,
    sheet: FontSheet,
    build: Box<dyn FnMut(&MeshData) -> Result<Arc<GpuMesh>, GraphError>>,
}

impl TextItem {
    pub fn new(
        text: impl Into<String>,
        sheet: FontSheet,
        mut build: Box<dyn FnMut(&MeshData) -> Result<Arc<GpuMesh>, GraphError>>,
    ) -> Result<Self, GraphError> {
        let text = text.into();
        let mesh = build(&build_text_mesh(&text, &sheet))?;
        Ok(Self {
            item: GameItem::new(mesh),
            text,
            sheet,
            build,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) -> Result<(), GraphError> {
        if text == self.text {
            return Ok(());
        }
        let mesh = (self.build)(&build_text_mesh(text, &self.sheet))?;
        let old = self.item.set_mesh(mesh);
        old.release_buffers();
        self.text = text.to_owned();
        Ok(())
    }

    pub fn item(&self) -> &GameItem<GpuMesh> {
        &self.item
    }

    pub fn item_mut(&mut self) -> &mut GameItem<GpuMesh> {
        &mut self.item
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> FontSheet {
        let mut sheet = FontSheet::new(22.0, 16.0);
        sheet.add_glyph('A', GlyphInfo { start_x: 0.0, width: 10.0 });
        sheet.add_glyph('B', GlyphInfo { start_x: 10.0, width: 12.0 });
        sheet
    }

    #[test]
    fn each_character_emits_one_quad() {
        let data = build_text_mesh("AB", &sheet());
        assert_eq!(data.vertex_count(), 8);
        assert_eq!(data.indices.len(), 12);
        assert!(data.validate().is_ok());
    }

    #[test]
    fn pen_advances_by_glyph_width() {
        let data = build_text_mesh("AB", &sheet());
        // Second quad's top-left x is the width of 'A'.
        assert_eq!(data.positions[4 * 3], 10.0);
        // And it ends at 10 + 12.
        assert_eq!(data.positions[6 * 3], 22.0);
    }

    #[test]
    fn tex_coords_are_normalised_atlas_columns() {
        let data = build_text_mesh("B", &sheet());
        assert!((data.tex_coords[0] - 10.0 / 22.0).abs() < 1e-6);
        assert!((data.tex_coords[4] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn unknown_characters_are_skipped() {
        let data = build_text_mesh("A?B", &sheet());
        assert_eq!(data.vertex_count(), 8);
    }

    // Clearing a string must rebuild into geometry the upload path accepts,
    // so the new empty mesh can replace the old one.
    #[test]
    fn cleared_text_builds_uploadable_empty_geometry() {
        let data = build_text_mesh("", &sheet());
        assert_eq!(data.vertex_count(), 0);
        assert!(data.indices.is_empty());
        assert!(data.validate().is_ok());

        // Same for text consisting only of unknown glyphs.
        let unknown = build_text_mesh("??", &sheet());
        assert_eq!(unknown.vertex_count(), 0);
        assert!(unknown.validate().is_ok());
    }
}

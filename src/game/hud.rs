//! Demo overlay: a status line of text and a compass needle that tracks the
//! camera yaw.

use std::fs;
use std::sync::Arc;

use anyhow::Context;
use glam::Vec4;
use log::warn;

use aster_graph::{GpuMesh, GraphError, MaterialDesc, MeshData};
use aster_render::Renderer;
use aster_scene::{FontAtlas, FontSheet, GameItem, GlyphInfo, Hud, TextItem};

use crate::game::primitives;

const TEXT_SIZE_PX: f32 = 32.0;
const COMPASS_SIZE_PX: f32 = 40.0;

/// Candidate font files, tried in order. The first entry lets a bundled
/// font override whatever the system provides.
const FONT_PATHS: &[&str] = &[
    "assets/font.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
];

pub struct DemoHud {
    text: Option<TextItem>,
    compass: GameItem<GpuMesh>,
}

impl DemoHud {
    pub fn new(renderer: &Renderer) -> anyhow::Result<Self> {
        let compass_material = renderer.create_material(
            MaterialDesc::coloured(Vec4::new(0.9, 0.15, 0.15, 1.0), 0.0),
            None,
        );
        let compass_mesh = Arc::new(
            renderer.upload_mesh(&primitives::compass_arrow(), compass_material)?,
        );
        let mut compass = GameItem::new(compass_mesh);
        compass.set_scale(COMPASS_SIZE_PX);

        // A missing font degrades the HUD to compass-only rather than
        // aborting startup.
        let text = match build_text_item(renderer) {
            Ok(text) => Some(text),
            Err(err) => {
                warn!("HUD text disabled: {err:#}");
                None
            }
        };

        Ok(Self { text, compass })
    }

    /// Repositions the items for the given surface size, in pixels: status
    /// line in the bottom-left corner, compass in the top-right.
    pub fn layout(&mut self, width: u32, height: u32) {
        if let Some(text) = &mut self.text {
            text.item_mut().set_position(10.0, height as f32 - 50.0, 0.0);
        }
        self.compass.set_position(width as f32 - 40.0, 50.0, 0.0);
    }

    /// The needle mirrors the camera: at yaw 0 it points away from the
    /// viewer's facing, hence the half-turn offset.
    pub fn set_compass_rotation(&mut self, yaw_degrees: f32) {
        self.compass.set_rotation(0.0, 0.0, 180.0 + yaw_degrees);
    }

    pub fn set_status_text(&mut self, status: &str) -> Result<(), GraphError> {
        if let Some(text) = &mut self.text {
            text.set_text(status)?;
        }
        Ok(())
    }
}

impl Hud for DemoHud {
    fn items(&self) -> Vec<&GameItem<GpuMesh>> {
        let mut items = Vec::new();
        if let Some(text) = &self.text {
            items.push(text.item());
        }
        items.push(&self.compass);
        items
    }
}

fn build_text_item(renderer: &Renderer) -> anyhow::Result<TextItem> {
    let bytes = load_font_bytes().context("no usable font file found")?;
    let font = fontdue::Font::from_bytes(bytes.as_slice(), fontdue::FontSettings::default())
        .map_err(|err| anyhow::anyhow!("parsing font: {err}"))?;

    let (sheet, width, height, pixels) = rasterise_atlas(&font, TEXT_SIZE_PX);
    let texture = Arc::new(renderer.create_texture(width, height, &pixels)?);
    let atlas = FontAtlas::new(sheet, texture);

    let uploader = renderer.uploader();
    let colour = MaterialDesc::coloured(Vec4::new(1.0, 1.0, 1.0, 1.0), 0.0);
    let sheet = atlas.sheet().clone();
    let build = Box::new(move |data: &MeshData| -> Result<Arc<GpuMesh>, GraphError> {
        let material = uploader.create_material(colour, Some(Arc::clone(atlas.texture())));
        Ok(Arc::new(uploader.upload_mesh(data, material)?))
    });

    Ok(TextItem::new("aster", sheet, build)?)
}

fn load_font_bytes() -> Option<Vec<u8>> {
    FONT_PATHS.iter().find_map(|path| fs::read(path).ok())
}

/// Rasterises the printable ASCII range into a single-row atlas: white
/// pixels with glyph coverage in the alpha channel.
fn rasterise_atlas(font: &fontdue::Font, px: f32) -> (FontSheet, u32, u32, Vec<u8>) {
    let (ascent, descent) = font
        .horizontal_line_metrics(px)
        .map(|m| (m.ascent, m.descent))
        .unwrap_or((px, -px * 0.25));
    let height = (ascent - descent).ceil() as u32;
    let baseline = ascent.ceil() as i32;

    struct Raster {
        ch: char,
        metrics: fontdue::Metrics,
        coverage: Vec<u8>,
        start: u32,
        cell: u32,
    }

    let mut rasters = Vec::new();
    let mut atlas_width = 0u32;
    for byte in b' '..=b'~' {
        let ch = char::from(byte);
        let (metrics, coverage) = font.rasterize(ch, px);
        let cell = (metrics.advance_width.max(metrics.width as f32)).ceil() as u32 + 1;
        rasters.push(Raster {
            ch,
            metrics,
            coverage,
            start: atlas_width,
            cell,
        });
        atlas_width += cell;
    }

    let mut pixels = vec![0u8; (atlas_width * height * 4) as usize];
    let mut sheet = FontSheet::new(atlas_width as f32, height as f32);
    for raster in &rasters {
        let x0 = raster.start as i32 + raster.metrics.xmin;
        let y0 = baseline - raster.metrics.ymin - raster.metrics.height as i32;
        for row in 0..raster.metrics.height {
            for col in 0..raster.metrics.width {
                let x = x0 + col as i32;
                let y = y0 + row as i32;
                if x < 0 || y < 0 || x >= atlas_width as i32 || y >= height as i32 {
                    continue;
                }
                let alpha = raster.coverage[row * raster.metrics.width + col];
                let idx = ((y as u32 * atlas_width + x as u32) * 4) as usize;
                pixels[idx] = 0xff;
                pixels[idx + 1] = 0xff;
                pixels[idx + 2] = 0xff;
                pixels[idx + 3] = pixels[idx + 3].max(alpha);
            }
        }
        sheet.add_glyph(
            raster.ch,
            GlyphInfo {
                start_x: raster.start as f32,
                width: (raster.cell - 1) as f32,
            },
        );
    }

    (sheet, atlas_width, height, pixels)
}

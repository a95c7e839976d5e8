#![warn(clippy::pedantic)]

use ab_glyph::{Font as _, FontVec, GlyphId, PxScale, ScaleFont as _};
use log::debug;
use mountfs_asset::{Asset, AssetError, AssetLoader, Result};
use mountfs_image::Image;

pub mod atlas;

const FALLBACK_CODEPOINT: char = '?';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSettings {
    /// Pixel height glyphs are rasterized at
    pub size: u32,
    pub codepoints: Vec<char>,
    /// Empty pixels around each glyph in the atlas
    pub padding: u32,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            size: 32,
            codepoints: (' '..='~').collect(),
            padding: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphInfo {
    pub codepoint: char,
    /// Location of the glyph in the atlas
    pub rect: Rect,
    /// Offset from the pen position to the left edge of the glyph
    pub offset_x: i32,
    /// Offset from the top of the line to the top edge of the glyph
    pub offset_y: i32,
    pub advance_x: i32,
}

/// Glyphs rasterized into an atlas image.
#[derive(Debug, Clone)]
pub struct Font {
    base_size: u32,
    glyph_padding: u32,
    glyphs: Vec<GlyphInfo>,
    atlas: Image,
}

struct Bitmap {
    width: u32,
    height: u32,
    coverage: Vec<u8>,
    offset_x: i32,
    offset_y: i32,
    advance_x: i32,
}

impl Font {
    /// Rasterizes the requested glyphs of a font file and packs them into an atlas
    ///
    /// # Errors
    ///
    /// Will return an error if the format is not supported or if the font
    /// cannot be parsed
    pub fn from_memory(
        extension: &str,
        file_content: &[u8],
        settings: &FontSettings,
    ) -> Result<Self> {
        if !matches!(extension, "ttf" | "otf") {
            return Err(AssetError::UnsupportedFormat(extension.into()));
        }

        let font = FontVec::try_from_vec(file_content.to_vec())
            .map_err(|e| AssetError::DecodingFailed(e.to_string()))?;
        #[allow(clippy::cast_precision_loss)]
        let scale = PxScale::from(settings.size as f32);

        let bitmaps: Vec<Bitmap> = settings
            .codepoints
            .iter()
            .map(|&codepoint| rasterize(&font, scale, font.glyph_id(codepoint)))
            .collect();
        let sizes: Vec<(u32, u32)> = bitmaps.iter().map(|b| (b.width, b.height)).collect();
        let packing = atlas::pack(&sizes, settings.padding);

        let mut pixels = vec![0u8; packing.width as usize * packing.height as usize * 4];
        let mut glyphs = Vec::with_capacity(bitmaps.len());
        for ((&codepoint, bitmap), &(x, y)) in settings
            .codepoints
            .iter()
            .zip(&bitmaps)
            .zip(&packing.positions)
        {
            blit(&mut pixels, packing.width, bitmap, x, y);
            glyphs.push(GlyphInfo {
                codepoint,
                rect: Rect {
                    x,
                    y,
                    width: bitmap.width,
                    height: bitmap.height,
                },
                offset_x: bitmap.offset_x,
                offset_y: bitmap.offset_y,
                advance_x: bitmap.advance_x,
            });
        }

        debug!(
            "Rasterized {} glyphs into a {}x{} atlas",
            glyphs.len(),
            packing.width,
            packing.height
        );
        Ok(Self {
            base_size: settings.size,
            glyph_padding: settings.padding,
            glyphs,
            atlas: Image::from_rgba8(packing.width, packing.height, pixels)?,
        })
    }

    #[must_use]
    pub fn base_size(&self) -> u32 {
        self.base_size
    }

    #[must_use]
    pub fn glyph_padding(&self) -> u32 {
        self.glyph_padding
    }

    #[must_use]
    pub fn glyphs(&self) -> &[GlyphInfo] {
        &self.glyphs
    }

    #[must_use]
    pub fn atlas(&self) -> &Image {
        &self.atlas
    }

    /// Looks up a glyph, falling back to `'?'` for codepoints that weren't rasterized
    #[must_use]
    pub fn glyph(&self, codepoint: char) -> Option<&GlyphInfo> {
        self.glyphs
            .iter()
            .find(|glyph| glyph.codepoint == codepoint)
            .or_else(|| {
                self.glyphs
                    .iter()
                    .find(|glyph| glyph.codepoint == FALLBACK_CODEPOINT)
            })
    }

    /// Width in pixels of a single line of text at the base size
    #[must_use]
    pub fn measure_text(&self, text: &str) -> i32 {
        text.chars()
            .filter_map(|codepoint| self.glyph(codepoint))
            .map(|glyph| glyph.advance_x)
            .sum()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rasterize(font: &FontVec, scale: PxScale, id: GlyphId) -> Bitmap {
    let scaled = font.as_scaled(scale);
    let advance_x = scaled.h_advance(id).round() as i32;
    let Some(outline) = font.outline_glyph(id.with_scale(scale)) else {
        return Bitmap {
            width: 0,
            height: 0,
            coverage: vec![],
            offset_x: 0,
            offset_y: 0,
            advance_x,
        };
    };

    let bounds = outline.px_bounds();
    let width = bounds.width() as u32;
    let height = bounds.height() as u32;
    let mut coverage = vec![0u8; width as usize * height as usize];
    outline.draw(|x, y, c| {
        if x < width && y < height {
            coverage[(y * width + x) as usize] = (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
    });

    Bitmap {
        width,
        height,
        coverage,
        offset_x: bounds.min.x as i32,
        offset_y: (bounds.min.y + scaled.ascent()).round() as i32,
        advance_x,
    }
}

/// Copies a glyph bitmap as white pixels whose alpha is the coverage
fn blit(pixels: &mut [u8], atlas_width: u32, bitmap: &Bitmap, x: u32, y: u32) {
    for row in 0..bitmap.height {
        for column in 0..bitmap.width {
            let alpha = bitmap.coverage[(row * bitmap.width + column) as usize];
            let offset = (((y + row) * atlas_width + x + column) * 4) as usize;
            pixels[offset..offset + 4].copy_from_slice(&[0xff, 0xff, 0xff, alpha]);
        }
    }
}

impl Asset for Font {
    type Loader = FontLoader;
}

pub struct FontLoader;
impl AssetLoader<Font> for FontLoader {
    type Settings = FontSettings;

    fn load(file_content: &[u8], extension: &str, settings: &FontSettings) -> Result<Font> {
        Font::from_memory(extension, file_content, settings)
    }
}

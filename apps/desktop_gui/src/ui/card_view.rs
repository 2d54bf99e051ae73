//! Stateless rendering of a single drawn card.

use eframe::egui;
use egui::TextureHandle;

pub const CARD_SIZE: egui::Vec2 = egui::vec2(113.0, 157.0);
const CARD_DECODE_MAX_EDGE: u32 = 512;

/// Decoded RGBA pixels of a card face, ready to become a texture on the UI thread.
#[derive(Clone)]
pub struct CardImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for CardImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl CardImage {
    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied([self.width, self.height], &self.rgba)
    }
}

pub fn decode_card_image(bytes: &[u8]) -> Result<CardImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    // `thumbnail` fits to the bound in both directions, so only shrink.
    let resized = if dynamic.width() > CARD_DECODE_MAX_EDGE
        || dynamic.height() > CARD_DECODE_MAX_EDGE
    {
        dynamic
            .thumbnail(CARD_DECODE_MAX_EDGE, CARD_DECODE_MAX_EDGE)
            .to_rgba8()
    } else {
        dynamic.to_rgba8()
    };
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(CardImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}

/// One card face at a display position. Shows a spinner until the image
/// texture is available.
pub struct CardView<'a> {
    image_url: &'a str,
    position: usize,
    texture: Option<&'a TextureHandle>,
}

impl<'a> CardView<'a> {
    pub fn new(image_url: &'a str, position: usize, texture: Option<&'a TextureHandle>) -> Self {
        Self {
            image_url,
            position,
            texture,
        }
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        egui::Frame::new()
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .corner_radius(egui::CornerRadius::same(6))
            .inner_margin(egui::Margin::symmetric(4, 4))
            .show(ui, |ui| match self.texture {
                Some(texture) => ui.add(egui::Image::new(texture).fit_to_exact_size(CARD_SIZE)),
                None => ui.add_sized(CARD_SIZE, egui::Spinner::new()),
            })
            .inner
            .on_hover_text(format!("Playing card #{} ({})", self.position, self.image_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_png(width: u32, height: u32) -> Vec<u8> {
        let pixels = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(pixels)
            .write_to(&mut out, image::ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    #[test]
    fn decodes_png_card_faces() {
        let decoded = decode_card_image(&encode_png(4, 6)).expect("decode");
        assert_eq!((decoded.width, decoded.height), (4, 6));
        assert_eq!(decoded.rgba.len(), 4 * 6 * 4);
        assert_eq!(&decoded.rgba[..4], &[200, 10, 10, 255]);
    }

    #[test]
    fn regular_card_faces_keep_their_size() {
        let decoded = decode_card_image(&encode_png(226, 314)).expect("decode");
        assert_eq!((decoded.width, decoded.height), (226, 314));
    }

    #[test]
    fn oversized_faces_are_scaled_down() {
        let decoded = decode_card_image(&encode_png(1024, 64)).expect("decode");
        assert_eq!(decoded.width as u32, CARD_DECODE_MAX_EDGE);
        assert!(decoded.height < 64);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(decode_card_image(b"definitely not an image").is_err());
    }
}

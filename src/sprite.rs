use image::imageops::FilterType;

use crate::error::FetchError;
use crate::fetch::PokeApi;

const THUMB_W: u32 = 48;
const THUMB_H: u32 = 48;

/// Compact RGB thumbnail kept in memory for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteThumb {
    pub w: u32,
    pub h: u32,
    /// RGB pixels in row-major order (len = w*h*3)
    pub pixels: Vec<u8>,
}

impl SpriteThumb {
    /// Decode image bytes into a thumbnail. Transparent pixels are
    /// composited over black so they blend into the terminal.
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let img = image::load_from_memory(bytes)?;
        let small = image::imageops::resize(&img.to_rgba8(), THUMB_W, THUMB_H, FilterType::Lanczos3);
        let mut pixels = Vec::with_capacity((THUMB_W * THUMB_H * 3) as usize);
        for p in small.pixels() {
            let a = p[3] as u16;
            pixels.push((p[0] as u16 * a / 255) as u8);
            pixels.push((p[1] as u16 * a / 255) as u8);
            pixels.push((p[2] as u16 * a / 255) as u8);
        }
        Ok(Self {
            w: THUMB_W,
            h: THUMB_H,
            pixels,
        })
    }

    /// Pixel rows sized `w` x `h`, resampled from the thumbnail when the
    /// size differs.
    pub fn rows(&self, w: u32, h: u32) -> Vec<Vec<(u8, u8, u8)>> {
        if self.w == w && self.h == h {
            return self
                .pixels
                .chunks(3 * w as usize)
                .map(|row| row.chunks(3).map(|c| (c[0], c[1], c[2])).collect())
                .collect();
        }

        let mut buf = image::RgbImage::new(self.w, self.h);
        for (i, px) in buf.pixels_mut().enumerate() {
            let idx = i * 3;
            *px = image::Rgb([self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]);
        }
        let resized = image::imageops::resize(&buf, w.max(1), h.max(1), FilterType::Lanczos3);
        resized
            .rows()
            .map(|row| row.map(|p| (p[0], p[1], p[2])).collect())
            .collect()
    }
}

pub async fn fetch_sprite(api: &PokeApi, url: &str) -> Result<SpriteThumb, FetchError> {
    let bytes = api.fetch_bytes(url).await?;
    SpriteThumb::decode(&bytes).map_err(|source| FetchError::Image {
        url: url.to_string(),
        source,
    })
}

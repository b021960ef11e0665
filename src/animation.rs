//! Animated PNG recording and HTML embedding.
//!
//! Frames are pulled from a render callback one at a time and streamed into
//! an in-memory APNG, which is then embedded in a self-contained HTML page as
//! a base64 `data:` URI. Nothing touches the filesystem until
//! [`Animation::write_html`], so a failed frame never leaves a partial file.

use std::fs;
use std::path::Path;

use base64::Engine;

use crate::error::{Error, Result};

/// APNG play count; 1 plays the sequence once and stops on the last frame.
const PLAY_ONCE: u32 = 1;

#[derive(Clone, Debug)]
pub struct Animation {
    name: String,
    frames: usize,
    width: usize,
    height: usize,
    interval_ms: u16,
    png: Vec<u8>,
}

impl Animation {
    /// Render `frame_count` frames of `width x height` RGBA through `render`
    /// and encode them with `interval_ms` between frames.
    pub fn record<F>(
        name: &str,
        frame_count: usize,
        width: usize,
        height: usize,
        interval_ms: u16,
        render: F,
    ) -> Result<Self>
    where
        F: Fn(usize, &mut Vec<u8>),
    {
        if frame_count == 0 {
            return Err(Error::EmptyAnimation { name: name.to_string() });
        }

        let mut png_buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_buf, width as u32, height as u32);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            encoder.set_compression(png::Compression::Fast);
            encoder.set_animated(frame_count as u32, PLAY_ONCE)?;
            encoder.set_frame_delay(interval_ms, 1000)?;
            let mut writer = encoder.write_header()?;

            let mut rgba = Vec::with_capacity(width * height * 4);
            for frame in 0..frame_count {
                render(frame, &mut rgba);
                writer.write_image_data(&rgba)?;
                if (frame + 1) % 10 == 0 || frame + 1 == frame_count {
                    log::debug!("{name}: frame {}/{frame_count}", frame + 1);
                }
            }
            writer.finish()?;
        }
        log::info!("{name}: {frame_count} frames, {} KiB", png_buf.len() / 1024);

        Ok(Self {
            name: name.to_string(),
            frames: frame_count,
            width,
            height,
            interval_ms,
            png: png_buf,
        })
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn interval_ms(&self) -> u16 {
        self.interval_ms
    }

    /// Encoded APNG bytes.
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// Self-contained HTML page showing the animation.
    pub fn to_html(&self) -> String {
        let mut b64 = String::with_capacity(self.png.len() * 4 / 3 + 4);
        base64::engine::general_purpose::STANDARD.encode_string(&self.png, &mut b64);

        let mut html = String::with_capacity(b64.len() + 512);
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", self.name));
        html.push_str("</head>\n<body>\n");
        html.push_str(&format!(
            "<img width=\"{}\" height=\"{}\" alt=\"{}\" src=\"data:image/png;base64,",
            self.width, self.height, self.name
        ));
        html.push_str(&b64);
        html.push_str("\">\n</body>\n</html>\n");
        html
    }

    /// Write [`Self::to_html`] to `path`.
    pub fn write_html(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_html()).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("wrote {}", path.display());
        Ok(())
    }
}

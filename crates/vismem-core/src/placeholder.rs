//! Deterministic placeholder synthesis: a fixed-layout mock browser
//! window standing in for a screenshot until real bytes arrive.
//!
//! The primary renderer rasterises the layout to PNG through the
//! `image` crate (the filename becomes skeleton label bars whose width
//! derives from its length). If PNG encoding fails, the same layout is
//! emitted as an SVG carrying the literal filename text instead.
//! Either way the output is display-only and never leaves the client.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::{ImageFormat, Rgba, RgbaImage};

pub const PLACEHOLDER_WIDTH: u32 = 300;
pub const PLACEHOLDER_HEIGHT: u32 = 200;

/// Longest filename prefix shown on a placeholder.
const LABEL_CHARS: usize = 25;

// Layout palette, shared by both renderers.
const GRADIENT_STOPS: [[u8; 3]; 3] = [
    [0xf8, 0xfa, 0xfc],
    [0xe2, 0xe8, 0xf0],
    [0xcb, 0xd5, 0xe0],
];
const CHROME_BAR: [u8; 3] = [0xf1, 0xf5, 0xf9];
const BORDER: [u8; 3] = [0xe2, 0xe8, 0xf0];
const DOT_CLOSE: [u8; 3] = [0xef, 0x44, 0x44];
const DOT_MIN: [u8; 3] = [0xf5, 0x9e, 0x0b];
const DOT_MAX: [u8; 3] = [0x10, 0xb9, 0x81];
const TITLE_INK: [u8; 3] = [0x47, 0x55, 0x69];
const LABEL_INK: [u8; 3] = [0x64, 0x74, 0x8b];
const ICON_INK: [u8; 3] = [0x94, 0xa3, 0xb8];

/// Synthesize the placeholder for `filename` as a data URI.
///
/// Deterministic: the same filename always yields byte-identical
/// output. Falls back to [`svg_placeholder`] if rasterisation fails;
/// the failure never surfaces to the user.
pub fn placeholder_data_uri(filename: &str) -> String {
    match render_png(filename) {
        Ok(png) => format!("data:image/png;base64,{}", BASE64.encode(png)),
        Err(err) => {
            tracing::debug!(filename, %err, "raster placeholder failed, using SVG fallback");
            svg_placeholder(filename)
        }
    }
}

fn render_png(filename: &str) -> image::ImageResult<Vec<u8>> {
    let mut img = RgbaImage::new(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT);

    // Diagonal three-stop gradient body.
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let t = (x + y) as f32 / (PLACEHOLDER_WIDTH + PLACEHOLDER_HEIGHT - 2) as f32;
        *pixel = Rgba([
            gradient_channel(t, 0),
            gradient_channel(t, 1),
            gradient_channel(t, 2),
            0xff,
        ]);
    }

    // Mock browser chrome: title bar, separator, window dots.
    fill_rect(&mut img, 0, 0, PLACEHOLDER_WIDTH, 30, CHROME_BAR);
    fill_rect(&mut img, 0, 30, PLACEHOLDER_WIDTH, 1, BORDER);
    fill_circle(&mut img, 20, 15, 6, DOT_CLOSE);
    fill_circle(&mut img, 40, 15, 6, DOT_MIN);
    fill_circle(&mut img, 60, 15, 6, DOT_MAX);

    // Outer border.
    fill_rect(&mut img, 0, 0, PLACEHOLDER_WIDTH, 1, BORDER);
    fill_rect(&mut img, 0, PLACEHOLDER_HEIGHT - 1, PLACEHOLDER_WIDTH, 1, BORDER);
    fill_rect(&mut img, 0, 0, 1, PLACEHOLDER_HEIGHT, BORDER);
    fill_rect(&mut img, PLACEHOLDER_WIDTH - 1, 0, 1, PLACEHOLDER_HEIGHT, BORDER);

    // "Screenshot" title bar and a filename bar whose width tracks the
    // (truncated) filename length, so distinct names stay visually
    // distinct without a font rasteriser.
    centered_bar(&mut img, 74, 84, 10, TITLE_INK);
    let label_width = (label_for(filename).chars().count() as u32 * 6).max(12);
    centered_bar(&mut img, 92, label_width, 8, LABEL_INK);

    // Camera icon: body with a lens cut-out.
    fill_rect(&mut img, 136, 126, 28, 20, ICON_INK);
    fill_rect(&mut img, 144, 122, 12, 4, ICON_INK);
    fill_circle(&mut img, 150, 136, 6, CHROME_BAR);

    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

fn gradient_channel(t: f32, channel: usize) -> u8 {
    let (a, b, local) = if t < 0.5 {
        (GRADIENT_STOPS[0], GRADIENT_STOPS[1], t * 2.0)
    } else {
        (GRADIENT_STOPS[1], GRADIENT_STOPS[2], (t - 0.5) * 2.0)
    };
    let from = a[channel] as f32;
    let to = b[channel] as f32;
    (from + (to - from) * local).round() as u8
}

fn fill_rect(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: [u8; 3]) {
    let rgba = Rgba([color[0], color[1], color[2], 0xff]);
    for yy in y..(y + h).min(PLACEHOLDER_HEIGHT) {
        for xx in x..(x + w).min(PLACEHOLDER_WIDTH) {
            img.put_pixel(xx, yy, rgba);
        }
    }
}

fn fill_circle(img: &mut RgbaImage, cx: i64, cy: i64, r: i64, color: [u8; 3]) {
    let rgba = Rgba([color[0], color[1], color[2], 0xff]);
    for yy in (cy - r).max(0)..=(cy + r).min(PLACEHOLDER_HEIGHT as i64 - 1) {
        for xx in (cx - r).max(0)..=(cx + r).min(PLACEHOLDER_WIDTH as i64 - 1) {
            let dx = xx - cx;
            let dy = yy - cy;
            if dx * dx + dy * dy <= r * r {
                img.put_pixel(xx as u32, yy as u32, rgba);
            }
        }
    }
}

fn centered_bar(img: &mut RgbaImage, y: u32, width: u32, height: u32, color: [u8; 3]) {
    let width = width.min(PLACEHOLDER_WIDTH - 20);
    let x = (PLACEHOLDER_WIDTH - width) / 2;
    fill_rect(img, x, y, width, height, color);
}

fn label_for(filename: &str) -> String {
    filename.chars().take(LABEL_CHARS).collect()
}

/// Vector fallback: same layout, with the truncated filename as literal
/// text.
pub fn svg_placeholder(filename: &str) -> String {
    let label = xml_escape(&label_for(filename));
    let svg = format!(
        r##"<svg width="300" height="200" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="grad" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" stop-color="#f8fafc"/>
      <stop offset="50%" stop-color="#e2e8f0"/>
      <stop offset="100%" stop-color="#cbd5e0"/>
    </linearGradient>
  </defs>
  <rect width="300" height="200" fill="url(#grad)" stroke="#e2e8f0" stroke-width="1"/>
  <rect x="0" y="0" width="300" height="30" fill="#f1f5f9" stroke="#e2e8f0" stroke-width="1"/>
  <circle cx="20" cy="15" r="6" fill="#ef4444"/>
  <circle cx="40" cy="15" r="6" fill="#f59e0b"/>
  <circle cx="60" cy="15" r="6" fill="#10b981"/>
  <text x="150" y="80" font-family="Arial" font-size="14" font-weight="bold" text-anchor="middle" fill="#475569">Screenshot</text>
  <text x="150" y="100" font-family="Arial" font-size="12" text-anchor="middle" fill="#64748b">{label}</text>
  <text x="150" y="140" font-family="Arial" font-size="24" text-anchor="middle" fill="#94a3b8">[]</text>
</svg>
"##
    );
    format!("data:image/svg+xml;base64,{}", BASE64.encode(svg))
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

//! Raster images for PDF documents

use crate::{PdfError, Result};
use image::{DynamicImage, ImageDecoder, ImageReader};
use lopdf::{Dictionary, Object, Stream};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::Cursor;

impl From<image::ImageError> for PdfError {
    fn from(err: image::ImageError) -> Self {
        PdfError::ImageError(err.to_string())
    }
}

/// Detected image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// Image scaling mode for insert_image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageScaleMode {
    /// Stretch to exact dimensions
    #[default]
    Stretch,
    /// Scale proportionally based on width, auto-calculate height
    FitWidth,
    /// Scale proportionally based on height, auto-calculate width
    FitHeight,
    /// Fit within bounding box, preserving aspect ratio
    FitBox,
}

/// Calculate display dimensions based on scaling mode
///
/// # Arguments
/// * `original_width` - Original image width in pixels
/// * `original_height` - Original image height in pixels
/// * `target_width` - Target width in points
/// * `target_height` - Target height in points
/// * `mode` - Scaling mode
///
/// # Returns
/// (actual_width, actual_height) in points
pub fn calculate_scaled_dimensions(
    original_width: u32,
    original_height: u32,
    target_width: f64,
    target_height: f64,
    mode: ImageScaleMode,
) -> (f64, f64) {
    if original_width == 0 || original_height == 0 {
        return (target_width, target_height);
    }

    match mode {
        ImageScaleMode::Stretch => (target_width, target_height),
        ImageScaleMode::FitWidth => {
            let aspect = original_height as f64 / original_width as f64;
            (target_width, target_width * aspect)
        }
        ImageScaleMode::FitHeight => {
            let aspect = original_width as f64 / original_height as f64;
            (target_height * aspect, target_height)
        }
        ImageScaleMode::FitBox => {
            let width_ratio = target_width / original_width as f64;
            let height_ratio = target_height / original_height as f64;
            let scale = width_ratio.min(height_ratio);
            (
                original_width as f64 * scale,
                original_height as f64 * scale,
            )
        }
    }
}

/// Detect image format from magic bytes
pub fn detect_format(data: &[u8]) -> Result<ImageFormat> {
    if data.len() < 8 {
        return Err(PdfError::ImageError("Image data too short".to_string()));
    }

    if data[0..3] == [0xFF, 0xD8, 0xFF] {
        return Ok(ImageFormat::Jpeg);
    }

    if data[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
        return Ok(ImageFormat::Png);
    }

    Err(PdfError::ImageError("Unknown image format".to_string()))
}

/// Image XObject for PDF embedding
#[derive(Debug, Clone)]
pub struct ImageXObject {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Color space ("DeviceRGB", "DeviceGray")
    pub color_space: String,
    /// Bits per component
    pub bits_per_component: u8,
    /// PDF filter ("DCTDecode" for JPEG, "FlateDecode" for PNG)
    pub filter: String,
    /// Encoded image data
    pub data: Vec<u8>,
}

impl ImageXObject {
    /// Fully decode image bytes and prepare them for embedding
    ///
    /// Truncated or corrupt files are rejected here rather than producing
    /// a broken page later.
    pub fn decode(data: &[u8]) -> Result<Self> {
        match detect_format(data)? {
            ImageFormat::Jpeg => {
                image::load_from_memory_with_format(data, image::ImageFormat::Jpeg)?;
                Self::from_jpeg(data)
            }
            ImageFormat::Png => Self::from_png(data),
        }
    }

    /// Create XObject from JPEG data
    ///
    /// JPEG images are embedded directly with the DCTDecode filter.
    pub fn from_jpeg(data: &[u8]) -> Result<Self> {
        let (width, height, components) = jpeg_frame_info(data)?;

        let color_space = match components {
            1 => "DeviceGray",
            3 => "DeviceRGB",
            n => {
                return Err(PdfError::ImageError(format!(
                    "Unsupported JPEG component count: {n}"
                )))
            }
        };

        Ok(Self {
            width,
            height,
            color_space: color_space.to_string(),
            bits_per_component: 8,
            filter: "DCTDecode".to_string(),
            data: data.to_vec(),
        })
    }

    /// Create XObject from PNG data
    ///
    /// PNG images are decoded and re-encoded as raw samples with FlateDecode.
    /// Alpha channels are blended onto a white background.
    pub fn from_png(data: &[u8]) -> Result<Self> {
        let reader = ImageReader::with_format(Cursor::new(data), image::ImageFormat::Png);
        let decoder = reader.into_decoder()?;

        let (width, height) = decoder.dimensions();
        let color_type = decoder.color_type();
        let image = DynamicImage::from_decoder(decoder)?;

        let (raw_data, color_space) = match color_type {
            image::ColorType::L8 | image::ColorType::L16 => {
                (image.to_luma8().into_raw(), "DeviceGray")
            }
            image::ColorType::La8 | image::ColorType::La16 => {
                let gray = image
                    .to_luma_alpha8()
                    .pixels()
                    .map(|p| blend_on_white(p[0], p[1]))
                    .collect::<Vec<u8>>();
                (gray, "DeviceGray")
            }
            image::ColorType::Rgba8 | image::ColorType::Rgba16 => {
                let rgb = image
                    .to_rgba8()
                    .pixels()
                    .flat_map(|p| {
                        [
                            blend_on_white(p[0], p[3]),
                            blend_on_white(p[1], p[3]),
                            blend_on_white(p[2], p[3]),
                        ]
                    })
                    .collect::<Vec<u8>>();
                (rgb, "DeviceRGB")
            }
            _ => (image.to_rgb8().into_raw(), "DeviceRGB"),
        };

        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        std::io::Write::write_all(&mut encoder, &raw_data)?;
        let data = encoder.finish()?;

        Ok(Self {
            width,
            height,
            color_space: color_space.to_string(),
            bits_per_component: 8,
            filter: "FlateDecode".to_string(),
            data,
        })
    }

    /// Hash of the encoded data, used to embed identical images once
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.data.hash(&mut hasher);
        hasher.finish()
    }

    /// Convert to lopdf Stream object
    pub fn to_pdf_stream(&self) -> Stream {
        let dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"XObject".to_vec())),
            ("Subtype", Object::Name(b"Image".to_vec())),
            ("Width", (self.width as i64).into()),
            ("Height", (self.height as i64).into()),
            ("ColorSpace", Object::Name(self.color_space.as_bytes().to_vec())),
            ("BitsPerComponent", (self.bits_per_component as i64).into()),
            ("Filter", Object::Name(self.filter.as_bytes().to_vec())),
            ("Length", (self.data.len() as i64).into()),
        ]);

        Stream::new(dict, self.data.clone())
    }
}

fn blend_on_white(value: u8, alpha: u8) -> u8 {
    let alpha = alpha as f32 / 255.0;
    (value as f32 * alpha + 255.0 * (1.0 - alpha)) as u8
}

/// Width, height and component count from the first JPEG SOF segment
fn jpeg_frame_info(data: &[u8]) -> Result<(u32, u32, u8)> {
    // SOF layout: marker (2) length (2) precision (1) height (2) width (2) components (1)
    let mut i = 2;
    while i + 10 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }

        let marker = data[i + 1];
        if (0xC0..=0xCF).contains(&marker) && ![0xC4, 0xC8, 0xCC].contains(&marker) {
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Ok((width, height, data[i + 9]));
        }

        let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        if length < 2 {
            break;
        }
        i += 2 + length;
    }

    Err(PdfError::ImageError("Could not parse JPEG info".to_string()))
}

/// Generate operators to draw an image XObject
///
/// # Arguments
/// * `image_name` - Image resource name (e.g., "Im1")
/// * `x` - X coordinate in points
/// * `y` - Y coordinate in points (from bottom, PDF coordinates)
/// * `width` - Image width in points
/// * `height` - Image height in points
pub fn generate_image_operators(
    image_name: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Vec<u8> {
    format!("q\n{width} 0 0 {height} {x} {y} cm\n/{image_name} Do\nQ\n").into_bytes()
}

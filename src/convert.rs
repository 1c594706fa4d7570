//! 12-bit RGB444 hex dumps.
//!
//! Each pixel is quantized to 4 bits per channel, packed as `r << 8 | g << 4 | b`
//! and written as three lowercase hex digits and a newline, row-major. The
//! output has no header, so readers need the dimensions from elsewhere.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{DynamicImage, ImageReader, RgbImage};

use crate::types::GridError;

/// Largest packed value.
pub const RGB444_MAX: u16 = 0xfff;

/// Drop the low nibble of an 8-bit channel.
#[inline]
pub const fn quantize(channel: u8) -> u8 {
    channel >> 4
}

#[inline]
pub const fn pack_rgb444(r: u8, g: u8, b: u8) -> u16 {
    ((quantize(r) as u16) << 8) | ((quantize(g) as u16) << 4) | quantize(b) as u16
}

/// Three lowercase hex digits, zero padded.
pub fn format_pixel(code: u16) -> String {
    format!("{code:03x}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertSummary {
    pub width: u32,
    pub height: u32,
    /// Packed code of the top-left pixel.
    pub first_pixel: u16,
}

impl ConvertSummary {
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Write one line per pixel of `image`. Returns the number of pixels written.
pub fn write_hex_pixels<W: Write>(image: &RgbImage, mut writer: W) -> std::io::Result<u64> {
    let mut count = 0;
    for pixel in image.pixels() {
        let [r, g, b] = pixel.0;
        writeln!(writer, "{:03x}", pack_rgb444(r, g, b))?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// Convert an already decoded image. Alpha is discarded.
pub fn convert_image<W: Write>(image: &DynamicImage, writer: W) -> Result<ConvertSummary, GridError> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let Some(first) = rgb.pixels().next() else {
        return Err(GridError::invalid(format!(
            "image has no pixels ({width}x{height})"
        )));
    };
    let [r, g, b] = first.0;
    let first_pixel = pack_rgb444(r, g, b);

    write_hex_pixels(&rgb, writer)?;

    Ok(ConvertSummary {
        width,
        height,
        first_pixel,
    })
}

/// Decode `input` and write its RGB444 dump to `output`.
///
/// The output file is only created once the input has decoded.
pub fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<ConvertSummary, GridError> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let image = ImageReader::open(input)?.with_guessed_format()?.decode()?;

    let file = File::create(output)?;
    let summary = convert_image(&image, BufWriter::new(file))?;

    tracing::debug!(
        input = %input.display(),
        output = %output.display(),
        width = summary.width,
        height = summary.height,
        first = %format_pixel(summary.first_pixel),
        "converted image"
    );
    Ok(summary)
}

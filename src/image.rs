//! Reading and writing PNG files as [`Grid`] values.

use std::io::{Read, Write};

use marginfill::{Grid, GridError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error(transparent)]
    Decode {
        #[from]
        source: png::DecodingError,
    },

    #[error(transparent)]
    Encode {
        #[from]
        source: png::EncodingError,
    },

    #[error(transparent)]
    Grid {
        #[from]
        source: GridError,
    },

    #[error("unsupported PNG layout: {color_type:?} at {bit_depth:?}")]
    UnsupportedLayout {
        color_type: png::ColorType,
        bit_depth: png::BitDepth,
    },
}

/// Decodes a PNG into 8-bit RGBA, whatever layout it was stored in.
///
/// Palettes and bit depths below 8 are expanded and 16-bit channels are
/// truncated to 8 bits. Images without an alpha channel come out fully opaque.
pub fn decode_png<R: Read>(input: R) -> Result<Grid, ImageError> {
    let mut decoder = png::Decoder::new(input);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

    let (info, mut reader) = decoder.read_info()?;

    let mut data = vec![0; info.buffer_size()];
    reader.next_frame(&mut data)?;

    let size = (info.width, info.height);

    if info.bit_depth != png::BitDepth::Eight {
        return Err(ImageError::UnsupportedLayout {
            color_type: info.color_type,
            bit_depth: info.bit_depth,
        });
    }

    let rgba = match info.color_type {
        png::ColorType::RGBA => data,
        png::ColorType::RGB => widen(&data, 3, |chunk| [chunk[0], chunk[1], chunk[2], 255]),
        png::ColorType::GrayscaleAlpha => {
            widen(&data, 2, |chunk| [chunk[0], chunk[0], chunk[0], chunk[1]])
        }
        png::ColorType::Grayscale => widen(&data, 1, |chunk| [chunk[0], chunk[0], chunk[0], 255]),
        color_type => {
            return Err(ImageError::UnsupportedLayout {
                color_type,
                bit_depth: info.bit_depth,
            })
        }
    };

    log::trace!(
        "Decoded {}x{} PNG stored as {:?}",
        size.0,
        size.1,
        info.color_type
    );

    Ok(Grid::from_rgba8(size, rgba)?)
}

pub fn encode_png<W: Write>(image: &Grid, output: W) -> Result<(), ImageError> {
    let mut encoder = png::Encoder::new(output, image.width(), image.height());
    encoder.set_color(png::ColorType::RGBA);
    encoder.set_depth(png::BitDepth::Eight);

    let mut output_writer = encoder.write_header()?;
    output_writer.write_image_data(&image.to_rgba8())?;

    // On drop, output_writer will write the last chunk of the PNG file.
    Ok(())
}

fn widen<F>(data: &[u8], stride: usize, to_rgba: F) -> Vec<u8>
where
    F: Fn(&[u8]) -> [u8; 4],
{
    let mut rgba = Vec::with_capacity(data.len() / stride * 4);

    for chunk in data.chunks_exact(stride) {
        rgba.extend_from_slice(&to_rgba(chunk));
    }

    rgba
}

#[cfg(test)]
mod test {
    use super::*;

    use marginfill::Pixel;

    fn encode_raw(size: (u32, u32), color_type: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut encoded = Vec::new();

        {
            let mut encoder = png::Encoder::new(&mut encoded, size.0, size.1);
            encoder.set_color(color_type);
            encoder.set_depth(png::BitDepth::Eight);

            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }

        encoded
    }

    #[test]
    fn rgba_round_trip() {
        let mut image = Grid::new_empty((3, 2));
        image.set_pixel((0, 0), Pixel::new(1, 2, 3, 4));
        image.set_pixel((2, 1), Pixel::new(250, 0, 128, 0));

        let mut encoded = Vec::new();
        encode_png(&image, &mut encoded).unwrap();

        let decoded = decode_png(encoded.as_slice()).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn rgb_is_opaque() {
        let encoded = encode_raw((2, 1), png::ColorType::RGB, &[10, 20, 30, 40, 50, 60]);
        let decoded = decode_png(encoded.as_slice()).unwrap();

        assert_eq!(decoded.get_pixel((0, 0)), Pixel::new(10, 20, 30, 255));
        assert_eq!(decoded.get_pixel((1, 0)), Pixel::new(40, 50, 60, 255));
    }

    #[test]
    fn grayscale_alpha() {
        let encoded = encode_raw((2, 1), png::ColorType::GrayscaleAlpha, &[77, 0, 200, 128]);
        let decoded = decode_png(encoded.as_slice()).unwrap();

        assert_eq!(decoded.get_pixel((0, 0)), Pixel::new(77, 77, 77, 0));
        assert_eq!(decoded.get_pixel((1, 0)), Pixel::new(200, 200, 200, 128));
    }

    #[test]
    fn not_a_png() {
        let result = decode_png(&b"definitely not a png"[..]);

        assert!(matches!(result, Err(ImageError::Decode { .. })));
    }
}

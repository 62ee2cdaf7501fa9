//! # Camera Equipment Module

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use image::{DynamicImage, GenericImageView, GrayImage, RgbImage};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single compressed or raw frame from one camera.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CamImage {
    /// Serial number of the camera which acquired this frame
    pub serial: String,

    /// Sequence number of the frame in the camera's stream
    pub frame_id: u64,

    /// Width of the image in pixels
    pub width: u32,

    /// Height of the image in pixels
    pub height: u32,

    /// The format of this frame
    pub format: ImageFormat,

    /// The formatted image data, encoded in base64 when serialised.
    #[serde(with = "crate::b64")]
    pub data: Vec<u8>,
}

/// Decoder backed by the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdImageDecoder;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Possible formats for camera images. This is used rather than image::ImageFormat to:
///     1. Restrict the formats that can be sent back and forth
///     2. Allow serialisation as image::ImageFormat does not implement serde.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq)]
pub enum ImageFormat {
    /// Raw 8 bit greyscale, row major
    Mono8,

    /// Raw 8 bit RGB, row major
    Rgb8,

    /// PNG image
    Png,

    /// JPEG image
    Jpeg,
}

/// Errors that can occur while decoding a camera image.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Failed to decompress the image: {0}")]
    ImageError(image::ImageError),

    #[error("The raw frame data was the wrong size")]
    FrameWrongSize,

    #[error("Decoded image is {0}x{1} but {2}x{3} was declared")]
    SizeMismatch(u32, u32, u32, u32),
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Turns a delivered camera frame into a raster image.
pub trait ImageDecoder {
    fn decode(&self, image: &CamImage) -> Result<DynamicImage, DecodeError>;
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ImageDecoder for StdImageDecoder {
    fn decode(&self, frame: &CamImage) -> Result<DynamicImage, DecodeError> {
        let image = match frame.format {
            ImageFormat::Mono8 => DynamicImage::ImageLuma8(
                GrayImage::from_raw(frame.width, frame.height, frame.data.clone())
                    .ok_or(DecodeError::FrameWrongSize)?,
            ),
            ImageFormat::Rgb8 => DynamicImage::ImageRgb8(
                RgbImage::from_raw(frame.width, frame.height, frame.data.clone())
                    .ok_or(DecodeError::FrameWrongSize)?,
            ),
            ImageFormat::Png => {
                image::load_from_memory_with_format(&frame.data, image::ImageFormat::Png)
                    .map_err(DecodeError::ImageError)?
            }
            ImageFormat::Jpeg => {
                image::load_from_memory_with_format(&frame.data, image::ImageFormat::Jpeg)
                    .map_err(DecodeError::ImageError)?
            }
        };

        let (width, height) = (image.width(), image.height());
        if width != frame.width || height != frame.height {
            return Err(DecodeError::SizeMismatch(
                width,
                height,
                frame.width,
                frame.height,
            ));
        }

        Ok(image)
    }
}

impl CamImage {
    /// Build a frame by encoding an image in the given format.
    pub fn from_image(
        serial: &str,
        frame_id: u64,
        image: &DynamicImage,
        format: ImageFormat,
    ) -> image::ImageResult<Self> {
        let data = match format {
            ImageFormat::Mono8 => image.to_luma8().into_raw(),
            ImageFormat::Rgb8 => image.to_rgb8().into_raw(),
            ImageFormat::Png => {
                let mut data = Vec::<u8>::new();
                image.write_to(&mut data, image::ImageOutputFormat::Png)?;
                data
            }
            ImageFormat::Jpeg => {
                let mut data = Vec::<u8>::new();
                image.write_to(&mut data, image::ImageOutputFormat::Jpeg(90))?;
                data
            }
        };

        Ok(Self {
            serial: serial.to_string(),
            frame_id,
            width: image.width(),
            height: image.height(),
            format,
            data,
        })
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

//! Latest decoded frame per camera

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use image::RgbaImage;
use log::{trace, warn};
use sensor_if::eqpt::cam::{CamImage, ImageDecoder};
use std::collections::BTreeMap;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A decoded camera frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFrame {
    pub frame_id: u64,

    /// Units: pixels
    pub width: u32,

    /// Units: pixels
    pub height: u32,

    pub pixels: Arc<RgbaImage>,
}

/// Frame store keyed by camera serial.
///
/// Frames are ordered by serial so that every pass over the buffer visits
/// the cameras in the same order.
#[derive(Debug, Clone, Default)]
pub struct FrameBuffer {
    rendering_rate: usize,

    frames: BTreeMap<String, CameraFrame>,

    /// Messages received per serial since the last decoded one
    rate_counters: BTreeMap<String, usize>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Result of offering a delivered image to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameUpdate {
    /// Dropped by the rate limiter
    Suppressed,

    /// The stored frame already has this id
    Duplicate,

    /// The stored frame was replaced (or the camera is new)
    Replaced,

    /// The image could not be decoded
    Rejected,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CameraFrame {
    pub fn new(frame_id: u64, pixels: RgbaImage) -> Self {
        Self {
            frame_id,
            width: pixels.width(),
            height: pixels.height(),
            pixels: Arc::new(pixels),
        }
    }
}

impl FrameUpdate {
    pub fn is_replaced(&self) -> bool {
        matches!(self, FrameUpdate::Replaced)
    }
}

impl FrameBuffer {
    pub fn new(rendering_rate: usize) -> Self {
        Self {
            rendering_rate,
            ..Default::default()
        }
    }

    pub fn set_rendering_rate(&mut self, rendering_rate: usize) {
        self.rendering_rate = rendering_rate;
    }

    /// Rate limit, deduplicate and decode a delivered image.
    ///
    /// Decoding only happens when the frame will actually be stored.
    pub fn offer(&mut self, image: &CamImage, decoder: &dyn ImageDecoder) -> FrameUpdate {
        let counter = self.rate_counters.entry(image.serial.clone()).or_insert(0);
        *counter += 1;
        if *counter < self.rendering_rate.max(1) {
            trace!("Frame {} of {} suppressed", image.frame_id, image.serial);
            return FrameUpdate::Suppressed;
        }
        *counter = 0;

        if self.is_current(&image.serial, image.frame_id) {
            return FrameUpdate::Duplicate;
        }

        match decoder.decode(image) {
            Ok(decoded) => {
                self.insert(&image.serial, CameraFrame::new(image.frame_id, decoded.to_rgba8()));
                FrameUpdate::Replaced
            }
            Err(e) => {
                warn!(
                    "Could not decode frame {} of camera {}: {}",
                    image.frame_id, image.serial, e
                );
                FrameUpdate::Rejected
            }
        }
    }

    /// Store a decoded frame, returning `false` if the stored frame already
    /// had the same id.
    pub fn insert(&mut self, serial: &str, frame: CameraFrame) -> bool {
        if self.is_current(serial, frame.frame_id) {
            return false;
        }

        trace!(
            "Camera {} frame {} ({}x{})",
            serial,
            frame.frame_id,
            frame.width,
            frame.height
        );
        self.frames.insert(serial.to_string(), frame);
        true
    }

    pub fn get(&self, serial: &str) -> Option<&CameraFrame> {
        self.frames.get(serial)
    }

    /// Serials of all cameras with a stored frame, in order.
    pub fn serials(&self) -> impl Iterator<Item = &str> {
        self.frames.keys().map(|s| s.as_str())
    }

    pub fn frames(&self) -> impl Iterator<Item = (&str, &CameraFrame)> {
        self.frames.iter().map(|(s, f)| (s.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.rate_counters.clear();
    }

    fn is_current(&self, serial: &str, frame_id: u64) -> bool {
        self.frames
            .get(serial)
            .map(|f| f.frame_id == frame_id)
            .unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use image::{DynamicImage, GrayImage, Luma};
    use sensor_if::eqpt::cam::{DecodeError, ImageFormat, StdImageDecoder};
    use std::cell::Cell;

    /// Decoder counting how often it is called.
    struct CountingDecoder {
        calls: Cell<usize>,
    }

    impl ImageDecoder for CountingDecoder {
        fn decode(&self, image: &CamImage) -> Result<DynamicImage, DecodeError> {
            self.calls.set(self.calls.get() + 1);
            StdImageDecoder.decode(image)
        }
    }

    fn mono(serial: &str, frame_id: u64, value: u8) -> CamImage {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 2, Luma([value])));
        CamImage::from_image(serial, frame_id, &img, ImageFormat::Mono8).unwrap()
    }

    #[test]
    fn test_duplicate_is_noop() {
        let decoder = CountingDecoder { calls: Cell::new(0) };
        let mut buffer = FrameBuffer::new(1);

        assert_eq!(buffer.offer(&mono("A", 1, 10), &decoder), FrameUpdate::Replaced);
        let stored = buffer.get("A").unwrap().clone();

        // Same id with different content is ignored and never decoded
        assert_eq!(buffer.offer(&mono("A", 1, 200), &decoder), FrameUpdate::Duplicate);
        assert_eq!(buffer.get("A").unwrap(), &stored);
        assert_eq!(decoder.calls.get(), 1);
    }

    #[test]
    fn test_new_id_replaces() {
        let mut buffer = FrameBuffer::new(1);
        buffer.offer(&mono("A", 1, 10), &StdImageDecoder);
        assert!(buffer.offer(&mono("A", 2, 20), &StdImageDecoder).is_replaced());

        let frame = buffer.get("A").unwrap();
        assert_eq!(frame.frame_id, 2);
        assert_eq!((frame.width, frame.height), (4, 2));
        assert_eq!(frame.pixels.get_pixel(0, 0).0, [20, 20, 20, 255]);
    }

    #[test]
    fn test_cameras_coexist() {
        let mut buffer = FrameBuffer::new(1);
        buffer.offer(&mono("B", 1, 10), &StdImageDecoder);
        buffer.offer(&mono("A", 7, 10), &StdImageDecoder);

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.serials().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(buffer.get("B").unwrap().frame_id, 1);
    }

    #[test]
    fn test_rate_limit() {
        let mut buffer = FrameBuffer::new(3);
        let updates: Vec<FrameUpdate> = (0..6)
            .map(|i| buffer.offer(&mono("A", i, 0), &StdImageDecoder))
            .collect();

        assert_eq!(
            updates,
            vec![
                FrameUpdate::Suppressed,
                FrameUpdate::Suppressed,
                FrameUpdate::Replaced,
                FrameUpdate::Suppressed,
                FrameUpdate::Suppressed,
                FrameUpdate::Replaced,
            ]
        );
        assert_eq!(buffer.get("A").unwrap().frame_id, 5);
    }

    #[test]
    fn test_rejected() {
        let mut buffer = FrameBuffer::new(1);
        let mut image = mono("A", 1, 0);
        image.data.truncate(3);

        assert_eq!(buffer.offer(&image, &StdImageDecoder), FrameUpdate::Rejected);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut buffer = FrameBuffer::new(1);
        buffer.offer(&mono("A", 1, 0), &StdImageDecoder);
        buffer.clear();
        assert!(buffer.get("A").is_none());

        // The same id is accepted again after a clear
        assert!(buffer.offer(&mono("A", 1, 0), &StdImageDecoder).is_replaced());
    }
}

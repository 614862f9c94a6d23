//! PNG and GIF output.

use super::canvas::Canvas;
use crate::config::SnowfallConfig;
use crate::error::{AnimationError, Result};
use image::RgbaImage;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// What the animation export wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSummary {
    pub path: PathBuf,
    pub frames: usize,
    pub fps: u32,
}

/// Writes `image` as an 8-bit RGBA PNG.
pub fn write_png<W: io::Write>(
    w: W,
    image: &RgbaImage,
) -> std::result::Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())?;
    writer.finish()
}

/// Saves the canvas as a PNG file, replacing any existing file.
pub fn save_png(canvas: &Canvas, path: &Path) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write_png(&mut w, &canvas.to_rgba_image())?;
    w.flush()?;
    log::debug!(
        "Wrote {}x{} PNG to {}",
        canvas.width(),
        canvas.height(),
        path.display()
    );
    Ok(())
}

/// Renders the snowfall over `base` and streams it to a looping GIF.
///
/// Each frame is drawn on a copy of `base` and handed to the encoder right
/// away, so only one frame is held in memory at a time.
#[cfg(feature = "animation")]
pub fn save_snowfall_gif(
    base: &Canvas,
    config: &SnowfallConfig,
    path: &Path,
) -> std::result::Result<AnimationSummary, AnimationError> {
    use super::snowfall::SnowfallAnimator;
    use image::codecs::gif::{GifEncoder, Repeat};
    use image::{Delay, Frame};

    let fps = config.fps.max(1);
    let delay = Delay::from_numer_denom_ms(1000, fps);

    let speed = config.encoder_speed.clamp(1, 30);
    let mut w = BufWriter::new(File::create(path)?);
    let mut animator = SnowfallAnimator::new(config.particles, config.seed);
    {
        // The trailer is written when the encoder drops
        let mut encoder = GifEncoder::new_with_speed(&mut w, speed);
        encoder.set_repeat(Repeat::Infinite)?;

        for _ in 0..config.frames {
            animator.advance();
            let mut frame = base.clone();
            animator.draw(&mut frame, config.alpha);
            encoder.encode_frame(Frame::from_parts(frame.to_rgba_image(), 0, 0, delay))?;

            if animator.frame() % 20 == 0 {
                log::debug!("Encoded {}/{} snowfall frames", animator.frame(), config.frames);
            }
        }
    }
    w.flush()?;

    Ok(AnimationSummary {
        path: path.to_path_buf(),
        frames: animator.frame(),
        fps,
    })
}

/// Always fails: the crate was built without GIF support.
#[cfg(not(feature = "animation"))]
pub fn save_snowfall_gif(
    _base: &Canvas,
    _config: &SnowfallConfig,
    _path: &Path,
) -> std::result::Result<AnimationSummary, AnimationError> {
    Err(AnimationError::EncoderUnavailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{MapProjection, ProjectionKind};
    use crate::render::colors::Rgb;

    fn canvas() -> Canvas {
        let projection = MapProjection::fit(ProjectionKind::Robinson, 64, 40, 2.0);
        let mut canvas = Canvas::new(64, 40, projection, 0.5).unwrap();
        canvas.fill_background(Rgb(15, 20, 36).opaque());
        canvas
    }

    #[test]
    fn test_png_header_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        save_png(&canvas(), &path).unwrap();

        let decoder = png::Decoder::new(File::open(&path).unwrap());
        let reader = decoder.read_info().unwrap();
        assert_eq!(reader.info().width, 64);
        assert_eq!(reader.info().height, 40);
        assert_eq!(reader.info().color_type, png::ColorType::Rgba);
    }

    /// IEND chunk type followed by its fixed CRC.
    const PNG_END: [u8; 8] = [b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82];

    #[test]
    fn test_png_file_ends_with_iend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        save_png(&canvas(), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.ends_with(&PNG_END));
    }

    #[test]
    fn test_write_png_into_buffer_is_complete() {
        let mut buf = Vec::new();
        write_png(&mut buf, &canvas().to_rgba_image()).unwrap();
        assert!(buf.starts_with(b"\x89PNG"));
        assert!(buf.ends_with(&PNG_END));
    }

    #[test]
    fn test_png_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        std::fs::write(&path, vec![0u8; 1 << 20]).unwrap();

        save_png(&canvas(), &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() < 1 << 20);
    }

    #[test]
    fn test_png_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("map.png");
        assert!(save_png(&canvas(), &path).is_err());
    }

    #[cfg(feature = "animation")]
    #[test]
    fn test_gif_has_configured_frame_count() {
        use image::codecs::gif::GifDecoder;
        use image::AnimationDecoder;
        use std::io::BufReader;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snow.gif");
        let config = SnowfallConfig {
            particles: 30,
            frames: 7,
            encoder_speed: 30,
            ..Default::default()
        };

        let summary = save_snowfall_gif(&canvas(), &config, &path).unwrap();
        assert_eq!(summary.frames, 7);
        assert_eq!(summary.fps, 18);

        let decoder = GifDecoder::new(BufReader::new(File::open(&path).unwrap())).unwrap();
        let frames = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(frames.len(), 7);
        assert_eq!(frames[0].buffer().dimensions(), (64, 40));
    }

    #[cfg(feature = "animation")]
    #[test]
    fn test_gif_file_ends_with_trailer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snow.gif");
        let config = SnowfallConfig {
            particles: 10,
            frames: 2,
            encoder_speed: 30,
            ..Default::default()
        };

        save_snowfall_gif(&canvas(), &config, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));
        assert_eq!(bytes.last(), Some(&0x3B));
    }

    #[cfg(feature = "animation")]
    #[test]
    fn test_gif_into_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("snow.gif");
        let err = save_snowfall_gif(&canvas(), &SnowfallConfig::default(), &path).unwrap_err();
        assert!(matches!(err, AnimationError::Io(_)));
        assert!(!err.is_encoder_missing());
    }

    #[cfg(not(feature = "animation"))]
    #[test]
    fn test_gif_without_encoder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snow.gif");
        let err = save_snowfall_gif(&canvas(), &SnowfallConfig::default(), &path).unwrap_err();
        assert!(err.is_encoder_missing());
        assert!(!path.exists());
    }
}

//! Preview thumbnails for historical revisions.
//!
//! Plain image files are decoded directly. Zip-based painting formats carry
//! their own rendered previews as archive members; those are tried in order
//! of preference. Anything that cannot be read simply has no thumbnail.

use image::DynamicImage;
use image::imageops::FilterType;
use std::io::{Cursor, Read};
use std::path::Path;

use crate::error::Result;

pub const THUMBNAIL_WIDTH: u32 = 200;
pub const THUMBNAIL_HEIGHT: u32 = 150;

/// Container extensions and their preview members, most preferred first.
const CONTAINERS: &[(&str, &[&str])] = &[
    ("kra", &["mergedimage.png", "preview.png"]),
    ("ora", &["mergedimage.png", "Thumbnails/thumbnail.png"]),
];

/// A decoded preview that fits inside `THUMBNAIL_WIDTH` x `THUMBNAIL_HEIGHT`.
#[derive(Debug, Clone)]
pub struct ThumbnailImage {
    image: DynamicImage,
}

impl ThumbnailImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }
}

/// Build a thumbnail from revision content. `path_hint` picks the container
/// format by extension.
pub fn extract(content: &[u8], path_hint: &Path) -> Option<ThumbnailImage> {
    let decoded = match container_members(path_hint) {
        Some(members) => decode_from_container(content, members)?,
        None => decode(content)?,
    };

    Some(ThumbnailImage {
        image: decoded.resize(THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT, FilterType::Lanczos3),
    })
}

fn container_members(path_hint: &Path) -> Option<&'static [&'static str]> {
    let ext = path_hint.extension()?.to_str()?.to_ascii_lowercase();
    CONTAINERS
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, members)| *members)
}

fn decode_from_container(content: &[u8], members: &[&str]) -> Option<DynamicImage> {
    let mut archive = match zip::ZipArchive::new(Cursor::new(content)) {
        Ok(archive) => archive,
        Err(e) => {
            tracing::debug!("Not a readable archive: {}", e);
            return None;
        }
    };

    for name in members {
        let Ok(mut member) = archive.by_name(name) else {
            tracing::debug!("Archive has no {}", name);
            continue;
        };

        let mut bytes = Vec::new();
        if let Err(e) = member.read_to_end(&mut bytes) {
            tracing::warn!("Failed to read {}: {}", name, e);
            continue;
        }

        if let Some(image) = decode(&bytes) {
            return Some(image);
        }
    }

    None
}

fn decode(bytes: &[u8]) -> Option<DynamicImage> {
    image::load_from_memory(bytes)
        .map_err(|e| tracing::debug!("Image decode failed: {}", e))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn png(width: u32, height: u32, color: Rgba<u8>) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, color))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn archive(members: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in members {
            writer
                .start_file(*name, SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored))
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn center(thumb: &ThumbnailImage) -> Rgba<u8> {
        let rgba = thumb.as_image().to_rgba8();
        *rgba.get_pixel(thumb.width() / 2, thumb.height() / 2)
    }

    fn is_red(pixel: Rgba<u8>) -> bool {
        pixel[0] > 200 && pixel[2] < 50
    }

    fn is_blue(pixel: Rgba<u8>) -> bool {
        pixel[2] > 200 && pixel[0] < 50
    }

    #[test]
    fn plain_image_is_scaled_into_the_box() {
        let thumb = extract(&png(400, 100, RED), Path::new("sketch.png")).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (200, 50));

        let thumb = extract(&png(30, 60, RED), Path::new("tall.png")).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (75, 150));
    }

    #[test]
    fn merged_image_wins_over_preview() {
        let merged = png(40, 30, RED);
        let preview = png(40, 30, BLUE);
        let kra = archive(&[("preview.png", preview.as_slice()), ("mergedimage.png", merged.as_slice())]);

        let thumb = extract(&kra, Path::new("/work/painting.kra")).unwrap();
        assert!(is_red(center(&thumb)));
        assert_eq!((thumb.width(), thumb.height()), (200, 150));
    }

    #[test]
    fn preview_is_used_when_merged_image_is_missing() {
        let preview = png(40, 30, BLUE);
        let kra = archive(&[("mimetype", b"application/x-krita".as_slice()), ("preview.png", preview.as_slice())]);

        let thumb = extract(&kra, Path::new("painting.kra")).unwrap();
        assert!(is_blue(center(&thumb)));
    }

    #[test]
    fn preview_is_used_when_merged_image_is_corrupt() {
        let preview = png(40, 30, BLUE);
        let kra = archive(&[("mergedimage.png", b"not a png".as_slice()), ("preview.png", preview.as_slice())]);

        let thumb = extract(&kra, Path::new("painting.kra")).unwrap();
        assert!(is_blue(center(&thumb)));
    }

    #[test]
    fn openraster_falls_back_to_its_thumbnail_member() {
        let thumbnail = png(20, 20, BLUE);
        let ora = archive(&[("Thumbnails/thumbnail.png", thumbnail.as_slice())]);

        let thumb = extract(&ora, Path::new("scene.ora")).unwrap();
        assert!(is_blue(center(&thumb)));
        assert_eq!((thumb.width(), thumb.height()), (150, 150));
    }

    #[test]
    fn extension_match_ignores_case() {
        let kra = archive(&[("mergedimage.png", png(10, 10, RED).as_slice())]);
        assert!(extract(&kra, Path::new("PAINTING.KRA")).is_some());
    }

    #[test]
    fn archive_without_preview_members_has_no_thumbnail() {
        let kra = archive(&[("maindoc.xml", b"<DOC/>".as_slice()), ("layers/layer1", b"\x00\x01".as_slice())]);
        assert!(extract(&kra, Path::new("painting.kra")).is_none());
    }

    #[test]
    fn unreadable_content_has_no_thumbnail() {
        assert!(extract(b"definitely not a zip", Path::new("painting.kra")).is_none());
        assert!(extract(b"hello world\n", Path::new("notes.txt")).is_none());
        assert!(extract(&[], Path::new("empty.png")).is_none());
    }
}

//! PDF page image extraction using lopdf.

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageBuffer, Rgba};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, info, trace};

use super::{ImageExtractor, Result};
use crate::error::PdfError;
use crate::models::config::{PageImageFormat, PdfConfig};

/// Extracts embedded page images (scans) from a PDF.
#[derive(Debug, Clone, Default)]
pub struct PdfImageExtractor {
    config: PdfConfig,
}

impl PdfImageExtractor {
    pub fn new(config: PdfConfig) -> Self {
        Self { config }
    }

    /// Load a PDF from bytes, decrypting empty-password documents.
    pub fn load(data: &[u8]) -> Result<Document> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        if doc.get_pages().is_empty() {
            return Err(PdfError::NoPages);
        }

        Ok(doc)
    }

    /// Decode every image XObject placed on a page.
    pub fn page_images(doc: &Document, page_id: ObjectId) -> Vec<DynamicImage> {
        let mut images = Vec::new();

        let Some(resources) = page_resources(doc, page_id) else {
            return images;
        };

        if let Ok(xobjects) = resources.get(b"XObject") {
            if let Ok((_, Object::Dictionary(xobj_dict))) = doc.dereference(xobjects) {
                for (_name, obj_ref) in xobj_dict.iter() {
                    if let Ok((_, obj)) = doc.dereference(obj_ref) {
                        if let Some(img) = decode_image_object(doc, obj) {
                            images.push(img);
                        }
                    }
                }
            }
        }

        images
    }

    fn file_name(&self, page: u32, index: usize) -> String {
        format!(
            "{}_{:04}_{}.{}",
            self.config.file_prefix,
            page,
            index + 1,
            self.config.image_format.extension()
        )
    }

    fn write_image(&self, image: DynamicImage, path: &Path) -> Result<()> {
        // JPEG has no alpha channel.
        let image = match self.config.image_format {
            PageImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
            PageImageFormat::Png => image,
        };

        image
            .save_with_format(path, self.config.image_format.image_format())
            .map_err(|e| PdfError::ImageExtraction(format!("{}: {}", path.display(), e)))
    }
}

impl ImageExtractor for PdfImageExtractor {
    fn extract_images(&self, pdf_path: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(output_dir).map_err(|source| PdfError::Io {
            path: output_dir.display().to_string(),
            source,
        })?;

        let data = fs::read(pdf_path).map_err(|source| PdfError::Io {
            path: pdf_path.display().to_string(),
            source,
        })?;
        let doc = Self::load(&data)?;

        let mut written = Vec::new();
        for (page, page_id) in doc.get_pages() {
            let images = Self::page_images(&doc, page_id);
            if images.is_empty() {
                debug!("No decodable images on page {}", page);
                continue;
            }

            for (index, image) in images.into_iter().enumerate() {
                let path = output_dir.join(self.file_name(page, index));
                self.write_image(image, &path)?;
                trace!("Wrote {}", path.display());
                written.push(path);
            }
        }

        info!(
            "Extracted {} images from {} into {}",
            written.len(),
            pdf_path.display(),
            output_dir.display()
        );

        Ok(written)
    }
}

fn decode_image_object(doc: &Document, obj: &Object) -> Option<DynamicImage> {
    let Object::Stream(stream) = obj else {
        return None;
    };
    let dict = &stream.dict;

    let subtype = dict.get(b"Subtype").ok()?;
    if subtype.as_name().ok()? != b"Image" {
        return None;
    }

    let width = u32::try_from(dict.get(b"Width").ok()?.as_i64().ok()?).ok()?;
    let height = u32::try_from(dict.get(b"Height").ok()?.as_i64().ok()?).ok()?;
    if width == 0 || height == 0 {
        trace!("Skipping image with empty dimensions {}x{}", width, height);
        return None;
    }

    trace!("Found image object: {}x{}", width, height);

    if let Ok(filter) = dict.get(b"Filter") {
        let filter_name = match filter {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) if !arr.is_empty() => arr.first().and_then(|o| o.as_name().ok()),
            _ => None,
        };

        match filter_name {
            Some(b"DCTDecode") => {
                return image::load_from_memory_with_format(&stream.content, image::ImageFormat::Jpeg)
                    .ok();
            }
            Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
                trace!("Skipping unsupported image encoding");
                return None;
            }
            _ => {}
        }
    }

    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    let color_space = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|o| match o {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
            Object::Reference(r) => doc.get_object(*r).ok().and_then(|o| o.as_name().ok()),
            _ => None,
        })
        .unwrap_or(b"DeviceRGB");

    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(8);

    if bits != 8 {
        trace!("Unsupported bits per component: {}", bits);
        return None;
    }

    image_from_raw(&data, width, height, color_space)
}

fn image_from_raw(data: &[u8], width: u32, height: u32, color_space: &[u8]) -> Option<DynamicImage> {
    let pixels = (width as usize).checked_mul(height as usize)?;
    let channels = match color_space {
        b"DeviceRGB" | b"RGB" => 3,
        b"DeviceGray" | b"G" => 1,
        _ => 0,
    };
    let len = pixels.checked_mul(channels)?;

    let rgba: Vec<u8> = match channels {
        3 if len > 0 && data.len() >= len => data[..len]
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], 255])
            .collect(),
        1 if len > 0 && data.len() >= len => data[..len]
            .iter()
            .flat_map(|&g| [g, g, g, 255])
            .collect(),
        _ => {
            trace!(
                "Could not decode image: colorspace={:?}, data_len={}",
                String::from_utf8_lossy(color_space),
                data.len()
            );
            return None;
        }
    };

    ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba).map(DynamicImage::ImageRgba8)
}

/// Resources dictionary for a page, following `Parent` inheritance.
fn page_resources(doc: &Document, node_id: ObjectId) -> Option<Dictionary> {
    let Ok(Object::Dictionary(dict)) = doc.get_object(node_id) else {
        return None;
    };

    if let Ok(resources) = dict.get(b"Resources") {
        if let Ok((_, Object::Dictionary(res_dict))) = doc.dereference(resources) {
            return Some(res_dict.clone());
        }
    }

    match dict.get(b"Parent") {
        Ok(Object::Reference(parent_id)) => page_resources(doc, *parent_id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Stream};

    /// One page per entry, each page showing a gray image of the given size.
    fn write_scanned_pdf(path: &Path, pages: &[(i64, i64)], inherit_resources: bool) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::new();
        let mut shared_xobjects = Dictionary::new();
        for (i, &(width, height)) in pages.iter().enumerate() {
            let pixels = vec![128u8; (width * height) as usize];
            let image_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width,
                    "Height" => height,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8i64,
                },
                pixels,
            ));
            let name = format!("Im{}", i);
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                format!("q {} 0 0 {} 0 0 cm /{} Do Q", width, height, name).into_bytes(),
            ));

            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(width),
                    Object::Integer(height),
                ],
            };
            if inherit_resources {
                shared_xobjects.set(name, image_id);
            } else {
                let resources_id = doc.add_object(dictionary! {
                    "XObject" => dictionary! { name => image_id },
                });
                page.set("Resources", resources_id);
            }
            kids.push(doc.add_object(page).into());
        }

        let mut pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
        };
        if inherit_resources {
            pages_dict.set("Resources", dictionary! { "XObject" => shared_xobjects });
        }
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_extracts_one_image_per_page() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("ledger.pdf");
        write_scanned_pdf(&pdf, &[(4, 3), (2, 2)], false);

        let out = dir.path().join("nested").join("images");
        let written = PdfImageExtractor::default()
            .extract_images(&pdf, &out)
            .unwrap();

        assert_eq!(
            written,
            vec![out.join("page_0001_1.png"), out.join("page_0002_1.png")]
        );
        let first = image::open(&written[0]).unwrap();
        assert_eq!((first.width(), first.height()), (4, 3));
    }

    #[test]
    fn test_inherited_resources_and_jpeg_output() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("ledger.pdf");
        write_scanned_pdf(&pdf, &[(8, 8)], true);

        let extractor = PdfImageExtractor::new(PdfConfig {
            image_format: PageImageFormat::Jpeg,
            file_prefix: "scan".to_string(),
        });
        let written = extractor.extract_images(&pdf, dir.path()).unwrap();

        assert_eq!(written, vec![dir.path().join("scan_0001_1.jpg")]);
        assert!(written[0].exists());
    }

    #[test]
    fn test_unreadable_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.pdf");
        let err = PdfImageExtractor::default()
            .extract_images(&missing, dir.path())
            .unwrap_err();
        assert!(matches!(err, PdfError::Io { .. }));

        let garbage = dir.path().join("garbage.pdf");
        fs::write(&garbage, b"not a pdf").unwrap();
        let err = PdfImageExtractor::default()
            .extract_images(&garbage, dir.path())
            .unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_image_from_raw_rgb() {
        let img = image_from_raw(&[255, 0, 0, 0, 255, 0], 2, 1, b"DeviceRGB").unwrap();
        let rgba = img.to_rgba8();
        assert_eq!(rgba.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(rgba.get_pixel(1, 0).0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_bogus_dimensions_skipped() {
        let image = |width: i64, height: i64| {
            Object::Stream(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width,
                    "Height" => height,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8i64,
                },
                vec![0u8; 12],
            ))
        };
        let doc = Document::with_version("1.5");

        assert!(decode_image_object(&doc, &image(-1, -1)).is_none());
        assert!(decode_image_object(&doc, &image(0, 4)).is_none());
        assert!(decode_image_object(&doc, &image(i64::from(u32::MAX), i64::from(u32::MAX))).is_none());
        assert!(decode_image_object(&doc, &image(1i64 << 40, 2)).is_none());
        assert!(decode_image_object(&doc, &image(2, 2)).is_some());
    }

    #[test]
    fn test_negative_dimensions_extract_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("hostile.pdf");

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => -1i64,
                "Height" => -1i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8i64,
            },
            vec![0u8; 12],
        ));
        let resources_id = doc.add_object(dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        });
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(10),
                Object::Integer(10),
            ],
        });
        let kids: Vec<Object> = vec![page_id.into()];
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => 1i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(&pdf).unwrap();

        let written = PdfImageExtractor::default()
            .extract_images(&pdf, &dir.path().join("out"))
            .unwrap();
        assert!(written.is_empty());
    }

    #[test]
    fn test_image_from_raw_huge_dimensions() {
        assert!(image_from_raw(&[0; 12], u32::MAX, u32::MAX, b"DeviceRGB").is_none());
        assert!(image_from_raw(&[0; 12], u32::MAX, u32::MAX, b"DeviceGray").is_none());
    }

    #[test]
    fn test_image_from_raw_short_data() {
        assert!(image_from_raw(&[1, 2], 2, 2, b"DeviceGray").is_none());
        assert!(image_from_raw(&[1, 2, 3, 4], 2, 2, b"DeviceCMYK").is_none());
    }
}

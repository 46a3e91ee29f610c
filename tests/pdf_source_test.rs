//! Integration tests against small PDFs assembled with lopdf.

use std::path::PathBuf;

use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tempfile::TempDir;

use pdfnav::error::Error;
use pdfnav::{
    extract_page_images, get_toc, open_bytes, DocumentSource, LopdfSource, NavOptions, Navigator,
    PageImages, SectionRange, TocSource,
};

const PAGE_ONE: &[u8] = b"BT /F2 20 Tf 72 760 Td (1. Introduction) Tj ET \
BT /F1 10 Tf 72 730 Td (Transformers replaced recurrence in sequence models.) Tj \
0 -14 Td (This paper studies attention over long inputs.) Tj \
0 -14 Td (We keep the body text at a regular size.) Tj ET";

const PAGE_TWO: &[u8] = b"BT /F1 10 Tf 72 760 Td (Figures on this page show attention maps.) Tj \
0 -14 Td (Each map is rendered as a small raster image.) Tj ET";

const PAGE_THREE: &[u8] = b"BT /F2 20 Tf 72 760 Td (2. Method) Tj ET \
BT /F1 10 Tf 72 730 Td (The method section describes the training setup.) Tj \
0 -14 Td (Attention heads are pruned after warmup.) Tj ET";

struct Fixture {
    with_outline: bool,
}

impl Fixture {
    fn build(&self) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id: ObjectId = doc.new_object_id();

        let regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });

        let rgb = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 64,
                "Height" => 64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            vec![200u8; 64 * 64 * 3],
        ));
        let tiny = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 10,
                "Height" => 10,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            vec![0u8; 100],
        ));
        let jpeg = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 120,
                "Height" => 80,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0xFF, 0xD9],
        ));

        let fonts = || {
            Object::Dictionary(dictionary! {
                "F1" => regular,
                "F2" => bold,
            })
        };

        let mut page_ids = Vec::new();
        for (i, content) in [PAGE_ONE, PAGE_TWO, PAGE_THREE].iter().enumerate() {
            let content_id =
                doc.add_object(Stream::new(lopdf::Dictionary::new(), content.to_vec()));
            let mut resources = dictionary! { "Font" => fonts() };
            if i == 1 {
                resources.set(
                    "XObject",
                    Object::Dictionary(dictionary! {
                        "Im1" => rgb,
                        "Im2" => tiny,
                        "Im3" => jpeg,
                    }),
                );
            }
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => Object::Dictionary(resources),
            });
            page_ids.push(page_id);
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids.iter().map(|id| Object::from(*id)).collect::<Vec<_>>(),
                "Count" => page_ids.len() as i64,
            }),
        );

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };
        if self.with_outline {
            self.add_outline(&mut doc, &mut catalog, &page_ids);
        }
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);

        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal("Synthetic Paper"),
            "Author" => Object::string_literal("Test Author"),
            "CreationDate" => Object::string_literal("D:20240102030405Z"),
        });
        doc.trailer.set("Info", info_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    /// Three entries: an explicit destination, a GoTo action to a named
    /// destination, and one pointing nowhere.
    fn add_outline(&self, doc: &mut Document, catalog: &mut lopdf::Dictionary, pages: &[ObjectId]) {
        let outlines_id = doc.new_object_id();
        let intro_id = doc.new_object_id();
        let method_id = doc.new_object_id();
        let broken_id = doc.new_object_id();

        doc.objects.insert(
            intro_id,
            Object::Dictionary(dictionary! {
                "Title" => Object::string_literal("Introduction"),
                "Parent" => outlines_id,
                "Next" => method_id,
                "Dest" => vec![Object::from(pages[0]), "Fit".into()],
            }),
        );
        doc.objects.insert(
            method_id,
            Object::Dictionary(dictionary! {
                "Title" => Object::string_literal("Method"),
                "Parent" => outlines_id,
                "Prev" => intro_id,
                "Next" => broken_id,
                "A" => dictionary! {
                    "S" => "GoTo",
                    "D" => Object::String(b"sec.method".to_vec(), StringFormat::Literal),
                },
            }),
        );
        doc.objects.insert(
            broken_id,
            Object::Dictionary(dictionary! {
                "Title" => Object::string_literal("Dangling"),
                "Parent" => outlines_id,
                "Prev" => method_id,
                "Dest" => Object::string_literal("missing.name"),
            }),
        );
        doc.objects.insert(
            outlines_id,
            Object::Dictionary(dictionary! {
                "Type" => "Outlines",
                "First" => intro_id,
                "Last" => broken_id,
                "Count" => 3,
            }),
        );

        catalog.set("Outlines", outlines_id);
        catalog.set(
            "Names",
            dictionary! {
                "Dests" => dictionary! {
                    "Names" => vec![
                        Object::string_literal("sec.method"),
                        vec![Object::from(pages[2]), "Fit".into()].into(),
                    ],
                },
            },
        );
    }
}

fn write_fixture(dir: &TempDir, name: &str, with_outline: bool) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, Fixture { with_outline }.build()).unwrap();
    path
}

// ==================== Source ====================

#[test]
fn test_page_count_and_metadata() {
    let source = open_bytes(&Fixture { with_outline: false }.build()).unwrap();
    assert_eq!(source.page_count(), 3);
    assert_eq!(source.version(), "1.5");

    let meta = source.metadata();
    assert_eq!(meta.title.as_deref(), Some("Synthetic Paper"));
    assert_eq!(meta.author.as_deref(), Some("Test Author"));
    assert!(meta.subject.is_none());
    let created = meta.created().unwrap();
    assert_eq!(created.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-01-02 03:04:05");
}

#[test]
fn test_spans_carry_size_and_weight() {
    let source = open_bytes(&Fixture { with_outline: false }.build()).unwrap();
    let spans = source.text_spans(0).unwrap();

    let heading = spans.iter().find(|s| s.text == "1. Introduction").unwrap();
    assert!(heading.bold);
    assert!((heading.font_size - 20.0).abs() < 0.01);

    let body = spans.iter().find(|s| s.text.starts_with("Transformers")).unwrap();
    assert!(!body.bold);
    assert!((body.font_size - 10.0).abs() < 0.01);
    assert!(body.y < heading.y);
}

#[test]
fn test_raw_text() {
    let source = open_bytes(&Fixture { with_outline: false }.build()).unwrap();
    let text = source.raw_text(2).unwrap();
    assert!(text.contains("training setup"));
    assert!(matches!(
        source.raw_text(3),
        Err(Error::PageOutOfRange { page: 4, total: 3 })
    ));
}

#[test]
fn test_native_outline_resolves_destinations() {
    let source = open_bytes(&Fixture { with_outline: true }.build()).unwrap();
    let outline = source.native_outline().unwrap();

    let entries: Vec<(u32, &str, u32)> = outline
        .iter()
        .map(|e| (e.level, e.title.as_str(), e.page))
        .collect();
    assert_eq!(entries, vec![(1, "Introduction", 1), (1, "Method", 3)]);
}

#[test]
fn test_detected_outline_without_bookmarks() {
    let source = open_bytes(&Fixture { with_outline: false }.build()).unwrap();
    assert!(source.native_outline().unwrap().is_empty());

    let toc = get_toc(&source);
    assert_eq!(toc.source, TocSource::Detected);
    assert_eq!(toc.titles(10), vec!["1. Introduction", "2. Method"]);
    assert_eq!(toc.get(1).map(|e| e.page), Some(3));
}

#[test]
fn test_image_decoding() {
    let source = open_bytes(&Fixture { with_outline: false }.build()).unwrap();
    assert!(source.images(0).unwrap().is_empty());

    let refs = source.images(1).unwrap();
    let names: Vec<&str> = refs.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Im1", "Im2", "Im3"]);

    let png = source.extract_image(&refs[0]).unwrap();
    assert_eq!(png.format, "png");
    assert_eq!((png.width, png.height), (64, 64));
    assert!(png.bytes.starts_with(b"\x89PNG"));

    let jpeg = source.extract_image(&refs[2]).unwrap();
    assert_eq!(jpeg.format, "jpeg");
    assert_eq!(jpeg.bytes, vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0xFF, 0xD9]);
}

/// One page whose XObjects are the given image streams, named Im1, Im2, ...
fn image_page_pdf(images: Vec<Stream>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let mut xobjects = lopdf::Dictionary::new();
    for (i, image) in images.into_iter().enumerate() {
        let id = doc.add_object(image);
        xobjects.set(format!("Im{}", i + 1), id);
    }

    let content_id = doc.add_object(Stream::new(lopdf::Dictionary::new(), Vec::new()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => content_id,
        "Resources" => dictionary! { "XObject" => Object::Dictionary(xobjects) },
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::from(page_id)],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn image_stream(width: i64, height: i64, color_space: &str, filter: Option<&str>) -> Stream {
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width,
        "Height" => height,
        "ColorSpace" => color_space,
        "BitsPerComponent" => 8,
    };
    if let Some(filter) = filter {
        dict.set("Filter", Object::Name(filter.as_bytes().to_vec()));
    }
    Stream::new(dict, vec![0u8; 64 * 64])
}

#[test]
fn test_oversized_image_dimensions_are_skipped() {
    let max = i64::from(u32::MAX);
    let wrapping = (1i64 << 32) + 60;
    let data = image_page_pdf(vec![
        image_stream(max, max, "DeviceRGB", None),
        image_stream(wrapping, wrapping, "DeviceRGB", Some("DCTDecode")),
        image_stream(64, 64, "DeviceGray", None),
    ]);
    let source = open_bytes(&data).unwrap();

    let refs = source.images(0).unwrap();
    assert_eq!(refs.len(), 3);
    for image_ref in &refs[..2] {
        assert!(matches!(
            source.extract_image(image_ref),
            Err(Error::ImageExtract(_))
        ));
    }

    match extract_page_images(&source, 1, &NavOptions::default()).unwrap() {
        PageImages::Extracted { images, skipped, .. } => {
            assert_eq!(skipped, 2);
            assert_eq!(images.len(), 1);
            assert_eq!(images[0].index, 3);
            assert_eq!((images[0].width, images[0].height), (64, 64));
        }
        other => panic!("expected extracted images, got {:?}", other),
    }
}

// ==================== Navigator ====================

#[test]
fn test_navigator_info() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "paper.pdf", true);
    let nav = Navigator::new();

    let info = nav.info(&path).unwrap();
    assert_eq!(info.page_count, 3);
    assert!(info.has_text);
    assert_eq!(info.toc.source, TocSource::Native);

    let text = info.to_string();
    assert!(text.contains("Title: Synthetic Paper"));
    assert!(text.contains("Subject: (unknown)"));
    assert!(text.contains("=== Table of Contents (2 entries) ==="));
    assert!(nav.cache().contains(&path));
}

#[test]
fn test_navigator_section_and_search() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "paper.pdf", true);
    let nav = Navigator::new().with_options(NavOptions::default().sequential());

    let section = nav.read_section(&path, "methods").unwrap();
    assert_eq!(section.title, "Method");
    assert_eq!(section.range, SectionRange::new(2, 3));
    assert!(section.to_string().contains("training setup"));

    let intro = nav.read_section(&path, "intro").unwrap();
    assert_eq!(intro.range, SectionRange::new(0, 2));

    let results = nav.search(&path, "ATTENTION", None).unwrap();
    assert_eq!(results.total_hits, 3);
    let pages: Vec<u32> = results.pages.iter().map(|p| p.page).collect();
    assert_eq!(pages, vec![1, 2, 3]);
    assert_eq!(nav.cache().len(), 1);
}

#[test]
fn test_navigator_page_images() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "figures.pdf", false);
    let nav = Navigator::new();

    let images = nav.page_images(&path, 2).unwrap();
    match &images {
        PageImages::Extracted { images, skipped, .. } => {
            assert_eq!(*skipped, 1);
            let indexes: Vec<usize> = images.iter().map(|i| i.index).collect();
            assert_eq!(indexes, vec![1, 3]);
            assert_eq!(images[1].mime_type, "image/jpeg");
        }
        other => panic!("unexpected: {:?}", other),
    }
    assert!(images.to_string().contains("[Image 1: 64x64px, format=png]"));

    assert!(matches!(
        nav.page_images(&path, 1).unwrap(),
        PageImages::NoImages { page: 1 }
    ));
    assert!(matches!(
        nav.page_images(&path, 9),
        Err(Error::PageOutOfRange { page: 9, total: 3 })
    ));
}

#[test]
fn test_navigator_rejects_bad_paths() {
    let dir = TempDir::new().unwrap();
    let nav = Navigator::new();

    assert!(matches!(
        nav.info(dir.path().join("absent.pdf")),
        Err(Error::NotFound(_))
    ));

    let not_pdf = dir.path().join("notes.pdf");
    std::fs::write(&not_pdf, b"just some notes").unwrap();
    assert!(nav.info(&not_pdf).is_err());
    assert!(nav.cache().is_empty());
}

#[test]
fn test_lopdf_source_open() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "paper.pdf", false);
    let source = LopdfSource::open(&path).unwrap();
    assert_eq!(source.page_count(), 3);
}

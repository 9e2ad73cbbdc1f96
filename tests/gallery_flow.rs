//! End-to-end flow over file-backed storage: transform, save, reopen,
//! export and delete.

use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use toonify::prelude::*;

fn photo_uri() -> String {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_fn(16, 9, |x, y| {
        Rgba([(x * 15) as u8, (y * 28) as u8, 100, 255])
    }));
    DataUri::encode_image(&img, ImageFormat::Png)
        .unwrap()
        .to_string()
}

fn config(root: &std::path::Path) -> ToonifyConfig {
    ToonifyConfig {
        data_dir: root.join("data"),
        download_dir: root.join("downloads"),
        processing_delay_ms: 0,
        ..ToonifyConfig::default()
    }
}

#[tokio::test]
async fn test_transform_save_reopen_delete() {
    let root = tempfile::tempdir().unwrap();
    let config = config(root.path());
    let log = DiagnosticLog::new();
    let app = Toonify::from_config(&config, log.sink());

    let original = photo_uri();
    let output = app.transform(&original, "watercolor").await;
    assert_eq!(output.status, TransformStatus::Applied);
    let rendered = DataUri::parse(&output.image).unwrap().decode_image().unwrap();
    assert_eq!(rendered.dimensions(), (16, 9));

    let first = app
        .save_transformed_image(&original, &output.image, "watercolor")
        .unwrap();
    let second = app
        .save_transformed_image(&original, &original, "no-such-style")
        .unwrap();
    assert_eq!(second.style_name, "Custom");

    // A fresh facade over the same directory sees the same collection.
    let reopened = Toonify::from_config(&config, DiagnosticSink::none());
    let items = reopened.get_gallery_items();
    assert_eq!(items, vec![second.clone(), first.clone()]);

    let path = reopened
        .download_image(&first.transformed, &first.download_name())
        .unwrap();
    assert!(path.starts_with(root.path().join("downloads")));
    assert_eq!(
        std::fs::read(&path).unwrap(),
        DataUri::parse(&first.transformed).unwrap().into_bytes()
    );

    reopened.delete_gallery_item(&second.id).unwrap();
    reopened.delete_gallery_item("missing").unwrap();
    assert_eq!(app.get_gallery_items(), vec![first]);
    assert!(log.is_empty());
}

#[tokio::test]
async fn test_broken_input_falls_back_and_is_reported() {
    let root = tempfile::tempdir().unwrap();
    let log = DiagnosticLog::new();
    let app = Toonify::from_config(&config(root.path()), log.sink());

    let broken = "data:image/jpeg;base64,/9j/AAAA";
    let output = app.transform(broken, "anime").await;
    assert!(output.is_fallback());
    assert_eq!(output.image, broken);
    assert_eq!(output.notice(), Some("Failed to load image"));
    assert!(matches!(
        log.events()[0],
        Diagnostic::TransformFallback { .. }
    ));
}

#[test]
fn test_corrupt_gallery_file_reads_as_empty() {
    let root = tempfile::tempdir().unwrap();
    let config = config(root.path());
    std::fs::create_dir_all(&config.data_dir).unwrap();
    std::fs::write(config.data_dir.join("toonify-gallery.json"), "[{\"id\":").unwrap();

    let log = DiagnosticLog::new();
    let app = Toonify::from_config(&config, log.sink());
    assert!(app.get_gallery_items().is_empty());
    assert!(matches!(log.events()[0], Diagnostic::StorageCorrupt { .. }));

    app.save_transformed_image("o", "t", "mosaic").unwrap();
    assert_eq!(app.get_gallery_items().len(), 1);
}

use std::{env, fs, path::PathBuf};

use anyhow::Result;
use image::RgbImage;

use classify_server::{
    nn::{classify_path, InferModel},
    render::{render_index, ResultView},
};
use common::{Classification, Prediction, TumorClass};

/// Model stub answering with a fixed prediction.
struct FixedModel(Prediction);

impl InferModel for FixedModel {
    fn run(&self, _input: &RgbImage) -> Result<Prediction> {
        Ok(self.0.clone())
    }
}

fn test_file(name: &str) -> PathBuf {
    let dir = env::temp_dir().join("classify_server_tests");
    fs::create_dir_all(&dir).expect("create test dir");
    dir.join(name)
}

#[test]
fn test_classify_valid_upload() -> Result<(), Box<dyn std::error::Error>> {
    let path = test_file("valid_scan.png");
    RgbImage::new(64, 64).save(&path)?;

    let model = FixedModel(Prediction {
        class: TumorClass::Meningioma,
        confidence: 0.75,
    });

    let classification = classify_path(&model, &path);
    assert_eq!(
        classification,
        Classification::Predicted(Prediction {
            class: TumorClass::Meningioma,
            confidence: 0.75,
        })
    );

    Ok(())
}

#[test]
fn test_classify_corrupt_upload_renders_error() -> Result<(), Box<dyn std::error::Error>> {
    let path = test_file("corrupt_scan.png");
    fs::write(&path, b"this is not an image")?;

    let model = FixedModel(Prediction {
        class: TumorClass::Glioma,
        confidence: 0.9,
    });

    let classification = classify_path(&model, &path);
    let reason = match &classification {
        Classification::Failed(reason) => reason.clone(),
        other => panic!("expected failure, got {:?}", other),
    };
    assert!(!reason.is_empty());

    let view = ResultView::new(&classification, "/static/uploads/corrupt_scan.png?v=1".into());
    assert!(view.predicted_class.starts_with("Error:"));
    assert_eq!(view.confidence, "0.0%");
    assert!(view.tumor_info.is_empty());

    Ok(())
}

#[test]
fn test_classify_missing_file_fails() {
    let model = FixedModel(Prediction {
        class: TumorClass::Glioma,
        confidence: 0.9,
    });

    let classification = classify_path(&model, &test_file("does_not_exist.png"));
    assert!(matches!(classification, Classification::Failed(_)));
}

#[test]
fn test_result_page_for_classified_upload() -> Result<(), Box<dyn std::error::Error>> {
    let path = test_file("page_scan.png");
    RgbImage::new(32, 32).save(&path)?;

    let model = FixedModel(Prediction {
        class: TumorClass::Pituitary,
        confidence: 0.987654,
    });

    let classification = classify_path(&model, &path);
    let view = ResultView::new(&classification, "/static/uploads/page_scan.png?v=42".into());
    let page = render_index(Some(&view));

    assert!(page.contains("Prediction: pituitary"));
    assert!(page.contains("Confidence: 98.77%"));
    assert!(page.contains("/static/uploads/page_scan.png?v=42"));
    assert!(page.contains("pituitary gland"));

    Ok(())
}

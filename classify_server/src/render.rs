//! HTML rendering of the upload page.
//!
use common::Classification;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

/// One classification result, formatted as shown on the page.
#[derive(Debug, PartialEq)]
pub struct ResultView {
    pub predicted_class: String,
    pub confidence: String,
    pub uploaded_image: String,
    pub tumor_info: String,
    pub is_error: bool,
}

impl ResultView {
    pub fn new(classification: &Classification, image_url: String) -> Self {
        match classification {
            Classification::Predicted(prediction) => Self {
                predicted_class: prediction.class.to_string(),
                confidence: format_confidence(prediction.confidence),
                uploaded_image: image_url,
                tumor_info: prediction.class.info().to_owned(),
                is_error: false,
            },
            Classification::Failed(reason) => Self {
                predicted_class: format!("Error: {}", reason),
                confidence: "0.0%".to_owned(),
                uploaded_image: image_url,
                tumor_info: String::new(),
                is_error: true,
            },
        }
    }
}

/// Format a `[0, 1]` confidence as a percentage with two decimals.
pub fn format_confidence(confidence: f32) -> String {
    format!("{:.2}%", confidence * 100.0)
}

/// Render the upload page, empty or with a classification result.
pub fn render_index(result: Option<&ResultView>) -> String {
    let result_html = match result {
        None => String::new(),
        Some(view) if view.is_error => format!(
            r#"<div class="result error">
        <h2>{}</h2>
        <p class="confidence">Confidence: {}</p>
        <img src="{}" alt="Uploaded scan">
      </div>"#,
            escape_html(&view.predicted_class),
            view.confidence,
            escape_html(&view.uploaded_image),
        ),
        Some(view) => format!(
            r#"<div class="result">
        <h2>Prediction: {}</h2>
        <p class="confidence">Confidence: {}</p>
        <img src="{}" alt="Uploaded scan">
        <p class="info">{}</p>
      </div>"#,
            escape_html(&view.predicted_class),
            view.confidence,
            escape_html(&view.uploaded_image),
            escape_html(&view.tumor_info),
        ),
    };

    INDEX_TEMPLATE.replace("{{result}}", &result_html)
}

/// Escape text interpolated into the page.
fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

//! Neural-network plumbing around the tumor classifier.
//!
use std::path::Path;

use anyhow::{ensure, Context, Result};
use image::RgbImage;
use ndarray::s;
use smallvec::SmallVec;
use tract_onnx::prelude::*;

use common::{Classification, Prediction, TumorClass};

type NnModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;
type NnOut = SmallVec<[TValue; 4]>;

/// Edge length the classifier expects its input scaled to.
const INPUT_WIDTH: u32 = 150;
const INPUT_HEIGHT: u32 = 150;

/// Something that maps an RGB image to a tumor prediction.
pub trait InferModel {
    fn run(&self, input: &RgbImage) -> Result<Prediction>;
}

/// Pre-trained CNN classifying brain MRI scans into [`TumorClass`] categories.
///
/// The ONNX graph is loaded and optimized once; the resulting plan is
/// immutable and shared read-only for the process lifetime.
pub struct TumorClassModel {
    model: NnModel,
}

impl TumorClassModel {
    /// Load and optimize the classifier from an ONNX file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let input_fact = InferenceFact::dt_shape(
            f32::datum_type(),
            tvec!(1, INPUT_HEIGHT as i32, INPUT_WIDTH as i32, 3),
        );
        let model = tract_onnx::onnx()
            .model_for_path(path)
            .with_context(|| format!("reading classifier model from {}", path.display()))?
            .with_input_fact(0, input_fact)?
            .into_optimized()?
            .into_runnable()?;

        log::info!("Loaded classifier model from {}", path.display());

        Ok(Self { model })
    }

    fn postproc(&self, raw_nn_out: NnOut) -> Result<Prediction> {
        let probabilities = raw_nn_out[0]
            .to_array_view::<f32>()?
            .slice(s![0, ..])
            .to_vec();

        argmax_prediction(&probabilities)
    }
}

impl InferModel for TumorClassModel {
    fn run(&self, input: &RgbImage) -> Result<Prediction> {
        let valid_input = tvec!(preprocess(input).into());
        let raw_nn_out = self.model.run(valid_input)?;
        self.postproc(raw_nn_out)
    }
}

/// Scale an image to the fixed input size and pack it into an NHWC tensor.
///
/// Pixel values are scaled by 1/255 into `[0, 1]`; the leading dimension is
/// the batch dimension of size one.
pub fn preprocess(input: &RgbImage) -> Tensor {
    let resized: RgbImage = image::imageops::resize(
        input,
        INPUT_WIDTH,
        INPUT_HEIGHT,
        image::imageops::FilterType::Triangle,
    );

    tract_ndarray::Array4::from_shape_fn(
        (1, INPUT_HEIGHT as usize, INPUT_WIDTH as usize, 3),
        |(_, y, x, c)| resized[(x as _, y as _)][c] as f32 / 255.0,
    )
    .into()
}

/// Pick the most probable class from the classifier output vector.
pub fn argmax_prediction(probabilities: &[f32]) -> Result<Prediction> {
    ensure!(
        probabilities.len() == TumorClass::ALL.len(),
        "classifier returned {} scores for {} classes",
        probabilities.len(),
        TumorClass::ALL.len(),
    );

    let (index, confidence) = probabilities
        .iter()
        .cloned()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
        .unwrap();

    // from_index cannot fail after the length check above
    let class = TumorClass::from_index(index).unwrap();

    Ok(Prediction { class, confidence })
}

/// Decode the saved upload and run it through the classifier.
///
/// Decode and inference failures are folded into [`Classification::Failed`]
/// so the page can show the reason in place of a prediction.
pub fn classify_path(model: &dyn InferModel, path: &Path) -> Classification {
    let outcome = image::open(path)
        .map_err(anyhow::Error::from)
        .and_then(|decoded| model.run(&decoded.to_rgb8()));

    match outcome {
        Ok(prediction) => Classification::Predicted(prediction),
        Err(err) => Classification::Failed(err.to_string()),
    }
}

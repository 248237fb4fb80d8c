// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! BlazePose landmark model on ONNX Runtime
//!
//! The model takes a letterboxed square RGB image and emits 39 landmark rows
//! of `[x, y, z, visibility, presence]` in input pixels (33 body landmarks
//! plus auxiliary points) and a single pose-presence score.

use anyhow::Context;
use image::RgbImage;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::detector::{DetectorError, PoseDetector};
use super::landmarks::{Landmark, LandmarkSet, PoseLandmark};
use super::preprocessing::{preprocess_for_pose, LetterboxInfo, TensorLayout};

/// Values per landmark row in the model output
const VALUES_PER_LANDMARK: usize = 5;

/// Options for building the ONNX pose detector
#[derive(Debug, Clone)]
pub struct OnnxPoseOptions {
    /// Square input size in pixels
    pub input_size: u32,
    /// Input tensor layout
    pub layout: TensorLayout,
    /// Pose presence below this means nobody is in frame
    pub min_presence: f32,
    /// Presence output is a raw logit and needs a sigmoid
    pub presence_is_logit: bool,
    /// ONNX Runtime intra-op threads
    pub intra_threads: usize,
}

impl Default for OnnxPoseOptions {
    fn default() -> Self {
        Self {
            input_size: super::preprocessing::POSE_INPUT_SIZE,
            layout: TensorLayout::Nhwc,
            min_presence: 0.5,
            presence_is_logit: true,
            intra_threads: 4,
        }
    }
}

/// Pose landmark detector backed by an ONNX Runtime session
///
/// Runs on CPU. The session is not reentrant, so concurrent callers queue on
/// the mutex.
#[derive(Clone)]
pub struct OnnxPoseDetector {
    session: Arc<Mutex<Session>>,
    input_name: String,
    options: OnnxPoseOptions,
}

impl std::fmt::Debug for OnnxPoseDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxPoseDetector")
            .field("input_name", &self.input_name)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl OnnxPoseDetector {
    /// Load the pose landmark model from a file
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - ONNX Runtime initialization fails
    pub fn new<P: AsRef<Path>>(model_path: P, options: OnnxPoseOptions) -> Result<Self, DetectorError> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            return Err(DetectorError::ModelNotFound(model_path.display().to_string()));
        }

        info!("Loading pose landmark model from {}", model_path.display());

        let session = build_session(model_path, options.intra_threads).map_err(|e| {
            DetectorError::Session(format!("{}: {:#}", model_path.display(), e))
        })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "input_1".to_string());

        debug!(
            input = %input_name,
            outputs = session.outputs.len(),
            "Pose model loaded"
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            options,
        })
    }

    pub fn options(&self) -> &OnnxPoseOptions {
        &self.options
    }

    /// Runs the session and returns (landmark rows, presence score)
    fn infer(&self, image: &RgbImage) -> Result<(Vec<f32>, Option<f32>, LetterboxInfo), DetectorError> {
        let (tensor, letterbox) =
            preprocess_for_pose(image, self.options.input_size, self.options.layout);
        let input = Tensor::from_array(tensor).map_err(|e| DetectorError::Inference(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| DetectorError::Inference("pose session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(|e| DetectorError::Inference(e.to_string()))?;

        // Output names differ between exports, so pick outputs by shape
        let min_len = PoseLandmark::COUNT * VALUES_PER_LANDMARK;
        let mut rows: Option<Vec<f32>> = None;
        let mut presence: Option<f32> = None;
        for i in 0..outputs.len() {
            let Ok(array) = outputs[i].try_extract_array::<f32>() else {
                continue;
            };
            let len = array.len();
            if len == 1 && presence.is_none() {
                presence = array.iter().next().copied();
            } else if len >= min_len && len % VALUES_PER_LANDMARK == 0 && rows.is_none() {
                rows = Some(array.iter().copied().collect());
            }
        }

        let rows = rows.ok_or_else(|| {
            DetectorError::UnexpectedOutput(format!(
                "no output with at least {} landmark values",
                min_len
            ))
        })?;

        Ok((rows, presence, letterbox))
    }
}

impl PoseDetector for OnnxPoseDetector {
    fn detect(&self, image: &RgbImage) -> Result<Option<LandmarkSet>, DetectorError> {
        let (rows, presence, letterbox) = self.infer(image)?;
        Ok(decode_landmarks(&rows, presence, &letterbox, &self.options))
    }

    fn name(&self) -> &str {
        "blazepose-onnx"
    }
}

/// CPU-only session, same settings as the other vision models
fn build_session(model_path: &Path, intra_threads: usize) -> anyhow::Result<Session> {
    let session = Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CPUExecutionProvider::default().build()])
        .context("Failed to set CPU execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .with_intra_threads(intra_threads)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path)
        .context("Failed to load pose landmark model")?;
    Ok(session)
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Turns raw landmark rows into normalized original-image landmarks.
///
/// Returns `None` when the presence probability is below
/// `options.min_presence` or the rows are too short for a full body. A
/// missing presence output counts as present.
pub fn decode_landmarks(
    rows: &[f32],
    presence: Option<f32>,
    letterbox: &LetterboxInfo,
    options: &OnnxPoseOptions,
) -> Option<LandmarkSet> {
    let presence = match presence {
        Some(score) if options.presence_is_logit => sigmoid(score),
        Some(score) => score,
        None => 1.0,
    };
    if presence < options.min_presence {
        debug!(presence, "No pose in frame");
        return None;
    }

    if rows.len() < PoseLandmark::COUNT * VALUES_PER_LANDMARK {
        return None;
    }

    let landmarks = rows
        .chunks_exact(VALUES_PER_LANDMARK)
        .take(PoseLandmark::COUNT)
        .map(|row| {
            let (x, y) = letterbox.to_original_normalized(row[0], row[1]);
            let z = if letterbox.scale > 0.0 && letterbox.original_width > 0 {
                Some((row[2] / letterbox.scale / letterbox.original_width as f32) as f64)
            } else {
                None
            };
            Landmark {
                x: x as f64,
                y: y as f64,
                z,
                visibility: Some(sigmoid(row[3]) as f64),
            }
        })
        .collect::<Vec<_>>();

    Some(LandmarkSet::new(landmarks))
}

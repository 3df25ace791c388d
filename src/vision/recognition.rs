//! PaddleOCR text recognition
//!
//! Reads the text inside each detected region with the CRNN recognition
//! model and greedy CTC decoding.

use anyhow::{Context, Result};
use image::DynamicImage;
use ndarray::{ArrayViewD, Axis, Ix2};
use std::path::Path;
use tracing::debug;

use super::models::OnnxSession;
use super::preprocess::{resize_for_recognition, to_nchw, PreprocessConfig};
use super::{BoundingBox, Recognition, TextRecognizer};

/// CTC blank class
const BLANK_INDEX: usize = 0;

/// Text recognizer backed by the PaddleOCR recognition model
pub struct PaddleRecognizer {
    session: OnnxSession,
    /// Class index -> character; index 0 is the CTC blank
    dictionary: Vec<char>,
    preprocess: PreprocessConfig,
}

impl PaddleRecognizer {
    /// Load the recognition model and its character dictionary
    pub fn new(model_path: &Path, dict_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(dict_path)
            .with_context(|| format!("Failed to read dictionary {}", dict_path.display()))?;
        let dictionary = parse_dictionary(&content);
        debug!("Loaded character dictionary with {} classes", dictionary.len());

        let session = OnnxSession::new(model_path).context("Failed to load recognition model")?;

        Ok(Self {
            session,
            dictionary,
            preprocess: PreprocessConfig::default(),
        })
    }

    fn recognize_one(&mut self, image: &DynamicImage, bbox: &BoundingBox) -> Result<(String, f32)> {
        let Some((x, y, width, height)) = bbox.pixel_rect(image.width(), image.height()) else {
            return Ok((String::new(), 0.0));
        };

        let crop = image.crop_imm(x, y, width, height).to_rgb8();
        let resized = resize_for_recognition(
            &crop,
            self.preprocess.rec_target_height,
            self.preprocess.rec_max_width,
        );
        let tensor = to_nchw(&resized, &self.preprocess.rec_mean, &self.preprocess.rec_std);

        let output = self.session.run(tensor).context("Text recognition failed")?;
        ctc_decode(output.view(), &self.dictionary)
    }
}

impl TextRecognizer for PaddleRecognizer {
    fn recognize(&mut self, image: &DynamicImage, boxes: &[BoundingBox]) -> Result<Vec<Recognition>> {
        let mut results = Vec::with_capacity(boxes.len());

        for bbox in boxes {
            let (text, confidence) = self.recognize_one(image, bbox)?;
            debug!("Recognized {} chars (confidence {:.2})", text.chars().count(), confidence);
            results.push(Recognition {
                bbox: *bbox,
                text,
                confidence,
            });
        }

        Ok(results)
    }
}

/// Build the class table from a dictionary file: one character per line.
///
/// Index 0 is reserved for the CTC blank and a space class is appended,
/// matching how PaddleOCR exports its English recognizer.
pub fn parse_dictionary(content: &str) -> Vec<char> {
    let mut dictionary = vec!['\0'];
    dictionary.extend(
        content
            .lines()
            .filter_map(|line| line.trim_end_matches('\r').chars().next()),
    );
    dictionary.push(' ');
    dictionary
}

/// Greedy CTC decoding: best class per timestep, collapse repeats, drop blanks.
///
/// Accepts `[1, T, C]` or `[T, C]` outputs. Confidence is the mean of the
/// kept characters' probabilities.
pub fn ctc_decode(output: ArrayViewD<f32>, dictionary: &[char]) -> Result<(String, f32)> {
    let mut probs = output;
    while probs.ndim() > 2 {
        probs = probs.index_axis_move(Axis(0), 0);
    }
    let probs = probs
        .into_dimensionality::<Ix2>()
        .context("Unexpected recognition output shape")?;

    let mut text = String::new();
    let mut total = 0.0f32;
    let mut kept = 0usize;
    let mut prev: Option<usize> = None;

    for step in probs.outer_iter() {
        let (best, best_prob) = step
            .iter()
            .enumerate()
            .fold((BLANK_INDEX, f32::NEG_INFINITY), |acc, (i, &p)| {
                if p > acc.1 {
                    (i, p)
                } else {
                    acc
                }
            });

        if best != BLANK_INDEX && Some(best) != prev {
            if let Some(&ch) = dictionary.get(best) {
                text.push(ch);
                total += best_prob;
                kept += 1;
            }
        }
        prev = Some(best);
    }

    let confidence = if kept == 0 { 0.0 } else { (total / kept as f32).min(1.0) };
    Ok((text, confidence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn one_hot(steps: &[usize], classes: usize) -> Array3<f32> {
        let mut output = Array3::<f32>::from_elem((1, steps.len(), classes), 0.01);
        for (t, &c) in steps.iter().enumerate() {
            output[[0, t, c]] = 0.9;
        }
        output
    }

    #[test]
    fn test_parse_dictionary_reserves_blank_and_space() {
        let dict = parse_dictionary("A\nB\r\nC\n");
        assert_eq!(dict, vec!['\0', 'A', 'B', 'C', ' ']);
    }

    #[test]
    fn test_ctc_collapses_repeats_and_blanks() {
        let dict = parse_dictionary("A\nB\nC");
        // A A _ A B B _ _ C
        let output = one_hot(&[1, 1, 0, 1, 2, 2, 0, 0, 3], dict.len());

        let (text, confidence) = ctc_decode(output.view().into_dyn(), &dict).unwrap();
        assert_eq!(text, "AABC");
        assert!((confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_ctc_decodes_space_class() {
        let dict = parse_dictionary("A\nB");
        let space = dict.len() - 1;
        let output = one_hot(&[1, space, 2], dict.len());

        let (text, _) = ctc_decode(output.view().into_dyn(), &dict).unwrap();
        assert_eq!(text, "A B");
    }

    #[test]
    fn test_ctc_all_blank_is_empty() {
        let dict = parse_dictionary("A");
        let output = one_hot(&[0, 0, 0], dict.len());

        let (text, confidence) = ctc_decode(output.view().into_dyn(), &dict).unwrap();
        assert!(text.is_empty());
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn test_missing_dictionary_errors() {
        let result = PaddleRecognizer::new(
            Path::new("/nonexistent/rec.onnx"),
            Path::new("/nonexistent/dict.txt"),
        );
        assert!(result.is_err());
    }
}

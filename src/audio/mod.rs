//! Prompt audio handling.
//!
//! Reference recordings used for voice cloning arrive at arbitrary sample
//! rates and channel counts. They are folded to mono, resampled to the rate
//! the cloning model expects, trimmed, peak-normalized and padded before
//! being handed to the model. Synthesized chunks are joined back together
//! with [`postprocess::concat_chunks`].

pub mod postprocess;
pub mod wav;

use std::path::Path;

pub use postprocess::{
    concat_chunks, normalize_peak, pad_silence, prepare_prompt, resample, to_mono,
    trim_silence,
};
pub use wav::read_wav;

#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
    #[error("Failed to create resampler: {0}")]
    ResamplerConstruction(#[from] rubato::ResamplerConstructionError),
    #[error("Resampling failed: {0}")]
    Resample(#[from] rubato::ResampleError),
    #[error("Audio contains no samples")]
    Empty,
}

/// A block of audio samples.
///
/// Samples are interleaved when `channels > 1` and lie in `[-1.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioClip {
    /// A single-channel clip.
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            channels: 1,
        }
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Write the audio to a 32-bit float WAV file.
    pub fn write_wav(&self, path: &Path) -> Result<(), AudioError> {
        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(path, spec)?;
        for &sample in &self.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(())
    }
}

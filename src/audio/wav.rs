use std::path::Path;

use super::{AudioClip, AudioError};

/// Read a WAV file into an [`AudioClip`].
///
/// Integer PCM is scaled to `[-1.0, 1.0]` by its bit depth; float WAVs are
/// taken as is. Channels stay interleaved.
pub fn read_wav(path: &Path) -> Result<AudioClip, AudioError> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    if samples.is_empty() {
        return Err(AudioError::Empty);
    }

    log::debug!(
        "Read {} samples ({} ch @ {}Hz) from {}",
        samples.len(),
        spec.channels,
        spec.sample_rate,
        path.display()
    );

    Ok(AudioClip {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

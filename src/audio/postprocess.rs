use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use crate::config::PromptConfig;

use super::{AudioClip, AudioError};

/// Fold interleaved channels into one by averaging each frame.
pub fn to_mono(clip: &AudioClip) -> AudioClip {
    let channels = clip.channels.max(1) as usize;
    if channels == 1 {
        return AudioClip::mono(clip.samples.clone(), clip.sample_rate);
    }

    let samples = clip
        .samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();

    AudioClip::mono(samples, clip.sample_rate)
}

/// Frames fed to the sinc resampler per call.
const RESAMPLE_CHUNK_FRAMES: usize = 1024;

/// Resample mono audio with a band-limited (windowed-sinc) resampler.
///
/// Content above the Nyquist frequency of the lower rate is filtered out
/// instead of folding back into the audible band. The output is aligned with
/// the input (the filter delay is removed) and holds
/// `ceil(len * dst_rate / src_rate)` samples.
pub fn resample(input: &[f32], src_rate: u32, dst_rate: u32) -> Result<Vec<f32>, AudioError> {
    if src_rate == dst_rate || input.is_empty() || src_rate == 0 || dst_rate == 0 {
        return Ok(input.to_vec());
    }

    let ratio = f64::from(dst_rate) / f64::from(src_rate);
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, RESAMPLE_CHUNK_FRAMES, 1)?;

    let delay = resampler.output_delay();
    let expected = (input.len() as f64 * ratio).ceil() as usize;
    let mut output = Vec::with_capacity(expected + delay + RESAMPLE_CHUNK_FRAMES);

    let mut pos = 0;
    while input.len() - pos >= resampler.input_frames_next() {
        let frames = resampler.input_frames_next();
        let wave_in = [&input[pos..pos + frames]];
        let chunk = resampler.process(&wave_in[..], None)?;
        output.extend_from_slice(&chunk[0]);
        pos += frames;
    }
    if pos < input.len() {
        let wave_in = [&input[pos..]];
        let chunk = resampler.process_partial(Some(&wave_in[..]), None)?;
        output.extend_from_slice(&chunk[0]);
    }
    // Flush the filter tail.
    while output.len() < delay + expected {
        let chunk = resampler.process_partial(None::<&[&[f32]]>, None)?;
        if chunk[0].is_empty() {
            break;
        }
        output.extend_from_slice(&chunk[0]);
    }

    output.drain(..delay.min(output.len()));
    output.resize(expected, 0.0);
    Ok(output)
}

/// Cut leading and trailing silence.
///
/// Frames of `frame_length` samples are centered every `hop_length` samples
/// (zero-padded at the edges). A frame is silent when its mean power is more
/// than `top_db` below the loudest frame. The result spans from the first to
/// the last non-silent frame. Input with no energy is returned unchanged.
pub fn trim_silence(
    samples: &[f32],
    top_db: f32,
    frame_length: usize,
    hop_length: usize,
) -> Vec<f32> {
    if samples.is_empty() || frame_length == 0 || hop_length == 0 {
        return samples.to_vec();
    }

    let powers = frame_powers(samples, frame_length, hop_length);
    let max_power = powers.iter().copied().fold(0.0f32, f32::max);
    if max_power <= 0.0 {
        return samples.to_vec();
    }

    let threshold = max_power * 10f32.powf(-top_db / 10.0);
    let first = powers.iter().position(|&p| p > threshold);
    let last = powers.iter().rposition(|&p| p > threshold);

    match (first, last) {
        (Some(first), Some(last)) => {
            let start = (first * hop_length).min(samples.len());
            let end = ((last + 1) * hop_length).min(samples.len());
            samples[start..end].to_vec()
        }
        _ => samples.to_vec(),
    }
}

fn frame_powers(samples: &[f32], frame_length: usize, hop_length: usize) -> Vec<f32> {
    let half = frame_length / 2;
    let n_frames = 1 + samples.len() / hop_length;

    (0..n_frames)
        .map(|k| {
            let center = k * hop_length;
            let start = center.saturating_sub(half).min(samples.len());
            let end = (center + frame_length - half).min(samples.len());
            let energy: f32 = samples[start..end].iter().map(|s| s * s).sum();
            energy / frame_length as f32
        })
        .collect()
}

/// Scale down so the peak does not exceed `max_amplitude`. Quieter audio is
/// left alone.
pub fn normalize_peak(samples: &mut [f32], max_amplitude: f32) {
    let peak = samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    if peak > max_amplitude {
        let gain = max_amplitude / peak;
        samples.iter_mut().for_each(|s| *s *= gain);
    }
}

/// Append `secs` seconds of silence.
pub fn pad_silence(samples: &mut Vec<f32>, sample_rate: u32, secs: f32) {
    let n = (sample_rate as f32 * secs.max(0.0)) as usize;
    samples.resize(samples.len() + n, 0.0);
}

/// Turn a raw reference recording into prompt audio for voice cloning.
///
/// Mono downmix, resample to `config.sample_rate`, trim silence, cap the
/// peak, then append `pad_secs * target_sample_rate` zeros.
pub fn prepare_prompt(clip: &AudioClip, config: &PromptConfig) -> Result<AudioClip, AudioError> {
    if clip.samples.is_empty() {
        return Err(AudioError::Empty);
    }

    let mono = to_mono(clip);
    if mono.sample_rate != config.sample_rate {
        log::debug!(
            "Resampling prompt audio {}Hz -> {}Hz",
            mono.sample_rate,
            config.sample_rate
        );
    }
    let resampled = resample(&mono.samples, mono.sample_rate, config.sample_rate)?;

    let mut samples = trim_silence(
        &resampled,
        config.top_db,
        config.frame_length,
        config.hop_length,
    );
    normalize_peak(&mut samples, config.max_amplitude);
    // The tail pad is sized by the synthesis output rate, not the prompt
    // rate, so 0.2 s yields 4410 zeros even on 16 kHz prompt audio.
    pad_silence(&mut samples, config.target_sample_rate, config.pad_secs);

    Ok(AudioClip::mono(samples, config.sample_rate))
}

/// Join mono synthesis chunks in order.
pub fn concat_chunks<I>(chunks: I, sample_rate: u32) -> AudioClip
where
    I: IntoIterator<Item = Vec<f32>>,
{
    let mut samples = Vec::new();
    for chunk in chunks {
        samples.extend_from_slice(&chunk);
    }
    AudioClip::mono(samples, sample_rate)
}

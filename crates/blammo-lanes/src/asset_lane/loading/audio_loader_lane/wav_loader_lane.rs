// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::{AudioDecoderLane, ClipLimits};
use blammo_core::asset::AssetKey;
use blammo_core::lane::{Lane, LaneKind};
use blammo_data::assets::SoundData;
use hound::{SampleFormat, WavReader};
use std::{error::Error, io::Cursor};

/// Decodes RIFF/WAVE data with `hound`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WavLoaderLane {
    limits: ClipLimits,
}

impl WavLoaderLane {
    /// Creates a WAV decoder with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a WAV decoder enforcing `limits`.
    pub fn with_limits(limits: ClipLimits) -> Self {
        Self { limits }
    }
}

/// Factor mapping a signed integer sample of `bits` bits into `[-1, 1)`.
fn int_scale(bits: u16) -> f32 {
    let shift = bits.clamp(1, 32) - 1;
    1.0 / (1u64 << shift) as f32
}

impl AudioDecoderLane for WavLoaderLane {
    fn decode(
        &self,
        _key: &AssetKey,
        bytes: &[u8],
    ) -> Result<SoundData, Box<dyn Error + Send + Sync>> {
        let mut reader = WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();
        let channels = self
            .limits
            .check_format(spec.sample_rate, usize::from(spec.channels))?;
        // The header states the length, so oversized clips never get decoded.
        self.limits
            .check_length(u64::from(reader.duration()), spec.sample_rate)?;

        let samples = match spec.sample_format {
            SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
            SampleFormat::Int => {
                let scale = int_scale(spec.bits_per_sample);
                reader
                    .samples::<i32>()
                    .map(|sample| sample.map(|value| value as f32 * scale))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(SoundData {
            samples,
            channels,
            sample_rate: spec.sample_rate,
        })
    }
}

impl Lane for WavLoaderLane {
    fn strategy_name(&self) -> &'static str {
        "WavLoader"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Audio
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::asset_lane::{is_wav, AudioLoaderLane, ClipError};

    pub(crate) fn wav(samples: &[i16], channels: u16) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut bytes = Vec::new();
        {
            let mut writer = hound::WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
            for &sample in samples {
                writer.write_sample(sample).unwrap();
            }
            writer.finalize().unwrap();
        }
        bytes
    }

    fn key() -> AssetKey {
        AssetKey::new("resources/sounds/test.wav")
    }

    #[test]
    fn int_samples_are_scaled_by_bit_depth() {
        assert_eq!(int_scale(8), 1.0 / 128.0);
        assert_eq!(int_scale(16), 1.0 / 32768.0);
        assert_eq!(int_scale(32), 1.0 / 2_147_483_648.0);
    }

    #[test]
    fn stereo_clips_decode_interleaved() {
        let bytes = wav(&[0, 16384, -16384, 32767], 2);
        let sound = WavLoaderLane::new().decode(&key(), &bytes).unwrap();
        assert_eq!((sound.sample_rate, sound.channels), (22050, 2));
        assert_eq!(sound.frames(), 2);
        assert!((sound.samples[1] - 0.5).abs() < 1e-4);
        assert!((sound.samples[2] + 0.5).abs() < 1e-4);
    }

    #[test]
    fn clips_over_the_limit_are_rejected_from_the_header() {
        // 22050 frames at 22050 Hz is one second.
        let bytes = wav(&vec![0; 22050], 1);
        let strict = WavLoaderLane::with_limits(ClipLimits { max_seconds: 0 });
        let err = strict.decode(&key(), &bytes).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ClipError>(),
            Some(ClipError::TooLong { limit: 0, .. })
        ));
        assert!(WavLoaderLane::new().decode(&key(), &bytes).is_ok());
    }

    #[test]
    fn empty_and_invalid_data_fail() {
        let err = WavLoaderLane::new().decode(&key(), &wav(&[], 1)).unwrap_err();
        assert_eq!(err.downcast_ref::<ClipError>(), Some(&ClipError::Empty));
        assert!(WavLoaderLane::new().decode(&key(), &[0, 1, 2, 3, 4]).is_err());
    }

    #[test]
    fn audio_lane_routes_riff_data_to_hound() {
        let bytes = wav(&[1, 2, 3], 1);
        assert!(is_wav(&bytes));
        assert!(!is_wav(b"OggS\0\0\0\0\0\0\0\0"));
        let sound = AudioLoaderLane::new().decode(&key(), &bytes).unwrap();
        assert_eq!(sound.samples.len(), 3);
    }
}

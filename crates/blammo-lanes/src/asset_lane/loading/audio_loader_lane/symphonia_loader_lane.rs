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

use super::{AudioDecoderLane, ClipError, ClipLimits};
use blammo_core::asset::AssetKey;
use blammo_core::lane::{Lane, LaneKind};
use blammo_data::assets::SoundData;
use std::{error::Error, io, io::Cursor};
use symphonia::core::audio::{AudioBufferRef, SampleBuffer};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decodes any container and codec `symphonia` supports.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaLoaderLane {
    limits: ClipLimits,
}

impl SymphoniaLoaderLane {
    /// Creates a decoder with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a decoder enforcing `limits`.
    pub fn with_limits(limits: ClipLimits) -> Self {
        Self { limits }
    }
}

/// Interleaved samples gathered packet by packet.
///
/// The format seen in the track header wins. Streams that leave it out take
/// it from the first decoded packet.
struct Interleaved {
    samples: Vec<f32>,
    sample_rate: Option<u32>,
    channels: Option<usize>,
}

impl Interleaved {
    fn push(&mut self, buffer: AudioBufferRef<'_>, limits: &ClipLimits) -> Result<(), ClipError> {
        let spec = *buffer.spec();
        let sample_rate = *self.sample_rate.get_or_insert(spec.rate);
        let channels = *self.channels.get_or_insert(spec.channels.count());

        let mut scratch = SampleBuffer::<f32>::new(buffer.capacity() as u64, spec);
        scratch.copy_interleaved_ref(buffer);
        self.samples.extend_from_slice(scratch.samples());

        // Streams without a frame count are capped while decoding.
        let frames = self.samples.len() / channels.max(1);
        if frames > 0 {
            limits.check_length(frames as u64, sample_rate)?;
        }
        Ok(())
    }

    fn finish(self, limits: &ClipLimits) -> Result<SoundData, ClipError> {
        let sample_rate = self.sample_rate.unwrap_or(0);
        let channels = limits.check_format(sample_rate, self.channels.unwrap_or(0))?;
        if self.samples.is_empty() {
            return Err(ClipError::Empty);
        }
        Ok(SoundData {
            samples: self.samples,
            channels,
            sample_rate,
        })
    }
}

impl AudioDecoderLane for SymphoniaLoaderLane {
    fn decode(
        &self,
        key: &AssetKey,
        bytes: &[u8],
    ) -> Result<SoundData, Box<dyn Error + Send + Sync>> {
        let mut hint = Hint::new();
        if let Some(extension) = key.extension() {
            hint.with_extension(&extension);
        }
        let stream = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());
        let mut format = symphonia::default::get_probe()
            .format(
                &hint,
                stream,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )?
            .format;

        let track = format.default_track().ok_or(ClipError::NoTrack)?;
        let track_id = track.id;
        let params = track.codec_params.clone();
        if let (Some(frames), Some(sample_rate)) = (params.n_frames, params.sample_rate) {
            self.limits.check_length(frames, sample_rate)?;
        }

        let mut decoder = symphonia::default::get_codecs().make(&params, &DecoderOptions::default())?;
        let mut clip = Interleaved {
            samples: Vec::new(),
            sample_rate: params.sample_rate,
            channels: params.channels.map(|channels| channels.count()),
        };

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            };
            if packet.track_id() != track_id {
                continue;
            }
            match decoder.decode(&packet) {
                Ok(buffer) => clip.push(buffer, &self.limits)?,
                Err(SymphoniaError::DecodeError(reason)) => {
                    log::warn!("Clip '{}': skipping a corrupt packet ({})", key, reason);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(clip.finish(&self.limits)?)
    }
}

impl Lane for SymphoniaLoaderLane {
    fn strategy_name(&self) -> &'static str {
        "SymphoniaLoader"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Audio
    }
}

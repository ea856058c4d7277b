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

//! Defines lanes for decoding audio clips.
//!
//! WAV data goes straight to `hound` and every other container is decoded by
//! `symphonia`. Both lanes hold clips to the same [`ClipLimits`] so a clip is
//! accepted or rejected the same way whichever lane decodes it.

mod symphonia_loader_lane;
mod wav_loader_lane;

pub use symphonia_loader_lane::*;
pub use wav_loader_lane::*;

use blammo_core::asset::AssetKey;
use blammo_core::lane::{Lane, LaneKind};
use blammo_data::assets::SoundData;
use std::error::Error;
use thiserror::Error;

/// Longest clip accepted by default, in seconds.
pub const DEFAULT_MAX_CLIP_SECONDS: u32 = 600;

/// Common trait for all audio decoders.
///
/// The key is passed along so container formats can be hinted from its
/// extension. The bytes stay authoritative.
pub trait AudioDecoderLane: Lane {
    /// Decodes the clip stored under `key` into interleaved `f32` samples.
    fn decode(
        &self,
        key: &AssetKey,
        bytes: &[u8],
    ) -> Result<SoundData, Box<dyn Error + Send + Sync>>;
}

/// Reasons a decoded stream is not a usable clip.
#[derive(Debug, Error, PartialEq)]
pub enum ClipError {
    /// The container holds no track to decode.
    #[error("the stream has no audio track")]
    NoTrack,
    /// Neither the container nor the decoded packets name a sample rate.
    #[error("the stream does not declare a sample rate")]
    UnknownSampleRate,
    /// The stream has no channels.
    #[error("the stream has no channels")]
    NoChannels,
    /// The channel count does not fit a clip.
    #[error("{channels} channels is more than a clip can carry")]
    TooManyChannels {
        /// Channels in the stream.
        channels: usize,
    },
    /// The stream decoded to nothing.
    #[error("the clip holds no samples")]
    Empty,
    /// The clip runs past [`ClipLimits::max_seconds`].
    #[error("the clip is {seconds:.1}s long, over the {limit}s limit")]
    TooLong {
        /// Length of the clip, or of the part decoded so far.
        seconds: f64,
        /// The limit in force.
        limit: u32,
    },
}

/// Bounds a decoded clip must stay within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipLimits {
    /// Longest accepted clip, in seconds.
    pub max_seconds: u32,
}

impl Default for ClipLimits {
    fn default() -> Self {
        Self {
            max_seconds: DEFAULT_MAX_CLIP_SECONDS,
        }
    }
}

impl ClipLimits {
    /// Checks the stream format and returns the channel count as stored in
    /// [`SoundData`].
    pub fn check_format(&self, sample_rate: u32, channels: usize) -> Result<u16, ClipError> {
        if sample_rate == 0 {
            return Err(ClipError::UnknownSampleRate);
        }
        if channels == 0 {
            return Err(ClipError::NoChannels);
        }
        u16::try_from(channels).map_err(|_| ClipError::TooManyChannels { channels })
    }

    /// Checks a clip of `frames` sample frames against the length limit.
    pub fn check_length(&self, frames: u64, sample_rate: u32) -> Result<(), ClipError> {
        if sample_rate == 0 {
            return Err(ClipError::UnknownSampleRate);
        }
        if frames == 0 {
            return Err(ClipError::Empty);
        }
        let seconds = frames as f64 / f64::from(sample_rate);
        if seconds > f64::from(self.max_seconds) {
            return Err(ClipError::TooLong {
                seconds,
                limit: self.max_seconds,
            });
        }
        Ok(())
    }
}

/// Returns `true` if `bytes` start with a RIFF/WAVE header.
pub fn is_wav(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE"
}

/// Routes WAV data to [`WavLoaderLane`] and everything else to
/// [`SymphoniaLoaderLane`].
#[derive(Debug, Default, Clone, Copy)]
pub struct AudioLoaderLane {
    wav: WavLoaderLane,
    fallback: SymphoniaLoaderLane,
}

impl AudioLoaderLane {
    /// Creates a router with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `limits` to both decoders.
    pub fn with_limits(limits: ClipLimits) -> Self {
        Self {
            wav: WavLoaderLane::with_limits(limits),
            fallback: SymphoniaLoaderLane::with_limits(limits),
        }
    }
}

impl AudioDecoderLane for AudioLoaderLane {
    fn decode(
        &self,
        key: &AssetKey,
        bytes: &[u8],
    ) -> Result<SoundData, Box<dyn Error + Send + Sync>> {
        if is_wav(bytes) {
            self.wav.decode(key, bytes)
        } else {
            self.fallback.decode(key, bytes)
        }
    }
}

impl Lane for AudioLoaderLane {
    fn strategy_name(&self) -> &'static str {
        "AudioLoader"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Audio
    }
}

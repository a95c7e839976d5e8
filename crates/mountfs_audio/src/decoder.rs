use std::io::{self, Cursor};

use log::warn;
use mountfs_asset::{AssetError, Result};
use symphonia::core::{
    audio::SampleBuffer,
    codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL},
    errors::Error,
    formats::{FormatOptions, FormatReader, SeekMode, SeekTo},
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
};

pub(crate) fn decoding_failed(error: impl ToString) -> AssetError {
    AssetError::DecodingFailed(error.to_string())
}

/// The first audio track of an encoded file, decoded packet by packet.
pub(crate) struct Track {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: Option<u32>,
    /// Total frame count, if the container records it
    pub frame_count: Option<u64>,
    /// Frames before this timestamp are dropped from decoded packets
    skip_until: Option<u64>,
}

impl Track {
    pub fn open(extension: &str, file_content: Vec<u8>) -> Result<Self> {
        let source =
            MediaSourceStream::new(Box::new(Cursor::new(file_content)), Default::default());
        let mut hint = Hint::new();
        hint.with_extension(extension);

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                source,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(decoding_failed)?;
        let format = probed.format;
        let track = format
            .tracks()
            .iter()
            .find(|track| track.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| decoding_failed("no audio track"))?;
        let track_id = track.id;
        let params = track.codec_params.clone();

        let decoder = symphonia::default::get_codecs()
            .make(&params, &DecoderOptions::default())
            .map_err(decoding_failed)?;
        let sample_rate = params
            .sample_rate
            .ok_or_else(|| decoding_failed("unknown sample rate"))?;
        let channels = params
            .channels
            .and_then(|channels| u16::try_from(channels.count()).ok())
            .ok_or_else(|| decoding_failed("unknown channel layout"))?;

        Ok(Self {
            format,
            decoder,
            track_id,
            sample_rate,
            channels,
            bits_per_sample: params.bits_per_sample,
            frame_count: params.n_frames,
            skip_until: None,
        })
    }

    /// Appends the interleaved samples of the next packet to `out`.
    ///
    /// Returns `false` once the end of the track is reached.
    pub fn decode_next(&mut self, out: &mut Vec<f32>) -> Result<bool> {
        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(Error::IoError(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    return Ok(false)
                }
                Err(e) => return Err(decoding_failed(e)),
            };
            if packet.track_id() != self.track_id {
                continue;
            }

            let skipped_frames = self
                .skip_until
                .map_or(0, |target| target.saturating_sub(packet.ts()));
            let decoded = match self.decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(Error::DecodeError(e)) => {
                    warn!("Skipping undecodable audio packet: {e}");
                    continue;
                }
                Err(e) => return Err(decoding_failed(e)),
            };
            let frames = decoded.frames() as u64;
            if skipped_frames >= frames {
                continue;
            }
            self.skip_until = None;

            let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
            buffer.copy_interleaved_ref(decoded);
            let skipped_samples = usize::try_from(skipped_frames)
                .unwrap_or(usize::MAX)
                .saturating_mul(usize::from(self.channels));
            let samples = buffer.samples().get(skipped_samples..).unwrap_or_default();
            out.extend_from_slice(samples);
            return Ok(true);
        }
    }

    /// Moves the decoding position to the given frame
    pub fn seek(&mut self, frame: u64) -> Result<()> {
        let seeked = self
            .format
            .seek(
                SeekMode::Accurate,
                SeekTo::TimeStamp {
                    ts: frame,
                    track_id: self.track_id,
                },
            )
            .map_err(decoding_failed)?;
        self.decoder.reset();
        self.skip_until = Some(seeked.required_ts);
        Ok(())
    }
}

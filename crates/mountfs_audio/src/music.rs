use mountfs_asset::{Asset, AssetLoader, Result};

use crate::{check_extension, decoder::Track};

/// Audio decoded on demand, packet by packet.
///
/// The stream owns the encoded file content for as long as it is played.
pub struct MusicStream {
    track: Track,
    /// Decoded samples not handed out yet
    pending: Vec<f32>,
    pending_offset: usize,
    frames_played: u64,
    finished: bool,
    pub looping: bool,
}

impl MusicStream {
    /// Prepares an audio file for streaming, using the file extension as a format hint
    ///
    /// # Errors
    ///
    /// Will return an error if the format is not supported or if the header
    /// cannot be decoded
    pub fn from_memory(extension: &str, file_content: Vec<u8>) -> Result<Self> {
        check_extension(extension)?;
        Ok(Self {
            track: Track::open(extension, file_content)?,
            pending: vec![],
            pending_offset: 0,
            frames_played: 0,
            finished: false,
            looping: true,
        })
    }

    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.track.sample_rate
    }

    #[must_use]
    pub fn channels(&self) -> u16 {
        self.track.channels
    }

    /// Total frame count, 0 when the container doesn't record it
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.track.frame_count.unwrap_or(0)
    }

    /// Length of the music in seconds
    #[must_use]
    pub fn time_length(&self) -> f32 {
        self.seconds(self.frame_count())
    }

    /// Position of the music in seconds
    #[must_use]
    pub fn time_played(&self) -> f32 {
        self.seconds(self.frames_played)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[allow(clippy::cast_precision_loss)]
    fn seconds(&self, frames: u64) -> f32 {
        frames as f32 / self.track.sample_rate.max(1) as f32
    }

    /// Moves the play position to the given frame
    ///
    /// # Errors
    ///
    /// Will return an error if the underlying data cannot be sought
    pub fn seek(&mut self, frame: u64) -> Result<()> {
        let frame = match self.track.frame_count {
            Some(frame_count) => frame.min(frame_count),
            None => frame,
        };
        self.track.seek(frame)?;
        self.pending.clear();
        self.pending_offset = 0;
        self.frames_played = frame;
        self.finished = false;
        Ok(())
    }

    /// Decodes the next frames into `out`, interleaved and normalized to
    /// `[-1.0, 1.0]`, wrapping around to the start when looping.
    ///
    /// Returns the number of frames written, which is less than `out` holds
    /// only at the end of non-looping music.
    ///
    /// # Errors
    ///
    /// Will return an error if the data cannot be decoded
    pub fn read_frames(&mut self, out: &mut [f32]) -> Result<usize> {
        let channels = usize::from(self.track.channels.max(1));
        let capacity = out.len() / channels;
        let mut written = 0;
        while written < capacity && !self.finished {
            if self.pending_offset >= self.pending.len() {
                self.pending.clear();
                self.pending_offset = 0;
                if self.track.decode_next(&mut self.pending)? {
                    continue;
                }
                if self.looping && self.frames_played > 0 {
                    self.seek(0)?;
                } else {
                    self.finished = true;
                }
                continue;
            }

            let available = (self.pending.len() - self.pending_offset) / channels;
            let frames = available.min(capacity - written);
            let from = self.pending_offset;
            out[written * channels..(written + frames) * channels]
                .copy_from_slice(&self.pending[from..from + frames * channels]);
            self.pending_offset += frames * channels;
            written += frames;
            self.frames_played += frames as u64;
        }

        Ok(written)
    }
}

impl Asset for MusicStream {
    type Loader = MusicStreamLoader;
}

pub struct MusicStreamSettings {
    pub looping: bool,
}

impl Default for MusicStreamSettings {
    fn default() -> Self {
        Self { looping: true }
    }
}

pub struct MusicStreamLoader;
impl AssetLoader<MusicStream> for MusicStreamLoader {
    type Settings = MusicStreamSettings;

    fn load(
        file_content: &[u8],
        extension: &str,
        settings: &MusicStreamSettings,
    ) -> Result<MusicStream> {
        let mut music = MusicStream::from_memory(extension, file_content.to_vec())?;
        music.looping = settings.looping;
        Ok(music)
    }
}

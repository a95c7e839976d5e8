#![warn(clippy::pedantic)]

use log::debug;
use mountfs_asset::{Asset, AssetError, AssetLoader, Result};

mod decoder;
pub mod music;

use decoder::Track;
pub use music::MusicStream;

/// Extensions of the audio formats that can be decoded
pub const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "wave", "ogg", "mp3", "flac"];

/// Fully decoded audio samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Wave {
    sample_rate: u32,
    channels: u16,
    sample_size: u16,
    /// Interleaved, normalized to `[-1.0, 1.0]`
    samples: Vec<f32>,
}

impl Wave {
    /// Decodes a whole audio file, using the file extension as a format hint
    ///
    /// # Errors
    ///
    /// Will return an error if the format is not supported or if the data
    /// cannot be decoded
    pub fn from_memory(extension: &str, file_content: &[u8]) -> Result<Self> {
        check_extension(extension)?;
        let mut track = Track::open(extension, file_content.to_vec())?;
        let mut samples = Vec::new();
        while track.decode_next(&mut samples)? {}

        Ok(Self {
            sample_rate: track.sample_rate,
            channels: track.channels,
            sample_size: track
                .bits_per_sample
                .and_then(|bits| u16::try_from(bits).ok())
                .unwrap_or(32),
            samples,
        })
    }

    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[must_use]
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Bits per sample of the source data, 32 when the codec doesn't say
    #[must_use]
    pub fn sample_size(&self) -> u16 {
        self.sample_size
    }

    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.samples.len() / usize::from(self.channels.max(1))
    }
}

impl Asset for Wave {
    type Loader = WaveLoader;
}

pub struct WaveLoader;
impl AssetLoader<Wave> for WaveLoader {
    type Settings = ();

    fn load(file_content: &[u8], extension: &str, _settings: &()) -> Result<Wave> {
        let wave = Wave::from_memory(extension, file_content)?;
        debug!(
            "Decoded {} frames of {}Hz audio",
            wave.frame_count(),
            wave.sample_rate()
        );
        Ok(wave)
    }
}

pub(crate) fn check_extension(extension: &str) -> Result<()> {
    if SUPPORTED_EXTENSIONS.contains(&extension) {
        Ok(())
    } else {
        Err(AssetError::UnsupportedFormat(extension.into()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Cursor;

    use hound::{SampleFormat, WavSpec};
    use mountfs_asset::AssetStore;
    use mountfs_vfs::{MemoryArchive, Vfs};

    use super::*;

    /// 16-bit stereo WAV whose left channel counts up and right channel counts down
    pub(crate) fn encoded_wav(frames: i16) -> Vec<u8> {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut encoded = Cursor::new(Vec::new());
        let mut writer = hound::WavWriter::new(&mut encoded, spec).unwrap();
        for frame in 0..frames {
            writer.write_sample(frame * 1024).unwrap();
            writer.write_sample(-frame * 1024).unwrap();
        }
        writer.finalize().unwrap();
        encoded.into_inner()
    }

    #[test]
    fn load_wave() -> Result<()> {
        let wave = WaveLoader::load(&encoded_wav(8), "wav", &())?;
        assert_eq!(wave.sample_rate(), 8000);
        assert_eq!(wave.channels(), 2);
        assert_eq!(wave.sample_size(), 16);
        assert_eq!(wave.frame_count(), 8);
        assert_eq!(wave.samples().len(), 16);
        assert!((wave.samples()[2] - 1024.0 / 32768.0).abs() < f32::EPSILON);
        assert!((wave.samples()[3] + 1024.0 / 32768.0).abs() < f32::EPSILON);
        Ok(())
    }

    #[test]
    fn unsupported_format() {
        assert!(matches!(
            Wave::from_memory("mid", &encoded_wav(1)),
            Err(AssetError::UnsupportedFormat(extension)) if extension == "mid"
        ));
    }

    #[test]
    fn compressed_formats_are_accepted() {
        for extension in ["ogg", "mp3", "flac"] {
            assert!(check_extension(extension).is_ok());
        }
    }

    #[test]
    fn extension_is_only_a_hint() -> Result<()> {
        let wave = Wave::from_memory("ogg", &encoded_wav(3))?;
        assert_eq!(wave.frame_count(), 3);
        Ok(())
    }

    #[test]
    fn corrupted_wave() {
        assert!(matches!(
            Wave::from_memory("wav", b"RIFF\0\0\0\0WAVE"),
            Err(AssetError::DecodingFailed(_))
        ));
    }

    #[test]
    fn load_wave_through_vfs() {
        let mut archive = MemoryArchive::new();
        archive
            .insert_file("sound.wav", encoded_wav(4), None)
            .unwrap();
        let mut vfs = Vfs::new();
        vfs.mount_archive("memory", archive, "assets").unwrap();

        let asset_store = AssetStore::new(vfs);
        let wave = asset_store
            .load_without_storing::<Wave>("assets/sound.wav")
            .unwrap();
        assert_eq!(wave.frame_count(), 4);
        assert!(asset_store
            .load_without_storing::<Wave>("MissingFile.wav")
            .is_err());
    }
}

//! Synthesized audio

/// Audio encodings the relay can receive from a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioEncoding {
    #[default]
    Mp3,
    Wav,
}

impl AudioEncoding {
    /// File extension used for the transient playback file
    pub fn extension(&self) -> &'static str {
        match self {
            AudioEncoding::Mp3 => "mp3",
            AudioEncoding::Wav => "wav",
        }
    }

    /// MIME type requested from the provider
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioEncoding::Mp3 => "audio/mpeg",
            AudioEncoding::Wav => "audio/wav",
        }
    }
}

/// Encoded audio produced by a speech provider
///
/// Lives for a single request: it is written to a transient file, played
/// and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    pub data: Vec<u8>,
    pub encoding: AudioEncoding,
}

impl AudioBuffer {
    pub fn new(data: Vec<u8>, encoding: AudioEncoding) -> Self {
        Self { data, encoding }
    }

    /// MP3 audio, the format returned by ElevenLabs
    pub fn mp3(data: impl Into<Vec<u8>>) -> Self {
        Self::new(data.into(), AudioEncoding::Mp3)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

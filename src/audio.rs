use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sound {
    Typing,
    Right,
    Wrong,
}

impl Sound {
    pub fn file_name(self) -> &'static str {
        match self {
            Sound::Typing => "typing.mp3",
            Sound::Right => "right.mp3",
            Sound::Wrong => "wrong.mp3",
        }
    }
}

/// Where the review session sends its sounds.
pub trait AudioSurface {
    fn play_looping(&mut self, sound: Sound);
    fn play_once(&mut self, sound: Sound);
    fn stop(&mut self, sound: Sound);
}

/// Used when sound is turned off or no output device exists.
#[derive(Debug, Default)]
pub struct Silent;

impl AudioSurface for Silent {
    fn play_looping(&mut self, _sound: Sound) {}
    fn play_once(&mut self, _sound: Sound) {}
    fn stop(&mut self, _sound: Sound) {}
}

fn sound_path(dir: &Path, sound: Sound) -> PathBuf {
    dir.join(sound.file_name())
}

/// Decodes a sound file. Missing or undecodable files are skipped.
fn load_sound(path: &Path) -> Option<Decoder<BufReader<File>>> {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "sound file missing, skipping");
        return None;
    }
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "unable to open sound");
            return None;
        }
    };
    match Decoder::new(BufReader::new(file)) {
        Ok(source) => Some(source),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "unable to decode sound");
            None
        }
    }
}

/// Plays the sound files in `dir` on the default output device.
///
/// Each looping sound owns a `Sink` until it is stopped. One-shot sounds
/// are detached and play to the end.
pub struct SoundFiles {
    dir: PathBuf,
    // Dropping the stream silences every sink created from its handle.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    looping: HashMap<Sound, Sink>,
}

impl SoundFiles {
    /// Opens the default output device, or `None` when there is none.
    pub fn open(dir: impl Into<PathBuf>) -> Option<Self> {
        match OutputStream::try_default() {
            Ok((stream, handle)) => Some(Self {
                dir: dir.into(),
                _stream: stream,
                handle,
                looping: HashMap::new(),
            }),
            Err(err) => {
                tracing::debug!(error = %err, "no audio output, sounds disabled");
                None
            }
        }
    }

    fn start(&self, sound: Sound, repeat: bool) -> Option<Sink> {
        let source = load_sound(&sound_path(&self.dir, sound))?;
        let sink = match Sink::try_new(&self.handle) {
            Ok(sink) => sink,
            Err(err) => {
                tracing::warn!(?sound, error = %err, "unable to play sound");
                return None;
            }
        };
        if repeat {
            sink.append(source.repeat_infinite());
        } else {
            sink.append(source);
        }
        Some(sink)
    }
}

impl AudioSurface for SoundFiles {
    fn play_looping(&mut self, sound: Sound) {
        if self.looping.contains_key(&sound) {
            return;
        }
        if let Some(sink) = self.start(sound, true) {
            self.looping.insert(sound, sink);
        }
    }

    fn play_once(&mut self, sound: Sound) {
        if let Some(sink) = self.start(sound, false) {
            sink.detach();
        }
    }

    fn stop(&mut self, sound: Sound) {
        if let Some(sink) = self.looping.remove(&sound) {
            sink.stop();
        }
    }
}

pub fn audio_for(sound_enabled: bool, sounds_dir: Option<&Path>) -> Box<dyn AudioSurface> {
    if !sound_enabled {
        return Box::new(Silent);
    }
    match sounds_dir.and_then(SoundFiles::open) {
        Some(sounds) => Box::new(sounds),
        None => Box::new(Silent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn sound_file_names() {
        assert_eq!(
            sound_path(Path::new("sounds"), Sound::Right),
            Path::new("sounds/right.mp3")
        );
        assert_eq!(Sound::Typing.file_name(), "typing.mp3");
        assert_eq!(Sound::Wrong.file_name(), "wrong.mp3");
    }

    #[test]
    fn missing_sound_file_is_skipped() {
        let dir = tempdir().unwrap();
        assert!(load_sound(&sound_path(dir.path(), Sound::Typing)).is_none());
    }

    #[test]
    fn undecodable_sound_file_is_skipped() {
        let dir = tempdir().unwrap();
        let path = sound_path(dir.path(), Sound::Right);
        fs::write(&path, "not audio").unwrap();
        assert!(load_sound(&path).is_none());
    }

    #[test]
    fn silent_accepts_every_call() {
        let mut audio = audio_for(false, None);
        audio.play_looping(Sound::Typing);
        audio.play_once(Sound::Right);
        audio.stop(Sound::Typing);
    }
}

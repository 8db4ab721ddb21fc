use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use thiserror::Error;

pub const DEFAULT_PLAYER: &str = "mpv --no-video --loop=inf --really-quiet";
pub const DEFAULT_TRACK: &str = "bar-music.mp3";

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Music track not found: {0}")]
    MissingTrack(PathBuf),

    #[error("No player command configured")]
    NoPlayer,

    #[error("Could not start player '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Could not stop player: {0}")]
    Stop(std::io::Error),
}

/// Something that can start and stop the background track.
pub trait AudioOutput: Send {
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self) -> Result<(), AudioError>;
}

/// Plays the track through an external command line player, the same way
/// links are handed to `xdg-open`. Pausing stops the process; playing again
/// starts the track over.
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
    track: PathBuf,
    child: Option<Child>,
}

impl CommandPlayer {
    /// `command_line` is split on whitespace; the track path is appended.
    pub fn new(command_line: &str, track: PathBuf) -> Result<Self, AudioError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(AudioError::NoPlayer)?;
        Ok(Self {
            program,
            args: parts.collect(),
            track,
            child: None,
        })
    }
}

impl AudioOutput for CommandPlayer {
    fn play(&mut self) -> Result<(), AudioError> {
        if self.child.is_some() {
            return Ok(());
        }
        if !self.track.exists() {
            return Err(AudioError::MissingTrack(self.track.clone()));
        }
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(&self.track)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| AudioError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        tracing::info!(pid = child.id(), track = %self.track.display(), "music started");
        self.child = Some(child);
        Ok(())
    }

    fn pause(&mut self) -> Result<(), AudioError> {
        if let Some(mut child) = self.child.take() {
            // The player may already have exited on its own.
            if child.try_wait().map_err(AudioError::Stop)?.is_none() {
                child.kill().map_err(AudioError::Stop)?;
            }
            child.wait().map_err(AudioError::Stop)?;
            tracing::info!("music stopped");
        }
        Ok(())
    }
}

impl Drop for CommandPlayer {
    fn drop(&mut self) {
        let _ = self.pause();
    }
}

/// Play/pause toggle over a shared output.
pub struct BackgroundMusic {
    output: Box<dyn AudioOutput>,
    playing: bool,
}

impl BackgroundMusic {
    pub fn new(output: Box<dyn AudioOutput>) -> Self {
        Self {
            output,
            playing: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Label for the control: it names the action, not the state.
    pub fn label(&self) -> &'static str {
        if self.playing {
            "🔇 Mute Music"
        } else {
            "🔊 Play Music"
        }
    }

    /// Flip the flag and drive the output. The flag flips even when the
    /// output fails; the error is returned for reporting only.
    pub fn toggle(&mut self) -> Result<(), AudioError> {
        let result = if self.playing {
            self.output.pause()
        } else {
            self.output.play()
        };
        self.playing = !self.playing;
        result
    }
}

impl Drop for BackgroundMusic {
    fn drop(&mut self) {
        if self.playing {
            let _ = self.output.pause();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<&'static str>>>,
        fail_play: bool,
    }

    impl AudioOutput for Recorder {
        fn play(&mut self) -> Result<(), AudioError> {
            self.calls.lock().unwrap().push("play");
            if self.fail_play {
                return Err(AudioError::NoPlayer);
            }
            Ok(())
        }

        fn pause(&mut self) -> Result<(), AudioError> {
            self.calls.lock().unwrap().push("pause");
            Ok(())
        }
    }

    #[test]
    fn test_toggle_alternates_play_and_pause() {
        let recorder = Recorder::default();
        let mut music = BackgroundMusic::new(Box::new(recorder.clone()));
        assert!(!music.is_playing());
        assert_eq!(music.label(), "🔊 Play Music");

        music.toggle().unwrap();
        assert!(music.is_playing());
        assert_eq!(music.label(), "🔇 Mute Music");

        music.toggle().unwrap();
        assert!(!music.is_playing());
        assert_eq!(*recorder.calls.lock().unwrap(), vec!["play", "pause"]);
    }

    #[test]
    fn test_failed_play_still_flips() {
        let recorder = Recorder {
            fail_play: true,
            ..Recorder::default()
        };
        let mut music = BackgroundMusic::new(Box::new(recorder));
        assert!(music.toggle().is_err());
        assert!(music.is_playing());
    }

    #[test]
    fn test_drop_while_playing_pauses() {
        let recorder = Recorder::default();
        let mut music = BackgroundMusic::new(Box::new(recorder.clone()));
        music.toggle().unwrap();
        drop(music);
        assert_eq!(*recorder.calls.lock().unwrap(), vec!["play", "pause"]);

        let idle = Recorder::default();
        drop(BackgroundMusic::new(Box::new(idle.clone())));
        assert!(idle.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_command_player_parses_command_line() {
        let player = CommandPlayer::new("mpv --no-video  --loop=inf", PathBuf::from("x.mp3")).unwrap();
        assert_eq!(player.program, "mpv");
        assert_eq!(player.args, vec!["--no-video", "--loop=inf"]);
    }

    #[test]
    fn test_command_player_rejects_empty_command() {
        assert!(matches!(
            CommandPlayer::new("   ", PathBuf::from("x.mp3")),
            Err(AudioError::NoPlayer)
        ));
    }

    #[test]
    fn test_missing_track_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let track = dir.path().join("nope.mp3");
        let mut player = CommandPlayer::new("true", track.clone()).unwrap();
        match player.play() {
            Err(AudioError::MissingTrack(p)) => assert_eq!(p, track),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(player.pause().is_ok());
    }
}

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::GameError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SoundEvent {
    Eat,
    GameOver,
    Start,
}

impl SoundEvent {
    pub fn key(self) -> &'static str {
        match self {
            SoundEvent::Eat => "eat",
            SoundEvent::GameOver => "game_over",
            SoundEvent::Start => "start",
        }
    }
}

pub trait SoundPlayer {
    /// Fire-and-forget. A disabled player or a missing asset is not an error.
    fn play(&mut self, event: SoundEvent) -> Result<(), GameError>;

    fn set_enabled(&mut self, enabled: bool);

    fn is_enabled(&self) -> bool;
}

/// Plays `<assets_dir>/<key>.mp3` for each event.
pub struct Mixer {
    enabled: bool,
    assets_dir: PathBuf,
    #[cfg(feature = "audio")]
    output: Option<backend::Output>,
}

impl Mixer {
    /// The output device is opened on the first sound that has an asset.
    pub fn new(assets_dir: &Path, enabled: bool) -> Self {
        Mixer {
            enabled,
            assets_dir: assets_dir.to_path_buf(),
            #[cfg(feature = "audio")]
            output: None,
        }
    }

    pub fn asset_path(&self, event: SoundEvent) -> PathBuf {
        self.assets_dir.join(format!("{}.mp3", event.key()))
    }
}

impl SoundPlayer for Mixer {
    fn play(&mut self, event: SoundEvent) -> Result<(), GameError> {
        if !self.enabled {
            return Ok(());
        }

        let path = self.asset_path(event);
        if !path.is_file() {
            debug!(sound = event.key(), path = %path.display(), "sound asset missing, skipped");
            return Ok(());
        }

        #[cfg(feature = "audio")]
        {
            if self.output.is_none() {
                self.output = Some(backend::Output::open()?);
            }
            if let Some(output) = &self.output {
                output.play_file(&path)?;
            }
        }

        #[cfg(not(feature = "audio"))]
        debug!(sound = event.key(), "built without audio support, skipped");

        Ok(())
    }

    fn set_enabled(&mut self, enabled: bool) {
        info!(enabled, "sound toggled");
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(feature = "audio")]
mod backend {
    use std::fs::File;
    use std::io::BufReader;
    use std::path::Path;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use tracing::warn;

    use crate::error::GameError;

    pub struct Output {
        _stream: OutputStream,
        handle: OutputStreamHandle,
    }

    impl Output {
        pub fn open() -> Result<Self, GameError> {
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| GameError::Audio(e.to_string()))?;
            Ok(Output { _stream: stream, handle })
        }

        pub fn play_file(&self, path: &Path) -> Result<(), GameError> {
            let file = open_asset(path)?;
            let source = match Decoder::new(file) {
                Ok(source) => source,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "undecodable sound asset, skipped");
                    return Ok(());
                }
            };

            let sink = Sink::try_new(&self.handle).map_err(|e| GameError::Audio(e.to_string()))?;
            sink.append(source);
            sink.detach();
            Ok(())
        }
    }

    pub fn open_asset(path: &Path) -> Result<BufReader<File>, GameError> {
        File::open(path)
            .map(BufReader::new)
            .map_err(|e| GameError::Audio(format!("cannot open {}: {}", path.display(), e)))
    }

}

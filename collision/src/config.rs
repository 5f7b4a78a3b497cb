use crate::mask::PixelTest;
use configparser::ini::Ini;
use std::{
    fmt,
    path::{Path, PathBuf},
};

const SECTION: &str = "Collision";

/// Collision settings stored in an INI file under `[Collision]`.
///
/// The defaults reproduce the default pixel test: a pixel is visible when it
/// is not black and its alpha is above zero.
pub struct CollisionConfig {
    pub alpha_threshold: u8,
    pub ignore_black: bool,
    pub use_caching: bool,
    config: Ini,
    path: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(String),
    Write(std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "invalid collision config: {}", e),
            ConfigError::Write(e) => write!(f, "could not write collision config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(_) => None,
            ConfigError::Write(e) => Some(e),
        }
    }
}

impl CollisionConfig {
    /// Reads settings from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Ini::new();
        if !path.exists() {
            log::debug!("No config at \"{}\", using defaults", path.display());
            return Ok(Self::with_ini(config, path));
        }

        config.load(path).map_err(ConfigError::Parse)?;
        let alpha_threshold = config
            .getuint(SECTION, "AlphaThreshold")
            .map_err(ConfigError::Parse)?
            .unwrap_or(0);
        let alpha_threshold = u8::try_from(alpha_threshold).map_err(|_| {
            ConfigError::Parse(format!("AlphaThreshold {} is above 255", alpha_threshold))
        })?;
        let ignore_black = config
            .getbool(SECTION, "IgnoreBlack")
            .map_err(ConfigError::Parse)?
            .unwrap_or(true);
        let use_caching = config
            .getbool(SECTION, "UseCaching")
            .map_err(ConfigError::Parse)?
            .unwrap_or(true);

        Ok(CollisionConfig {
            alpha_threshold,
            ignore_black,
            use_caching,
            config,
            path: PathBuf::from(path),
        })
    }

    fn with_ini(config: Ini, path: &Path) -> Self {
        CollisionConfig {
            alpha_threshold: 0,
            ignore_black: true,
            use_caching: true,
            config,
            path: PathBuf::from(path),
        }
    }

    /// The pixel test described by these settings.
    pub fn pixel_test(&self) -> PixelTest {
        let alpha_threshold = self.alpha_threshold;
        let ignore_black = self.ignore_black;
        Box::new(move |r, g, b, a| {
            let lit = !ignore_black || (r as u32 + g as u32 + b as u32) > 0;
            lit && a > alpha_threshold
        })
    }

    pub fn write_to_disk(&mut self) -> Result<(), ConfigError> {
        self.config.set(
            SECTION,
            "AlphaThreshold",
            Some(self.alpha_threshold.to_string()),
        );
        self.config
            .set(SECTION, "IgnoreBlack", Some(self.ignore_black.to_string()));
        self.config
            .set(SECTION, "UseCaching", Some(self.use_caching.to_string()));
        self.config.write(&self.path).map_err(ConfigError::Write)
    }
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self::with_ini(Ini::new(), Path::new("config.ini"))
    }
}

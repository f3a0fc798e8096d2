//! Generator configuration.
//!
//! Built in three layers: defaults, then environment, then command-line
//! flags. Later layers win.

use std::path::PathBuf;

use thiserror::Error;

/// Default Java package of the hand-written runtime.
pub const DEFAULT_RUNTIME_PACKAGE: &str = "org.nbind.runtime";

/// Default output directory.
pub const DEFAULT_OUT_DIR: &str = "generated";

/// Environment override for [`GeneratorConfig::runtime_package`].
pub const RUNTIME_PACKAGE_ENV: &str = "NBIND_RUNTIME_PACKAGE";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Scan manifest (JSON).
    pub manifest: PathBuf,
    /// Root of the generated source tree.
    pub out_dir: PathBuf,
    /// Package of the runtime support classes.
    pub runtime_package: String,
    /// File whose contents are written before every generated class.
    pub header: Option<PathBuf>,
    /// Emit artifacts on the rayon pool.
    pub parallel: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing manifest path")]
    MissingManifest,
    #[error("`{0}` expects a value")]
    MissingValue(&'static str),
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("unexpected argument `{0}`")]
    UnexpectedArgument(String),
    #[error("`{0}` is not a valid package name")]
    BadPackage(String),
}

impl GeneratorConfig {
    pub fn new(manifest: impl Into<PathBuf>) -> Self {
        GeneratorConfig {
            manifest: manifest.into(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            runtime_package: DEFAULT_RUNTIME_PACKAGE.to_string(),
            header: None,
            parallel: true,
        }
    }

    /// Parse the arguments following `generate`.
    ///
    /// `env` looks up environment variables; the binary passes
    /// `std::env::var(..).ok()`.
    pub fn from_args<F>(args: &[String], env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut manifest = None;
        let mut out_dir = None;
        let mut runtime_package = env(RUNTIME_PACKAGE_ENV).filter(|p| !p.is_empty());
        let mut header = None;
        let mut parallel = true;

        let mut i = 0;
        while i < args.len() {
            let arg = &args[i];
            if arg == "-o" || arg == "--out-dir" {
                let value = args.get(i + 1).ok_or(ConfigError::MissingValue("-o"))?;
                out_dir = Some(PathBuf::from(value));
                i += 2;
                continue;
            }
            if let Some(dir) = arg.strip_prefix("--out-dir=") {
                out_dir = Some(PathBuf::from(dir));
            } else if let Some(pkg) = arg.strip_prefix("--runtime-package=") {
                runtime_package = Some(pkg.to_string());
            } else if let Some(file) = arg.strip_prefix("--header=") {
                header = Some(PathBuf::from(file));
            } else if arg == "--no-parallel" {
                parallel = false;
            } else if arg.starts_with('-') {
                return Err(ConfigError::UnknownOption(arg.clone()));
            } else if manifest.is_none() {
                manifest = Some(PathBuf::from(arg));
            } else {
                return Err(ConfigError::UnexpectedArgument(arg.clone()));
            }
            i += 1;
        }

        let mut config = GeneratorConfig::new(manifest.ok_or(ConfigError::MissingManifest)?);
        if let Some(dir) = out_dir {
            config.out_dir = dir;
        }
        if let Some(pkg) = runtime_package {
            if !is_package_name(&pkg) {
                return Err(ConfigError::BadPackage(pkg));
            }
            config.runtime_package = pkg;
        }
        config.header = header;
        config.parallel = parallel;
        Ok(config)
    }
}

/// Dot-separated Java identifiers.
pub fn is_package_name(s: &str) -> bool {
    !s.is_empty()
        && s.split('.').all(|seg| {
            let mut chars = seg.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        })
}

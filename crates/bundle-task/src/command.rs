//! A bundler backed by an external executable.
//!
//! Each build call spawns the configured program and writes one JSON request
//! to its stdin:
//!
//! ```json
//! {
//!   "method": "bundle",
//!   "source": "app/init.js",
//!   "dest": "dist/app.js",
//!   "options": { "minify": true },
//!   "config": { "baseURL": "./app" },
//!   "configFiles": [{ "path": "config.js", "merge": false, "ignoreBaseURL": true }]
//! }
//! ```
//!
//! The program signals success with exit code 0. Anything written to stderr
//! on failure becomes the build error message.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::bundler::ModuleBundler;
use crate::error::{Error, Result};
use crate::options::{BuildMethod, BuildOptions};

/// How to invoke the external bundler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BundlerCommand {
    /// Executable name or path
    #[serde(deserialize_with = "scalar::string")]
    #[schemars(with = "String")]
    pub program: String,

    /// Arguments placed before the request is written to stdin
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Working directory of the spawned process
    #[serde(
        default,
        deserialize_with = "scalar::optional_path",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<PathBuf>")]
    pub cwd: Option<PathBuf>,
}

impl BundlerCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

/// Deserializers for settings that may come from environment variables.
///
/// Layered environment values are typed eagerly, so `true` or `8080` arrive
/// as a bool or a number even where a program name or path is expected.
pub mod scalar {
    use std::path::PathBuf;

    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Bool(bool),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
    }

    impl Scalar {
        fn into_string(self) -> String {
            match self {
                Scalar::Text(text) => text,
                Scalar::Bool(value) => value.to_string(),
                Scalar::Unsigned(value) => value.to_string(),
                Scalar::Signed(value) => value.to_string(),
                Scalar::Float(value) => value.to_string(),
            }
        }
    }

    /// A string, or any scalar rendered as one.
    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Scalar::deserialize(deserializer).map(Scalar::into_string)
    }

    /// An optional path, accepting any scalar.
    pub fn optional_path<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Scalar>::deserialize(deserializer)?
            .map(|value| PathBuf::from(value.into_string())))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoadedConfig {
    path: PathBuf,
    merge: bool,
    #[serde(rename = "ignoreBaseURL")]
    ignore_base_url: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BuildRequest<'a> {
    method: &'a str,
    source: &'a str,
    dest: &'a Path,
    options: &'a BuildOptions,
    config: &'a Map<String, Value>,
    config_files: &'a [LoadedConfig],
}

/// [`ModuleBundler`] that delegates every build to an external program.
#[derive(Debug)]
pub struct CommandBundler {
    program: PathBuf,
    command: BundlerCommand,
    config: Map<String, Value>,
    config_files: Vec<LoadedConfig>,
}

impl CommandBundler {
    /// Locate `command.program` and start from the `builder` configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::BundlerUnavailable` if the program cannot be found.
    pub fn new(command: BundlerCommand, builder: &Map<String, Value>) -> Result<Self> {
        let program = match &command.cwd {
            Some(cwd) => which::which_in(&command.program, std::env::var_os("PATH"), cwd),
            None => which::which(&command.program),
        }
        .map_err(|e| Error::BundlerUnavailable(format!("{}: {}", command.program, e)))?;

        debug!("Using bundler {}", program.display());
        Ok(Self {
            program,
            command,
            config: builder.clone(),
            config_files: Vec::new(),
        })
    }

    /// Configuration accumulated so far.
    pub fn config(&self) -> &Map<String, Value> {
        &self.config
    }

    async fn invoke(
        &self,
        method: BuildMethod,
        source: &str,
        dest: &Path,
        options: &BuildOptions,
    ) -> Result<()> {
        let method_name = method.to_string();
        let request = BuildRequest {
            method: &method_name,
            source,
            dest,
            options,
            config: &self.config,
            config_files: &self.config_files,
        };
        let payload = serde_json::to_vec(&request)
            .map_err(|e| Error::build(source, dest, format!("failed to encode request: {}", e)))?;
        trace!("Bundler request: {}", String::from_utf8_lossy(&payload));

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &self.command.cwd {
            cmd.current_dir(cwd);
        }

        let mut child = cmd.spawn().map_err(|e| {
            Error::BundlerUnavailable(format!("failed to spawn {}: {}", self.program.display(), e))
        })?;

        // Feed stdin while draining stdout and stderr so neither side blocks
        // on a full pipe.
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                // The program may exit without reading its input.
                match stdin.write_all(&payload).await {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                    Err(e) => return Err(e),
                }
            }
            Ok(())
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        fed?;
        let output = output?;
        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = match stderr.trim() {
            "" => format!("bundler exited with {}", output.status),
            trimmed => trimmed.to_string(),
        };
        Err(Error::build(source, dest, message))
    }
}

#[async_trait]
impl ModuleBundler for CommandBundler {
    fn configure(&mut self, config: Value) -> Result<()> {
        match config {
            Value::Object(partial) => {
                self.config.extend(partial);
                Ok(())
            }
            other => Err(Error::InvalidOptions(format!(
                "bundler configuration must be an object, got {}",
                other
            ))),
        }
    }

    async fn load_config(
        &mut self,
        path: &Path,
        merge: bool,
        ignore_base_url: bool,
    ) -> Result<()> {
        let resolved = match &self.command.cwd {
            Some(cwd) if path.is_relative() => cwd.join(path),
            _ => path.to_path_buf(),
        };

        tokio::fs::File::open(&resolved)
            .await
            .map_err(|e| Error::ConfigLoad {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        if !merge {
            self.config_files.clear();
        }
        self.config_files.push(LoadedConfig {
            path: resolved,
            merge,
            ignore_base_url,
        });
        Ok(())
    }

    async fn bundle(&self, source: &str, dest: &Path, options: &BuildOptions) -> Result<()> {
        self.invoke(BuildMethod::Bundle, source, dest, options).await
    }

    async fn build_static(
        &self,
        source: &str,
        dest: &Path,
        options: &BuildOptions,
    ) -> Result<()> {
        self.invoke(BuildMethod::Static, source, dest, options).await
    }
}

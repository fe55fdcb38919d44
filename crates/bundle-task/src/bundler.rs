//! The seam to the external module bundler.

use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::options::{BuildMethod, BuildOptions};

/// An external bundler capability.
///
/// Configuration calls take `&mut self` and happen before any build is
/// dispatched. Build calls take `&self` and may run concurrently against one
/// shared instance.
#[async_trait]
pub trait ModuleBundler: Send + Sync + 'static {
    /// Merge a partial configuration (for example `{"baseURL": ".."}`).
    fn configure(&mut self, config: Value) -> Result<()>;

    /// Load a bundler configuration file.
    ///
    /// With `ignore_base_url` set, a base URL found in the file must not
    /// replace the one applied through [`configure`](Self::configure).
    async fn load_config(&mut self, path: &Path, merge: bool, ignore_base_url: bool)
    -> Result<()>;

    /// Build a bundle that still needs the module loader at runtime.
    async fn bundle(&self, source: &str, dest: &Path, options: &BuildOptions) -> Result<()>;

    /// Build a self-contained artifact.
    async fn build_static(&self, source: &str, dest: &Path, options: &BuildOptions)
    -> Result<()>;

    /// Dispatch to the call matching `method`.
    async fn build(
        &self,
        method: BuildMethod,
        source: &str,
        dest: &Path,
        options: &BuildOptions,
    ) -> Result<()> {
        match method {
            BuildMethod::Bundle => self.bundle(source, dest, options).await,
            BuildMethod::Static => self.build_static(source, dest, options).await,
        }
    }
}

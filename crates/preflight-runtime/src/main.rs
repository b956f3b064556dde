// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! `preflight-runtime <manifest.json> [out_dir]`
//!
//! Loads every resource of a JSON manifest with a progress bar on stderr and
//! writes each decoded blob to `out_dir/<name>`.

use anyhow::{bail, Context, Result};
use preflight_agents::LoadOrchestrator;
use preflight_core::blob::LoadResult;
use preflight_core::config::ManifestConfig;
use preflight_infra::{ReqwestTransport, TerminalSurface};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEFAULT_OUT_DIR: &str = "preflight-out";
const USAGE: &str = "usage: preflight-runtime <manifest.json> [out_dir]";

#[tokio::main]
async fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("reqwest", log::LevelFilter::Warn)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(manifest_path) = args.next() else {
        bail!(USAGE);
    };
    let out_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));

    let (manifest, config) = ManifestConfig::from_path(&manifest_path)?
        .into_parts()
        .with_context(|| format!("Invalid manifest '{manifest_path}'"))?;

    let transport = Arc::new(ReqwestTransport::new()?);
    let surface = Arc::new(TerminalSurface::stderr());
    let orchestrator = LoadOrchestrator::new(manifest, config, transport, surface)?;

    let result = orchestrator.load_all().await?;
    write_blobs(&out_dir, &result)?;

    log::info!(
        "Wrote {} blob(s), {} bytes, to '{}'",
        result.len(),
        result.total_bytes(),
        out_dir.display()
    );
    Ok(())
}

fn write_blobs(out_dir: &Path, result: &LoadResult) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory '{}'", out_dir.display()))?;

    for (name, handle) in result.iter() {
        let Some(file_name) = Path::new(name).file_name() else {
            bail!("Resource name '{name}' is not a valid file name");
        };
        let path = out_dir.join(file_name);
        fs::write(&path, handle.bytes())
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        log::info!("{} -> {} ({})", handle.url(), path.display(), handle.mime_type());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use preflight_core::blob::BlobHandle;

    #[test]
    fn writes_each_blob_under_its_name() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/out");
        let mut result = LoadResult::new();
        result.insert(BlobHandle::new("data", "application/octet-stream", b"level data".to_vec()));
        result.insert(BlobHandle::new("code", "application/wasm", b"\0asm".to_vec()));

        write_blobs(&out, &result).unwrap();

        assert_eq!(fs::read(out.join("data")).unwrap(), b"level data");
        assert_eq!(fs::read(out.join("code")).unwrap(), b"\0asm");
    }

    #[test]
    fn rejects_names_that_are_not_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut result = LoadResult::new();
        result.insert(BlobHandle::new("..", "text/plain", b"x".to_vec()));

        assert!(write_blobs(dir.path(), &result).is_err());
    }
}

// Copyright 2025 Multiclient Authors
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

use anyhow::{Context, Result};
use multiclient_common::GlobalConfig;
use std::path::{Path, PathBuf};

/// Reads and parses a global config file.
pub fn load_global_config(path: &Path) -> Result<GlobalConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read global config {}", path.display()))?;
    GlobalConfig::parse(&text)
        .with_context(|| format!("Invalid global config {}", path.display()))
}

/// One line per liteserver: `<index> <ip>:<port> <key>`.
pub fn list_liteservers(config: &GlobalConfig) -> Result<Vec<String>> {
    let descriptors = config.liteserver_descriptors()?;
    Ok(descriptors
        .iter()
        .enumerate()
        .map(|(index, descriptor)| format!("{} {} {}", index, descriptor, descriptor.id.key))
        .collect())
}

/// File name of the single-liteserver config for `index`.
pub fn split_file_name(index: usize) -> String {
    format!("ls_{}.json", index)
}

/// Writes `<out_dir>/ls_<i>.json` for every liteserver and returns the paths
/// in index order.
///
/// The output directory is created if missing. Existing files with the same
/// names are overwritten.
pub fn write_split_configs(config: &GlobalConfig, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let documents = config.partition()?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(documents.len());
    for (index, document) in documents.iter().enumerate() {
        let path = out_dir.join(split_file_name(index));
        let text = serde_json::to_string_pretty(document)?;
        std::fs::write(&path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!("Wrote {}", path.display());
        written.push(path);
    }

    Ok(written)
}

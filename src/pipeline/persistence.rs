// song files are plain json; the file name is remembered on the Song but not stored in it
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::pipeline::song::Song;

pub fn load_song(path: &Path) -> anyhow::Result<Song> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    let mut song: Song = serde_json::from_str(&data)
        .with_context(|| format!("{} is not a song file", path.display()))?;
    song.normalize();
    song.filename = Some(path.to_path_buf());
    log::info!("loaded song from {}", path.display());
    Ok(song)
}

// Save the song to disk, making the parent directories if they don't exist already
pub fn save_song(path: &Path, song: &Song) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(song)?;
    std::fs::write(path, json).with_context(|| format!("could not write {}", path.display()))?;
    log::info!("saved song to {}", path.display());
    Ok(())
}

// song files in `dir`, sorted by name
pub fn index_songs_in_dir(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("could not list {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e.eq_ignore_ascii_case("json")))
        .collect();
    paths.sort();
    Ok(paths)
}

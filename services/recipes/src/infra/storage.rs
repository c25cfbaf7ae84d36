use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context as _, bail};

use crate::domain::repository::ImageStorage;
use crate::error::RecipeServiceError;

/// Stores uploads as plain files below `root` (the media root).
#[derive(Clone, Debug)]
pub struct FsImageStorage {
    pub root: PathBuf,
}

impl FsImageStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a relative storage path, refusing anything that could escape `root`.
    fn resolve(&self, path: &str) -> anyhow::Result<PathBuf> {
        let relative = Path::new(path);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            bail!("storage path {path:?} is not a plain relative path");
        }
        Ok(self.root.join(relative))
    }
}

impl ImageStorage for FsImageStorage {
    async fn save(&self, path: &str, bytes: &[u8]) -> Result<(), RecipeServiceError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        tokio::fs::write(&target, bytes)
            .await
            .with_context(|| format!("write {}", target.display()))?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), RecipeServiceError> {
        let target = self.resolve(path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("remove {}", target.display()))
                .into()),
        }
    }
}

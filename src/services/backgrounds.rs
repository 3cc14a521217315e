use log::{debug, warn};
use std::path::{Path, PathBuf};
use tokio::fs;

const IMAGE_TYPES: [(&str, &str); 5] = [
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
];

/// Background images kept under `<images dir>/backgrounds`.
#[derive(Debug, Clone)]
pub struct ImageLibrary {
    backgrounds: PathBuf,
}

impl ImageLibrary {
    pub fn new(images_dir: &Path) -> Self {
        Self {
            backgrounds: images_dir.join("backgrounds"),
        }
    }

    /// File names with an allowed image extension. Empty when the directory
    /// is missing.
    pub async fn list(&self) -> Vec<String> {
        let mut entries = match fs::read_dir(&self.backgrounds).await {
            Ok(entries) => entries,
            Err(_) => {
                debug!("No backgrounds directory at {}", self.backgrounds.display());
                return vec![];
            }
        };

        let mut files = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    if content_type(&name).is_some() {
                        files.push(name);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Error while listing {}: {}", self.backgrounds.display(), e);
                    break;
                }
            }
        }
        files.sort();
        debug!("Found {} background images", files.len());
        files
    }

    /// Bytes and content type of one background image.
    pub async fn read(&self, name: &str) -> Option<(Vec<u8>, &'static str)> {
        if name.contains(['/', '\\']) || name.contains("..") {
            warn!("Rejected background image name {:?}", name);
            return None;
        }
        let kind = content_type(name)?;
        let bytes = fs::read(self.backgrounds.join(name)).await.ok()?;
        Some((bytes, kind))
    }
}

fn content_type(name: &str) -> Option<&'static str> {
    let extension = Path::new(name).extension()?.to_str()?.to_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, kind)| *kind)
}

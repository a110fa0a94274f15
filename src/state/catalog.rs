/// Dataset catalog
///
/// Scans the dataset root once at startup and maps each normalized drug
/// name to the images found in that drug's folder:
///
/// ```text
/// root/
///   Paracetamol/   -> "paracetamol" => [a.jpg, b.png]
///   Vitamin-C/     -> "vitaminc"    => [c.jpeg]
/// ```
use rand::seq::{IndexedRandom, IteratorRandom};
use rand::Rng;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::error::AppError;

/// Image extensions recognised inside a drug folder (compared lowercase)
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Derive a catalog key from a folder name or a search query.
///
/// Lowercases, drops hyphens, periods and spaces, then drops anything that is
/// not alphanumeric or an underscore. "Vitamin-C", "vitamin c" and "Vitamin.C"
/// all become "vitaminc".
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '-' | '.' | ' '))
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

/// Uniform pick of one image from a bucket
pub fn pick_random<'a, R: Rng + ?Sized>(paths: &'a [PathBuf], rng: &mut R) -> Option<&'a PathBuf> {
    paths.choose(rng)
}

/// Two folders that normalized to the same key. The later folder won.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub key: String,
    pub replaced: PathBuf,
    pub winner: PathBuf,
}

/// Read-only mapping from catalog key to image paths.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    root: PathBuf,
    buckets: HashMap<String, Vec<PathBuf>>,
    collisions: Vec<Collision>,
}

impl Catalog {
    /// Index every immediate subfolder of `root`.
    ///
    /// Folders are visited in directory-listing order; when two folders share a
    /// key the later one replaces the earlier one and the collision is
    /// recorded. Folders without any image are left out. Entries that cannot
    /// be read are skipped.
    pub fn build(root: &Path) -> Result<Self, AppError> {
        let build_error = |source| AppError::CatalogBuild {
            path: root.to_path_buf(),
            source,
        };

        // Canonical root so every stored path is absolute
        let root = fs::canonicalize(root).map_err(build_error)?;
        fs::read_dir(&root).map_err(build_error)?;

        tracing::info!("Scanning dataset folder: {}", root.display());

        let mut buckets: HashMap<String, Vec<PathBuf>> = HashMap::new();
        let mut owners: HashMap<String, PathBuf> = HashMap::new();
        let mut collisions = Vec::new();

        for entry in WalkDir::new(&root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }

            let folder = entry.path();
            let images = collect_images(folder);
            if images.is_empty() {
                continue;
            }

            let key = normalize(&entry.file_name().to_string_lossy());
            if let Some(previous) = owners.insert(key.clone(), folder.to_path_buf()) {
                tracing::warn!(
                    "Folders '{}' and '{}' both map to '{}'; keeping the latter",
                    previous.display(),
                    folder.display(),
                    key
                );
                collisions.push(Collision {
                    key: key.clone(),
                    replaced: previous,
                    winner: folder.to_path_buf(),
                });
            }
            buckets.insert(key, images);
        }

        let catalog = Catalog {
            root,
            buckets,
            collisions,
        };
        tracing::info!(
            "Indexed {} drugs ({} images)",
            catalog.len(),
            catalog.image_count()
        );

        Ok(catalog)
    }

    /// Images for a raw query, after normalization. Exact key match only.
    pub fn lookup(&self, query: &str) -> Option<&[PathBuf]> {
        self.buckets.get(&normalize(query)).map(Vec::as_slice)
    }

    /// Uniform pick of one drug key and its images
    pub fn random_drug<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(&str, &[PathBuf]), AppError> {
        self.buckets
            .iter()
            .choose(rng)
            .map(|(key, paths)| (key.as_str(), paths.as_slice()))
            .ok_or(AppError::EmptyCatalog)
    }

    /// Dataset root this catalog was built from
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of indexed images
    pub fn image_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// All keys, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.buckets.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Folder-name collisions found while indexing
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }
}

/// Image files directly inside `folder`, in listing order
fn collect_images(folder: &Path) -> Vec<PathBuf> {
    WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file() && is_image(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

/// Suffix match on the lowercased file name, so a bare ".png" counts too
fn is_image(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy().to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| name.strip_suffix(ext).is_some_and(|stem| stem.ends_with('.')))
}

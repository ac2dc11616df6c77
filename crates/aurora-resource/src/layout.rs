//! Game directory indexing
//!
//! Wires a resolver with the providers a real game install carries, in
//! game-accurate precedence, and handles per-module transient bundles.
//! Install media mixes filename cases freely, so every lookup under the
//! game root goes through a case-insensitive helper.

use crate::catalog::Strings;
use crate::error::{ResourceError, Result};
use crate::provider::{
    BundleProvider, FolderProvider, KeyBifProvider, MemoryProvider, ResourceProvider,
};
use crate::resolver::Resources;
use aurora_formats::TalkTable;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

const KEY_FILENAME: &str = "chitin.key";
const PATCH_FILENAME: &str = "patch.erf";
const TALK_TABLE_FILENAME: &str = "dialog.tlk";

const MODULES_DIR: &str = "modules";
const OVERRIDE_DIR: &str = "override";
const MUSIC_DIR: &str = "streammusic";
const SOUNDS_DIR: &str = "streamsounds";
const VOICE_DIR: &str = "streamvoice";
const WAVES_DIR: &str = "streamwaves";
const TEXTURE_PACKS_DIR: &str = "texturepacks";

const GUI_TEXTURE_PACK: &str = "swpc_tex_gui.erf";
const TEXTURE_PACK: &str = "swpc_tex_tpa.erf";

/// Which game's directory conventions apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameVersion {
    Kotor,
    TheSithLords,
}

/// An indexed game installation.
///
/// Registration order defines precedence, highest first: runtime memory
/// overrides, the override folder, the stream audio folders, the texture
/// packs, the patch bundle (first game only), and the KEY+BIF archives as
/// the fallback. Per-module bundles go into the resolver's transient tier,
/// which is searched before all of the above providers.
pub struct ResourceLayout {
    version: GameVersion,
    root: PathBuf,
    resources: Arc<Resources>,
    overrides: Arc<MemoryProvider>,
    module_names: Vec<String>,
    talk_table_path: Option<PathBuf>,
}

impl std::fmt::Debug for ResourceLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceLayout")
            .field("version", &self.version)
            .field("root", &self.root)
            .field("module_names", &self.module_names)
            .field("talk_table_path", &self.talk_table_path)
            .finish_non_exhaustive()
    }
}

impl ResourceLayout {
    /// Index the game install at `root`. Fails fast when the KEY index is
    /// missing or malformed; optional pieces are skipped with a warning.
    pub fn index(version: GameVersion, root: &Path) -> Result<Self> {
        let resources = Arc::new(Resources::new());

        let overrides = Arc::new(MemoryProvider::new());
        resources.add_provider(Arc::clone(&overrides) as Arc<dyn ResourceProvider>);

        if let Some(path) = find_path_ci(root, OVERRIDE_DIR) {
            add_folder(&resources, &path)?;
        }

        let voice_dir = match version {
            GameVersion::TheSithLords => VOICE_DIR,
            GameVersion::Kotor => WAVES_DIR,
        };
        for dir in [voice_dir, SOUNDS_DIR, MUSIC_DIR] {
            if let Some(path) = find_path_ci(root, dir) {
                add_folder(&resources, &path)?;
            } else {
                warn!("Audio directory not found: {dir}");
            }
        }

        if let Some(packs) = find_path_ci(root, TEXTURE_PACKS_DIR) {
            for pack in [TEXTURE_PACK, GUI_TEXTURE_PACK] {
                if let Some(path) = find_path_ci(&packs, pack) {
                    add_bundle(&resources, &path)?;
                } else {
                    warn!("Texture pack not found: {pack}");
                }
            }
        }

        if version == GameVersion::Kotor {
            if let Some(path) = find_path_ci(root, PATCH_FILENAME) {
                add_bundle(&resources, &path)?;
            }
        }

        let key_path = find_path_ci(root, KEY_FILENAME)
            .ok_or_else(|| ResourceError::MissingGameFile(root.join(KEY_FILENAME)))?;
        resources.add_provider(Arc::new(KeyBifProvider::open(&key_path, root)?));
        info!("Indexed KEY archives: {:?}", key_path);

        let talk_table_path = find_path_ci(root, TALK_TABLE_FILENAME);
        if talk_table_path.is_none() {
            warn!("Talk table not found: {TALK_TABLE_FILENAME}");
        }

        let module_names = scan_module_names(root);

        Ok(Self {
            version,
            root: root.to_path_buf(),
            resources,
            overrides,
            module_names,
            talk_table_path,
        })
    }

    pub fn version(&self) -> GameVersion {
        self.version
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resources(&self) -> &Arc<Resources> {
        &self.resources
    }

    /// The runtime override store, ahead of every file-backed provider.
    pub fn overrides(&self) -> &Arc<MemoryProvider> {
        &self.overrides
    }

    /// Module names discovered under `modules/`, sorted.
    pub fn module_names(&self) -> &[String] {
        &self.module_names
    }

    /// Swap the transient providers over to one module's bundles. Drops
    /// the resolver's byte cache; typed caches above must be cleared by
    /// the caller alongside this.
    pub fn load_module(&self, name: &str) -> Result<()> {
        self.resources.clear_transient_providers();

        let modules = find_path_ci(&self.root, MODULES_DIR)
            .ok_or_else(|| ResourceError::MissingGameFile(self.root.join(MODULES_DIR)))?;

        // Transient priority, highest first: the dialog bundle (second
        // game only), then the _s resource bundle, then the main bundle.
        if self.version == GameVersion::TheSithLords {
            if let Some(path) = find_path_ci(&modules, &format!("{name}_dlg.erf")) {
                self.resources
                    .add_transient_provider(Arc::new(BundleProvider::open(&path)?));
            }
        }
        for filename in [format!("{name}_s.rim"), format!("{name}.rim")] {
            let Some(path) = find_path_ci(&modules, &filename) else {
                warn!("Module bundle not found: {filename}");
                continue;
            };
            self.resources
                .add_transient_provider(Arc::new(BundleProvider::open(&path)?));
        }

        info!("Loaded module: {name}");
        Ok(())
    }

    /// Load the global talk table for string lookups. Developer notes are
    /// stripped for the second game.
    pub fn strings(&self) -> Result<Strings> {
        let path = self
            .talk_table_path
            .as_ref()
            .ok_or_else(|| ResourceError::MissingGameFile(self.root.join(TALK_TABLE_FILENAME)))?;
        let table = TalkTable::open(path)?;
        Ok(Strings::new(
            table,
            self.version == GameVersion::TheSithLords,
        ))
    }
}

fn add_folder(resources: &Arc<Resources>, path: &Path) -> Result<()> {
    resources.add_provider(Arc::new(FolderProvider::open(path)?));
    info!("Indexed folder: {:?}", path);
    Ok(())
}

fn add_bundle(resources: &Arc<Resources>, path: &Path) -> Result<()> {
    resources.add_provider(Arc::new(BundleProvider::open(path)?));
    info!("Indexed bundle: {:?}", path);
    Ok(())
}

/// Find `name` directly under `dir`, matching case-insensitively.
fn find_path_ci(dir: &Path, name: &str) -> Option<PathBuf> {
    let exact = dir.join(name);
    if exact.exists() {
        return Some(exact);
    }
    let lowered = name.to_lowercase();
    for entry in fs::read_dir(dir).ok()?.flatten() {
        if entry.file_name().to_string_lossy().to_lowercase() == lowered {
            return Some(entry.path());
        }
    }
    None
}

/// Module names are `modules/*.rim` minus the `_s.rim` resource halves.
fn scan_module_names(root: &Path) -> Vec<String> {
    let Some(modules) = find_path_ci(root, MODULES_DIR) else {
        debug!("Modules directory not found under {:?}", root);
        return Vec::new();
    };
    let Ok(entries) = fs::read_dir(&modules) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .flatten()
        .filter_map(|entry| {
            let filename = entry.file_name().to_string_lossy().to_lowercase();
            let name = filename.strip_suffix(".rim")?;
            if name.ends_with("_s") {
                return None;
            }
            Some(name.to_string())
        })
        .collect();
    names.sort();
    names
}

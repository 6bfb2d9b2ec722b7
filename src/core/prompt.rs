use std::path::{Path, PathBuf};

/// Synchronous user decisions the session needs from the presentation layer.
pub trait Prompt {
    /// Asked before an existing bound file is overwritten by a save.
    fn confirm_overwrite(&mut self, path: &Path) -> bool;

    /// Asked before unsaved changes are thrown away by new/open.
    fn confirm_discard_unsaved(&mut self) -> bool;

    /// Asked for a target when an untitled session is saved. `None` means the
    /// user cancelled the pick.
    fn pick_save_path(&mut self) -> Option<PathBuf>;
}

/// Confirms everything and never picks a save target. Suited to headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Prompt for AssumeYes {
    fn confirm_overwrite(&mut self, _path: &Path) -> bool {
        true
    }

    fn confirm_discard_unsaved(&mut self) -> bool {
        true
    }

    fn pick_save_path(&mut self) -> Option<PathBuf> {
        None
    }
}

mod copy;
mod deps;
mod extension;

pub use copy::{EXCLUDED_DIRS, copy_extension_tree};
pub use deps::{DependencyInstaller, NpmInstaller};
pub use extension::{InstallOutcome, InstallSource, Installer, remote_folder_name};

use std::path::Path;

/// Directory names never copied into an install.
pub const EXCLUDED_DIRS: [&str; 2] = [".git", "node_modules"];

/// Recursively copy a directory, excluding VCS metadata and installed dependencies.
pub fn copy_extension_tree(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let ty = entry.file_type()?;
        let name = entry.file_name();
        let src_path = entry.path();
        let dst_path = dst.join(&name);

        if EXCLUDED_DIRS.iter().any(|excluded| name == *excluded) {
            continue;
        }

        if ty.is_dir() {
            copy_extension_tree(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

use ignore::WalkBuilder;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Immediate child directories of `dir`, sorted by name.
pub fn child_dirs(dir: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut entries: Vec<(String, PathBuf)> = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        entries.push((name, entry.path()));
    }

    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

/// Recursively copy `src` into `dest`, creating `dest` and every
/// intermediate directory. Hidden files and ignore files are copied too.
/// Symlinks are recreated as links, not followed.
pub fn copy_tree(src: &Path, dest: &Path) -> io::Result<()> {
    fs::create_dir_all(dest)?;

    let walker = WalkBuilder::new(src)
        .standard_filters(false)
        .follow_links(false)
        .build();

    for entry in walker {
        let entry = entry.map_err(io::Error::other)?;
        let path = entry.path();
        let Ok(rel) = path.strip_prefix(src) else {
            continue;
        };
        if rel.as_os_str().is_empty() {
            continue;
        }

        let target = dest.join(rel);
        let Some(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        if file_type.is_symlink() {
            copy_link(path, &target)?;
        } else {
            fs::copy(path, &target)?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn copy_link(src: &Path, dest: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(src)?, dest)
}

#[cfg(not(unix))]
fn copy_link(src: &Path, dest: &Path) -> io::Result<()> {
    if src.is_dir() {
        copy_tree(src, dest)
    } else {
        fs::copy(src, dest).map(|_| ())
    }
}

/// `rm -rf`, tolerating a path that is already gone.
pub fn remove_tree(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_tree_keeps_hidden_and_ignored_files() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("lib/nested")).unwrap();
        fs::write(src.join(".gitignore"), "*.js\n").unwrap();
        fs::write(src.join("lib/nested/app.js"), "// app").unwrap();
        fs::write(src.join("README"), "hello").unwrap();

        let dest = dir.path().join("out/vendor/lib");
        copy_tree(&src, &dest).unwrap();

        assert_eq!(fs::read_to_string(dest.join(".gitignore")).unwrap(), "*.js\n");
        assert_eq!(fs::read_to_string(dest.join("lib/nested/app.js")).unwrap(), "// app");
        assert_eq!(fs::read_to_string(dest.join("README")).unwrap(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn copy_tree_recreates_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("lib");
        fs::create_dir_all(src.join("src")).unwrap();
        fs::write(src.join("src/a.js"), "// a").unwrap();
        std::os::unix::fs::symlink("src", src.join("dist")).unwrap();
        std::os::unix::fs::symlink("src/a.js", src.join("main.js")).unwrap();

        let dest = dir.path().join("vendor/lib");
        copy_tree(&src, &dest).unwrap();

        assert_eq!(fs::read_link(dest.join("dist")).unwrap(), Path::new("src"));
        assert_eq!(fs::read_link(dest.join("main.js")).unwrap(), Path::new("src/a.js"));
        assert_eq!(fs::read_to_string(dest.join("dist/a.js")).unwrap(), "// a");
    }

    #[test]
    fn child_dirs_skips_files_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("zeta")).unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        fs::write(dir.path().join("file.txt"), "").unwrap();

        let names: Vec<_> = child_dirs(dir.path())
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn remove_tree_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("gone");
        fs::create_dir_all(target.join("deep")).unwrap();

        remove_tree(&target).unwrap();
        remove_tree(&target).unwrap();
        assert!(!target.exists());
    }
}

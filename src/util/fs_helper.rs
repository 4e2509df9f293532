use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Every file below `dir`, sorted, as paths relative to `dir`.
pub fn list_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = vec![];
    collect_files(dir, Path::new(""), &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_files(root: &Path, relative: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(root.join(relative))? {
        let entry = entry?;
        let rel_path = relative.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            collect_files(root, &rel_path, files)?;
        } else {
            files.push(rel_path);
        }
    }
    Ok(())
}

/// Copies the content of `src` into `dst`, returning the number of files copied.
pub fn copy_dir(src: &Path, dst: &Path) -> io::Result<usize> {
    let files = list_files(src)
        .map_err(|e| io::Error::new(e.kind(), format!("Error reading directory {}: {}", src.display(), e)))?;

    for file in &files {
        let target = dst.join(file);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(src.join(file), &target)?;
    }

    Ok(files.len())
}

pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
        .map_err(|e| io::Error::new(e.kind(), format!("Error writing {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_copy_dir_is_recursive_and_sorted() {
        let src = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("css/vendor")).unwrap();
        fs::write(src.path().join("site.js"), "js").unwrap();
        fs::write(src.path().join("css/vendor/b.css"), "b").unwrap();
        fs::write(src.path().join("css/a.css"), "a").unwrap();

        assert_eq!(list_files(src.path()).unwrap(), vec![
            PathBuf::from("css/a.css"),
            PathBuf::from("css/vendor/b.css"),
            PathBuf::from("site.js"),
        ]);

        let dst = TempDir::new().unwrap();
        assert_eq!(copy_dir(src.path(), &dst.path().join("assets")).unwrap(), 3);
        assert_eq!(fs::read_to_string(dst.path().join("assets/css/vendor/b.css")).unwrap(), "b");
    }

    #[test]
    fn test_write_file_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/index.html");
        write_file(&path, b"<p>x</p>").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"<p>x</p>");
    }
}

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result, Stage};

/// Prefijo del directorio temporal usado durante la publicación
pub const STAGING_PREFIX: &str = ".staging-";

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Escribe un archivo completo o no lo toca
///
/// El contenido va a un temporal en el mismo directorio, que luego reemplaza al destino.
pub fn write_atomic(path: &Path, contents: &[u8], stage: Stage) -> Result<()> {
    let parent = parent_dir(path);
    fs::create_dir_all(&parent).map_err(|e| Error::io(stage, &parent, e))?;

    let mut file = NamedTempFile::new_in(&parent).map_err(|e| Error::io(stage, &parent, e))?;
    file.write_all(contents)
        .and_then(|_| file.as_file().sync_all())
        .map_err(|e| Error::io(stage, file.path(), e))?;
    file.persist(path).map_err(|e| Error::io(stage, path, e.error))?;

    Ok(())
}

/// Publica un conjunto de documentos en el directorio de salida
///
/// Todos los archivos se escriben primero en un directorio temporal dentro de `output_dir`; solo
/// si todas las escrituras terminan bien se mueven a su nombre definitivo, en el orden dado.
/// Los archivos existentes que no están en `files` se conservan.
pub fn publish(output_dir: &Path, files: &[(String, String)]) -> Result<()> {
    fs::create_dir_all(output_dir).map_err(|e| Error::io(Stage::Render, output_dir, e))?;

    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(output_dir)
        .map_err(|e| Error::io(Stage::Render, output_dir, e))?;

    for (name, contents) in files {
        let staged = staging.path().join(name);
        fs::write(&staged, contents).map_err(|e| Error::io(Stage::Render, &staged, e))?;
    }

    for (name, _) in files {
        let staged = staging.path().join(name);
        let target = output_dir.join(name);
        fs::rename(&staged, &target).map_err(|e| Error::io(Stage::Render, &target, e))?;
        debug!("Escrito {}", target.display());
    }

    let staging_path = staging.path().to_path_buf();
    staging
        .close()
        .map_err(|e| Error::io(Stage::Render, staging_path, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn publish_writes_files_and_keeps_stale_ones() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("test-cases");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("gone.md"), "old record").unwrap();
        fs::write(out.join("a.md"), "old a").unwrap();

        publish(
            &out,
            &[
                ("a.md".to_string(), "new a".to_string()),
                ("INDEX.md".to_string(), "index".to_string()),
            ],
        )
        .unwrap();

        assert_eq!(entries(&out), vec!["INDEX.md", "a.md", "gone.md"]);
        assert_eq!(fs::read_to_string(out.join("a.md")).unwrap(), "new a");
        assert_eq!(fs::read_to_string(out.join("gone.md")).unwrap(), "old record");
    }

    #[test]
    fn publish_creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("cases");
        publish(&out, &[("x.md".to_string(), "x".to_string())]).unwrap();
        assert_eq!(fs::read_to_string(out.join("x.md")).unwrap(), "x");
    }

    #[test]
    fn failed_staging_leaves_tree_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_path_buf();
        fs::write(out.join("a.md"), "old a").unwrap();

        let err = publish(
            &out,
            &[
                ("a.md".to_string(), "new a".to_string()),
                ("missing-dir/b.md".to_string(), "b".to_string()),
            ],
        )
        .unwrap_err();

        assert_eq!(err.stage(), "render");
        assert_eq!(fs::read_to_string(out.join("a.md")).unwrap(), "old a");
        assert_eq!(entries(&out), vec!["a.md"]);
    }

    #[test]
    fn write_atomic_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw").join("snapshot.json");
        write_atomic(&path, b"[1]", Stage::Fetch).unwrap();
        write_atomic(&path, b"[2]", Stage::Fetch).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"[2]");
        assert_eq!(entries(path.parent().unwrap()), vec!["snapshot.json"]);
    }
}

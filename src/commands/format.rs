use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::config::Settings;
use crate::error::{Error, Result, Stage};
use crate::models::{RawSnapshot, Snapshot, INDEX_STEM};
use crate::utils::{file_name_for, publish, render_index, render_test_case};

/// Resultado de generar los documentos
#[derive(Debug, Clone)]
pub struct FormatReport {
    pub output_dir: PathBuf,
    pub documents: usize,
    pub titles: Vec<String>,
}

/// Nombre del archivo índice
pub fn index_file_name() -> String {
    format!("{INDEX_STEM}.md")
}

/// Lee y valida un snapshot guardado por el fetcher
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let data = fs::read(path).map_err(|e| Error::io(Stage::Parse, path, e))?;
    let raw: RawSnapshot = serde_json::from_slice(&data).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Snapshot::from_raw(raw)
}

/// Genera todos los documentos en memoria, con el índice al final
pub fn render_all(snapshot: &Snapshot) -> Vec<(String, String)> {
    let mut files: Vec<(String, String)> = snapshot
        .test_cases
        .iter()
        .map(|tc| (file_name_for(&tc.id), render_test_case(tc)))
        .collect();
    files.push((index_file_name(), render_index(&snapshot.test_cases)));
    files
}

/// Convierte un snapshot en documentos Markdown dentro del directorio de salida
///
/// Si el snapshot no se puede leer o validar, el directorio de salida queda intacto.
#[instrument(skip(settings), fields(output_dir = %settings.output_dir.display()))]
pub fn format_snapshot(settings: &Settings, input: &Path) -> Result<FormatReport> {
    let snapshot = load_snapshot(input)?;
    info!("{} caso(s) de prueba encontrados en {}", snapshot.len(), input.display());
    if let Some(total) = snapshot.reported_total {
        if total != snapshot.len() as u64 {
            warn!(
                "La API informó {total} casos de prueba pero el snapshot contiene {}",
                snapshot.len()
            );
        }
    }
    if snapshot.is_empty() {
        warn!("El snapshot no tiene casos de prueba, solo se generará el índice");
    }

    let files = render_all(&snapshot);
    publish(&settings.output_dir, &files)?;
    info!(
        "{} documento(s) y {} escritos en {}",
        snapshot.len(),
        index_file_name(),
        settings.output_dir.display()
    );

    Ok(FormatReport {
        output_dir: settings.output_dir.clone(),
        documents: snapshot.len(),
        titles: snapshot.test_cases.iter().map(|tc| tc.title.clone()).collect(),
    })
}

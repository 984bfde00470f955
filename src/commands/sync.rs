use tracing::{info, instrument};

use crate::commands::{fetch_snapshot, format_snapshot, FetchReport, FormatReport};
use crate::config::Settings;
use crate::error::Result;

/// Resultado de una sincronización completa
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub fetch: FetchReport,
    pub format: FormatReport,
}

/// Descarga el snapshot y regenera todos los documentos
///
/// Si la descarga falla, no se genera nada.
#[instrument(skip(settings))]
pub fn run_sync(settings: &Settings) -> Result<SyncReport> {
    let fetch = fetch_snapshot(settings)?;
    let format = format_snapshot(settings, &fetch.path)?;
    info!("{} caso(s) de prueba sincronizados", format.documents);
    Ok(SyncReport { fetch, format })
}

//! Tipos de error del sincronizador.
//!
//! Cada variante pertenece a una etapa del proceso (configuración, descarga, parseo o
//! renderizado). Ningún error se recupera localmente: todos terminan la ejecución.

use std::path::PathBuf;
use thiserror::Error;

/// Resultado usado en todo el crate
pub type Result<T> = std::result::Result<T, Error>;

/// Etapa del proceso en la que ocurre un error de E/S
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Parse,
    Render,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Fetch => "fetch",
            Stage::Parse => "parse",
            Stage::Render => "render",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error principal
#[derive(Debug, Error)]
pub enum Error {
    /// Configuración incompleta o inválida
    #[error("config: {message}")]
    Config { message: String },

    /// Fallo de red o timeout al consultar la API
    #[error("fetch: request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// La API respondió con un estado distinto de 2xx
    #[error("fetch: {url} returned HTTP {status}: {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    /// El snapshot no es JSON válido o no tiene la forma esperada
    #[error("parse: {} is not a valid snapshot: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Un registro no cumple con la forma esperada
    #[error("parse: record #{index}{}: {message}", .id.as_deref().map(|id| format!(" ({id})")).unwrap_or_default())]
    InvalidRecord {
        index: usize,
        id: Option<String>,
        message: String,
    },

    /// Dos registros comparten el mismo identificador
    #[error("parse: duplicate test case id {id}")]
    DuplicateId { id: String },

    /// Error de E/S en alguna etapa
    #[error("{stage}: I/O error on {}: {source}", .path.display())]
    Io {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Construye un error de E/S asociado a una etapa y una ruta
    pub fn io(stage: Stage, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            stage,
            path: path.into(),
            source,
        }
    }

    /// Nombre de la etapa que falló
    pub fn stage(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config",
            Error::Transport { .. } | Error::HttpStatus { .. } => "fetch",
            Error::Json { .. } | Error::InvalidRecord { .. } | Error::DuplicateId { .. } => "parse",
            Error::Io { stage, .. } => stage.as_str(),
        }
    }

    /// Código de salida del proceso para este error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config { .. } => 2,
            _ => 1,
        }
    }
}

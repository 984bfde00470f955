//! Sincronización de casos de prueba de TestRigor.
//!
//! Descarga la lista de casos de prueba de una aplicación y la guarda como documentos Markdown,
//! uno por caso más un índice, para que los cambios queden registrados en el control de
//! versiones. Cada ejecución regenera todo a partir de la última descarga.

pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

pub use commands::{fetch_snapshot, format_snapshot, run_sync};
pub use config::Settings;
pub use error::{Error, Result};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::TestStatus;

/// Nombre reservado para el índice dentro del directorio de salida
pub const INDEX_STEM: &str = "INDEX";

/// Título usado cuando la API no envía descripción
pub const UNTITLED: &str = "Untitled Test Case";

/// Autor o último editor de un caso de prueba
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Caso de prueba tal como lo entrega la API de TestRigor
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    #[serde(rename = "uuid")]
    pub id: String,
    #[serde(
        rename = "description",
        default = "default_title",
        deserialize_with = "deserialize_title"
    )]
    pub title: String,
    #[serde(rename = "disabled")]
    pub status: TestStatus,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: Option<Identity>,
    #[serde(default)]
    pub modified_by: Option<Identity>,
    #[serde(rename = "customSteps", deserialize_with = "deserialize_steps")]
    pub steps: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<String>,
}

fn default_title() -> String {
    UNTITLED.to_string()
}

fn deserialize_title<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_title))
}

/// Un `null` explícito equivale a omitir el campo
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `customSteps` llega como texto con saltos de línea o como lista de textos
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSteps {
    Text(String),
    Lines(Vec<String>),
}

fn deserialize_steps<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawSteps>::deserialize(deserializer).map_err(|_| {
        serde::de::Error::custom("`customSteps` must be a string or an array of strings")
    })?;

    Ok(match raw {
        None => Vec::new(),
        Some(RawSteps::Text(text)) => split_steps(&text),
        Some(RawSteps::Lines(lines)) => lines.iter().flat_map(|line| split_lines(line)).collect(),
    })
}

/// Separa un bloque de texto en pasos, uno por línea
///
/// Las líneas en blanco se descartan; el resto se conserva tal cual y en orden.
pub fn split_steps(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Separa un paso de una lista en líneas, sin descartar ninguna
///
/// Cada elemento de la lista ya es un paso, aunque esté vacío.
pub fn split_lines(step: &str) -> impl Iterator<Item = String> + '_ {
    step.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
}

/// Verifica que el identificador sirva como nombre de archivo
pub fn validate_id(id: &str) -> Result<(), String> {
    if id.trim().is_empty() {
        return Err("empty `uuid`".to_string());
    }
    if id == "." || id == ".." {
        return Err(format!("`uuid` {id:?} is not a valid file name"));
    }
    if id.contains(['/', '\\', '\0']) {
        return Err(format!("`uuid` {id:?} contains a path separator"));
    }
    if id.eq_ignore_ascii_case(INDEX_STEM) {
        return Err(format!("`uuid` {id:?} collides with the index file"));
    }
    Ok(())
}

impl TestCase {
    /// Cantidad de pasos del caso de prueba
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

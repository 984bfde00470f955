use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{validate_id, TestCase};

/// Respuesta de la API: una lista directa o el sobre `{status, data: {content, totalElements}}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawSnapshot {
    Records(Vec<Value>),
    Envelope { data: EnvelopeData },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeData {
    pub content: Vec<Value>,
    #[serde(default)]
    pub total_elements: Option<u64>,
}

/// Casos de prueba de una descarga, en el orden en que los devolvió la API
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub test_cases: Vec<TestCase>,
    /// Total informado por la API, si vino en el sobre
    pub reported_total: Option<u64>,
}

impl Snapshot {
    /// Convierte la respuesta cruda en casos de prueba validados
    ///
    /// Falla con el primer registro inválido, indicando su posición y su `uuid` si lo tiene.
    pub fn from_raw(raw: RawSnapshot) -> Result<Self> {
        let (records, reported_total) = match raw {
            RawSnapshot::Records(records) => (records, None),
            RawSnapshot::Envelope { data } => (data.content, data.total_elements),
        };

        let mut seen = HashSet::with_capacity(records.len());
        let mut test_cases = Vec::with_capacity(records.len());
        for (index, value) in records.into_iter().enumerate() {
            let id = value.get("uuid").and_then(Value::as_str).map(str::to_string);
            let test_case: TestCase =
                serde_json::from_value(value).map_err(|e| Error::InvalidRecord {
                    index,
                    id: id.clone(),
                    message: e.to_string(),
                })?;

            validate_id(&test_case.id).map_err(|message| Error::InvalidRecord {
                index,
                id: id.clone(),
                message,
            })?;

            if !seen.insert(test_case.id.clone()) {
                return Err(Error::DuplicateId { id: test_case.id });
            }
            test_cases.push(test_case);
        }

        Ok(Self {
            test_cases,
            reported_total,
        })
    }

    pub fn len(&self) -> usize {
        self.test_cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.test_cases.is_empty()
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Estado de un caso de prueba, derivado del campo `disabled` de la API
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(from = "bool", into = "bool")]
pub enum TestStatus {
    Enabled,
    Disabled,
}

impl From<bool> for TestStatus {
    fn from(disabled: bool) -> Self {
        if disabled {
            TestStatus::Disabled
        } else {
            TestStatus::Enabled
        }
    }
}

impl From<TestStatus> for bool {
    fn from(status: TestStatus) -> Self {
        status == TestStatus::Disabled
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Enabled => write!(f, "✅ Enabled"),
            TestStatus::Disabled => write!(f, "🚫 Disabled"),
        }
    }
}

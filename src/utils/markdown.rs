use std::fmt::{self, Write};

use chrono::{DateTime, Utc};

use crate::models::{Identity, TestCase};

/// Formato de fecha en los documentos
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Formato de fecha en el índice
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Nombre del archivo de un caso de prueba
pub fn file_name_for(id: &str) -> String {
    format!("{id}.md")
}

/// Fecha legible, siempre en UTC
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

fn format_identity(identity: &Identity) -> String {
    format!(
        "{} ({})",
        identity.name.as_deref().unwrap_or("N/A"),
        identity.email.as_deref().unwrap_or("N/A")
    )
}

/// Delimitador de bloque de código más largo que cualquier secuencia de acentos graves en los pasos
fn code_fence(steps: &[String]) -> String {
    let longest = steps
        .iter()
        .map(|step| {
            step.split(|c: char| c != '`')
                .map(str::len)
                .max()
                .unwrap_or(0)
        })
        .max()
        .unwrap_or(0);
    "`".repeat((longest + 1).max(3))
}

/// Genera el documento Markdown de un caso de prueba
pub fn render_test_case(test_case: &TestCase) -> String {
    let mut out = String::new();
    write_test_case(&mut out, test_case).expect("writing to a String cannot fail");
    out
}

fn write_test_case(out: &mut impl Write, test_case: &TestCase) -> fmt::Result {
    writeln!(out, "# {}\n", test_case.title)?;

    writeln!(out, "## Metadata\n")?;
    writeln!(out, "- **UUID**: `{}`", test_case.id)?;
    writeln!(out, "- **Status**: {}", test_case.status)?;
    writeln!(out, "- **Created**: {}", format_timestamp(&test_case.created_at))?;
    if let Some(created_by) = &test_case.created_by {
        writeln!(out, "- **Created By**: {}", format_identity(created_by))?;
    }
    writeln!(out, "- **Modified**: {}", format_timestamp(&test_case.modified_at))?;
    if let Some(modified_by) = &test_case.modified_by {
        writeln!(out, "- **Modified By**: {}", format_identity(modified_by))?;
    }
    if !test_case.labels.is_empty() {
        writeln!(out, "- **Labels**: {}", test_case.labels.join(", "))?;
    }
    writeln!(out)?;

    writeln!(out, "## Test Steps\n")?;
    if test_case.steps.is_empty() {
        writeln!(out, "*No steps defined*")?;
    } else {
        let fence = code_fence(&test_case.steps);
        writeln!(out, "{fence}")?;
        for step in &test_case.steps {
            writeln!(out, "{step}")?;
        }
        writeln!(out, "{fence}")?;
    }

    Ok(())
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Genera el índice con una fila por caso de prueba, en el orden recibido
pub fn render_index(test_cases: &[TestCase]) -> String {
    let mut out = String::new();
    write_index(&mut out, test_cases).expect("writing to a String cannot fail");
    out
}

fn write_index(out: &mut impl Write, test_cases: &[TestCase]) -> fmt::Result {
    writeln!(out, "# Test Cases Index\n")?;
    writeln!(out, "**Total Test Cases**: {}\n", test_cases.len())?;

    if test_cases.is_empty() {
        return writeln!(out, "*No test cases found*");
    }

    writeln!(out, "| # | Test Case | UUID | Status | Created | Steps |")?;
    writeln!(out, "|---|-----------|------|--------|---------|-------|")?;
    for (i, test_case) in test_cases.iter().enumerate() {
        writeln!(
            out,
            "| {} | [{}](./{}) | `{}` | {} | {} | {} |",
            i + 1,
            escape_cell(&test_case.title),
            file_name_for(&test_case.id),
            test_case.id,
            test_case.status,
            test_case.created_at.format(DATE_FORMAT),
            test_case.step_count()
        )?;
    }

    Ok(())
}

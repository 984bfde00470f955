use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use tracing::{info, instrument};

use crate::config::Settings;
use crate::error::{Error, Result, Stage};
use crate::utils::write_atomic;

/// Máximo de bytes del cuerpo de error que se incluyen en el mensaje
const ERROR_BODY_LIMIT: usize = 512;

/// Resultado de una descarga
#[derive(Debug, Clone)]
pub struct FetchReport {
    pub url: String,
    pub path: PathBuf,
    pub bytes: usize,
}

fn truncate_body(body: &str) -> String {
    if body.len() <= ERROR_BODY_LIMIT {
        return body.trim().to_string();
    }
    let mut end = ERROR_BODY_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", body[..end].trim_end())
}

fn auth_value(settings: &Settings) -> String {
    if settings.auth_header.eq_ignore_ascii_case("authorization") {
        format!("Bearer {}", settings.token)
    } else {
        settings.token.clone()
    }
}

/// Descarga la lista de casos de prueba y guarda la respuesta tal cual
///
/// Cualquier error de red o estado distinto de 2xx termina la descarga sin escribir nada.
#[instrument(skip(settings), fields(app_id = %settings.app_id))]
pub fn fetch_snapshot(settings: &Settings) -> Result<FetchReport> {
    settings.validate_for_fetch()?;
    let url = settings.test_cases_url()?;
    let url_string = url.to_string();
    let transport = |source| Error::Transport {
        url: url_string.clone(),
        source,
    };

    let client = Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()
        .map_err(transport)?;

    info!("Consultando casos de prueba en {url_string}");
    let response = client
        .get(url)
        .header(settings.auth_header.as_str(), auth_value(settings))
        .header(ACCEPT, "application/json")
        .send()
        .map_err(transport)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(Error::HttpStatus {
            url: url_string.clone(),
            status: status.as_u16(),
            body: truncate_body(&body),
        });
    }

    let body = response.bytes().map_err(transport)?;
    write_atomic(&settings.snapshot_path, &body, Stage::Fetch)?;
    info!(
        "{} bytes guardados en {}",
        body.len(),
        settings.snapshot_path.display()
    );

    Ok(FetchReport {
        url: url_string,
        path: settings.snapshot_path.clone(),
        bytes: body.len(),
    })
}

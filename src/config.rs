//! Configuración del sincronizador.
//!
//! La configuración se arma en capas: valores por defecto, un archivo TOML opcional, variables de
//! entorno con prefijo `TESTRIGOR_` y finalmente los argumentos de línea de comandos. Solo el
//! binario llama a [`Settings::load`]; el resto del crate recibe un `&Settings` explícito.

use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use reqwest::Url;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Prefijo de las variables de entorno reconocidas
pub const ENV_PREFIX: &str = "TESTRIGOR";

/// Parámetros de una ejecución
#[derive(Clone, Deserialize)]
pub struct Settings {
    /// URL base de la API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Identificador de la aplicación en TestRigor
    #[serde(default)]
    pub app_id: String,

    /// Token de autenticación
    #[serde(default)]
    pub token: String,

    /// Cabecera donde se envía el token
    #[serde(default = "default_auth_header")]
    pub auth_header: String,

    /// Archivo donde se guarda la respuesta cruda
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// Directorio de los documentos generados
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Tiempo máximo de la petición HTTP, en segundos
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://api.testrigor.com/api/v1".to_string()
}

fn default_auth_header() -> String {
    "auth-token".to_string()
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("test-cases-response.json")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("test-cases")
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            app_id: String::new(),
            token: String::new(),
            auth_header: default_auth_header(),
            snapshot_path: default_snapshot_path(),
            output_dir: default_output_dir(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// El token nunca aparece en logs.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("endpoint", &self.endpoint)
            .field("app_id", &self.app_id)
            .field("token", &"<redacted>")
            .field("auth_header", &self.auth_header)
            .field("snapshot_path", &self.snapshot_path)
            .field("output_dir", &self.output_dir)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Valores recibidos por línea de comandos, con la mayor prioridad
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub app_id: Option<String>,
    pub snapshot_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

impl Settings {
    /// Carga la configuración combinando archivo, entorno y argumentos
    ///
    /// El archivo puede no existir.
    pub fn load(path: impl AsRef<Path>, overrides: &Overrides) -> Result<Self> {
        let path_string = |p: &Option<PathBuf>| p.as_ref().map(|p| p.to_string_lossy().into_owned());

        Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .set_override_option("endpoint", overrides.endpoint.clone())
            .and_then(|b| b.set_override_option("app_id", overrides.app_id.clone()))
            .and_then(|b| b.set_override_option("snapshot_path", path_string(&overrides.snapshot_path)))
            .and_then(|b| b.set_override_option("output_dir", path_string(&overrides.output_dir)))
            .and_then(|b| b.build())
            .and_then(|c| c.try_deserialize::<Settings>())
            .map_err(|e| Error::Config {
                message: e.to_string(),
            })
    }

    /// Verifica que haya lo necesario para consultar la API
    pub fn validate_for_fetch(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(Error::Config {
                message: format!("missing API token (set {ENV_PREFIX}_TOKEN)"),
            });
        }
        if self.app_id.trim().is_empty() {
            return Err(Error::Config {
                message: format!("missing application id (set {ENV_PREFIX}_APP_ID)"),
            });
        }
        if self.auth_header.trim().is_empty() {
            return Err(Error::Config {
                message: "auth_header must not be empty".to_string(),
            });
        }
        self.test_cases_url().map(|_| ())
    }

    /// URL completa de la lista de casos de prueba
    pub fn test_cases_url(&self) -> Result<Url> {
        let raw = format!(
            "{}/apps/{}/test_cases",
            self.endpoint.trim_end_matches('/'),
            self.app_id
        );
        Url::parse(&raw).map_err(|e| Error::Config {
            message: format!("invalid endpoint {raw}: {e}"),
        })
    }
}

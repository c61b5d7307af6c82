use config::{Config, ConfigError, Environment, File, Map};
use once_cell::sync::OnceCell;
use std::env;
use tracing::debug;
pub mod models;
pub use models::*;

/// Prefix for layered overrides, e.g. `BOOKIFY__SERVER__HOST`.
pub const ENV_PREFIX: &str = "BOOKIFY";

/// Loads the configuration from the process environment (after `.env`).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let dotenv_path = ensure_dotenv_loaded();
    debug!("Environment file: {}", dotenv_path);
    let vars: Map<String, String> = env::vars().collect();
    load_config_from(&vars)
}

/// Builds the configuration from an explicit set of variables.
///
/// Sources, lowest precedence first: built-in defaults, `config/default`,
/// `config/{RUN_ENV}`, `BOOKIFY__*` variables, then the flat variables
/// `PORT`, `GOOGLE_CLIENT_EMAIL`, `GOOGLE_PRIVATE_KEY` and `GOOGLE_CALENDAR_ID`.
pub fn load_config_from(vars: &Map<String, String>) -> Result<AppConfig, ConfigError> {
    let run_env = vars.get("RUN_ENV").map(String::as_str).unwrap_or("debug");
    let config_dir = vars.get("CONFIG_DIR").map(String::as_str).unwrap_or("config");

    let builder = Config::builder()
        .set_default("server.host", ServerConfig::default().host)?
        .set_default("server.port", i64::from(DEFAULT_PORT))?
        .set_default("gcal.time_zone", DEFAULT_TIME_ZONE)?
        .set_default("cors.allowed_origins", default_allowed_origins())?
        .add_source(File::with_name(&format!("{config_dir}/default")).required(false))
        .add_source(File::with_name(&format!("{config_dir}/{run_env}")).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins")
                .source(Some(vars.clone())),
        )
        .set_override_option("server.port", port_from(vars)?)?
        .set_override_option("gcal.client_email", non_empty(vars, "GOOGLE_CLIENT_EMAIL"))?
        .set_override_option("gcal.private_key", non_empty(vars, "GOOGLE_PRIVATE_KEY"))?
        .set_override_option("gcal.calendar_id", non_empty(vars, "GOOGLE_CALENDAR_ID"))?;

    let mut config: AppConfig = builder.build()?.try_deserialize()?;
    config.gcal.private_key = config.gcal.private_key.as_deref().map(unescape_private_key);
    Ok(config)
}

fn non_empty(vars: &Map<String, String>, key: &str) -> Option<String> {
    vars.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn port_from(vars: &Map<String, String>) -> Result<Option<i64>, ConfigError> {
    non_empty(vars, "PORT")
        .map(|raw| {
            raw.parse::<u16>()
                .map(i64::from)
                .map_err(|err| ConfigError::Message(format!("invalid PORT '{raw}': {err}")))
        })
        .transpose()
}

/// Turns the escaped `\n` sequences of a single-line PEM back into newlines.
pub fn unescape_private_key(raw: &str) -> String {
    raw.trim_matches('"').replace("\\n", "\n")
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment, once.
///
/// `DOTENV_OVERRIDE` selects the file, otherwise a first command line argument
/// starting with `.env`, otherwise `.env`. A missing file is not an error.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

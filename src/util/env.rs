//! Environment access: one-shot dotenv loading plus typed getters.
//! Every getter calls `init_env()` itself, so binaries may rely on the
//! lazy Once instead of bootstrapping explicitly.
use std::str::FromStr;
use std::sync::Once;

static INIT: Once = Once::new();

/// Load .env at most once. Safe to call from anywhere, any number of times.
pub fn init_env() {
    INIT.call_once(|| {
        let _ = dotenv::dotenv();
    });
}

/// Optional string var; unset and blank both read as `None`.
pub fn env_opt(key: &str) -> Option<String> {
    init_env();
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Parse a var into `T`, falling back to `default` when unset or unparseable.
pub fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Clone,
{
    init_env();
    match std::env::var(key) {
        Ok(raw) => raw.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Boolean flag: 1/true/on/yes (any case) count as set; anything else set
/// in the environment reads as false.
pub fn env_flag(key: &str, default: bool) -> bool {
    init_env();
    match std::env::var(key) {
        Ok(raw) => {
            let v = raw.trim().to_ascii_lowercase();
            matches!(v.as_str(), "1" | "true" | "on" | "yes")
        }
        Err(_) => default,
    }
}

/// First configured database URL, specific name before generic.
pub fn db_url() -> anyhow::Result<String> {
    init_env();
    for k in ["DATABASE_URL", "DB_URL"] {
        if let Some(v) = env_opt(k) {
            return Ok(v);
        }
    }
    Err(anyhow::anyhow!("no database URL env vars set"))
}

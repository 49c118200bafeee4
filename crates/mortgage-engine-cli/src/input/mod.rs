pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Typed input from `--input <file>` or piped stdin; `None` when neither is given.
pub fn optional<T: DeserializeOwned>(path: Option<&str>) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        Ok(Some(file::read_json(path)?))
    } else if let Some(data) = stdin::read_stdin()? {
        Ok(Some(serde_json::from_value(data)?))
    } else {
        Ok(None)
    }
}

/// Like [`optional`], but the command has no flag fallback.
pub fn required<T: DeserializeOwned>(path: Option<&str>, what: &str) -> Result<T, Box<dyn std::error::Error>> {
    optional(path)?.ok_or_else(|| format!("--input <file.json> or stdin required for {what}").into())
}

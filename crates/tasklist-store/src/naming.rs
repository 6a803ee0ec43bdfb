use std::path::Path;

use rand::distributions::Alphanumeric;
use rand::Rng;

/// URL prefix under which the blob area is served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads/";

const SUFFIX_LEN: usize = 10;

/// Generate a storage name for an uploaded file:
/// `<unix millis>-<random suffix>[.<extension>]`.
///
/// The extension decides how the file is served back, so it always comes
/// from `allowed_extensions`: the original one is kept (lowercased) when it
/// is in the list, otherwise the first entry is used.
pub fn blob_name(original_file_name: &str, allowed_extensions: &[&str]) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(char::from)
        .collect::<String>()
        .to_ascii_lowercase();

    match extension(original_file_name, allowed_extensions) {
        Some(ext) => format!("{millis}-{suffix}.{ext}"),
        None => format!("{millis}-{suffix}"),
    }
}

fn extension(file_name: &str, allowed: &[&str]) -> Option<String> {
    let original = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match original {
        Some(ext) if allowed.contains(&ext.as_str()) => Some(ext),
        _ => allowed.first().map(|e| e.to_string()),
    }
}

/// Public URL path for a stored blob.
pub fn file_url(key: &str) -> String {
    format!("{UPLOADS_URL_PREFIX}{key}")
}

/// Recover the blob key from a `file_url`. Returns `None` for URLs that do
/// not point directly into the blob area.
pub fn key_from_file_url(url: &str) -> Option<&str> {
    url.strip_prefix(UPLOADS_URL_PREFIX)
        .filter(|key| !key.is_empty() && !key.contains('/') && *key != "..")
}

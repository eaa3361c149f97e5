//! Printing and saving boundary responses.

use std::path::Path;

use crime_atlas_api_models::ApiResponse;
use serde::Serialize;

/// Prints `response` as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if the response cannot be serialized.
pub fn print_json<T: Serialize>(response: &ApiResponse<T>) -> Result<(), serde_json::Error> {
    warn_on_fallback(response);
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}

/// Writes a map fragment to `output`, or stdout when no file is given.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be written.
pub fn write_html(response: &ApiResponse<String>, output: Option<&Path>) -> std::io::Result<()> {
    warn_on_fallback(response);
    match output {
        Some(path) => {
            std::fs::write(path, &response.data)?;
            log::info!("Wrote map to {}", path.display());
        }
        None => println!("{}", response.data),
    }
    Ok(())
}

fn warn_on_fallback<T>(response: &ApiResponse<T>) {
    if let Some(error) = &response.error {
        log::warn!("Showing fallback result: {error}");
    }
}

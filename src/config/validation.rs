use url::Url;

use crate::core::tts::edge::OutputFormat;

/// Validate an output format literal
///
/// The value must be one of the 18 formats the synthesis service accepts.
pub fn validate_output_format(value: &str) -> Result<OutputFormat, Box<dyn std::error::Error>> {
    value.parse::<OutputFormat>().map_err(|_| {
        format!(
            "Invalid output_format '{value}'. Expected one of: {}",
            OutputFormat::ALL
                .iter()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
        .into()
    })
}

/// Validate that `value` is an absolute URL with one of the allowed schemes
pub fn validate_url(
    name: &str,
    value: &str,
    schemes: &[&str],
) -> Result<(), Box<dyn std::error::Error>> {
    let url = Url::parse(value).map_err(|e| format!("Invalid {name} '{value}': {e}"))?;

    if !schemes.contains(&url.scheme()) {
        return Err(format!(
            "Invalid {name} '{value}': scheme must be one of {}",
            schemes.join(", ")
        )
        .into());
    }

    Ok(())
}

/// Validate both service endpoints
///
/// The synthesis endpoint must be a WebSocket URL and the catalog endpoint an
/// HTTP URL.
pub fn validate_endpoints(
    synthesis_url: &str,
    voices_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    validate_url("synthesis_url", synthesis_url, &["ws", "wss"])?;
    validate_url("voices_url", voices_url, &["http", "https"])?;
    Ok(())
}

//! Input decoding: turn the request's base64 `pdf` field into raw bytes.
//!
//! Clients send either bare base64 or a full `data:application/pdf;base64,`
//! URI, sometimes wrapped at 76 columns, sometimes without `=` padding or in
//! the URL-safe alphabet. All of these are accepted; anything else that fails
//! to decode is rejected before the PDF engine is touched.

use crate::error::ProcessError;
use base64::{
    alphabet,
    engine::{
        general_purpose::{GeneralPurpose, GeneralPurposeConfig},
        DecodePaddingMode,
    },
    Engine as _,
};
use tracing::debug;

/// Standard alphabet; padding optional, non-zero trailing bits ignored.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Check if the field carries a `data:` URI prefix.
pub fn is_data_uri(input: &str) -> bool {
    input.starts_with("data:")
}

/// Decode the `pdf` field of a request.
///
/// # Errors
/// * [`ProcessError::MissingPdf`] when the field is absent or empty
/// * [`ProcessError::InvalidBase64`] when the payload is not valid base64
pub fn decode_pdf(field: Option<&str>) -> Result<Vec<u8>, ProcessError> {
    let raw = match field {
        Some(s) if !s.trim().is_empty() => s,
        _ => return Err(ProcessError::MissingPdf),
    };

    let payload = strip_data_uri(raw)?;
    // URL-safe digits are folded into the standard alphabet.
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();

    if compact.is_empty() {
        return Err(ProcessError::MissingPdf);
    }

    let bytes = LENIENT
        .decode(compact.as_bytes())
        .map_err(|e| ProcessError::InvalidBase64 {
            detail: e.to_string(),
        })?;

    debug!("Decoded PDF payload: {} bytes", bytes.len());
    Ok(bytes)
}

/// Return the base64 part of a `data:` URI, or the input unchanged.
fn strip_data_uri(input: &str) -> Result<&str, ProcessError> {
    if !is_data_uri(input) {
        return Ok(input);
    }
    match input.split_once(',') {
        Some((header, payload)) if header.ends_with(";base64") => Ok(payload),
        _ => Err(ProcessError::InvalidBase64 {
            detail: "data URI is not base64-encoded".to_string(),
        }),
    }
}

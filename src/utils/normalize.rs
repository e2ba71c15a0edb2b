use crate::utils::constants::DATE_FORMAT_HINT;
use unicode_normalization::UnicodeNormalization;

/// Turn arbitrary header text into a canonical identifier.
///
/// Accents are removed through compatibility decomposition, so `"Codificação"`
/// becomes `"codificacao"` and `"m²"` becomes `"m2"`. Any remaining non-ASCII
/// character is dropped. A trailing `(yyyy-mm-dd)` hint is removed and every
/// run of characters outside `[a-z0-9]` collapses to a single underscore.
///
/// # Examples
/// ```
/// use inmet_ingest::utils::normalize_token;
///
/// assert_eq!(normalize_token("CODIGO (WMO):"), "codigo_wmo");
/// assert_eq!(normalize_token("DATA (YYYY-MM-DD)"), "data");
/// assert_eq!(normalize_token("RADIACAO GLOBAL (Kj/m²)"), "radiacao_global_kj_m2");
/// ```
pub fn normalize_token(value: &str) -> String {
    let ascii: String = value.nfkd().filter(char::is_ascii).collect();
    let lowered = ascii.to_ascii_lowercase();
    let trimmed = lowered.trim_end();
    let stripped = trimmed.strip_suffix(DATE_FORMAT_HINT).unwrap_or(trimmed);

    let mut out = String::with_capacity(stripped.len());
    let mut pending_separator = false;
    for c in stripped.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.push(c);
        } else {
            pending_separator = true;
        }
    }

    out
}

/// Title-case text the way station names are displayed: the first letter of
/// every alphabetic run is upper-cased and the rest lower-cased.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut previous_is_letter = false;
    for c in value.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }
    out
}

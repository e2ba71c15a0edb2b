use crate::utils::constants::{CITY_TOKEN_INDEX, MIN_FILENAME_TOKENS};
use crate::utils::normalize::title_case;
use std::path::Path;

/// Infer the city name from an export file name.
///
/// INMET names its files `INMET_<region>_<uf>_<code>_<city>_<start>_A_<end>.CSV`.
/// Best effort only: stems with fewer than six underscore-separated tokens yield
/// `None` and callers fall back to the station name.
pub fn infer_city_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_string_lossy();
    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() < MIN_FILENAME_TOKENS {
        return None;
    }

    let city = parts.get(CITY_TOKEN_INDEX)?.replace('-', " ");
    let city = city.trim();
    if city.is_empty() {
        None
    } else {
        Some(title_case(city))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_city_name() {
        let path = Path::new("data/INMET_SE_RJ_A601_ECOLOGIA AGRICOLA_01-01-2020_A_31-12-2020.CSV");
        assert_eq!(infer_city_name(path), Some("Ecologia Agricola".to_string()));

        let path = Path::new("INMET_NE_SE_A409_ARACAJU_01-01-2020_A_31-12-2020.CSV");
        assert_eq!(infer_city_name(path), Some("Aracaju".to_string()));
    }

    #[test]
    fn test_infer_city_name_replaces_hyphens() {
        let path = Path::new("INMET_S_RS_A801_PORTO-ALEGRE_01-01-2020_A_31-12-2020.CSV");
        assert_eq!(infer_city_name(path), Some("Porto Alegre".to_string()));
    }

    #[test]
    fn test_infer_city_name_too_few_tokens() {
        assert_eq!(infer_city_name(Path::new("A711.CSV")), None);
        assert_eq!(infer_city_name(Path::new("INMET_SE_SP_A711_2020.CSV")), None);
    }

    #[test]
    fn test_infer_city_name_empty_token() {
        let path = Path::new("INMET_SE_SP_A711__01-01-2020_A_31-12-2020.CSV");
        assert_eq!(infer_city_name(path), None);
    }
}

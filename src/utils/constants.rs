use crate::models::{MeasurementField, MetaField};

/// Number of metadata lines at the top of every INMET CSV export
pub const META_ROWS: usize = 8;

/// Field delimiter used in both the metadata header and the observation table
pub const DELIMITER: u8 = b';';

/// Missing-value sentinel written by the station loggers
pub const MISSING_SENTINEL: &str = "-9999";
pub const MISSING_SENTINEL_VALUE: f64 = -9999.0;

/// Date-format hint some header generations append to date labels
pub const DATE_FORMAT_HINT: &str = "(yyyy-mm-dd)";

/// Normalized names of the date and time columns
pub const DATE_COLUMN: &str = "data";
pub const TIME_COLUMN: &str = "hora_utc";

/// Accepted (date, time) formats, oldest header generation first
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
pub const TIME_FORMATS: &[&str] = &["%H:%M", "%H%M"];
pub const TIME_ZONE_SUFFIX: &str = "UTC";

/// File name heuristics: `INMET_<region>_<uf>_<code>_<city>_<start>_A_<end>.CSV`
pub const MIN_FILENAME_TOKENS: usize = 6;
pub const CITY_TOKEN_INDEX: usize = 4;

/// Processing defaults
pub const DEFAULT_BATCH_SIZE: usize = 500;
pub const DEFAULT_PATTERN: &str = "*.CSV";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_DATABASE_FILE: &str = "data/inmet.db";
pub const DEFAULT_NAMESPACE: &str = "inmet";
pub const DEFAULT_CONFIG_FILE: &str = "inmet.toml";
pub const ENV_PREFIX: &str = "INMET";

/// Normalized metadata label → metadata field
pub const META_LABELS: &[(&str, MetaField)] = &[
    ("regiao", MetaField::RegionCode),
    ("uf", MetaField::StateCode),
    ("estacao", MetaField::StationName),
    ("codigo_wmo", MetaField::StationCode),
    ("latitude", MetaField::Latitude),
    ("longitude", MetaField::Longitude),
    ("altitude", MetaField::Altitude),
    ("data_de_fundacao", MetaField::StartDate),
];

/// Normalized observation column → measurement field
pub const MEASUREMENT_COLUMNS: &[(&str, MeasurementField)] = &[
    ("precipitacao_total_horario_mm", MeasurementField::Precipitation),
    (
        "pressao_atmosferica_ao_nivel_da_estacao_horaria_mb",
        MeasurementField::AtmosphericPressure,
    ),
    (
        "pressao_atmosferica_max_na_hora_ant_aut_mb",
        MeasurementField::PrevMaxPressure,
    ),
    (
        "pressao_atmosferica_min_na_hora_ant_aut_mb",
        MeasurementField::PrevMinPressure,
    ),
    ("radiacao_global_kj_m2", MeasurementField::GlobalRadiation),
    (
        "temperatura_do_ar_bulbo_seco_horaria_c",
        MeasurementField::AirTemperature,
    ),
    (
        "temperatura_do_ponto_de_orvalho_c",
        MeasurementField::DewPointTemperature,
    ),
    (
        "temperatura_maxima_na_hora_ant_aut_c",
        MeasurementField::MaxTemperature,
    ),
    (
        "temperatura_minima_na_hora_ant_aut_c",
        MeasurementField::MinTemperature,
    ),
    (
        "temperatura_orvalho_max_na_hora_ant_aut_c",
        MeasurementField::MaxDewPointTemperature,
    ),
    (
        "temperatura_orvalho_min_na_hora_ant_aut_c",
        MeasurementField::MinDewPointTemperature,
    ),
    (
        "umidade_rel_max_na_hora_ant_aut",
        MeasurementField::MaxRelativeHumidity,
    ),
    (
        "umidade_rel_min_na_hora_ant_aut",
        MeasurementField::MinRelativeHumidity,
    ),
    (
        "umidade_relativa_do_ar_horaria",
        MeasurementField::RelativeHumidity,
    ),
    ("vento_direcao_horaria_gr_gr", MeasurementField::WindDirection),
    ("vento_rajada_maxima_m_s", MeasurementField::MaxWindGust),
    ("vento_velocidade_horaria_m_s", MeasurementField::WindSpeed),
];

/// Brazilian macro-regions
pub const REGION_NAMES: &[(&str, &str)] = &[
    ("N", "Norte"),
    ("NE", "Nordeste"),
    ("CO", "Centro-Oeste"),
    ("SE", "Sudeste"),
    ("S", "Sul"),
];

/// Federative units
pub const STATE_NAMES: &[(&str, &str)] = &[
    ("AC", "Acre"),
    ("AL", "Alagoas"),
    ("AP", "Amapá"),
    ("AM", "Amazonas"),
    ("BA", "Bahia"),
    ("CE", "Ceará"),
    ("DF", "Distrito Federal"),
    ("ES", "Espírito Santo"),
    ("GO", "Goiás"),
    ("MA", "Maranhão"),
    ("MT", "Mato Grosso"),
    ("MS", "Mato Grosso do Sul"),
    ("MG", "Minas Gerais"),
    ("PA", "Pará"),
    ("PB", "Paraíba"),
    ("PR", "Paraná"),
    ("PE", "Pernambuco"),
    ("PI", "Piauí"),
    ("RJ", "Rio de Janeiro"),
    ("RN", "Rio Grande do Norte"),
    ("RS", "Rio Grande do Sul"),
    ("RO", "Rondônia"),
    ("RR", "Roraima"),
    ("SC", "Santa Catarina"),
    ("SP", "São Paulo"),
    ("SE", "Sergipe"),
    ("TO", "Tocantins"),
];

pub fn meta_field_for(label: &str) -> Option<MetaField> {
    META_LABELS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, field)| *field)
}

pub fn measurement_field_for(column: &str) -> Option<MeasurementField> {
    MEASUREMENT_COLUMNS
        .iter()
        .find(|(name, _)| *name == column)
        .map(|(_, field)| *field)
}

pub fn region_name(code: &str) -> Option<&'static str> {
    REGION_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

pub fn state_name(code: &str) -> Option<&'static str> {
    STATE_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_tables() {
        assert_eq!(meta_field_for("codigo_wmo"), Some(MetaField::StationCode));
        assert_eq!(meta_field_for("codigo"), None);
        assert_eq!(region_name("SE"), Some("Sudeste"));
        assert_eq!(region_name("XX"), None);
        assert_eq!(state_name("SE"), Some("Sergipe"));
        assert_eq!(STATE_NAMES.len(), 27);
        assert_eq!(MEASUREMENT_COLUMNS.len(), MeasurementField::ALL.len());
        assert_eq!(
            measurement_field_for("vento_velocidade_horaria_m_s"),
            Some(MeasurementField::WindSpeed)
        );
    }
}

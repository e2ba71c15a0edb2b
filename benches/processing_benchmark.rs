use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use inmet_ingest::models::{MeasurementField, Measurements, ObservationRow};
use inmet_ingest::processors::ObservationUpserter;
use inmet_ingest::readers::ObservationReader;
use inmet_ingest::store::{create_tables, Store};
use inmet_ingest::utils::{normalize_token, parse_cell};

const TABLE_HEADER: &str = "Data;Hora UTC;PRECIPITAÇÃO TOTAL, HORÁRIO (mm);PRESSAO ATMOSFERICA AO NIVEL DA ESTACAO, HORARIA (mB);TEMPERATURA DO AR - BULBO SECO, HORARIA (°C);UMIDADE RELATIVA DO AR, HORARIA (%);VENTO, VELOCIDADE HORARIA (m/s);";

// Hourly table body in the newer header layout
fn create_table_body(hours: usize) -> String {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let mut body = String::from(TABLE_HEADER);
    body.push('\n');
    for hour in 0..hours {
        let ts = start + Duration::hours(hour as i64);
        let wind = if hour % 7 == 0 {
            "-9999".to_string()
        } else {
            format!("{},{}", hour % 9, hour % 10)
        };
        body.push_str(&format!(
            "{};{} UTC;0,{};1009,{};2{},{};{};{};\n",
            ts.format("%Y/%m/%d"),
            ts.format("%H%M"),
            hour % 5,
            hour % 10,
            hour % 10,
            hour % 10,
            60 + hour % 30,
            wind
        ));
    }
    body
}

fn create_rows(hours: usize) -> Vec<ObservationRow> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc();

    (0..hours)
        .map(|hour| ObservationRow {
            datetime: start + Duration::hours(hour as i64),
            measurements: Measurements::default()
                .with(MeasurementField::AirTemperature, 20.0 + (hour % 10) as f64)
                .with(MeasurementField::Precipitation, 0.2),
        })
        .collect()
}

fn benchmark_normalize_token(c: &mut Criterion) {
    let headers = vec![
        "PRECIPITAÇÃO TOTAL, HORÁRIO (mm)",
        "PRESSÃO ATMOSFERICA MAX.NA HORA ANT. (AUT) (mB)",
        "TEMPERATURA DO PONTO DE ORVALHO (°C)",
        "DATA (YYYY-MM-DD)",
        "Hora UTC",
        "CODIGO (WMO):",
    ];

    c.bench_function("normalize_token", |b| {
        b.iter(|| {
            let mut total = 0;
            for header in &headers {
                total += normalize_token(black_box(header)).len();
            }
            black_box(total)
        })
    });
}

fn benchmark_parse_cell(c: &mut Criterion) {
    let cells = vec!["0,2", "1009,6", "-9999", "\"-9999\"", "", "n/a", "-3,75"];

    c.bench_function("parse_cell", |b| {
        b.iter(|| {
            let mut observed = 0;
            for cell in &cells {
                if parse_cell(black_box(cell)).value().is_some() {
                    observed += 1;
                }
            }
            black_box(observed)
        })
    });
}

fn benchmark_parse_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_table_by_hours");
    let reader = ObservationReader::new();

    // one day, one month, one year of hourly rows
    for &hours in &[24, 720, 8760] {
        let body = create_table_body(hours);
        group.bench_with_input(BenchmarkId::new("hours", hours), &body, |b, body| {
            b.iter(|| {
                let table = reader.parse_table(black_box(body), "bench.CSV");
                black_box(table.map(|t| t.len()).unwrap_or(0))
            })
        });
    }
    group.finish();
}

fn benchmark_upsert_batch_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("upsert_by_batch_size");
    let rows = create_rows(720);

    for &batch_size in &[1, 100, 500] {
        group.bench_with_input(
            BenchmarkId::new("batch_size", batch_size),
            &batch_size,
            |b, &batch_size| {
                let store = Store::open_in_memory("inmet").unwrap();
                create_tables(&store, false).unwrap();
                store
                    .connection()
                    .execute_batch(
                        "INSERT INTO inmet.regions (code, name) VALUES ('SE', 'Sudeste');
                         INSERT INTO inmet.states (code, name, region_id) VALUES ('SP', 'São Paulo', 1);
                         INSERT INTO inmet.cities (name, state_id) VALUES ('São Paulo', 1);
                         INSERT INTO inmet.stations (code, latitude, longitude, altitude, city_id, state_id)
                             VALUES ('A701', -23.49, -46.62, 785.16, 1, 1);",
                    )
                    .unwrap();
                let upserter = ObservationUpserter::new(&store)
                    .with_batch_size(batch_size)
                    .unwrap();

                b.iter(|| {
                    let stats = upserter.upsert_rows(1, black_box(&rows));
                    black_box(stats.map(|s| s.total()).unwrap_or(0))
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_normalize_token,
    benchmark_parse_cell,
    benchmark_parse_table,
    benchmark_upsert_batch_sizes
);
criterion_main!(benches);

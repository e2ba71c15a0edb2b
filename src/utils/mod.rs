pub mod constants;
pub mod filename;
pub mod normalize;
pub mod numbers;
pub mod progress;

pub use constants::*;
pub use filename::infer_city_name;
pub use normalize::{normalize_token, title_case};
pub use numbers::{parse_cell, parse_coordinate, parse_decimal, CellValue};
pub use progress::ProgressReporter;

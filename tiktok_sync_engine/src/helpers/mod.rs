mod region_codes;

pub use region_codes::{country_code, state_code};

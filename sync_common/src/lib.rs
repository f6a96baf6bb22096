mod helpers;
mod secret;

pub use helpers::{env_parse_or, non_blank, parse_boolean_flag, parse_or};
pub use secret::Secret;

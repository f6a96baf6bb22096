mod mock_platform;
mod prepare_env;

pub use mock_platform::{CallCounts, MockPlatform};
pub use prepare_env::prepare_test_env;

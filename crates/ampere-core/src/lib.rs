pub mod config;
pub mod modules;
pub mod services;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

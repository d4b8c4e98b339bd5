//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Access key, mode, base URL, and timeout resolution
//! - `validation`: Configuration consistency validation tests

mod helpers;

//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that runs the full controller against
//! mock hardware.  All tests run on the host with no real board required.

mod mock_hw;
mod restart_tests;
mod scenario_tests;

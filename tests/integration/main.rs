//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a subsystem end-to-end
//! against mock adapters.  All tests run on the host (x86_64) with no
//! real hardware or radio required.

mod aggregation_tests;
mod mesh_flow_tests;
mod mock_hw;

#![allow(dead_code)]

pub use watchpoints_test_utils::init_tracing;

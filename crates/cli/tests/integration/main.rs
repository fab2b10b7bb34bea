mod build_tests;
mod common;
mod schedule_tests;

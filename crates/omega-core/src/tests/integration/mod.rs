#![cfg(test)]

pub mod common;
pub mod lifecycle_tests;
pub mod route_file_tests;

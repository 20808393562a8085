pub mod response_tests;
pub mod session_tests;

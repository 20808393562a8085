pub mod singleton_tests;

// tests/unit/mod.rs
mod property_based_tests;

mod command_tests;
mod extraction_tests;

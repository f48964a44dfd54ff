mod matcher_tests;
mod parser_tests;
mod shape_backend;

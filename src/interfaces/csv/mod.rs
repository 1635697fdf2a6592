pub mod catalog_reader;
pub mod summary_writer;

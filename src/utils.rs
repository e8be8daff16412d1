pub mod lib_csv;

pub mod caiso;
pub mod lib_download;
pub mod prod_db;

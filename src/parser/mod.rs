pub mod csv_file;
pub mod record;

pub use csv_file::*;
pub use record::*;

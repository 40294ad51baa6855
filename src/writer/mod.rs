pub mod loader;
pub mod provision;
pub mod schema_gen;

pub use loader::{discover_datasets, load_datasets, Dataset, DatasetOutcome, LoadReport};
pub use provision::{create_data_model, ProvisionReport};
pub use schema_gen::generate_script;

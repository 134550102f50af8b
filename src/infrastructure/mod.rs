// Infrastructure - storage, id sequences, sessions and request gating

pub mod csv_storage;
pub mod data_store;
pub mod id_generator;
pub mod middleware;
pub mod session_store;
pub mod viewer;

pub use csv_storage::CsvStorage;
pub use data_store::DataStore;
pub use id_generator::IdGenerator;
pub use session_store::SessionStore;

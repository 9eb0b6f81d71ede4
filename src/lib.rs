pub mod models;
pub mod monitor;
pub mod probe;
pub mod scenario;
pub mod storage;

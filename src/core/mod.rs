// Core modules for error modeling, state file storage and path conventions.
pub mod error;
pub mod paths;
pub mod storage;

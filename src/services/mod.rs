// src/services/mod.rs
//
// Clients for services that live outside this process

pub mod remote_store;

pub use remote_store::RemoteStoreClient;

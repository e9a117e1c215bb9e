pub mod fetch;
pub mod server;

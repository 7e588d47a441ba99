pub mod media_host;
pub mod sync_gateway;

pub mod compress;
pub mod health;
pub mod history;
pub mod media;
pub mod proxy;

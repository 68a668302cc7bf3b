pub mod cache;
pub mod db;
pub mod notification_store;
pub mod repositories;

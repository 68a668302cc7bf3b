pub mod access;
pub mod clock;
pub mod notifications;
pub mod rules;

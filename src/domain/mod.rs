pub mod equipment;
pub mod feature;
pub mod notification;
pub mod tenant;
pub mod tier;

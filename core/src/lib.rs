pub mod calendar;
pub mod db;
pub mod edamam;
pub mod fallback;
pub mod grouping;
pub mod lookup;
pub mod models;
pub mod session;
pub mod store;

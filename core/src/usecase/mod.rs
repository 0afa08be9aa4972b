pub mod presentation;
pub mod session;

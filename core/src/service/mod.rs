pub mod attendance_service;
pub mod dto;
pub mod fetch_service;
pub mod holiday_service;

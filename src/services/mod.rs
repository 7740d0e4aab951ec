/// Business logic modules
pub mod holiday_service;

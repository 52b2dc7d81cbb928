pub mod payload_service;
pub mod chart_service;
pub mod dashboard_service;

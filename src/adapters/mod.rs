pub mod api_handler;
pub mod health_handler;
pub mod mock_transport;
pub mod ui_handler;

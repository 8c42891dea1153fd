pub mod chat_panel;
pub mod config_panel;
pub mod schema_form;

pub mod contact;
pub mod site_config;
pub mod web_server;
pub mod ws_handler;

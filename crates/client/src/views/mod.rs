pub mod auth;
pub mod footer;
pub mod resource_list;
pub mod search;
pub mod shell;
pub mod tabs;
pub mod upload_form;

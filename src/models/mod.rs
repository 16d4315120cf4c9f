pub mod advertisement;
pub mod auth;
pub mod category;
pub mod dashboard;
pub mod news;
pub mod notification;
pub mod operator;
pub mod shared;
pub mod sub_category;

pub mod advertisement;
pub mod auth;
pub mod category;
pub mod dashboard;
pub mod images;
pub mod news;
pub mod notification;
pub mod operator;
pub mod sub_category;

pub mod admin;
pub mod advertisement;
pub mod category;
pub mod news;
pub mod news_image;
pub mod notification;
pub mod operator;
pub mod sub_category;

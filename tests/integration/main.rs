mod common;

mod auth;
mod category;
mod images;
mod news;
mod notification;
mod operator;

pub mod admin;
pub mod auth_pages;
pub mod error;
pub mod health;
pub mod news;
pub mod pages;
pub mod players;
pub mod teams;
pub mod views;


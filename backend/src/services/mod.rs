pub mod agency;
pub mod auth;
pub mod clients;
pub mod copywriting;
pub mod ebook;
pub mod finance;
pub mod health;
pub mod projects;
pub mod tasks;

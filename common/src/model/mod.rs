pub mod agency;
pub mod client;
pub mod content;
pub mod ebook;
pub mod finance;
pub mod project;
pub mod task;

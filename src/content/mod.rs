//! Content domain: taxonomy, pages with their attachments, and review scheduling.

pub mod pages;
pub mod review;
pub mod slug;
pub mod storage;
pub mod taxonomy;

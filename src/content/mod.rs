//! Content module - post and page models and the clients that fetch them

pub mod client;
mod post;

pub use client::{ContentSource, FeedClient, WordPressClient};
pub use post::{Embedded, Media, MediaDetails, MediaSize, Page, Post, PostBatch, Rendered};

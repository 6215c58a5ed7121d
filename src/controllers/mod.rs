//! UI state controllers
//!
//! Each controller owns its state exclusively and changes it only through
//! its own transitions.

pub mod carousel;
pub mod feed;

pub use carousel::{ActiveCarousel, Carousel, CarouselState, CarouselTiming, Nav, Transition};
pub use feed::{LoadOutcome, PageCursor, PageLoader, Phase, PostFeed};

//! # Covenant Layout
//!
//! Print layout for agreement documents: a swappable height estimator and a
//! greedy paginator that packs the top-level node list into pages.
//!
//! ```rust,ignore
//! use covenant_layout::{PageGeometry, Paginator};
//!
//! let pages = Paginator::new(PageGeometry::default()).paginate(&structure.nodes);
//! for page in &pages {
//!     println!("page {}: {} items", page.number, page.nodes.len());
//! }
//! ```

pub mod estimator;
pub mod paginator;

pub use estimator::{EstimatorMetrics, HeightEstimator, HeuristicEstimator};
pub use paginator::{reassemble, Page, PageGeometry, Paginator};

//! Qualification rating: reduces the final scores to High / Medium / Low.

mod policy;


pub use policy::{Rating, RatingBreakdown, RatingPolicy};

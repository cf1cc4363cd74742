//! URL handling module
//!
//! This module provides the canonical URL value type used as the key of the
//! seen-URL store, along with the normalization rules behind it.

mod canonical;
mod domain;
mod normalize;

pub use canonical::CanonicalUrl;
pub use domain::extract_domain;
pub use normalize::{normalize_url, normalize_url_with};

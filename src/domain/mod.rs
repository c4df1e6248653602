pub mod dedupe;
pub mod diff;
pub mod filter;
pub mod fingerprint;
pub mod listing;
pub mod normalize;

pub use dedupe::{
    duplicate_groups, mark_duplicates, unique_count, DedupEntry, DedupReport, DuplicateGroup,
};
pub use diff::{compute_differences, ComparedField, DiffResult, Mismatch, ReconcileError, SourcePair};
pub use filter::{sort_by_price, FilterOptions, ListingFilter};
pub use fingerprint::{fingerprint, Fingerprint};
pub use listing::{AgencyOrPrivate, Listing, ListingType, Source};
pub use normalize::normalize;

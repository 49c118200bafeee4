//! Storage seam for loan snapshots and generated document needs.

pub mod needs;
pub mod repository;

pub use needs::{generate_needs, needs_packet, parse_needs, DocumentNeed, NeedsGenerator};
pub use repository::{InMemoryLoanRepository, JsonFileRepository, LoanRepository};

pub mod deal;
pub mod payments;
pub mod pipeline;
pub mod preapproval;
pub mod rehab;

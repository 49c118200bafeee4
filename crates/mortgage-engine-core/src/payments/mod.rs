pub mod math;
pub mod pricing;
pub mod scenario;

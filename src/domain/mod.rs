mod order;
mod pricing;
mod vehicle;

pub use order::*;
pub use pricing::*;
pub use vehicle::*;

mod compare;
mod normalize;

pub use compare::run_compare;
pub use normalize::run_normalize;

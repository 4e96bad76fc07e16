mod conv;
mod dense;

pub use conv::*;
pub use dense::*;

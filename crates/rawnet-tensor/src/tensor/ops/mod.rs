mod base;
mod conv;
mod matmul;
mod maxpool;
mod sum;

pub use base::*;
pub use conv::*;
pub use matmul::*;
pub use maxpool::*;
pub use sum::*;

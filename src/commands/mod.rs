mod batch;
mod extend;

pub use batch::*;
pub use extend::*;

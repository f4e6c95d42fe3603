//! Domain models for the Fabric Ops platform

pub mod common_code;
pub mod machine;
pub mod money;
pub mod order;
pub mod partner;
pub mod product;
pub mod quantity;
pub mod status;

pub use common_code::*;
pub use machine::*;
pub use money::*;
pub use order::*;
pub use partner::*;
pub use product::*;
pub use quantity::*;
pub use status::*;

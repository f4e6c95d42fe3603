//! HTTP handlers, one module per service area

pub mod dyeing;
pub mod health;
pub mod lineage;
pub mod orders;
pub mod reference;
pub mod sewing;
pub mod shipping;
pub mod stock;
pub mod weaving;

pub use dyeing::*;
pub use health::*;
pub use lineage::*;
pub use orders::*;
pub use reference::*;
pub use sewing::*;
pub use shipping::*;
pub use stock::*;
pub use weaving::*;

//! Business logic services for the Fabric Ops backend

pub mod dyeing;
pub mod lineage;
pub mod orders;
pub mod reference;
pub mod sewing;
pub mod shipping;
pub mod stock;
pub mod weaving;

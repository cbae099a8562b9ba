pub mod lookup;
pub mod stats;

mod merge ;
mod non_empty ;
mod partial_success ;

pub(crate) use merge::Merge ;
pub(crate) use non_empty::non_empty_map ;
pub use partial_success::PartialSuccess ;

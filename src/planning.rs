//! Isolation planning.
//!
//! Code units are partitioned into isolation contexts from the dependency graph the
//! resolution phase established:
//!
//! 1. [`UnitGraph`] lifts module-level relations to unit-level dependency edges
//! 2. [`IsolationPlanner`] assigns every unit to one [`IsolationContext`], collapsing
//! 	cyclic groups and linking each context to the contexts it may see
//! 3. [`assign_libraries`] fills in each context's external libraries, minus whatever
//! 	its accessibility parents already provide
//!
//! Contexts are stored in an arena in the order they were built, so a context's
//! dependencies always precede it.

mod unit_graph ;
mod isolation_plan ;
mod library_set ;

pub use unit_graph::UnitGraph ;
pub use isolation_plan::{ ContextId, ContextKind, IsolationContext, IsolationPlan, IsolationPlanner };
pub use library_set::{ LibraryOverride, assign_libraries };

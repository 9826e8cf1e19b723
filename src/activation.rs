//! Module activation.
//!
//! Once a load cycle is fully planned, the runtime hands every module to a
//! [`ModuleActivator`] in resolved order: first every module is instantiated, then
//! every instance is enabled. The activator decides what an instance is (a loaded
//! library, an interpreter handle, a struct built from a registry).

use std::collections::BTreeSet ;

use crate::library::ResolvedLibrary ;
use crate::module::{ ModuleMetadata, UnitId };
use crate::planning::{ IsolationContext, IsolationPlan };



/// Where a module is being instantiated.
#[derive( Debug, Clone, Copy )]
pub struct ActivationContext<'a> {
    unit: &'a UnitId,
    context: &'a IsolationContext,
    plan: &'a IsolationPlan,
}

impl<'a> ActivationContext<'a> {

    pub(crate) fn new( unit: &'a UnitId, context: &'a IsolationContext, plan: &'a IsolationPlan ) -> Self {
        Self { unit, context, plan }
    }

    /// The unit that contains the module.
    #[inline] pub fn unit( &self ) -> &'a UnitId { self.unit }

    /// The isolation context the unit was assigned to.
    #[inline] pub fn context( &self ) -> &'a IsolationContext { self.context }

    #[inline] pub fn plan( &self ) -> &'a IsolationPlan { self.plan }

    /// Every unit whose code the module may see, its own included.
    pub fn accessible_units( &self ) -> BTreeSet<UnitId> {
        self.plan.accessible_units( self.unit )
    }

    /// Every external library the module may see.
    pub fn libraries( &self ) -> BTreeSet<ResolvedLibrary> {
        self.plan.transitive_libraries( self.context.id() )
    }

}

/// Turns planned modules into running instances.
///
/// Both methods are called strictly in resolved load order. `instantiate` runs for
/// the whole batch before the first `enable`.
pub trait ModuleActivator {

    type Instance ;
    type Error: std::error::Error ;

    /// Creates the instance of `module` inside its isolation context.
    ///
    /// # Errors
    /// Implementations fail if the entry point cannot be found or constructed.
    fn instantiate( &mut self, module: &ModuleMetadata, context: ActivationContext<'_> ) -> Result<Self::Instance, Self::Error> ;

    /// Starts a previously instantiated module.
    ///
    /// # Errors
    /// Implementations fail if the module refuses to start.
    fn enable( &mut self, module: &ModuleMetadata, instance: &mut Self::Instance ) -> Result<(), Self::Error> ;

}

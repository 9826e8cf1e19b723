use crate::activation::ActivationContext ;
use crate::module::{ ModuleMetadata, UnitId };
use crate::planning::{ ContextId, IsolationPlan };
use crate::relation::ModuleKey ;
use crate::resolution::ResolutionResult ;



/// A module registered with a [`Runtime`](crate::Runtime).
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct LoadedModule {
    metadata: ModuleMetadata,
    /// `None` for the host
    unit: Option<UnitId>,
}

impl LoadedModule {
    pub(super) fn new( metadata: ModuleMetadata, unit: Option<UnitId> ) -> Self { Self { metadata, unit }}
    #[inline] pub fn key( &self ) -> &ModuleKey { self.metadata.key() }
    #[inline] pub fn metadata( &self ) -> &ModuleMetadata { &self.metadata }
    #[inline] pub fn unit( &self ) -> Option<&UnitId> { self.unit.as_ref() }
    #[inline] pub fn is_host( &self ) -> bool { self.unit.is_none() }
}

/// A candidate module with the unit it was read from.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct PlannedModule {
    pub(super) unit: UnitId,
    pub(super) metadata: ModuleMetadata,
}

impl PlannedModule {
    #[inline] pub fn key( &self ) -> &ModuleKey { self.metadata.key() }
    #[inline] pub fn unit( &self ) -> &UnitId { &self.unit }
    #[inline] pub fn metadata( &self ) -> &ModuleMetadata { &self.metadata }
}

/// A validated load cycle, ready for activation.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct LoadPlan {
    /// Candidates in resolved load order
    pub(super) modules: Vec<PlannedModule>,
    pub(super) resolution: ResolutionResult,
    pub(super) isolation: IsolationPlan,
}

impl LoadPlan {

    #[inline] pub fn modules( &self ) -> &[PlannedModule] { &self.modules }
    #[inline] pub fn resolution( &self ) -> &ResolutionResult { &self.resolution }
    #[inline] pub fn isolation( &self ) -> &IsolationPlan { &self.isolation }

    /// Candidate keys in resolved load order.
    pub fn order( &self ) -> impl Iterator<Item = &ModuleKey> { self.modules.iter().map( PlannedModule::key )}

    /// Every planned module with the context it activates in, in load order.
    pub(super) fn activation_contexts( &self ) -> impl Iterator<Item = ( &PlannedModule, ActivationContext<'_> )> {
        self.modules.iter().filter_map(| module | {
            let context = self.isolation.context_of( &module.unit )?;
            Some(( module, ActivationContext::new( &module.unit, context, &self.isolation )))
        })
    }

}

/// An instantiated and enabled module.
#[derive( Debug )]
pub struct ActiveModule<I> {
    pub(super) unit: UnitId,
    pub(super) metadata: ModuleMetadata,
    pub(super) context: ContextId,
    pub(super) instance: I,
}

impl<I> ActiveModule<I> {
    #[inline] pub fn key( &self ) -> &ModuleKey { self.metadata.key() }
    #[inline] pub fn unit( &self ) -> &UnitId { &self.unit }
    #[inline] pub fn metadata( &self ) -> &ModuleMetadata { &self.metadata }
    #[inline] pub fn context( &self ) -> ContextId { self.context }
    #[inline] pub fn instance( &self ) -> &I { &self.instance }
    #[inline] pub fn instance_mut( &mut self ) -> &mut I { &mut self.instance }
    pub fn into_instance( self ) -> I { self.instance }
}

/// Outcome of a successful [`Runtime::load`](crate::Runtime::load).
#[derive( Debug )]
pub struct LoadReport<I> {
    pub(super) modules: Vec<ActiveModule<I>>,
    pub(super) plan: LoadPlan,
}

impl<I> LoadReport<I> {

    /// Activated modules in load order.
    #[inline] pub fn modules( &self ) -> &[ActiveModule<I>] { &self.modules }
    #[inline] pub fn plan( &self ) -> &LoadPlan { &self.plan }
    #[inline] pub fn resolution( &self ) -> &ResolutionResult { &self.plan.resolution }
    #[inline] pub fn isolation( &self ) -> &IsolationPlan { &self.plan.isolation }

    pub fn into_modules( self ) -> Vec<ActiveModule<I>> { self.modules }

}

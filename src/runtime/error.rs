use thiserror::Error ;

use crate::activation::ModuleActivator ;
use crate::library::ArtifactResolver ;
use crate::manifest::ManifestReader ;
use crate::module::UnitId ;
use crate::ordering::OrderError ;
use crate::planning::LibraryOverride ;
use crate::relation::{ ModuleKey, Relation };
use crate::resolution::ResolutionError ;
use super::ActiveModule ;



/// Errors that abort a load cycle before any module is activated.
#[derive( Error )]
pub enum PlanError<Mr: ManifestReader, Ar: ArtifactResolver> {

    /// The manifest of a unit could not be read.
    #[error( "Failed to read manifest of unit '{unit}': {cause}" )]
    ManifestRead { unit: UnitId, cause: Mr::Error },

    /// Duplicate identities, unsatisfied requirements or conflicts.
    #[error( "Resolution failed: {0}" )]
    Resolution( #[from] ResolutionError ),

    /// No load order satisfies the batch's ordering relations.
    #[error( "Ordering failed: {0}" )]
    Order( #[from] OrderError ),

    /// The external libraries of a unit could not be resolved.
    #[error( "Failed to resolve libraries of unit '{unit}': {cause}" )]
    LibraryResolution { unit: UnitId, cause: Ar::Error },

}

impl<Mr: ManifestReader, Ar: ArtifactResolver> std::fmt::Debug for PlanError<Mr, Ar> {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        match self {
            Self::ManifestRead { unit, cause } => f.debug_struct( "ManifestRead" ).field( "unit", unit ).field( "cause", cause ).finish(),
            Self::Resolution( err ) => f.debug_tuple( "Resolution" ).field( err ).finish(),
            Self::Order( err ) => f.debug_tuple( "Order" ).field( err ).finish(),
            Self::LibraryResolution { unit, cause } => f.debug_struct( "LibraryResolution" ).field( "unit", unit ).field( "cause", cause ).finish(),
        }
    }
}

/// Errors that can occur during [`Runtime::load`].
///
/// Every variant but [`LoadError::Activation`] is raised before the activator is
/// first called. An activation failure does not roll back modules that were already
/// enabled: they stay registered and are handed back in `enabled`.
///
/// [`Runtime::load`]: crate::Runtime::load
#[derive( Error )]
pub enum LoadError<Mr: ManifestReader, Ar: ArtifactResolver, Ma: ModuleActivator> {

    #[error( "Failed to read manifest of unit '{unit}': {cause}" )]
    ManifestRead { unit: UnitId, cause: Mr::Error },

    #[error( "Resolution failed: {0}" )]
    Resolution( ResolutionError ),

    #[error( "Ordering failed: {0}" )]
    Order( OrderError ),

    #[error( "Failed to resolve libraries of unit '{unit}': {cause}" )]
    LibraryResolution { unit: UnitId, cause: Ar::Error },

    /// The activator failed to instantiate or enable a module.
    #[error( "Failed to activate module {module} of unit '{unit}': {cause}" )]
    Activation {
        unit: UnitId,
        module: ModuleKey,
        cause: Ma::Error,
        enabled: Vec<ActiveModule<Ma::Instance>>,
    },

}

impl<Mr: ManifestReader, Ar: ArtifactResolver, Ma: ModuleActivator> From<PlanError<Mr, Ar>> for LoadError<Mr, Ar, Ma> {
    fn from( err: PlanError<Mr, Ar> ) -> Self {
        match err {
            PlanError::ManifestRead { unit, cause } => Self::ManifestRead { unit, cause },
            PlanError::Resolution( err ) => Self::Resolution( err ),
            PlanError::Order( err ) => Self::Order( err ),
            PlanError::LibraryResolution { unit, cause } => Self::LibraryResolution { unit, cause },
        }
    }
}

impl<Mr: ManifestReader, Ar: ArtifactResolver, Ma: ModuleActivator> std::fmt::Debug for LoadError<Mr, Ar, Ma> {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        match self {
            Self::ManifestRead { unit, cause } => f.debug_struct( "ManifestRead" ).field( "unit", unit ).field( "cause", cause ).finish(),
            Self::Resolution( err ) => f.debug_tuple( "Resolution" ).field( err ).finish(),
            Self::Order( err ) => f.debug_tuple( "Order" ).field( err ).finish(),
            Self::LibraryResolution { unit, cause } => f.debug_struct( "LibraryResolution" ).field( "unit", unit ).field( "cause", cause ).finish(),
            Self::Activation { unit, module, cause, enabled } => f.debug_struct( "Activation" )
                .field( "unit", unit )
                .field( "module", module )
                .field( "cause", cause )
                .field( "enabled", &enabled.iter().map( ActiveModule::key ).collect::<Vec<_>>() )
                .finish(),
        }
    }
}

/// Non-fatal problems met during a load cycle.
#[derive( Debug, Error, Clone, PartialEq, Eq )]
pub enum LoadWarning {

    /// Optional relations whose target is absent or has an unacceptable version.
    #[error( "Module {module} has {} unsatisfied optional relations", .relations.len() )]
    MissingOptional { module: ModuleKey, relations: Vec<Relation> },

    /// A context overrides a library version its parents provide.
    #[error( "{0}" )]
    LibraryOverride( LibraryOverride ),

}

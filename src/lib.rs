//! Dependency-ordered module loading with isolation-context planning.
//!
//! Modules are independently authored units of functionality shipped inside code
//! units (compiled artifacts). Each module declares an identity, a version and a list
//! of relations to other modules. `module_link` turns a batch of units into a
//! validated load order, partitions the units into isolation contexts so that code is
//! only visible along declared dependencies, and activates the modules in order.
//!
//! # Core Concepts
//!
//! - [`Relation`]: A typed declaration one module makes about another. Ordering kinds
//! 	([`RelationKind::RequiredBefore`], [`RelationKind::OptionalAfter`], ...) constrain
//! 	the load order; conflict kinds ([`RelationKind::Incompatible`],
//! 	[`RelationKind::Included`]) reject the batch if their target is present.
//!
//! - [`ModuleMetadata`]: What the loader knows about a module before running it.
//! 	Metadata comes from a [`ManifestReader`]; [`TomlManifestReader`] reads a
//! 	`modules.toml` file next to each unit.
//!
//! - [`IsolationContext`]: An execution namespace. Units that depend on nothing get a
//! 	context of their own, units depending on each other share one, and every other
//! 	unit sees its dependencies through its context's parent.
//!
//! - [`Runtime`]: Owns the registry of loaded modules and drives load cycles. Each
//! 	cycle is ordered after every module loaded before it.
//!
//! # Example
//!
//! ```
//! use std::collections::{ BTreeSet, HashMap };
//! use std::convert::Infallible ;
//! use module_link::{
//! 	ActivationContext, ArtifactResolver, CodeUnit, LibraryCoordinate, LoaderConfig,
//! 	ModuleActivator, ModuleKey, ModuleMetadata, Relation, RelationKind, ResolvedLibrary,
//! 	Runtime, UnitId, Version,
//! };
//!
//! // Libraries are resolved by a collaborator; this one knows no repositories.
//! struct Offline ;
//! impl ArtifactResolver for Offline {
//! 	type Error = Infallible ;
//! 	fn resolve(
//! 		&self,
//! 		requests: &BTreeSet<LibraryCoordinate>,
//! 		_exclusions: &BTreeSet<LibraryCoordinate>,
//! 	) -> Result<Vec<ResolvedLibrary>, Self::Error> {
//! 		Ok( requests.iter().map(| library | ResolvedLibrary::new( library.clone(), "local" )).collect())
//! 	}
//! }
//!
//! // The activator decides what a running module is; here, just its name.
//! struct Names ;
//! impl ModuleActivator for Names {
//! 	type Instance = String ;
//! 	type Error = Infallible ;
//! 	fn instantiate( &mut self, module: &ModuleMetadata, _: ActivationContext<'_> ) -> Result<String, Infallible> {
//! 		Ok( module.name().to_string() )
//! 	}
//! 	fn enable( &mut self, _: &ModuleMetadata, _: &mut String ) -> Result<(), Infallible> { Ok(()) }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let base = ModuleKey::new( "core", "base" );
//! let net = ModuleKey::new( "core", "net" );
//!
//! // A map from unit to metadata works as a manifest reader.
//! let manifests = HashMap::from([
//! 	( UnitId::from( "net.jar" ), vec![
//! 		ModuleMetadata::new( net.clone(), Version::parse( "1.2.0" )? )
//! 			.with_relation( Relation::new( RelationKind::RequiredBefore, base.clone() )),
//! 	]),
//! 	( UnitId::from( "base.jar" ), vec![ ModuleMetadata::new( base.clone(), Version::new( 1, 0, 0 ))]),
//! ]);
//! let units = [ CodeUnit::new( "net.jar" ), CodeUnit::new( "base.jar" )];
//!
//! let mut runtime = Runtime::new( LoaderConfig::new()
//! 	.with_host( ModuleKey::new( "app", "host" ), Version::new( 1, 0, 0 )));
//! let ( report, warnings ) = runtime.load( &units, &manifests, &Offline, &mut Names )?;
//!
//! let order = report.modules().iter().map(| module | module.key().clone() ).collect::<Vec<_>>();
//! assert_eq!( order, vec![ base, net.clone() ]);
//! assert!( warnings.is_empty() );
//!
//! // `net` depends on `base`, so its context sees the base unit.
//! let net_unit = UnitId::from( "net.jar" );
//! let visible = report.isolation().accessible_units( &net_unit );
//! assert!( visible.contains( &UnitId::from( "base.jar" )));
//! assert!( runtime.is_loaded( &net ));
//! # Ok(())
//! # }
//! ```

mod version ;
mod range ;
mod relation ;
mod module ;
mod library ;
mod resolution ;
mod ordering ;
pub mod planning ;
mod manifest ;
mod activation ;
mod runtime ;
mod utils ;

pub use version::{ Version, VersionError };
pub use range::VersionRange ;
pub use relation::{ ModuleKey, Direction, RelationKind, Relation };
pub use module::{ UnitId, CodeUnit, ModuleMetadata };
pub use library::{ LibraryCoordinate, CoordinateError, ResolvedLibrary, ArtifactResolver, LibraryCache };
pub use resolution::{ LoadedModules, ResolutionError, ResolutionResult, resolve };
pub use ordering::{ OrderError, resolve_order };
pub use planning::{ UnitGraph, ContextId, ContextKind, IsolationContext, IsolationPlan, IsolationPlanner, LibraryOverride, assign_libraries };
pub use manifest::{ ManifestReader, TomlManifestReader, TomlManifestError };
pub use activation::{ ActivationContext, ModuleActivator };
pub use runtime::{ Runtime, LoaderConfig, PlanError, LoadError, LoadWarning, LoadedModule, PlannedModule, LoadPlan, ActiveModule, LoadReport };
pub use utils::PartialSuccess ;
pub use nonempty_collections ;

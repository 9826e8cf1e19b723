//! The load cycle driver.
//!
//! A [`Runtime`] owns the registry of loaded modules and drives one load cycle at a
//! time through every phase:
//!
//! 1. Reads each unit's manifest and injects the implicit host relation
//! 2. Resolves every relation of the batch and rejects it on missing requirements,
//! 	conflicts or duplicate identities
//! 3. Orders the batch after the modules loaded in earlier cycles
//! 4. Plans isolation contexts and their library sets
//! 5. Instantiates every module, then enables them one by one in load order
//!
//! Phases 1 to 4 are [`Runtime::plan`]; they don't touch the registry, so a failing
//! plan leaves the runtime as it was.

mod config ;
mod error ;
mod report ;

pub use config::LoaderConfig ;
pub use error::{ PlanError, LoadError, LoadWarning };
pub use report::{ LoadedModule, PlannedModule, LoadPlan, ActiveModule, LoadReport };

use std::collections::{ BTreeSet, HashMap };
use std::sync::Arc ;
use pipe_trait::Pipe ;
use tracing::{ debug, info, warn };

use crate::activation::ModuleActivator ;
use crate::library::{ ArtifactResolver, LibraryCache, LibraryCoordinate };
use crate::manifest::ManifestReader ;
use crate::module::{ CodeUnit, ModuleMetadata, UnitId };
use crate::ordering::resolve_order ;
use crate::planning::{ IsolationPlan, UnitGraph, assign_libraries };
use crate::relation::ModuleKey ;
use crate::resolution::{ LoadedModules, resolve };
use crate::utils::{ Merge, PartialSuccess };
use crate::version::Version ;



/// Owns the loaded-module registry and runs load cycles.
///
/// Modules are registered in the order they were enabled, across cycles; this order
/// is the fixed prefix every later cycle is ordered after. The host, if configured,
/// is registered first.
#[derive( Debug )]
pub struct Runtime {
    config: LoaderConfig,
    loaded: Vec<LoadedModule>,
    index: HashMap<ModuleKey, usize>,
    libraries: LibraryCache,
}

impl Runtime {

    pub fn new( config: LoaderConfig ) -> Self {
        let mut runtime = Self {
            config,
            loaded: Vec::new(),
            index: HashMap::new(),
            libraries: LibraryCache::new(),
        };
        runtime.register_host();
        runtime
    }

    #[inline] pub fn config( &self ) -> &LoaderConfig { &self.config }

    /// Registered modules in load order, host first.
    #[inline] pub fn loaded( &self ) -> &[LoadedModule] { &self.loaded }

    #[inline] pub fn library_cache( &self ) -> &LibraryCache { &self.libraries }

    pub fn is_loaded( &self, key: &ModuleKey ) -> bool { self.index.contains_key( key )}

    pub fn get( &self, key: &ModuleKey ) -> Option<&LoadedModule> {
        self.index.get( key ).map(| position | &self.loaded[ *position ])
    }

    /// Forgets every loaded module and cached library set. The host is registered again.
    pub fn clear( &mut self ) {
        info!( modules = self.loaded.len(), "Clearing runtime registry" );
        self.loaded.clear();
        self.index.clear();
        self.libraries.clear();
        self.register_host();
    }

    fn register_host( &mut self ) {
        if let Some(( key, version )) = self.config.host() {
            let host = ModuleMetadata::new( key.clone(), version.clone() );
            self.register( LoadedModule::new( host, None ));
        }
    }

    fn register( &mut self, module: LoadedModule ) {
        debug!( module = %module.key(), position = self.loaded.len(), "Registered module" );
        self.index.insert( module.key().clone(), self.loaded.len() );
        self.loaded.push( module );
    }

    /// Reads, validates, orders and isolates a batch of units without activating
    /// anything.
    ///
    /// # Errors
    /// Any [`PlanError`]; the registry is left untouched either way.
    pub fn plan<Mr, Ar>(
        &self,
        units: &[CodeUnit],
        reader: &Mr,
        resolver: &Ar,
    ) -> Result<PartialSuccess<LoadPlan, LoadWarning>, PlanError<Mr, Ar>>
    where
        Mr: ManifestReader,
        Ar: ArtifactResolver,
    {

        info!( units = units.len(), "Planning load cycle" );

        let planned = self.read_manifests::<Mr, Ar>( units, reader )?;
        let candidates = planned.iter().map(| module | module.metadata.clone() ).collect::<Vec<_>>();

        let resolution = resolve( &candidates, self )?;
        resolution.check()?;
        let warnings = resolution.missing_optional().iter()
            .map(|( module, relations )| LoadWarning::MissingOptional { module: module.clone(), relations: relations.clone() })
            .inspect(| warning | warn!( %warning, "Optional relations unsatisfied" ))
            .collect::<Vec<_>>();

        let loaded = self.loaded.iter().map(| module | module.metadata().clone() ).collect::<Vec<_>>();
        let mut by_key = planned.into_iter()
            .map(| module | ( module.key().clone(), module ))
            .collect::<HashMap<_, _>>();
        let modules = resolve_order( &loaded, &candidates )?
            .into_iter()
            .filter_map(| key | by_key.remove( &key ))
            .collect::<Vec<_>>();

        let owners = modules.iter()
            .map(| module | ( module.key().clone(), module.unit.clone() ))
            .collect::<HashMap<_, _>>();
        let isolation = UnitGraph::from_established( units.iter().map(| unit | unit.id().clone() ), &owners, resolution.established() )
            .pipe_ref( IsolationPlan::new );

        let requests = library_requests( units, &modules );
        let ( isolation, overrides ) = assign_libraries( isolation, | unit | match requests.get( unit ) {
            Some( requested ) => self.libraries.get_or_resolve( unit, requested, self.config.host_libraries(), resolver ),
            None => Ok( Arc::default() ),
        }).map_err(|( unit, cause )| PlanError::LibraryResolution { unit, cause })?;

        info!( modules = modules.len(), contexts = isolation.len(), "Planned load cycle" );

        let warnings = warnings.merge_all( overrides.into_iter().map( LoadWarning::LibraryOverride ));
        Ok(( LoadPlan { modules, resolution, isolation }, warnings ))

    }

    /// Plans a batch of units and activates it.
    ///
    /// Every module is instantiated before the first one is enabled, both in load
    /// order. A module is registered as loaded as soon as it is enabled.
    ///
    /// # Errors
    /// Any [`LoadError`]. Only [`LoadError::Activation`] can leave modules of the
    /// batch registered: those enabled before the failure.
    pub fn load<Mr, Ar, Ma>(
        &mut self,
        units: &[CodeUnit],
        reader: &Mr,
        resolver: &Ar,
        activator: &mut Ma,
    ) -> Result<PartialSuccess<LoadReport<Ma::Instance>, LoadWarning>, LoadError<Mr, Ar, Ma>>
    where
        Mr: ManifestReader,
        Ar: ArtifactResolver,
        Ma: ModuleActivator,
    {

        let ( plan, warnings ) = self.plan( units, reader, resolver )?;

        let mut instances = Vec::with_capacity( plan.modules.len() );
        for ( module, context ) in plan.activation_contexts() {
            let instance = activator.instantiate( &module.metadata, context )
                .map_err(| cause | LoadError::Activation {
                    unit: module.unit.clone(),
                    module: module.key().clone(),
                    cause,
                    enabled: Vec::with_capacity( 0 ),
                })?;
            debug!( module = %module.key(), context = %context.context().id(), "Instantiated module" );
            instances.push( ActiveModule {
                unit: module.unit.clone(),
                metadata: module.metadata.clone(),
                context: context.context().id(),
                instance,
            });
        }

        let mut enabled = Vec::with_capacity( instances.len() );
        for mut module in instances {
            if let Err( cause ) = activator.enable( &module.metadata, &mut module.instance ) {
                warn!( module = %module.key(), enabled = enabled.len(), "Module failed to enable" );
                return Err( LoadError::Activation { unit: module.unit, module: module.metadata.key().clone(), cause, enabled });
            }
            self.register( LoadedModule::new( module.metadata.clone(), Some( module.unit.clone() )));
            enabled.push( module );
        }

        info!( modules = enabled.len(), warnings = warnings.len(), "Load cycle complete" );
        Ok(( LoadReport { modules: enabled, plan }, warnings ))

    }

}

impl LoadedModules for Runtime {
    fn version_of( &self, key: &ModuleKey ) -> Option<&Version> {
        self.get( key ).map(| module | module.metadata().version() )
    }
}

/// Per-unit library requests: the unit's own plus those of the modules it contains.
fn library_requests( units: &[CodeUnit], modules: &[PlannedModule] ) -> HashMap<UnitId, BTreeSet<LibraryCoordinate>> {
    let mut requests = units.iter()
        .map(| unit | ( unit.id().clone(), unit.libraries().clone() ))
        .collect::<HashMap<_, _>>();
    modules.iter().for_each(| module | requests
        .entry( module.unit.clone() )
        .or_default()
        .extend( module.metadata.libraries().iter().cloned() ));
    requests
}

impl Runtime {

    fn read_manifests<Mr, Ar>( &self, units: &[CodeUnit], reader: &Mr ) -> Result<Vec<PlannedModule>, PlanError<Mr, Ar>>
    where
        Mr: ManifestReader,
        Ar: ArtifactResolver,
    {
        let host = self.config.host().filter(|_| self.config.injects_host_relation() ).map(|( key, _ )| key );
        let mut planned = Vec::new();
        for unit in units {
            let modules = reader.read( unit )
                .map_err(| cause | PlanError::ManifestRead { unit: unit.id().clone(), cause })?;
            debug!( unit = %unit.id(), modules = modules.len(), "Read unit manifest" );
            planned.extend( modules.into_iter().map(| metadata | PlannedModule {
                unit: unit.id().clone(),
                metadata: match host {
                    Some( host ) => metadata.with_implicit_host( host ),
                    None => metadata,
                },
            }));
        }
        Ok( planned )
    }

}

//! Relation resolution.
//!
//! [`resolve`] checks every relation declared by a batch of candidate modules against
//! the other candidates and the modules that are already loaded, and sorts each
//! relation into exactly one bucket of a [`ResolutionResult`]. It does not decide
//! whether the batch may load; [`ResolutionResult::check`] does that.

use std::collections::{ BTreeMap, BTreeSet, HashMap };
use itertools::Itertools ;
use nonempty_collections::NEMap ;
use thiserror::Error ;
use tracing::{ debug, trace };

use crate::module::ModuleMetadata ;
use crate::relation::{ ModuleKey, Relation };
use crate::utils::non_empty_map ;
use crate::version::Version ;



/// Lookup of modules loaded in earlier cycles (or provided by the host).
pub trait LoadedModules {
    /// Returns the version of the loaded module `key`, if any.
    fn version_of( &self, key: &ModuleKey ) -> Option<&Version> ;
}

impl<S: std::hash::BuildHasher> LoadedModules for HashMap<ModuleKey, Version, S> {
    fn version_of( &self, key: &ModuleKey ) -> Option<&Version> { self.get( key )}
}

impl LoadedModules for BTreeMap<ModuleKey, Version> {
    fn version_of( &self, key: &ModuleKey ) -> Option<&Version> { self.get( key )}
}

/// A fatal outcome of resolution.
#[derive( Debug, Error )]
pub enum ResolutionError {

    /// Two candidates share a key, or a candidate's key is already loaded.
    #[error( "Duplicate module identity: {0}" )]
    DuplicateIdentity( ModuleKey ),

    /// Required relations whose target is absent or has an unacceptable version.
    #[error( "{} modules have unsatisfied required dependencies", .0.len() )]
    MissingRequired( NEMap<ModuleKey, Vec<Relation>> ),

    /// Conflict relations whose target is present with a matching version.
    #[error( "{} modules conflict with present modules", .0.len() )]
    Conflicts( NEMap<ModuleKey, Vec<Relation>> ),

}

/// How a single relation resolved.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
enum Outcome {
    MissingRequired,
    MissingOptional,
    Conflict,
    Established,
}

impl Outcome {
    // Conflict relations without a matching target are simply satisfied.
    fn classify( relation: &Relation, matched: bool ) -> Option<Self> {
        match ( relation.kind().is_conflict(), matched ) {
            ( true, true ) => Some( Self::Conflict ),
            ( true, false ) => None,
            ( false, true ) => Some( Self::Established ),
            ( false, false ) if relation.kind().is_required() => Some( Self::MissingRequired ),
            ( false, false ) => Some( Self::MissingOptional ),
        }
    }
}

/// Classification of every relation declared by a batch of candidates.
///
/// Each map goes from the declaring module to the relations that ended up in that
/// bucket, in declaration order. Modules with no entries in a map are absent from it.
#[derive( Debug, Clone, Default, PartialEq, Eq )]
pub struct ResolutionResult {
    missing_required: BTreeMap<ModuleKey, Vec<Relation>>,
    missing_optional: BTreeMap<ModuleKey, Vec<Relation>>,
    conflicts: BTreeMap<ModuleKey, Vec<Relation>>,
    established: BTreeMap<ModuleKey, Vec<Relation>>,
    independents: BTreeSet<ModuleKey>,
}

impl ResolutionResult {

    #[inline] pub fn missing_required( &self ) -> &BTreeMap<ModuleKey, Vec<Relation>> { &self.missing_required }
    #[inline] pub fn missing_optional( &self ) -> &BTreeMap<ModuleKey, Vec<Relation>> { &self.missing_optional }
    #[inline] pub fn conflicts( &self ) -> &BTreeMap<ModuleKey, Vec<Relation>> { &self.conflicts }
    #[inline] pub fn established( &self ) -> &BTreeMap<ModuleKey, Vec<Relation>> { &self.established }

    /// Modules that declare no relations of their own.
    #[inline] pub fn independents( &self ) -> &BTreeSet<ModuleKey> { &self.independents }

    /// Total number of established relations across all modules.
    pub fn established_count( &self ) -> usize {
        self.established.values().map( Vec::len ).sum()
    }

    /// Whether nothing fatal was found.
    pub fn is_satisfied( &self ) -> bool {
        self.missing_required.is_empty() && self.conflicts.is_empty()
    }

    /// Turns fatal classifications into an error. Missing required relations are
    /// reported in preference to conflicts.
    ///
    /// # Errors
    /// [`ResolutionError::MissingRequired`] or [`ResolutionError::Conflicts`].
    pub fn check( &self ) -> Result<(), ResolutionError> {
        if let Some( missing ) = non_empty_map( self.missing_required.clone() ) {
            return Err( ResolutionError::MissingRequired( missing ));
        }
        if let Some( conflicts ) = non_empty_map( self.conflicts.clone() ) {
            return Err( ResolutionError::Conflicts( conflicts ));
        }
        Ok(())
    }

    fn record( &mut self, outcome: Outcome, module: &ModuleKey, relation: &Relation ) {
        let bucket = match outcome {
            Outcome::MissingRequired => &mut self.missing_required,
            Outcome::MissingOptional => &mut self.missing_optional,
            Outcome::Conflict => &mut self.conflicts,
            Outcome::Established => &mut self.established,
        };
        bucket.entry( module.clone() ).or_default().push( relation.clone() );
    }

}

/// Classifies the relations of `candidates`.
///
/// Each relation's target is looked up among the other candidates first and then in
/// `loaded`; a found target only counts as a match if its version is accepted by the
/// relation. Relations a module declares on itself are ignored.
///
/// # Errors
/// Fails with [`ResolutionError::DuplicateIdentity`] before classifying anything if
/// two candidates share a key or a candidate is already loaded.
pub fn resolve( candidates: &[ModuleMetadata], loaded: &impl LoadedModules ) -> Result<ResolutionResult, ResolutionError> {

    if let Some( duplicate ) = candidates.iter().map( ModuleMetadata::key ).duplicates().next() {
        return Err( ResolutionError::DuplicateIdentity( duplicate.clone() ));
    }
    if let Some( module ) = candidates.iter().find(| module | loaded.version_of( module.key() ).is_some() ) {
        return Err( ResolutionError::DuplicateIdentity( module.key().clone() ));
    }

    let versions = candidates.iter()
        .map(| module | ( module.key(), module.version() ))
        .collect::<HashMap<_, _>>();

    let mut result = ResolutionResult {
        independents: candidates.iter()
            .filter(| module | module.is_independent() )
            .map(| module | module.key().clone() )
            .collect(),
        ..ResolutionResult::default()
    };

    candidates.iter()
        .flat_map(| module | module.relations().iter().map( move | relation | ( module, relation )))
        .filter(|( module, relation )| relation.target() != module.key() )
        .filter_map(|( module, relation )| {
            let found = versions.get( relation.target() ).copied()
                .or_else(|| loaded.version_of( relation.target() ));
            let matched = found.is_some_and(| version | relation.accepts( version ));
            trace!( module = %module.key(), %relation, ?found, matched, "Resolved relation" );
            Outcome::classify( relation, matched ).map(| outcome | ( outcome, module.key(), relation ))
        })
        .for_each(|( outcome, module, relation )| result.record( outcome, module, relation ));

    debug!(
        candidates = candidates.len(),
        established = result.established_count(),
        missing_required = result.missing_required.len(),
        missing_optional = result.missing_optional.len(),
        conflicts = result.conflicts.len(),
        "Resolved batch relations",
    );

    Ok( result )

}

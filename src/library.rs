//! External library coordinates and their resolution.
//!
//! Modules request external libraries by [`LibraryCoordinate`]. An
//! [`ArtifactResolver`] expands a request set into the transitive set of
//! [`ResolvedLibrary`] locations. Because resolution may hit the network, results are
//! memoized per code unit in a [`LibraryCache`] that can be shared across threads.

use std::collections::{ BTreeSet, HashMap };
use std::str::FromStr ;
use std::sync::{ Arc, Mutex, PoisonError };
use thiserror::Error ;
use tracing::{ debug, trace };

use crate::module::UnitId ;



/// Error produced when a library coordinate string cannot be parsed.
#[derive( Debug, Error, Clone, PartialEq, Eq )]
#[error( "Invalid library coordinate '{0}', expected 'group:artifact:version'" )]
pub struct CoordinateError( pub String );

/// A `group:artifact:version` library identity.
#[derive( Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash )]
pub struct LibraryCoordinate {
    group: String,
    artifact: String,
    version: String,
}

impl LibraryCoordinate {

    pub fn new( group: impl Into<String>, artifact: impl Into<String>, version: impl Into<String> ) -> Self {
        Self { group: group.into(), artifact: artifact.into(), version: version.into() }
    }

    /// Parses `group:artifact:version`.
    ///
    /// # Errors
    /// Fails unless the input has exactly three non-empty, colon-separated parts.
    pub fn parse( input: &str ) -> Result<Self, CoordinateError> {
        match input.trim().split( ':' ).collect::<Vec<_>>().as_slice() {
            [ group, artifact, version ] if ![ group, artifact, version ].iter().any(| part | part.is_empty() ) =>
                Ok( Self::new( *group, *artifact, *version )),
            _ => Err( CoordinateError( input.to_string() )),
        }
    }

    #[inline] pub fn group( &self ) -> &str { &self.group }
    #[inline] pub fn artifact( &self ) -> &str { &self.artifact }
    #[inline] pub fn version( &self ) -> &str { &self.version }

    /// Whether both coordinates name the same artifact, regardless of version.
    pub fn same_artifact( &self, other: &Self ) -> bool {
        self.group == other.group && self.artifact == other.artifact
    }

}

impl FromStr for LibraryCoordinate {
    type Err = CoordinateError ;
    fn from_str( input: &str ) -> Result<Self, Self::Err> { Self::parse( input ) }
}

impl std::fmt::Display for LibraryCoordinate {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> Result<(), std::fmt::Error> {
        write!( f, "{}:{}:{}", self.group, self.artifact, self.version )
    }
}

/// A library resolved to a downloadable or local location.
#[derive( Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash )]
pub struct ResolvedLibrary {
    coordinate: LibraryCoordinate,
    location: String,
}

impl ResolvedLibrary {
    pub fn new( coordinate: LibraryCoordinate, location: impl Into<String> ) -> Self {
        Self { coordinate, location: location.into() }
    }
    #[inline] pub fn coordinate( &self ) -> &LibraryCoordinate { &self.coordinate }
    #[inline] pub fn location( &self ) -> &str { &self.location }
}

/// Resolves library requests into their transitive closure.
///
/// Implementations must be deterministic for identical inputs and may cache across
/// calls. The runtime passes the host-provided libraries as `exclusions`; neither they
/// nor their own dependencies should appear in the result.
pub trait ArtifactResolver {

    /// Error type for resolution failures (unreachable repository, unknown artifact, ...).
    type Error: std::error::Error ;

    /// Resolves `requests` transitively.
    ///
    /// # Errors
    /// Implementations fail if any requested artifact cannot be resolved.
    fn resolve(
        &self,
        requests: &BTreeSet<LibraryCoordinate>,
        exclusions: &BTreeSet<LibraryCoordinate>,
    ) -> Result<Vec<ResolvedLibrary>, Self::Error> ;

}

/// A resolved set with the inputs it was resolved from.
#[derive( Debug )]
struct CachedSet {
    requests: BTreeSet<LibraryCoordinate>,
    exclusions: BTreeSet<LibraryCoordinate>,
    libraries: Arc<BTreeSet<ResolvedLibrary>>,
}

impl CachedSet {
    fn matches( &self, requests: &BTreeSet<LibraryCoordinate>, exclusions: &BTreeSet<LibraryCoordinate> ) -> bool {
        &self.requests == requests && &self.exclusions == exclusions
    }
}

type CacheSlot = Arc<Mutex<Option<CachedSet>>> ;

/// Per-unit memo of resolved library sets.
///
/// Each unit has its own slot guarded by a mutex, so concurrent requests for the same
/// unit are serialized and only the first one reaches the resolver, while requests for
/// different units proceed independently. A slot is only served while the unit asks
/// for the same requests and exclusions it was resolved with; anything else resolves
/// again and replaces it. Failures are not cached.
#[derive( Debug, Default )]
pub struct LibraryCache {
    slots: Mutex<HashMap<UnitId, CacheSlot>>,
}

impl LibraryCache {

    pub fn new() -> Self { Self::default() }

    /// Returns the set resolved for `unit` from `requests` and `exclusions`, resolving
    /// it if the unit has no set for exactly these inputs yet.
    ///
    /// # Errors
    /// Propagates the resolver's error; the slot keeps its previous content so a later
    /// call retries.
    pub fn get_or_resolve<R: ArtifactResolver>(
        &self,
        unit: &UnitId,
        requests: &BTreeSet<LibraryCoordinate>,
        exclusions: &BTreeSet<LibraryCoordinate>,
        resolver: &R,
    ) -> Result<Arc<BTreeSet<ResolvedLibrary>>, R::Error> {

        let slot = Arc::clone( self.slots
            .lock().unwrap_or_else( PoisonError::into_inner )
            .entry( unit.clone() )
            .or_default());

        let mut slot = slot.lock().unwrap_or_else( PoisonError::into_inner );
        match slot.as_ref() {
            Some( cached ) if cached.matches( requests, exclusions ) => {
                trace!( %unit, "Library set served from cache" );
                return Ok( Arc::clone( &cached.libraries ));
            },
            Some( _ ) => debug!( %unit, "Library requests changed, resolving again" ),
            None => {},
        }

        let libraries = match requests.is_empty() {
            true => BTreeSet::new(),
            false => resolver.resolve( requests, exclusions )?.into_iter().collect(),
        };
        debug!( %unit, requested = requests.len(), resolved = libraries.len(), "Resolved library set" );

        let libraries = Arc::new( libraries );
        *slot = Some( CachedSet {
            requests: requests.clone(),
            exclusions: exclusions.clone(),
            libraries: Arc::clone( &libraries ),
        });
        Ok( libraries )

    }

    /// Whether a resolved set is cached for `unit`.
    pub fn contains( &self, unit: &UnitId ) -> bool {
        self.slots.lock().unwrap_or_else( PoisonError::into_inner )
            .get( unit )
            .is_some_and(| slot | slot.lock().unwrap_or_else( PoisonError::into_inner ).is_some() )
    }

    /// Drops every cached set.
    pub fn clear( &self ) {
        self.slots.lock().unwrap_or_else( PoisonError::into_inner ).clear();
    }

}

//! Module metadata and code units.
//!
//! A [`CodeUnit`] is one physical artifact; it holds the code of one or more modules,
//! each described by an immutable [`ModuleMetadata`]. Isolation is planned per unit,
//! resolution and ordering per module.

use std::collections::BTreeSet ;
use std::path::{ Path, PathBuf };

use crate::library::LibraryCoordinate ;
use crate::relation::{ ModuleKey, Relation, RelationKind };
use crate::version::Version ;



/// Opaque identifier of a code unit.
#[derive( Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash )]
pub struct UnitId( String );

impl UnitId {
    pub fn new( id: impl Into<String> ) -> Self { Self( id.into() )}
    #[inline] pub fn as_str( &self ) -> &str { &self.0 }
}

impl From<&str> for UnitId {
    fn from( id: &str ) -> Self { Self::new( id )}
}

impl From<String> for UnitId {
    fn from( id: String ) -> Self { Self( id )}
}

impl std::fmt::Display for UnitId {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> Result<(), std::fmt::Error> {
        std::fmt::Display::fmt( &self.0, f )
    }
}

/// A compiled artifact handed to a load cycle.
///
/// Besides its identity a unit may carry a filesystem location (used by file-based
/// manifest readers) and libraries the artifact itself declares, on top of whatever
/// its modules request.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct CodeUnit {
    id: UnitId,
    location: Option<PathBuf>,
    libraries: BTreeSet<LibraryCoordinate>,
}

impl CodeUnit {

    pub fn new( id: impl Into<UnitId> ) -> Self {
        Self { id: id.into(), location: None, libraries: BTreeSet::new() }
    }

    /// Sets the directory or file the unit was found at.
    pub fn with_location( mut self, location: impl Into<PathBuf> ) -> Self {
        self.location = Some( location.into());
        self
    }

    /// Adds an artifact-level library requirement.
    pub fn with_library( mut self, library: LibraryCoordinate ) -> Self {
        self.libraries.insert( library );
        self
    }

    #[inline] pub fn id( &self ) -> &UnitId { &self.id }
    #[inline] pub fn location( &self ) -> Option<&Path> { self.location.as_deref() }
    #[inline] pub fn libraries( &self ) -> &BTreeSet<LibraryCoordinate> { &self.libraries }

}

/// Everything the loader knows about a module before running any of its code.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct ModuleMetadata {
    key: ModuleKey,
    name: String,
    version: Version,
    relations: Vec<Relation>,
    libraries: BTreeSet<LibraryCoordinate>,
    /// Reference handed to the activator to locate the module's entry point
    entry_point: Option<String>,
}

impl ModuleMetadata {

    /// Creates metadata with no relations. The display name defaults to the identifier.
    pub fn new( key: ModuleKey, version: Version ) -> Self {
        Self {
            name: key.id().to_string(),
            key,
            version,
            relations: Vec::with_capacity( 0 ),
            libraries: BTreeSet::new(),
            entry_point: None,
        }
    }

    pub fn with_name( mut self, name: impl Into<String> ) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_relation( mut self, relation: Relation ) -> Self {
        self.relations.push( relation );
        self
    }

    pub fn with_relations( mut self, relations: impl IntoIterator<Item = Relation> ) -> Self {
        self.relations.extend( relations );
        self
    }

    pub fn with_library( mut self, library: LibraryCoordinate ) -> Self {
        self.libraries.insert( library );
        self
    }

    pub fn with_entry_point( mut self, entry_point: impl Into<String> ) -> Self {
        self.entry_point = Some( entry_point.into());
        self
    }

    /// Adds an implicit `RequiredBefore` relation on `host` unless a relation on it
    /// is already declared.
    pub(crate) fn with_implicit_host( self, host: &ModuleKey ) -> Self {
        if &self.key == host || self.relations.iter().any(| relation | relation.target() == host ) { return self }
        self.with_relation( Relation::implicit( RelationKind::RequiredBefore, host.clone() ))
    }

    #[inline] pub fn key( &self ) -> &ModuleKey { &self.key }
    #[inline] pub fn name( &self ) -> &str { &self.name }
    #[inline] pub fn version( &self ) -> &Version { &self.version }
    #[inline] pub fn relations( &self ) -> &[Relation] { &self.relations }
    #[inline] pub fn libraries( &self ) -> &BTreeSet<LibraryCoordinate> { &self.libraries }
    #[inline] pub fn entry_point( &self ) -> Option<&str> { self.entry_point.as_deref() }

    /// Whether the module declares no relations of its own (implicit ones don't count).
    pub fn is_independent( &self ) -> bool {
        self.relations.iter().all( Relation::is_implicit )
    }

}

//! Manifest reading.
//!
//! A [`ManifestReader`] extracts the [`ModuleMetadata`] of every module a code unit
//! contains. Two readers ship with the crate: a plain map from unit to metadata (for
//! callers that discover modules some other way) and [`TomlManifestReader`], which
//! reads a `modules.toml` file next to each unit.
//!
//! A TOML manifest lists one `[[module]]` table per module:
//!
//! ```toml
//! [[module]]
//! namespace = "core"
//! id = "net"
//! name = "Networking"
//! version = "1.2.0"
//! entry-point = "core.net.Main"
//! libraries = [ "org.example:codec:2.0.0" ]
//!
//! [[module.relation]]
//! kind = "required-before"
//! namespace = "core"
//! id = "base"
//! versions = [{ min = "1.0.0", max = "2.0.0", exclude = [{ min = "1.5.0", max = "1.5.3" }]}]
//! ```

use std::collections::HashMap ;
use std::convert::Infallible ;
use std::path::{ Path, PathBuf };
use thiserror::Error ;
use tracing::debug ;

use crate::library::{ CoordinateError, LibraryCoordinate };
use crate::module::{ CodeUnit, ModuleMetadata, UnitId };
use crate::range::VersionRange ;
use crate::relation::{ ModuleKey, Relation };
use crate::version::{ Version, VersionError };



/// Extracts module metadata from code units.
pub trait ManifestReader {

    type Error: std::error::Error ;

    /// Returns the modules `unit` contains; a unit may contain none.
    ///
    /// # Errors
    /// Implementations fail if the unit's manifest is missing or malformed.
    fn read( &self, unit: &CodeUnit ) -> Result<Vec<ModuleMetadata>, Self::Error> ;

}

/// Units not in the map contain no modules.
impl<S: std::hash::BuildHasher> ManifestReader for HashMap<UnitId, Vec<ModuleMetadata>, S> {
    type Error = Infallible ;
    fn read( &self, unit: &CodeUnit ) -> Result<Vec<ModuleMetadata>, Self::Error> {
        Ok( self.get( unit.id() ).cloned().unwrap_or_default())
    }
}

#[derive( Debug, Error )]
pub enum TomlManifestError {
    #[error( "Unit '{0}' has no location to read a manifest from" )]
    MissingLocation( UnitId ),
    #[error( "Failed to read manifest {}: {source}", .path.display() )]
    Io { path: PathBuf, #[source] source: std::io::Error },
    #[error( "Malformed manifest {}: {source}", .path.display() )]
    Toml { path: PathBuf, #[source] source: toml::de::Error },
    #[error( "Invalid version in manifest {}: {source}", .path.display() )]
    Version { path: PathBuf, #[source] source: VersionError },
    #[error( "Invalid library in manifest {}: {source}", .path.display() )]
    Coordinate { path: PathBuf, #[source] source: CoordinateError },
}

/// Reads `<unit location>/<file name>` as a TOML manifest.
///
/// A unit whose location is itself a file is read directly.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct TomlManifestReader {
    file_name: String,
}

impl TomlManifestReader {

    pub const DEFAULT_FILE_NAME: &str = "modules.toml" ;

    pub fn new() -> Self { Self { file_name: Self::DEFAULT_FILE_NAME.to_string() }}

    pub fn with_file_name( mut self, file_name: impl Into<String> ) -> Self {
        self.file_name = file_name.into();
        self
    }

    #[inline] pub fn file_name( &self ) -> &str { &self.file_name }

    fn manifest_path( &self, location: &Path ) -> PathBuf {
        match location.is_file() {
            true => location.to_path_buf(),
            false => location.join( &self.file_name ),
        }
    }

    /// Parses manifest text; `path` is only used in errors.
    ///
    /// # Errors
    /// Fails on malformed TOML, versions or library coordinates.
    pub fn parse( text: &str, path: &Path ) -> Result<Vec<ModuleMetadata>, TomlManifestError> {
        let manifest = toml::from_str::<raw::ManifestFile>( text )
            .map_err(| source | TomlManifestError::Toml { path: path.to_path_buf(), source })?;
        manifest.module.into_iter()
            .map(| module | module.into_metadata())
            .collect::<Result<Vec<_>, raw::ConversionError>>()
            .map_err(| err | err.at( path ))
    }

}

impl Default for TomlManifestReader {
    fn default() -> Self { Self::new() }
}

impl ManifestReader for TomlManifestReader {

    type Error = TomlManifestError ;

    fn read( &self, unit: &CodeUnit ) -> Result<Vec<ModuleMetadata>, Self::Error> {
        let location = unit.location().ok_or_else(|| TomlManifestError::MissingLocation( unit.id().clone() ))?;
        let path = self.manifest_path( location );
        let text = std::fs::read_to_string( &path )
            .map_err(| source | TomlManifestError::Io { path: path.clone(), source })?;
        let modules = Self::parse( &text, &path )?;
        debug!( unit = %unit.id(), path = %path.display(), modules = modules.len(), "Read manifest" );
        Ok( modules )
    }

}

mod raw {

    use serde::Deserialize ;

    use super::*;
    use crate::relation::RelationKind ;

    pub(super) enum ConversionError {
        Version( VersionError ),
        Coordinate( CoordinateError ),
    }

    impl ConversionError {
        pub(super) fn at( self, path: &Path ) -> TomlManifestError {
            let path = path.to_path_buf();
            match self {
                Self::Version( source ) => TomlManifestError::Version { path, source },
                Self::Coordinate( source ) => TomlManifestError::Coordinate { path, source },
            }
        }
    }

    impl From<VersionError> for ConversionError {
        fn from( err: VersionError ) -> Self { Self::Version( err )}
    }

    impl From<CoordinateError> for ConversionError {
        fn from( err: CoordinateError ) -> Self { Self::Coordinate( err )}
    }

    #[derive( Deserialize )]
    #[serde( deny_unknown_fields )]
    pub(super) struct ManifestFile {
        #[serde( default )]
        pub module: Vec<ModuleEntry>,
    }

    #[derive( Deserialize )]
    #[serde( rename_all = "kebab-case", deny_unknown_fields )]
    pub(super) struct ModuleEntry {
        namespace: String,
        id: String,
        name: Option<String>,
        version: String,
        entry_point: Option<String>,
        #[serde( default )]
        libraries: Vec<String>,
        #[serde( default )]
        relation: Vec<RelationEntry>,
    }

    #[derive( Deserialize )]
    #[serde( deny_unknown_fields )]
    struct RelationEntry {
        kind: Kind,
        namespace: String,
        id: String,
        #[serde( default )]
        versions: Vec<RangeEntry>,
    }

    #[derive( Deserialize )]
    #[serde( rename_all = "kebab-case", deny_unknown_fields )]
    struct RangeEntry {
        min: Option<String>,
        max: Option<String>,
        #[serde( default )]
        exclude: Vec<RangeEntry>,
        #[serde( default = "enabled" )]
        unstable: bool,
        #[serde( default = "enabled" )]
        case_sensitive: bool,
    }

    fn enabled() -> bool { true }

    #[derive( Deserialize, Clone, Copy )]
    #[serde( rename_all = "kebab-case" )]
    enum Kind {
        RequiredBefore,
        RequiredAfter,
        OptionalBefore,
        OptionalAfter,
        Incompatible,
        Included,
    }

    impl From<Kind> for RelationKind {
        fn from( kind: Kind ) -> Self {
            match kind {
                Kind::RequiredBefore => Self::RequiredBefore,
                Kind::RequiredAfter => Self::RequiredAfter,
                Kind::OptionalBefore => Self::OptionalBefore,
                Kind::OptionalAfter => Self::OptionalAfter,
                Kind::Incompatible => Self::Incompatible,
                Kind::Included => Self::Included,
            }
        }
    }

    impl ModuleEntry {
        pub(super) fn into_metadata( self ) -> Result<ModuleMetadata, ConversionError> {

            let relations = self.relation.into_iter()
                .map( RelationEntry::into_relation )
                .collect::<Result<Vec<_>, _>>()?;
            let libraries = self.libraries.iter()
                .map(| library | LibraryCoordinate::parse( library ))
                .collect::<Result<Vec<_>, _>>()?;

            let mut metadata = ModuleMetadata::new( ModuleKey::new( self.namespace, self.id ), Version::parse( &self.version )?)
                .with_relations( relations );
            metadata = libraries.into_iter().fold( metadata, ModuleMetadata::with_library );
            if let Some( name ) = self.name { metadata = metadata.with_name( name ); }
            if let Some( entry_point ) = self.entry_point { metadata = metadata.with_entry_point( entry_point ); }
            Ok( metadata )

        }
    }

    impl RelationEntry {
        fn into_relation( self ) -> Result<Relation, ConversionError> {
            let ranges = self.versions.into_iter()
                .map( RangeEntry::into_range )
                .collect::<Result<Vec<_>, _>>()?;
            Ok( Relation::new( self.kind.into(), ModuleKey::new( self.namespace, self.id )).with_ranges( ranges ))
        }
    }

    impl RangeEntry {
        fn into_range( self ) -> Result<VersionRange, ConversionError> {
            let min = self.min.as_deref().map( Version::parse ).transpose()?;
            let max = self.max.as_deref().map( Version::parse ).transpose()?;
            let exclusions = self.exclude.into_iter()
                .map( RangeEntry::into_range )
                .collect::<Result<Vec<_>, _>>()?;
            Ok( exclusions.into_iter().fold(
                VersionRange::new( min, max ).with_unstable( self.unstable ).with_case_sensitive( self.case_sensitive ),
                VersionRange::excluding,
            ))
        }
    }

}

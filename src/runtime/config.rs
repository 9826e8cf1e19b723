use std::collections::BTreeSet ;

use crate::library::LibraryCoordinate ;
use crate::manifest::TomlManifestReader ;
use crate::relation::ModuleKey ;
use crate::version::Version ;



/// Configuration of a [`Runtime`].
///
/// ```
/// use module_link::{ LoaderConfig, ModuleKey, Version, LibraryCoordinate };
///
/// let config = LoaderConfig::new()
/// 	.with_host( ModuleKey::new( "app", "host" ), Version::new( 3, 1, 0 ))
/// 	.with_host_library( LibraryCoordinate::new( "org.example", "logging", "1.0.0" ));
///
/// assert!( config.injects_host_relation() );
/// assert_eq!( config.host_libraries().len(), 1 );
/// ```
///
/// [`Runtime`]: crate::Runtime
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct LoaderConfig {
    host: Option<( ModuleKey, Version )>,
    implicit_host_relation: bool,
    host_libraries: BTreeSet<LibraryCoordinate>,
    manifest_file_name: String,
}

impl LoaderConfig {

    pub fn new() -> Self {
        Self {
            host: None,
            implicit_host_relation: true,
            host_libraries: BTreeSet::new(),
            manifest_file_name: TomlManifestReader::DEFAULT_FILE_NAME.to_string(),
        }
    }

    /// Sets the identity the host registers itself under. Every candidate module gets
    /// an implicit dependency on it unless disabled with
    /// [`with_implicit_host_relation`](Self::with_implicit_host_relation).
    pub fn with_host( mut self, key: ModuleKey, version: Version ) -> Self {
        self.host = Some(( key, version ));
        self
    }

    pub fn with_implicit_host_relation( mut self, enabled: bool ) -> Self {
        self.implicit_host_relation = enabled ;
        self
    }

    /// Adds a library the host already provides. Host libraries are passed to the
    /// artifact resolver as exclusions.
    pub fn with_host_library( mut self, library: LibraryCoordinate ) -> Self {
        self.host_libraries.insert( library );
        self
    }

    pub fn with_host_libraries( mut self, libraries: impl IntoIterator<Item = LibraryCoordinate> ) -> Self {
        self.host_libraries.extend( libraries );
        self
    }

    pub fn with_manifest_file_name( mut self, file_name: impl Into<String> ) -> Self {
        self.manifest_file_name = file_name.into();
        self
    }

    #[inline] pub fn host( &self ) -> Option<( &ModuleKey, &Version )> { self.host.as_ref().map(|( key, version )| ( key, version ))}
    #[inline] pub fn host_libraries( &self ) -> &BTreeSet<LibraryCoordinate> { &self.host_libraries }
    #[inline] pub fn manifest_file_name( &self ) -> &str { &self.manifest_file_name }

    /// Whether candidates receive the implicit host relation. Always `false` without a host.
    pub fn injects_host_relation( &self ) -> bool { self.implicit_host_relation && self.host.is_some() }

    /// A TOML manifest reader using the configured file name.
    pub fn manifest_reader( &self ) -> TomlManifestReader {
        TomlManifestReader::new().with_file_name( self.manifest_file_name.clone() )
    }

}

impl Default for LoaderConfig {
    fn default() -> Self { Self::new() }
}

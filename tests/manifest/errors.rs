use std::path::Path ;
use module_link::{ CodeUnit, ManifestReader, TomlManifestError, TomlManifestReader, VersionError };

fn parse( text: &str ) -> TomlManifestError {
	match TomlManifestReader::parse( text, Path::new( "broken.toml" )) {
		Err( err ) => err,
		Ok( modules ) => panic!( "Parsed {} modules from a broken manifest", modules.len() ),
	}
}

#[test]
fn manifest_error_on_malformed_toml() {

	assert!( matches!( parse( "[[module]\nid = " ), TomlManifestError::Toml { .. }));

}

#[test]
fn manifest_error_on_unknown_field() {

	let err = parse( "[[module]]\nnamespace = \"a\"\nid = \"b\"\nversion = \"1.0.0\"\nauthor = \"nobody\"\n" );
	assert!( matches!( err, TomlManifestError::Toml { .. }));

}

#[test]
fn manifest_error_on_unknown_relation_kind() {

	let err = parse( r#"
		[[module]]
		namespace = "a"
		id = "b"
		version = "1.0.0"
		relation = [{ kind = "required-sometimes", namespace = "a", id = "c" }]
	"# );
	assert!( matches!( err, TomlManifestError::Toml { .. }));

}

#[test]
fn manifest_error_on_bad_version() {

	match parse( "[[module]]\nnamespace = \"a\"\nid = \"b\"\nversion = \"1.x\"\n" ) {
		TomlManifestError::Version { path, source: VersionError::InvalidNumber { component, .. }} => {
			assert_eq!( path, Path::new( "broken.toml" ));
			assert_eq!( component, "x" );
		},
		other => panic!( "Expected a version error, found: {:?}", other ),
	}

}

#[test]
fn manifest_error_on_bad_range_version() {

	let err = parse( r#"
		[[module]]
		namespace = "a"
		id = "b"
		version = "1.0.0"
		relation = [{ kind = "required-before", namespace = "a", id = "c", versions = [{ max = "" }] }]
	"# );
	assert!( matches!( err, TomlManifestError::Version { source: VersionError::Empty, .. }));

}

#[test]
fn manifest_error_on_bad_library() {

	let err = parse( "[[module]]\nnamespace = \"a\"\nid = \"b\"\nversion = \"1.0.0\"\nlibraries = [ \"codec\" ]\n" );
	assert!( matches!( err, TomlManifestError::Coordinate { .. }));

}

#[test]
fn manifest_error_without_location() {

	match TomlManifestReader::new().read( &CodeUnit::new( "virtual" )) {
		Err( TomlManifestError::MissingLocation( unit )) => assert_eq!( unit.as_str(), "virtual" ),
		other => panic!( "Expected MissingLocation, found: {:?}", other ),
	}

}

#[test]
fn manifest_error_on_missing_file() {

	let directory = tempfile::tempdir().unwrap();

	match TomlManifestReader::new().read( &CodeUnit::new( "empty" ).with_location( directory.path() )) {
		Err( TomlManifestError::Io { path, .. }) => assert_eq!( path, directory.path().join( "modules.toml" )),
		other => panic!( "Expected an I/O error, found: {:?}", other ),
	}

}

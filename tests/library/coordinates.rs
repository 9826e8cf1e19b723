use module_link::{ CoordinateError, LibraryCoordinate };

#[test]
fn coordinate_parses_three_parts() {

	let coordinate = LibraryCoordinate::parse( "org.example:codec:2.0.1" ).unwrap();

	assert_eq!( coordinate.group(), "org.example" );
	assert_eq!( coordinate.artifact(), "codec" );
	assert_eq!( coordinate.version(), "2.0.1" );
	assert_eq!( coordinate.to_string(), "org.example:codec:2.0.1" );
	assert_eq!( " org.example:codec:2.0.1 ".parse::<LibraryCoordinate>().unwrap(), coordinate );

}

#[test]
fn coordinate_rejects_malformed_input() {

	for input in [ "", "codec", "org.example:codec", "org.example:codec:1.0:extra", "org.example::1.0", ":codec:1.0" ] {
		assert_eq!( LibraryCoordinate::parse( input ), Err( CoordinateError( input.to_string() )), "accepted '{}'", input );
	}

}

#[test]
fn coordinate_same_artifact_ignores_version() {

	let old = LibraryCoordinate::new( "org.example", "codec", "1.0.0" );
	let new = LibraryCoordinate::new( "org.example", "codec", "2.0.0" );
	let other = LibraryCoordinate::new( "org.other", "codec", "1.0.0" );

	assert!( old.same_artifact( &new ));
	assert!( !old.same_artifact( &other ));
	assert_ne!( old, new );

}

use std::collections::BTreeMap ;
use module_link::{ RelationKind, ResolutionError, Version, resolve };
use crate::fixture_modules::{ key, module, nothing_loaded, relation };

#[test]
fn resolution_duplicate_candidates_abort() {

	let candidates = [
		module( "app:a", "1.0.0" ).with_relation( relation( RelationKind::RequiredBefore, "app:absent" )),
		module( "app:b", "1.0.0" ),
		module( "app:a", "2.0.0" ),
	];

	match resolve( &candidates, &nothing_loaded() ) {
		Err( ResolutionError::DuplicateIdentity( duplicate )) => assert_eq!( duplicate, key( "app:a" )),
		other => panic!( "Expected DuplicateIdentity, found: {:?}", other ),
	}

}

#[test]
fn resolution_candidate_already_loaded_aborts() {

	let loaded = BTreeMap::from([( key( "app:b" ), Version::new( 1, 0, 0 ))]);
	let candidates = [ module( "app:a", "1.0.0" ), module( "app:b", "1.1.0" )];

	match resolve( &candidates, &loaded ) {
		Err( ResolutionError::DuplicateIdentity( duplicate )) => assert_eq!( duplicate, key( "app:b" )),
		other => panic!( "Expected DuplicateIdentity, found: {:?}", other ),
	}

}

#[test]
fn resolution_same_identifier_in_other_namespace_is_distinct() {
	let candidates = [ module( "app:a", "1.0.0" ), module( "ext:a", "1.0.0" )];
	assert!( resolve( &candidates, &nothing_loaded() ).is_ok() );
}

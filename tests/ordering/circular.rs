use std::collections::BTreeSet ;
use module_link::{ Direction, OrderError, RelationKind, resolve_order };
use crate::fixture_modules::{ key, module, relation };

#[test]
fn ordering_before_cycle_is_circular() {

	let candidates = [
		module( "app:a", "1.0.0" ).with_relation( relation( RelationKind::RequiredBefore, "app:b" )),
		module( "app:b", "1.0.0" ).with_relation( relation( RelationKind::RequiredBefore, "app:c" )),
		module( "app:c", "1.0.0" ).with_relation( relation( RelationKind::OptionalBefore, "app:a" )),
		module( "app:d", "1.0.0" ),
	];

	match resolve_order( &[], &candidates ) {
		Err( OrderError::CircularOrdering { direction, path, elements }) => {
			assert_eq!( direction, Direction::Before );
			assert_eq!( path.first(), path.last() );
			assert_eq!( path.len(), 4 );
			assert_eq!( elements, keys![ "app:a", "app:b", "app:c" ].into_iter().collect::<BTreeSet<_>>() );
		},
		other => panic!( "Expected CircularOrdering, found: {:?}", other ),
	}

}

#[test]
fn ordering_after_cycle_is_circular() {

	let candidates = [
		module( "app:a", "1.0.0" ).with_relation( relation( RelationKind::RequiredAfter, "app:b" )),
		module( "app:b", "1.0.0" ).with_relation( relation( RelationKind::OptionalAfter, "app:a" )),
	];

	match resolve_order( &[], &candidates ) {
		Err( OrderError::CircularOrdering { direction, elements, .. }) => {
			assert_eq!( direction, Direction::After );
			assert!( elements.contains( &key( "app:a" )));
			assert!( elements.contains( &key( "app:b" )));
		},
		other => panic!( "Expected CircularOrdering, found: {:?}", other ),
	}

}

#[test]
fn ordering_cycle_elements_exclude_modules_hanging_off_the_cycle() {

	let candidates = [
		module( "app:a", "1.0.0" ).with_relation( relation( RelationKind::RequiredBefore, "app:b" )),
		module( "app:b", "1.0.0" ).with_relation( relation( RelationKind::RequiredBefore, "app:a" )),
		module( "app:c", "1.0.0" ).with_relation( relation( RelationKind::RequiredBefore, "app:a" )),
	];

	match resolve_order( &[], &candidates ) {
		Err( OrderError::CircularOrdering { elements, .. }) => assert!( !elements.contains( &key( "app:c" ))),
		other => panic!( "Expected CircularOrdering, found: {:?}", other ),
	}

}

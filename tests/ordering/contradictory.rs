use module_link::{ OrderError, RelationKind, resolve_order };
use crate::fixture_modules::{ module, relation };

#[test]
fn ordering_direct_contradiction() {

	// a needs b loaded both before and after itself.
	let candidates = [
		module( "app:a", "1.0.0" )
			.with_relation( relation( RelationKind::RequiredBefore, "app:b" ))
			.with_relation( relation( RelationKind::RequiredAfter, "app:b" )),
		module( "app:b", "1.0.0" ),
	];

	match resolve_order( &[], &candidates ) {
		Err( OrderError::ContradictoryOrdering { path }) => {
			assert_eq!( path.first(), path.last() );
			assert_eq!( path.len(), 3 );
		},
		other => panic!( "Expected ContradictoryOrdering, found: {:?}", other ),
	}

}

#[test]
fn ordering_transitive_contradiction() {

	// c before b before a through BEFORE relations; a requires c after itself.
	let candidates = [
		module( "app:a", "1.0.0" )
			.with_relation( relation( RelationKind::RequiredBefore, "app:b" ))
			.with_relation( relation( RelationKind::OptionalAfter, "app:c" )),
		module( "app:b", "1.0.0" ).with_relation( relation( RelationKind::RequiredBefore, "app:c" )),
		module( "app:c", "1.0.0" ),
	];

	assert!( matches!( resolve_order( &[], &candidates ), Err( OrderError::ContradictoryOrdering { .. })));

}

#[test]
fn ordering_contradiction_across_modules() {

	// a after b and c after a through BEFORE relations, while c wants b after itself.
	let candidates = [
		module( "app:a", "1.0.0" ).with_relation( relation( RelationKind::RequiredBefore, "app:b" )),
		module( "app:b", "1.0.0" ),
		module( "app:c", "1.0.0" )
			.with_relation( relation( RelationKind::RequiredBefore, "app:a" ))
			.with_relation( relation( RelationKind::RequiredAfter, "app:b" )),
	];

	assert!( matches!( resolve_order( &[], &candidates ), Err( OrderError::ContradictoryOrdering { .. })));

}

use module_link::resolve_order ;
use crate::fixture_modules::module ;

#[test]
fn ordering_without_relations_sorts_by_key() {

	let candidates = [
		module( "net:http", "1.0.0" ),
		module( "core:zeta", "1.0.0" ),
		module( "core:alpha", "3.0.0" ),
		module( "app:main", "0.1.0" ),
	];

	assert_eq!( resolve_order( &[], &candidates ).unwrap(), keys![ "app:main", "core:alpha", "core:zeta", "net:http" ]);

}

#[test]
fn ordering_of_empty_batch_is_empty() {
	assert!( resolve_order( &[], &[] ).unwrap().is_empty() );
}

use std::collections::{ BTreeSet, HashMap };
use std::convert::Infallible ;
use std::sync::Arc ;
use module_link::{ IsolationPlan, LibraryOverride, ResolvedLibrary, UnitGraph, UnitId, assign_libraries };
use crate::fixture_modules::library ;

fn unit( id: &str ) -> UnitId { UnitId::from( id ) }

fn resolved( coordinate: &str ) -> ResolvedLibrary {
	ResolvedLibrary::new( library( coordinate ), format!( "memory://{}", coordinate ))
}

fn sets<const N: usize>( entries: [( &str, Vec<&str> ); N] ) -> HashMap<UnitId, Arc<BTreeSet<ResolvedLibrary>>> {
	entries.into_iter()
		.map(|( id, libraries )| ( unit( id ), Arc::new( libraries.iter().map(| coordinate | resolved( coordinate )).collect())))
		.collect()
}

fn assign( plan: IsolationPlan, sets: &HashMap<UnitId, Arc<BTreeSet<ResolvedLibrary>>> ) -> ( IsolationPlan, Vec<LibraryOverride> ) {
	assign_libraries( plan, | unit | Ok::<_, Infallible>( sets.get( unit ).cloned().unwrap_or_default() )).unwrap()
}

#[test]
fn context_library_shared_with_dependency_lives_in_dependency() {

	let graph = UnitGraph::new([ unit( "base" ), unit( "app" )])
		.with_dependency( unit( "app" ), unit( "base" ));
	let sets = sets([
		( "base", vec![ "org.example:log:1.0.0" ]),
		( "app", vec![ "org.example:log:1.0.0", "org.example:json:1.0.0" ]),
	]);

	let ( plan, overrides ) = assign( IsolationPlan::new( &graph ), &sets );
	assert_no_warnings!( overrides );

	let base = plan.context_of( &unit( "base" )).unwrap();
	let app = plan.context_of( &unit( "app" )).unwrap();
	assert_eq!( base.libraries(), &BTreeSet::from([ resolved( "org.example:log:1.0.0" )]));
	assert_eq!( app.libraries(), &BTreeSet::from([ resolved( "org.example:json:1.0.0" )]));
	assert_eq!( plan.transitive_libraries( app.id() ), BTreeSet::from([
		resolved( "org.example:log:1.0.0" ),
		resolved( "org.example:json:1.0.0" ),
	]));

}

#[test]
fn context_library_version_override_warns() {

	let graph = UnitGraph::new([ unit( "base" ), unit( "app" )])
		.with_dependency( unit( "app" ), unit( "base" ));
	let sets = sets([
		( "base", vec![ "org.example:log:1.0.0" ]),
		( "app", vec![ "org.example:log:2.0.0" ]),
	]);

	let ( plan, overrides ) = assign( IsolationPlan::new( &graph ), &sets );

	let app = plan.context_of( &unit( "app" )).unwrap();
	assert_eq!( app.libraries(), &BTreeSet::from([ resolved( "org.example:log:2.0.0" )]));
	assert_eq!( overrides, vec![ LibraryOverride {
		context: app.id(),
		library: resolved( "org.example:log:2.0.0" ),
		shadowed: resolved( "org.example:log:1.0.0" ),
	}]);

}

#[test]
fn context_multiplex_exposes_union_of_aggregates() {

	let graph = UnitGraph::new([ unit( "left" ), unit( "right" ), unit( "top" )])
		.with_dependency( unit( "top" ), unit( "left" ))
		.with_dependency( unit( "top" ), unit( "right" ));
	let sets = sets([
		( "left", vec![ "org.example:a:1.0.0" ]),
		( "right", vec![ "org.example:b:1.0.0" ]),
		( "top", vec![ "org.example:a:1.0.0", "org.example:c:1.0.0" ]),
	]);

	let ( plan, overrides ) = assign( IsolationPlan::new( &graph ), &sets );
	assert_no_warnings!( overrides );

	let top = plan.context_of( &unit( "top" )).unwrap();
	let multiplex = plan.context( top.parent().unwrap() ).unwrap();
	assert!( multiplex.libraries().is_empty() );
	assert_eq!( plan.transitive_libraries( multiplex.id() ), BTreeSet::from([
		resolved( "org.example:a:1.0.0" ),
		resolved( "org.example:b:1.0.0" ),
	]));
	assert_eq!( top.libraries(), &BTreeSet::from([ resolved( "org.example:c:1.0.0" )]));

}

#[test]
fn context_cyclic_group_unites_member_sets() {

	let graph = UnitGraph::new([ unit( "a" ), unit( "b" )])
		.with_dependency( unit( "a" ), unit( "b" ))
		.with_dependency( unit( "b" ), unit( "a" ));
	let sets = sets([
		( "a", vec![ "org.example:x:1.0.0" ]),
		( "b", vec![ "org.example:y:1.0.0" ]),
	]);

	let ( plan, _ ) = assign( IsolationPlan::new( &graph ), &sets );

	assert_eq!( plan.context_of( &unit( "a" )).unwrap().libraries(), &BTreeSet::from([
		resolved( "org.example:x:1.0.0" ),
		resolved( "org.example:y:1.0.0" ),
	]));

}

#[test]
fn context_library_failure_names_unit() {

	let graph = UnitGraph::new([ unit( "fine" ), unit( "broken" )]);

	let result = assign_libraries( IsolationPlan::new( &graph ), | unit | match unit.as_str() {
		"broken" => Err( "unreachable repository" ),
		_ => Ok( Arc::default() ),
	});

	match result {
		Err(( unit, cause )) => {
			assert_eq!( unit.as_str(), "broken" );
			assert_eq!( cause, "unreachable repository" );
		},
		Ok( _ ) => panic!( "Expected a library failure" ),
	}

}

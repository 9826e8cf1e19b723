use std::collections::BTreeSet ;
use module_link::{ ContextKind, IsolationPlan, IsolationPlanner, UnitGraph, UnitId };

fn unit( id: &str ) -> UnitId { UnitId::from( id ) }

#[test]
fn isolation_mutual_dependency_shares_context() {

	// A <-> B, C -> A
	let graph = UnitGraph::new([ unit( "a" ), unit( "b" ), unit( "c" )])
		.with_dependency( unit( "a" ), unit( "b" ))
		.with_dependency( unit( "b" ), unit( "a" ))
		.with_dependency( unit( "c" ), unit( "a" ));
	let plan = IsolationPlan::new( &graph );

	let a = plan.context_of( &unit( "a" )).unwrap();
	let b = plan.context_of( &unit( "b" )).unwrap();
	let c = plan.context_of( &unit( "c" )).unwrap();

	assert_eq!( a.id(), b.id() );
	assert_eq!( a.kind(), &ContextKind::Cyclic );
	assert_eq!( a.units(), &BTreeSet::from([ unit( "a" ), unit( "b" )]));
	assert_eq!( a.parent(), None );

	assert_ne!( c.id(), a.id() );
	assert_eq!( c.kind(), &ContextKind::Chain );
	assert_eq!( c.parent(), Some( a.id() ));
	assert_eq!( plan.len(), 2 );

}

#[test]
fn isolation_cycle_through_three_units() {

	let graph = UnitGraph::new([ unit( "x" ), unit( "y" ), unit( "z" )])
		.with_dependency( unit( "x" ), unit( "y" ))
		.with_dependency( unit( "y" ), unit( "z" ))
		.with_dependency( unit( "z" ), unit( "x" ));
	let plan = IsolationPlan::new( &graph );

	assert_eq!( plan.len(), 1 );
	assert_eq!( plan.contexts()[ 0 ].units().len(), 3 );

}

#[test]
fn isolation_cyclic_group_with_external_dependency() {

	let graph = UnitGraph::new([ unit( "a" ), unit( "b" ), unit( "base" )])
		.with_dependency( unit( "a" ), unit( "b" ))
		.with_dependency( unit( "b" ), unit( "a" ))
		.with_dependency( unit( "b" ), unit( "base" ));
	let plan = IsolationPlan::new( &graph );

	let group = plan.context_of( &unit( "a" )).unwrap();
	let base = plan.context_of( &unit( "base" )).unwrap();
	assert_eq!( group.kind(), &ContextKind::Cyclic );
	assert_eq!( group.parent(), Some( base.id() ));
	assert!( plan.accessible_units( &unit( "a" )).contains( &unit( "base" )));

}

#[test]
fn isolation_planner_memoizes_group_members() {

	let graph = UnitGraph::new([ unit( "a" ), unit( "b" )])
		.with_dependency( unit( "a" ), unit( "b" ))
		.with_dependency( unit( "b" ), unit( "a" ));
	let mut planner = IsolationPlanner::new( &graph );

	let first = planner.plan( &unit( "b" ));
	let second = planner.plan( &unit( "a" ));
	let again = planner.plan( &unit( "b" ));

	assert!( first.is_some() );
	assert_eq!( first, second );
	assert_eq!( first, again );
	assert_eq!( planner.plan_all().len(), 1 );

}

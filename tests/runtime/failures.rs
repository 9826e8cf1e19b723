use module_link::{ CodeUnit, LoadError, LoadWarning, LoaderConfig, OrderError, RelationKind, ResolutionError, Runtime, TomlManifestError, TomlManifestReader };
use crate::fixture_modules::{ FixtureError, MemoryResolver, RecordingActivator, key, manifests, module, relation };

fn chain() -> std::collections::HashMap<module_link::UnitId, Vec<module_link::ModuleMetadata>> {
	manifests([
		( "a.jar", vec![ module( "app:a", "1.0.0" )]),
		( "b.jar", vec![ module( "app:b", "1.0.0" ).with_relation( relation( RelationKind::RequiredBefore, "app:a" ))]),
		( "c.jar", vec![ module( "app:c", "1.0.0" ).with_relation( relation( RelationKind::RequiredBefore, "app:b" ))]),
	])
}

fn chain_units() -> [CodeUnit; 3] {
	[ CodeUnit::new( "c.jar" ), CodeUnit::new( "b.jar" ), CodeUnit::new( "a.jar" )]
}

#[test]
fn failure_to_enable_keeps_earlier_modules() {

	let mut runtime = Runtime::new( LoaderConfig::new() );
	let mut activator = RecordingActivator::new().failing_enable( "app:b" );

	match runtime.load( &chain_units(), &chain(), &MemoryResolver::new(), &mut activator ) {
		Err( LoadError::Activation { unit, module, cause: FixtureError::Enable( _ ), enabled }) => {
			assert_eq!( unit.as_str(), "b.jar" );
			assert_eq!( module, key( "app:b" ));
			assert_eq!( enabled.iter().map(| module | module.key().clone() ).collect::<Vec<_>>(), keys![ "app:a" ]);
		},
		other => panic!( "Expected an enable failure, found: {:?}", other ),
	}

	assert_eq!( activator.events, vec![ "instantiate app:a", "instantiate app:b", "instantiate app:c", "enable app:a" ]);
	assert!( runtime.is_loaded( &key( "app:a" )));
	assert!( !runtime.is_loaded( &key( "app:b" )));
	assert!( !runtime.is_loaded( &key( "app:c" )));

}

#[test]
fn failure_to_instantiate_enables_nothing() {

	let mut runtime = Runtime::new( LoaderConfig::new() );
	let mut activator = RecordingActivator::new().failing_instantiate( "app:c" );

	match runtime.load( &chain_units(), &chain(), &MemoryResolver::new(), &mut activator ) {
		Err( LoadError::Activation { module, cause: FixtureError::Instantiate( _ ), enabled, .. }) => {
			assert_eq!( module, key( "app:c" ));
			assert!( enabled.is_empty() );
		},
		other => panic!( "Expected an instantiation failure, found: {:?}", other ),
	}

	assert_eq!( activator.events, vec![ "instantiate app:a", "instantiate app:b" ]);
	assert!( runtime.loaded().is_empty() );

}

#[test]
fn failure_to_order_leaves_registry_untouched() {

	let reader = manifests([
		( "x.jar", vec![ module( "app:x", "1.0.0" ).with_relation( relation( RelationKind::RequiredBefore, "app:y" ))]),
		( "y.jar", vec![ module( "app:y", "1.0.0" ).with_relation( relation( RelationKind::RequiredBefore, "app:x" ))]),
	]);
	let mut runtime = Runtime::new( LoaderConfig::new().with_host( key( "app:host" ), module_link::Version::new( 1, 0, 0 )));
	let mut activator = RecordingActivator::new();

	let result = runtime.load( &[ CodeUnit::new( "x.jar" ), CodeUnit::new( "y.jar" )], &reader, &MemoryResolver::new(), &mut activator );

	match result {
		Err( LoadError::Order( OrderError::CircularOrdering { elements, .. })) => {
			assert!( elements.contains( &key( "app:x" )));
			assert!( elements.contains( &key( "app:y" )));
		},
		other => panic!( "Expected CircularOrdering, found: {:?}", other ),
	}
	assert_eq!( runtime.loaded().len(), 1 );
	assert!( activator.events.is_empty() );

}

#[test]
fn failure_on_missing_requirement() {

	let reader = manifests([( "a.jar", vec![ module( "app:a", "1.0.0" ).with_relation( relation( RelationKind::RequiredAfter, "app:gone" ))])]);
	let mut runtime = Runtime::new( LoaderConfig::new() );

	match runtime.load( &[ CodeUnit::new( "a.jar" )], &reader, &MemoryResolver::new(), &mut RecordingActivator::new() ) {
		Err( LoadError::Resolution( ResolutionError::MissingRequired( missing ))) => {
			assert_eq!( missing.get( &key( "app:a" )), Some( &vec![ relation( RelationKind::RequiredAfter, "app:gone" )]));
		},
		other => panic!( "Expected MissingRequired, found: {:?}", other ),
	}

}

#[test]
fn failure_on_conflict() {

	let reader = manifests([
		( "a.jar", vec![ module( "app:a", "1.0.0" ).with_relation( relation( RelationKind::Included, "app:b" ))]),
		( "b.jar", vec![ module( "app:b", "1.0.0" )]),
	]);
	let mut runtime = Runtime::new( LoaderConfig::new() );

	let result = runtime.load( &[ CodeUnit::new( "a.jar" ), CodeUnit::new( "b.jar" )], &reader, &MemoryResolver::new(), &mut RecordingActivator::new() );

	assert!( matches!( result, Err( LoadError::Resolution( ResolutionError::Conflicts( _ )))));
	assert!( runtime.loaded().is_empty() );

}

#[test]
fn missing_optional_relation_only_warns() {

	let optional = relation( RelationKind::OptionalBefore, "app:extra" );
	let reader = manifests([( "a.jar", vec![ module( "app:a", "1.0.0" ).with_relation( optional.clone() )])]);
	let mut runtime = Runtime::new( LoaderConfig::new() );

	let ( _, warnings ) = runtime.load( &[ CodeUnit::new( "a.jar" )], &reader, &MemoryResolver::new(), &mut RecordingActivator::new() ).unwrap();

	assert_eq!( warnings, vec![ LoadWarning::MissingOptional { module: key( "app:a" ), relations: vec![ optional ]}]);
	assert!( runtime.is_loaded( &key( "app:a" )));

}

#[test]
fn failure_to_read_manifest_names_unit() {

	let mut runtime = Runtime::new( LoaderConfig::new() );

	let result = runtime.load( &[ CodeUnit::new( "nowhere.jar" )], &TomlManifestReader::new(), &MemoryResolver::new(), &mut RecordingActivator::new() );

	match result {
		Err( LoadError::ManifestRead { unit, cause: TomlManifestError::MissingLocation( _ ) }) => assert_eq!( unit.as_str(), "nowhere.jar" ),
		other => panic!( "Expected ManifestRead, found: {:?}", other ),
	}

}

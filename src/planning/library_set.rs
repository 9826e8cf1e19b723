//! Per-context external library sets.

use std::collections::BTreeSet ;
use std::sync::Arc ;
use tracing::{ debug, warn };

use crate::library::ResolvedLibrary ;
use crate::module::UnitId ;
use crate::utils::PartialSuccess ;
use super::{ ContextId, ContextKind, IsolationPlan };



/// A context providing its own version of an artifact its parents already supply.
///
/// The context keeps its own version; `shadowed` stays visible only to contexts that
/// don't have an override of their own.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct LibraryOverride {
    pub context: ContextId,
    pub library: ResolvedLibrary,
    pub shadowed: ResolvedLibrary,
}

impl std::fmt::Display for LibraryOverride {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> Result<(), std::fmt::Error> {
        write!( f, "Context {} overrides {} with {}", self.context, self.shadowed.coordinate(), self.library.coordinate() )
    }
}

/// Fills in the libraries every context of `plan` provides itself.
///
/// `base_of` returns the full resolved library set of one unit, typically served
/// from a [`crate::LibraryCache`]. Contexts are processed in arena order so a
/// context's parents are complete before it is visited:
/// - a unit or cyclic-group context provides the union of its units' sets, minus the
/// 	libraries visible through its parent
/// - a multiplex context provides nothing; it exposes the union of its aggregates
///
/// # Errors
/// The first unit whose set cannot be obtained, together with the cause.
pub fn assign_libraries<E>(
    mut plan: IsolationPlan,
    mut base_of: impl FnMut( &UnitId ) -> Result<Arc<BTreeSet<ResolvedLibrary>>, E>,
) -> Result<PartialSuccess<IsolationPlan, LibraryOverride>, ( UnitId, E )> {

    let mut transitive: Vec<BTreeSet<ResolvedLibrary>> = Vec::with_capacity( plan.len() );
    let mut overrides = Vec::with_capacity( 0 );

    for context in &mut plan.contexts {

        let id = context.id ;

        if let ContextKind::Multiplex( aggregated ) = &context.kind {
            let exposed = aggregated.iter()
                .flat_map(| aggregate | transitive[ aggregate.index() ].iter().cloned() )
                .collect();
            transitive.push( exposed );
            continue ;
        }

        let mut base = BTreeSet::new();
        for unit in &context.units {
            let libraries = base_of( unit ).map_err(| err | ( unit.clone(), err ))?;
            base.extend( libraries.iter().cloned() );
        }

        let inherited = context.parent.map(| parent | &transitive[ parent.index() ]);
        let own = match inherited {
            Some( inherited ) => base.difference( inherited ).cloned().collect::<BTreeSet<_>>(),
            None => base,
        };

        let shadowing = inherited.into_iter()
            .flat_map(| inherited | own.iter().flat_map( move | library | inherited.iter()
                .filter( move | parent | parent.coordinate().same_artifact( library.coordinate() ))
                .map( move | parent | LibraryOverride { context: id, library: library.clone(), shadowed: parent.clone() })))
            .inspect(| shadow | warn!( %shadow, "Library version overrides parent context" ))
            .collect::<Vec<_>>();
        overrides.extend( shadowing );

        debug!( context = %id, provided = own.len(), "Computed context library set" );
        let visible = inherited.into_iter().flatten().chain( own.iter()).cloned().collect();
        transitive.push( visible );
        context.libraries = own ;

    }

    Ok(( plan, overrides ))

}

//! Isolation contexts and the planner that builds them.

use std::collections::{ BTreeMap, BTreeSet, HashMap };
use tracing::{ debug, trace };

use crate::library::ResolvedLibrary ;
use crate::module::UnitId ;
use super::UnitGraph ;



/// Index of a context within its [`IsolationPlan`].
#[derive( Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash )]
pub struct ContextId( usize );

impl ContextId {
    #[inline] pub fn index( self ) -> usize { self.0 }
}

impl std::fmt::Display for ContextId {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> Result<(), std::fmt::Error> {
        write!( f, "#{}", self.0 )
    }
}

/// How a context came to be.
#[derive( Debug, Clone, PartialEq, Eq )]
pub enum ContextKind {
    /// A unit that depends on no other unit.
    Independent,
    /// A unit whose dependencies are reached through its parent.
    Chain,
    /// Units that depend on each other, sharing one context.
    Cyclic,
    /// A unit-less context exposing several dependency contexts at once.
    Multiplex( BTreeSet<ContextId> ),
}

/// An execution namespace: its own units' code plus whatever its parent exposes.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct IsolationContext {
    pub(super) id: ContextId,
    pub(super) kind: ContextKind,
    pub(super) units: BTreeSet<UnitId>,
    pub(super) parent: Option<ContextId>,
    pub(super) libraries: BTreeSet<ResolvedLibrary>,
}

impl IsolationContext {

    #[inline] pub fn id( &self ) -> ContextId { self.id }
    #[inline] pub fn kind( &self ) -> &ContextKind { &self.kind }
    #[inline] pub fn units( &self ) -> &BTreeSet<UnitId> { &self.units }
    #[inline] pub fn parent( &self ) -> Option<ContextId> { self.parent }

    /// Libraries this context provides itself, excluding those inherited from its parent.
    #[inline] pub fn libraries( &self ) -> &BTreeSet<ResolvedLibrary> { &self.libraries }

    /// Contexts aggregated by a multiplex context; empty for any other kind.
    pub fn aggregated( &self ) -> impl Iterator<Item = ContextId> + '_ {
        let contexts = match &self.kind {
            ContextKind::Multiplex( contexts ) => Some( contexts ),
            _ => None,
        };
        contexts.into_iter().flatten().copied()
    }

}

/// Canonical memo key: the sorted unit set of a group, or the aggregated set of a
/// multiplex context.
#[derive( Debug, Clone, PartialEq, Eq, Hash )]
enum ContextKey {
    Units( BTreeSet<UnitId> ),
    Multiplex( BTreeSet<ContextId> ),
}

enum Frame {
    Enter( UnitId ),
    Build( BTreeSet<UnitId> ),
}

/// Builds isolation contexts on demand.
///
/// Contexts are memoized by their canonical key with get-or-insert semantics: asking
/// for a unit that is already placed, or that belongs to a cyclic group built for
/// another member, returns the existing context.
#[derive( Debug )]
pub struct IsolationPlanner<'a> {
    graph: &'a UnitGraph,
    /// Cyclic groups, computed once per planner
    groups: Vec<BTreeSet<UnitId>>,
    group_of: HashMap<UnitId, usize>,
    contexts: Vec<IsolationContext>,
    memo: HashMap<ContextKey, ContextId>,
    by_unit: BTreeMap<UnitId, ContextId>,
}

impl<'a> IsolationPlanner<'a> {

    pub fn new( graph: &'a UnitGraph ) -> Self {
        let groups = graph.cyclic_groups();
        let group_of = groups.iter().enumerate()
            .flat_map(|( index, group )| group.iter().map( move | unit | ( unit.clone(), index )))
            .collect();
        Self { graph, groups, group_of, contexts: Vec::new(), memo: HashMap::new(), by_unit: BTreeMap::new() }
    }

    /// Returns the context of `unit`, building it and everything it depends on first.
    ///
    /// Returns `None` for units the graph does not know.
    pub fn plan( &mut self, unit: &UnitId ) -> Option<ContextId> {

        if !self.graph.contains( unit ) { return None }

        let mut stack = vec![ Frame::Enter( unit.clone() )];
        while let Some( frame ) = stack.pop() {
            match frame {
                Frame::Enter( unit ) => {
                    if self.by_unit.contains_key( &unit ) { continue }
                    let Some( group ) = self.group_of.get( &unit ).map(| index | self.groups[ *index ].clone() ) else { continue };
                    let pending = self.external_dependencies( &group ).into_iter()
                        .filter(| dependency | !self.by_unit.contains_key( dependency ))
                        .map( Frame::Enter )
                        .collect::<Vec<_>>();
                    stack.push( Frame::Build( group ));
                    stack.extend( pending );
                },
                Frame::Build( group ) => { self.build( group ); },
            }
        }

        self.by_unit.get( unit ).copied()

    }

    /// Places every unit of the graph and returns the finished plan.
    pub fn plan_all( mut self ) -> IsolationPlan {
        let graph = self.graph ;
        graph.units().for_each(| unit | { self.plan( unit ); });
        debug!( units = graph.len(), contexts = self.contexts.len(), "Planned isolation contexts" );
        IsolationPlan { contexts: self.contexts, by_unit: self.by_unit }
    }

    /// Dependencies of the group's members that lie outside the group.
    fn external_dependencies( &self, group: &BTreeSet<UnitId> ) -> BTreeSet<UnitId> {
        group.iter()
            .flat_map(| member | self.graph.dependencies( member ))
            .filter(| dependency | !group.contains( *dependency ))
            .cloned()
            .collect()
    }

    fn build( &mut self, group: BTreeSet<UnitId> ) -> ContextId {

        let key = ContextKey::Units( group.clone() );
        if let Some( &id ) = self.memo.get( &key ) { return id }

        let dependencies = self.external_dependencies( &group ).into_iter()
            .filter_map(| dependency | self.by_unit.get( &dependency ).copied() )
            .collect::<BTreeSet<_>>();

        let parent = match dependencies.len() {
            0 => None,
            1 => dependencies.first().copied(),
            _ => Some( self.multiplex( dependencies )),
        };

        let kind = match group.iter().next() {
            _ if group.len() > 1 => ContextKind::Cyclic,
            Some( unit ) if !self.graph.is_independent( unit ) => ContextKind::Chain,
            _ => ContextKind::Independent,
        };

        let id = self.insert( key, kind, group.clone(), parent );
        group.into_iter().for_each(| unit | { self.by_unit.insert( unit, id ); });
        id

    }

    fn multiplex( &mut self, contexts: BTreeSet<ContextId> ) -> ContextId {
        let key = ContextKey::Multiplex( contexts.clone() );
        match self.memo.get( &key ) {
            Some( &id ) => id,
            None => self.insert( key, ContextKind::Multiplex( contexts ), BTreeSet::new(), None ),
        }
    }

    fn insert( &mut self, key: ContextKey, kind: ContextKind, units: BTreeSet<UnitId>, parent: Option<ContextId> ) -> ContextId {
        let id = ContextId( self.contexts.len() );
        trace!( context = %id, ?kind, ?units, ?parent, "Created isolation context" );
        self.contexts.push( IsolationContext { id, kind, units, parent, libraries: BTreeSet::new() });
        self.memo.insert( key, id );
        id
    }

}

/// Every context of a load cycle, dependencies first.
#[derive( Debug, Clone, Default, PartialEq, Eq )]
pub struct IsolationPlan {
    pub(super) contexts: Vec<IsolationContext>,
    by_unit: BTreeMap<UnitId, ContextId>,
}

impl IsolationPlan {

    /// Plans every unit of `graph`.
    pub fn new( graph: &UnitGraph ) -> Self { IsolationPlanner::new( graph ).plan_all() }

    #[inline] pub fn contexts( &self ) -> &[IsolationContext] { &self.contexts }
    #[inline] pub fn len( &self ) -> usize { self.contexts.len() }
    #[inline] pub fn is_empty( &self ) -> bool { self.contexts.is_empty() }

    pub fn context( &self, id: ContextId ) -> Option<&IsolationContext> { self.contexts.get( id.0 )}

    /// The context `unit` was assigned to.
    pub fn context_of( &self, unit: &UnitId ) -> Option<&IsolationContext> {
        self.by_unit.get( unit ).and_then(| id | self.context( *id ))
    }

    /// `id` and every context visible through its parent link, multiplex contexts
    /// expanded.
    pub fn accessible_contexts( &self, id: ContextId ) -> BTreeSet<ContextId> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![ id ];
        while let Some( next ) = stack.pop() {
            let Some( context ) = self.context( next ) else { continue };
            if !seen.insert( next ) { continue }
            stack.extend( context.parent );
            stack.extend( context.aggregated() );
        }
        seen
    }

    /// Every unit whose code is visible from `unit`'s context.
    pub fn accessible_units( &self, unit: &UnitId ) -> BTreeSet<UnitId> {
        self.by_unit.get( unit )
            .map(| id | self.accessible_contexts( *id ))
            .into_iter()
            .flatten()
            .filter_map(| id | self.context( id ))
            .flat_map(| context | context.units.iter().cloned() )
            .collect()
    }

    /// Libraries visible from context `id`: its own plus everything its parents provide.
    pub fn transitive_libraries( &self, id: ContextId ) -> BTreeSet<ResolvedLibrary> {
        self.accessible_contexts( id ).into_iter()
            .filter_map(| id | self.context( id ))
            .flat_map(| context | context.libraries.iter().cloned() )
            .collect()
    }

}

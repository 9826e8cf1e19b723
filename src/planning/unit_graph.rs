//! Unit-level dependency graph and its cyclic groups.

use std::collections::{ BTreeMap, BTreeSet, HashMap };

use crate::module::UnitId ;
use crate::relation::{ ModuleKey, Relation };



/// Dependency edges between code units.
///
/// Every unit handed to the graph is a node, even one without modules or edges.
#[derive( Debug, Clone, Default, PartialEq, Eq )]
pub struct UnitGraph {
    dependencies: BTreeMap<UnitId, BTreeSet<UnitId>>,
}

impl UnitGraph {

    pub fn new( units: impl IntoIterator<Item = UnitId> ) -> Self {
        Self { dependencies: units.into_iter().map(| unit | ( unit, BTreeSet::new() )).collect() }
    }

    /// Builds the graph from established relations.
    ///
    /// `owners` maps each candidate module to the unit that contains it. A relation
    /// becomes an edge from the declarer's unit to the target's unit; relations on
    /// modules outside the batch (loaded earlier, or the host) and relations within a
    /// single unit produce no edge.
    pub fn from_established(
        units: impl IntoIterator<Item = UnitId>,
        owners: &HashMap<ModuleKey, UnitId>,
        established: &BTreeMap<ModuleKey, Vec<Relation>>,
    ) -> Self {
        established.iter()
            .flat_map(|( module, relations )| relations.iter().map( move | relation | ( module, relation.target() )))
            .filter_map(|( module, target )| Some(( owners.get( module )?, owners.get( target )? )))
            .filter(|( unit, dependency )| unit != dependency )
            .fold( Self::new( units ), | graph, ( unit, dependency )| graph.with_dependency( unit.clone(), dependency.clone() ))
    }

    /// Adds an edge, registering either end as a node if it is new.
    pub fn with_dependency( mut self, unit: UnitId, dependency: UnitId ) -> Self {
        self.add_dependency( unit, dependency );
        self
    }

    pub fn add_dependency( &mut self, unit: UnitId, dependency: UnitId ) {
        self.dependencies.entry( dependency.clone() ).or_default();
        self.dependencies.entry( unit ).or_default().insert( dependency );
    }

    pub fn units( &self ) -> impl Iterator<Item = &UnitId> { self.dependencies.keys() }
    #[inline] pub fn len( &self ) -> usize { self.dependencies.len() }
    #[inline] pub fn is_empty( &self ) -> bool { self.dependencies.is_empty() }
    #[inline] pub fn contains( &self, unit: &UnitId ) -> bool { self.dependencies.contains_key( unit ) }

    /// Direct dependencies of `unit`; empty for unknown units.
    pub fn dependencies( &self, unit: &UnitId ) -> impl Iterator<Item = &UnitId> {
        self.dependencies.get( unit ).into_iter().flatten()
    }

    /// Whether `unit` depends on nothing but possibly itself.
    pub fn is_independent( &self, unit: &UnitId ) -> bool {
        self.dependencies( unit ).all(| dependency | dependency == unit )
    }

    /// Every unit reachable from `unit` in one or more steps.
    pub fn reachable( &self, unit: &UnitId ) -> BTreeSet<UnitId> {
        let mut seen = BTreeSet::new();
        let mut stack = self.dependencies( unit ).collect::<Vec<_>>();
        while let Some( next ) = stack.pop() {
            if seen.insert( next.clone() ) { stack.extend( self.dependencies( next )); }
        }
        seen
    }

    /// The dependencies of `unit` that lead back to it.
    pub fn cyclic_dependencies( &self, unit: &UnitId ) -> BTreeSet<UnitId> {
        let group = self.cyclic_group( unit );
        self.dependencies( unit )
            .filter(| dependency | *dependency != unit && group.contains( *dependency ))
            .cloned()
            .collect()
    }

    /// The units mutually reachable with `unit`, `unit` included.
    ///
    /// A unit on no cycle forms a group of one.
    pub fn cyclic_group( &self, unit: &UnitId ) -> BTreeSet<UnitId> {
        self.cyclic_groups().into_iter()
            .find(| group | group.contains( unit ))
            .unwrap_or_else(|| BTreeSet::from([ unit.clone() ]))
    }

    /// Every cyclic group of the graph in one pass, each listed after the groups its
    /// members depend on.
    pub fn cyclic_groups( &self ) -> Vec<BTreeSet<UnitId>> {

        let units = self.dependencies.keys().collect::<Vec<_>>();
        let position = units.iter().enumerate()
            .map(|( index, unit )| ( *unit, index ))
            .collect::<HashMap<_, _>>();
        let edges = units.iter()
            .map(| unit | self.dependencies( unit ).filter_map(| dependency | position.get( dependency ).copied() ).collect::<Vec<_>>() )
            .collect::<Vec<_>>();

        let mut components = Components::new( edges.len() );
        ( 0..edges.len() ).for_each(| root | components.visit( &edges, root ));

        components.found.into_iter()
            .map(| component | component.into_iter().map(| node | units[ node ].clone() ).collect() )
            .collect()

    }

}

/// Iterative Tarjan search over node indices.
struct Components {
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next: usize,
    found: Vec<Vec<usize>>,
}

impl Components {

    fn new( size: usize ) -> Self {
        Self {
            index: vec![ None; size ],
            lowlink: vec![ 0; size ],
            on_stack: vec![ false; size ],
            stack: Vec::with_capacity( size ),
            next: 0,
            found: Vec::new(),
        }
    }

    fn open( &mut self, node: usize ) {
        self.index[ node ] = Some( self.next );
        self.lowlink[ node ] = self.next ;
        self.next += 1 ;
        self.stack.push( node );
        self.on_stack[ node ] = true ;
    }

    fn visit( &mut self, edges: &[Vec<usize>], root: usize ) {

        if self.index[ root ].is_some() { return }
        self.open( root );
        let mut work = vec![( root, 0_usize )];

        while let Some(( node, cursor )) = work.last().copied() {

            if let Some( &successor ) = edges[ node ].get( cursor ) {
                if let Some(( _, next )) = work.last_mut() { *next += 1 ; }
                match self.index[ successor ] {
                    None => {
                        self.open( successor );
                        work.push(( successor, 0 ));
                    },
                    Some( index ) if self.on_stack[ successor ] => self.lowlink[ node ] = self.lowlink[ node ].min( index ),
                    Some( _ ) => {},
                }
                continue
            }

            work.pop();
            if let Some( &( parent, _ )) = work.last() {
                self.lowlink[ parent ] = self.lowlink[ parent ].min( self.lowlink[ node ]);
            }
            if self.index[ node ] == Some( self.lowlink[ node ]) {
                let mut component = Vec::new();
                while let Some( member ) = self.stack.pop() {
                    self.on_stack[ member ] = false ;
                    component.push( member );
                    if member == node { break }
                }
                self.found.push( component );
            }

        }

    }

}

//! Load order resolution.
//!
//! [`resolve_order`] turns the BEFORE/AFTER relations of a batch into one total load
//! order. Already-loaded modules form a fixed prefix. Candidates follow in the
//! lexicographically smallest order by key that respects every ordering relation whose
//! target is a member of the set with an accepted version.
//!
//! Two failure modes are told apart:
//! - a cycle made entirely of relations of one direction is a circular ordering
//! - any other cycle (mixed directions, or a candidate that would have to precede an
//! 	already-loaded module) is a contradiction: some module is required both before
//! 	and after another one
//!
//! All traversals use explicit stacks, so deep chains don't grow the call stack.

use std::collections::{ BTreeMap, BTreeSet };
use itertools::Itertools ;
use thiserror::Error ;
use tracing::{ debug, trace };

use crate::module::ModuleMetadata ;
use crate::relation::{ Direction, ModuleKey };



/// A load order that cannot exist.
#[derive( Debug, Error, Clone, PartialEq, Eq )]
pub enum OrderError {

    /// Modules reachable from themselves through relations of a single direction.
    /// `path` starts and ends with the same module; `elements` are all modules on a
    /// cycle through its first element.
    #[error( "Circular '{direction}' ordering: {}", .path.iter().join( " -> " ))]
    CircularOrdering {
        direction: Direction,
        path: Vec<ModuleKey>,
        elements: BTreeSet<ModuleKey>,
    },

    /// A module required both before and after another one. Each module in `path`
    /// must load before the next; the first and last entries are the same module.
    #[error( "Contradictory ordering: {}", .path.iter().join( " -> " ))]
    ContradictoryOrdering { path: Vec<ModuleKey> },

}

/// Precedence edges, by node index: `edges[u]` holds every `v` that `u` must precede.
type Edges = Vec<BTreeSet<usize>> ;

struct OrderGraph<'a> {
    /// Node index to key; indices ascend with keys
    keys: Vec<&'a ModuleKey>,
    before: Edges,
    after: Edges,
    /// Loaded prefix chain plus last-loaded to every candidate
    prefix: Edges,
}

impl<'a> OrderGraph<'a> {

    fn new( loaded: &'a [ModuleMetadata], candidates: &'a [ModuleMetadata] ) -> Self {

        let members = loaded.iter().chain( candidates.iter())
            .map(| module | ( module.key(), module ))
            .collect::<BTreeMap<_, _>>();
        let index = members.keys().enumerate()
            .map(|( position, key )| ( *key, position ))
            .collect::<BTreeMap<_, _>>();
        let size = members.len();

        let mut graph = Self {
            keys: members.keys().copied().collect(),
            before: vec![ BTreeSet::new(); size ],
            after: vec![ BTreeSet::new(); size ],
            prefix: vec![ BTreeSet::new(); size ],
        };

        // Relations of loaded modules are already honoured by their position.
        candidates.iter()
            .flat_map(| module | module.relations().iter().map( move | relation | ( module, relation )))
            .filter_map(|( module, relation )| {
                let direction = relation.kind().direction()?;
                let target = members.get( relation.target() )?;
                if !relation.accepts( target.version() ) { return None }
                Some(( direction, index[ module.key() ], index[ target.key() ]))
            })
            .filter(|( _, declarer, target )| declarer != target )
            .for_each(|( direction, declarer, target )| match direction {
                Direction::Before => { graph.before[ target ].insert( declarer ); },
                Direction::After => { graph.after[ declarer ].insert( target ); },
            });

        let prefix = loaded.iter().map(| module | index[ module.key() ]).collect::<Vec<_>>();
        prefix.iter().tuple_windows().for_each(|( &earlier, &later )| { graph.prefix[ earlier ].insert( later ); });
        if let Some( &last ) = prefix.last() {
            candidates.iter()
                .map(| module | index[ module.key() ])
                .filter(| candidate | *candidate != last )
                .for_each(| candidate | { graph.prefix[ last ].insert( candidate ); });
        }

        graph

    }

    fn len( &self ) -> usize { self.keys.len() }

    fn combined( &self ) -> Edges {
        ( 0..self.len() )
            .map(| node | self.before[ node ].iter()
                .chain( self.after[ node ].iter())
                .chain( self.prefix[ node ].iter())
                .copied()
                .collect())
            .collect()
    }

    fn keys_of( &self, nodes: impl IntoIterator<Item = usize> ) -> Vec<ModuleKey> {
        nodes.into_iter().map(| node | self.keys[ node ].clone() ).collect()
    }

}

#[derive( Debug, Clone, Copy, PartialEq, Eq )]
enum Mark { Unvisited, OnStack, Done }

/// Finds a cycle, preferring the one reached first from the smallest node.
/// The returned path starts and ends with the same node.
fn find_cycle( edges: &Edges ) -> Option<Vec<usize>> {

    let mut marks = vec![ Mark::Unvisited; edges.len() ];

    for root in 0..edges.len() {
        if marks[ root ] != Mark::Unvisited { continue }
        marks[ root ] = Mark::OnStack ;
        let mut stack = vec![( root, edges[ root ].iter() )];

        while let Some(( node, next )) = stack.last_mut().map(|( node, successors )| ( *node, successors.next().copied() )) {
            match next {
                Some( successor ) => match marks[ successor ] {
                    Mark::Unvisited => {
                        marks[ successor ] = Mark::OnStack ;
                        stack.push(( successor, edges[ successor ].iter() ));
                    },
                    Mark::OnStack => {
                        let start = stack.iter().position(|( entry, _ )| *entry == successor ).unwrap_or_default();
                        let mut path = stack[ start.. ].iter().map(|( entry, _ )| *entry ).collect::<Vec<_>>();
                        path.push( successor );
                        return Some( path );
                    },
                    Mark::Done => {},
                },
                None => {
                    marks[ node ] = Mark::Done ;
                    stack.pop();
                },
            }
        }
    }

    None

}

/// Every node reachable from `start` in one or more steps.
fn reachable( edges: &Edges, start: usize ) -> BTreeSet<usize> {
    let mut seen = BTreeSet::new();
    let mut stack = edges[ start ].iter().copied().collect::<Vec<_>>();
    while let Some( node ) = stack.pop() {
        if seen.insert( node ) { stack.extend( edges[ node ].iter().copied() ); }
    }
    seen
}

/// Every node on some cycle through `start`.
fn cycle_members( edges: &Edges, start: usize ) -> BTreeSet<usize> {
    reachable( edges, start ).into_iter()
        .filter(| node | *node == start || reachable( edges, *node ).contains( &start ))
        .collect()
}

/// Resolves the total load order of `loaded` (kept as given) followed by `candidates`.
///
/// Keys are expected to be unique across both slices; [`crate::resolve`] enforces
/// this earlier in a load cycle.
///
/// # Errors
/// [`OrderError::CircularOrdering`] if relations of one direction form a cycle,
/// [`OrderError::ContradictoryOrdering`] if the combined constraints do.
pub fn resolve_order( loaded: &[ModuleMetadata], candidates: &[ModuleMetadata] ) -> Result<Vec<ModuleKey>, OrderError> {

    let graph = OrderGraph::new( loaded, candidates );

    for ( direction, edges ) in [( Direction::Before, &graph.before ), ( Direction::After, &graph.after )] {
        if let Some( path ) = find_cycle( edges ) {
            let elements = graph.keys_of( cycle_members( edges, path[ 0 ])).into_iter().collect();
            let path = graph.keys_of( path );
            return Err( OrderError::CircularOrdering { direction, path, elements });
        }
    }

    let combined = graph.combined();
    if let Some( path ) = find_cycle( &combined ) {
        return Err( OrderError::ContradictoryOrdering { path: graph.keys_of( path )});
    }

    let mut pending = vec![ 0_usize; graph.len() ];
    combined.iter().flatten().for_each(| &successor | pending[ successor ] += 1 );

    let mut ready = ( 0..graph.len() ).filter(| node | pending[ *node ] == 0 ).collect::<BTreeSet<_>>();
    let mut order = Vec::with_capacity( graph.len() );

    while let Some( node ) = ready.pop_first() {
        trace!( module = %graph.keys[ node ], position = order.len(), "Ordered module" );
        order.push( graph.keys[ node ].clone() );
        combined[ node ].iter().for_each(| &successor | {
            pending[ successor ] -= 1 ;
            if pending[ successor ] == 0 { ready.insert( successor ); }
        });
    }

    debug!( loaded = loaded.len(), candidates = candidates.len(), "Resolved load order" );
    Ok( order )

}

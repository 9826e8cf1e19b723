//! Relations between modules.
//!
//! A [`Relation`] is a typed, directional declaration a module makes about another
//! module identified by its [`ModuleKey`]. Ordering kinds constrain the load order,
//! required/optional kinds decide whether an absent target is fatal, and conflict
//! kinds invert the check: a present, matching target is the failure.

use crate::range::VersionRange ;
use crate::version::Version ;



/// Identity of a module: a namespace plus an identifier unique within it.
///
/// Keys order lexicographically by namespace, then identifier. This order is the
/// tie-breaker that makes load orders reproducible.
#[derive( Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash )]
pub struct ModuleKey {
    namespace: String,
    id: String,
}

impl ModuleKey {
    pub fn new( namespace: impl Into<String>, id: impl Into<String> ) -> Self {
        Self { namespace: namespace.into(), id: id.into() }
    }
    #[inline] pub fn namespace( &self ) -> &str { &self.namespace }
    #[inline] pub fn id( &self ) -> &str { &self.id }
}

impl std::fmt::Display for ModuleKey {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> Result<(), std::fmt::Error> {
        write!( f, "{}:{}", self.namespace, self.id )
    }
}

/// Which side of the declaring module the target must be loaded on.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub enum Direction {
    /// The target loads before the declaring module.
    Before,
    /// The target loads after the declaring module.
    After,
}

impl std::fmt::Display for Direction {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> Result<(), std::fmt::Error> {
        match self {
            Self::Before => write!( f, "before" ),
            Self::After => write!( f, "after" ),
        }
    }
}

/// The kind of a [`Relation`].
///
/// Direction is read from the target's point of view: a module declaring
/// `RequiredBefore` on `core:base` needs `core:base` loaded before itself.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub enum RelationKind {
    /// Target must be present and loads before the declaring module.
    RequiredBefore,
    /// Target must be present and loads after the declaring module.
    RequiredAfter,
    /// If present, target loads before the declaring module.
    OptionalBefore,
    /// If present, target loads after the declaring module.
    OptionalAfter,
    /// A present, matching target is a conflict.
    Incompatible,
    /// The declaring module already contains the target; a present, matching
    /// target is a conflict.
    Included,
}

impl RelationKind {

    /// The ordering constraint this kind imposes, if any.
    pub fn direction( self ) -> Option<Direction> {
        match self {
            Self::RequiredBefore | Self::OptionalBefore => Some( Direction::Before ),
            Self::RequiredAfter | Self::OptionalAfter => Some( Direction::After ),
            Self::Incompatible | Self::Included => None,
        }
    }

    /// Whether an unmatched target is fatal.
    pub fn is_required( self ) -> bool {
        matches!( self, Self::RequiredBefore | Self::RequiredAfter )
    }

    /// Whether a matched target is the failure condition.
    pub fn is_conflict( self ) -> bool {
        matches!( self, Self::Incompatible | Self::Included )
    }

}

impl std::fmt::Display for RelationKind {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> Result<(), std::fmt::Error> {
        match self {
            Self::RequiredBefore => write!( f, "required-before" ),
            Self::RequiredAfter => write!( f, "required-after" ),
            Self::OptionalBefore => write!( f, "optional-before" ),
            Self::OptionalAfter => write!( f, "optional-after" ),
            Self::Incompatible => write!( f, "incompatible" ),
            Self::Included => write!( f, "included" ),
        }
    }
}

/// A declaration one module makes about another.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct Relation {
    kind: RelationKind,
    target: ModuleKey,
    /// Acceptable target versions; empty accepts any version
    ranges: Vec<VersionRange>,
    /// Synthesised by the runtime rather than declared by the module
    implicit: bool,
}

impl Relation {

    /// Creates a relation accepting any version of `target`.
    pub fn new( kind: RelationKind, target: ModuleKey ) -> Self {
        Self { kind, target, ranges: Vec::with_capacity( 0 ), implicit: false }
    }

    pub(crate) fn implicit( kind: RelationKind, target: ModuleKey ) -> Self {
        Self { implicit: true, ..Self::new( kind, target )}
    }

    /// Adds an acceptable version range.
    pub fn with_range( mut self, range: VersionRange ) -> Self {
        self.ranges.push( range );
        self
    }

    /// Adds several acceptable version ranges.
    pub fn with_ranges( mut self, ranges: impl IntoIterator<Item = VersionRange> ) -> Self {
        self.ranges.extend( ranges );
        self
    }

    #[inline] pub fn kind( &self ) -> RelationKind { self.kind }
    #[inline] pub fn target( &self ) -> &ModuleKey { &self.target }
    #[inline] pub fn ranges( &self ) -> &[VersionRange] { &self.ranges }
    #[inline] pub fn is_implicit( &self ) -> bool { self.implicit }

    /// Whether `version` of the target satisfies this relation's ranges.
    pub fn accepts( &self, version: &Version ) -> bool {
        self.ranges.is_empty() || self.ranges.iter().any(| range | range.contains( version ))
    }

}

impl std::fmt::Display for Relation {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> Result<(), std::fmt::Error> {
        write!( f, "{} {}", self.kind, self.target )?;
        self.ranges.iter().enumerate().try_for_each(|( index, range )| match index {
            0 => write!( f, " {}", range ),
            _ => write!( f, " | {}", range ),
        })
    }
}

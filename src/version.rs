//! Module versions.
//!
//! A [`Version`] is a `major.minor.patch` triple with optional prerelease labels and
//! build metadata. Ordering follows the usual precedence rules: numeric fields first,
//! then prerelease labels, where a release always ranks above any of its prereleases.
//! Build metadata is carried for display only and never takes part in comparisons.

use std::cmp::Ordering ;
use std::hash::{ Hash, Hasher };
use std::str::FromStr ;
use thiserror::Error ;



/// Error produced when a version string cannot be parsed.
#[derive( Debug, Error, Clone, PartialEq, Eq )]
pub enum VersionError {
    /// The input was empty (after trimming and removing a leading `v`).
    #[error( "Empty version string" )]
    Empty,
    /// A numeric component was not a valid unsigned integer.
    #[error( "Invalid numeric component '{component}' in version '{input}'" )]
    InvalidNumber { input: String, component: String },
    /// More than three numeric components were given.
    #[error( "Too many numeric components in version '{0}'" )]
    TooManyComponents( String ),
    /// A prerelease label was empty (e.g. `1.0.0-alpha..1`).
    #[error( "Empty prerelease label in version '{0}'" )]
    EmptyLabel( String ),
}

/// A comparable module version.
///
/// Equality and hashing agree with [`Ord`]: two versions that differ only in build
/// metadata are equal, and numeric prerelease labels compare by value (`01 == 1`).
#[derive( Debug, Clone )]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    prerelease: Vec<String>,
    build: Option<String>,
}

impl Version {

    /// Creates a release version without labels or build metadata.
    pub const fn new( major: u64, minor: u64, patch: u64 ) -> Self {
        Self { major, minor, patch, prerelease: Vec::new(), build: None }
    }

    /// Replaces the prerelease labels of this version.
    pub fn with_prerelease( mut self, labels: impl IntoIterator<Item = impl Into<String>> ) -> Self {
        self.prerelease = labels.into_iter().map( Into::into ).collect();
        self
    }

    /// Replaces the build metadata of this version.
    pub fn with_build( mut self, build: impl Into<String> ) -> Self {
        self.build = Some( build.into());
        self
    }

    /// Parses `MAJOR[.MINOR[.PATCH]][-LABEL(.LABEL)*][+BUILD]`, with an optional leading `v`.
    ///
    /// Missing minor and patch components default to `0`.
    ///
    /// # Errors
    /// Returns a [`VersionError`] describing the first malformed component.
    pub fn parse( input: &str ) -> Result<Self, VersionError> {

        let trimmed = input.trim();
        let trimmed = trimmed.strip_prefix( 'v' ).unwrap_or( trimmed );
        if trimmed.is_empty() { return Err( VersionError::Empty ) }

        let ( rest, build ) = match trimmed.split_once( '+' ) {
            Some(( rest, build )) => ( rest, Some( build.to_string() )),
            None => ( trimmed, None ),
        };

        let ( core, prerelease ) = match rest.split_once( '-' ) {
            Some(( core, labels )) => ( core, labels.split( '.' ).map( str::to_string ).collect::<Vec<_>>() ),
            None => ( rest, Vec::new() ),
        };

        if prerelease.iter().any( String::is_empty ) {
            return Err( VersionError::EmptyLabel( input.to_string() ));
        }

        let numbers = core.split( '.' )
            .map(| component | component.parse::<u64>().map_err(| _ | VersionError::InvalidNumber {
                input: input.to_string(),
                component: component.to_string(),
            }))
            .collect::<Result<Vec<_>, _>>()?;

        let ( major, minor, patch ) = match numbers.as_slice() {
            [ major ] => ( *major, 0, 0 ),
            [ major, minor ] => ( *major, *minor, 0 ),
            [ major, minor, patch ] => ( *major, *minor, *patch ),
            _ => return Err( VersionError::TooManyComponents( input.to_string() )),
        };

        Ok( Self { major, minor, patch, prerelease, build })

    }

    #[inline] pub fn major( &self ) -> u64 { self.major }
    #[inline] pub fn minor( &self ) -> u64 { self.minor }
    #[inline] pub fn patch( &self ) -> u64 { self.patch }
    #[inline] pub fn prerelease( &self ) -> &[String] { &self.prerelease }
    #[inline] pub fn build( &self ) -> Option<&str> { self.build.as_deref() }

    /// Whether this version carries prerelease labels ("unstable").
    #[inline] pub fn is_prerelease( &self ) -> bool { !self.prerelease.is_empty() }

    /// Compares two versions, optionally ignoring ASCII and Unicode case in
    /// alphanumeric prerelease labels.
    pub fn compare( &self, other: &Self, case_sensitive: bool ) -> Ordering {
        self.major.cmp( &other.major )
            .then( self.minor.cmp( &other.minor ))
            .then( self.patch.cmp( &other.patch ))
            .then_with(|| compare_labels( &self.prerelease, &other.prerelease, case_sensitive ))
    }

}

fn compare_labels( left: &[String], right: &[String], case_sensitive: bool ) -> Ordering {
    match ( left.is_empty(), right.is_empty() ) {
        ( true, true ) => Ordering::Equal,
        ( true, false ) => Ordering::Greater,
        ( false, true ) => Ordering::Less,
        ( false, false ) => left.iter().zip( right.iter())
            .map(|( l, r )| compare_label( l, r, case_sensitive ))
            .find(| ordering | ordering.is_ne())
            .unwrap_or_else(|| left.len().cmp( &right.len() )),
    }
}

// Numeric labels rank below alphanumeric ones.
fn compare_label( left: &str, right: &str, case_sensitive: bool ) -> Ordering {
    match ( left.parse::<u64>(), right.parse::<u64>() ) {
        ( Ok( l ), Ok( r )) => l.cmp( &r ),
        ( Ok( _ ), Err( _ )) => Ordering::Less,
        ( Err( _ ), Ok( _ )) => Ordering::Greater,
        ( Err( _ ), Err( _ )) if case_sensitive => left.cmp( right ),
        ( Err( _ ), Err( _ )) => left.chars().flat_map( char::to_lowercase )
            .cmp( right.chars().flat_map( char::to_lowercase )),
    }
}

impl PartialEq for Version {
    fn eq( &self, other: &Self ) -> bool { self.compare( other, true ).is_eq() }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp( &self, other: &Self ) -> Option<Ordering> { Some( self.cmp( other )) }
}

impl Ord for Version {
    fn cmp( &self, other: &Self ) -> Ordering { self.compare( other, true ) }
}

impl Hash for Version {
    fn hash<H: Hasher>( &self, state: &mut H ) {
        self.major.hash( state );
        self.minor.hash( state );
        self.patch.hash( state );
        self.prerelease.len().hash( state );
        self.prerelease.iter().for_each(| label | match label.parse::<u64>() {
            Ok( number ) => number.hash( state ),
            Err( _ ) => label.hash( state ),
        });
    }
}

impl FromStr for Version {
    type Err = VersionError ;
    fn from_str( input: &str ) -> Result<Self, Self::Err> { Self::parse( input ) }
}

impl std::fmt::Display for Version {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> Result<(), std::fmt::Error> {
        write!( f, "{}.{}.{}", self.major, self.minor, self.patch )?;
        if !self.prerelease.is_empty() { write!( f, "-{}", self.prerelease.join( "." ))?; }
        if let Some( build ) = &self.build { write!( f, "+{}", build )?; }
        Ok(())
    }
}

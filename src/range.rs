//! Version acceptance ranges.
//!
//! A [`VersionRange`] is an inclusive interval over [`Version`]s with optional bounds,
//! a list of excluded sub-ranges and a switch for prerelease versions. Relations carry
//! a list of ranges; a version is acceptable if any of them contains it.

use std::cmp::Ordering ;
use tracing::warn ;

use crate::version::Version ;



/// An inclusive version interval with exclusions.
///
/// # Example
///
/// ```
/// use module_link::{ Version, VersionRange };
///
/// let range = VersionRange::between( Version::new( 1, 0, 0 ), Version::new( 2, 0, 0 ))
/// 	.excluding( VersionRange::exactly( Version::new( 1, 4, 2 )));
///
/// assert!( range.contains( &Version::new( 1, 4, 1 )));
/// assert!( !range.contains( &Version::new( 1, 4, 2 )));
/// assert!( !range.contains( &Version::new( 2, 0, 1 )));
/// ```
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct VersionRange {
    /// Inclusive lower bound, unbounded if absent
    min: Option<Version>,
    /// Inclusive upper bound, unbounded if absent
    max: Option<Version>,
    /// Sub-ranges whose bounds reject a version even if it is otherwise accepted
    exclusions: Vec<VersionRange>,
    /// Whether prerelease versions may be accepted
    allow_unstable: bool,
    /// Whether alphanumeric prerelease labels compare case-sensitively
    case_sensitive: bool,
}

impl VersionRange {

    /// Creates a range from optional inclusive bounds.
    ///
    /// If `min` is greater than `max` the range is invalid and the upper bound is
    /// dropped, leaving the range unbounded above.
    pub fn new( min: Option<Version>, max: Option<Version> ) -> Self {
        Self {
            min,
            max,
            exclusions: Vec::with_capacity( 0 ),
            allow_unstable: true,
            case_sensitive: true,
        }.normalized()
    }

    /// Accepts every version.
    pub fn any() -> Self { Self::new( None, None )}

    /// Accepts `version` and everything above it.
    pub fn at_least( version: Version ) -> Self { Self::new( Some( version ), None )}

    /// Accepts `version` and everything below it.
    pub fn at_most( version: Version ) -> Self { Self::new( None, Some( version ))}

    /// Accepts versions in `[min, max]`.
    pub fn between( min: Version, max: Version ) -> Self { Self::new( Some( min ), Some( max ))}

    /// Accepts a single version.
    pub fn exactly( version: Version ) -> Self { Self::new( Some( version.clone() ), Some( version ))}

    /// Adds an excluded sub-range. Only the exclusion's bounds are consulted.
    pub fn excluding( mut self, exclusion: VersionRange ) -> Self {
        self.exclusions.push( exclusion );
        self
    }

    /// Sets whether prerelease versions are accepted.
    pub fn with_unstable( mut self, allow_unstable: bool ) -> Self {
        self.allow_unstable = allow_unstable ;
        self
    }

    /// Sets whether prerelease labels compare case-sensitively.
    pub fn with_case_sensitive( mut self, case_sensitive: bool ) -> Self {
        self.case_sensitive = case_sensitive ;
        self.normalized()
    }

    #[inline] pub fn min( &self ) -> Option<&Version> { self.min.as_ref() }
    #[inline] pub fn max( &self ) -> Option<&Version> { self.max.as_ref() }
    #[inline] pub fn exclusions( &self ) -> &[VersionRange] { &self.exclusions }
    #[inline] pub fn allows_unstable( &self ) -> bool { self.allow_unstable }
    #[inline] pub fn is_case_sensitive( &self ) -> bool { self.case_sensitive }

    /// Membership test: within bounds, permitted by the unstable flag and outside
    /// every exclusion. Exclusion bounds compare with this range's case sensitivity.
    pub fn contains( &self, version: &Version ) -> bool {
        self.within_bounds( version, self.case_sensitive )
            && ( self.allow_unstable || !version.is_prerelease() )
            && !self.exclusions.iter().any(| exclusion | exclusion.within_bounds( version, self.case_sensitive ))
    }

    fn within_bounds( &self, version: &Version, case_sensitive: bool ) -> bool {
        let above_min = self.min.as_ref()
            .is_none_or(| min | version.compare( min, case_sensitive ) != Ordering::Less );
        let below_max = self.max.as_ref()
            .is_none_or(| max | version.compare( max, case_sensitive ) != Ordering::Greater );
        above_min && below_max
    }

    fn normalized( mut self ) -> Self {
        if let ( Some( min ), Some( max )) = ( &self.min, &self.max ) {
            if min.compare( max, self.case_sensitive ) == Ordering::Greater {
                warn!( %min, %max, "Version range minimum exceeds maximum, dropping upper bound" );
                self.max = None ;
            }
        }
        self
    }

}

impl Default for VersionRange {
    fn default() -> Self { Self::any() }
}

impl std::fmt::Display for VersionRange {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> Result<(), std::fmt::Error> {
        match &self.min {
            Some( min ) => write!( f, "[{}, ", min )?,
            None => write!( f, "[*, " )?,
        }
        match &self.max {
            Some( max ) => write!( f, "{}]", max )?,
            None => write!( f, "*]" )?,
        }
        self.exclusions.iter().try_for_each(| exclusion | write!( f, " \\ {}", exclusion ))?;
        if !self.allow_unstable { write!( f, " stable" )?; }
        Ok(())
    }
}

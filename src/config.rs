use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::error::{MineError, Result};

/// Default bound on the itemset size explored by the level-wise search.
pub const DEFAULT_MAX_LEVEL: usize = 10;
/// Rule generation enumerates splits with a 64 bit mask, so itemsets must stay well below that.
pub const MAX_LEVEL_LIMIT: usize = 32;

/// Thresholds and limits for one mining run.
#[derive( Debug, Clone )]
pub struct MiningParameters {
    min_support: f64,
    min_confidence: f64,
    /// largest itemset size mined; reaching it stops the search without error
    max_level: usize,
    /// drop candidates with an infrequent (k-1)-subset before counting
    prune_candidates: bool,
    timeout: Option<Duration>,
    cancel: Option<CancelToken>,
}

/// Shared flag to abort a mining run between two levels.
#[derive( Debug, Clone, Default )]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl MiningParameters {

    /// Creates parameters with the default level cap. Both thresholds must lie in (0, 1].
    pub fn new( min_support: f64, min_confidence: f64 ) -> Result<MiningParameters> {
	let parameters = MiningParameters {
	    min_support,
	    min_confidence,
	    max_level: DEFAULT_MAX_LEVEL,
	    prune_candidates: true,
	    timeout: None,
	    cancel: None,
	};
	parameters.validate()?;
	Ok( parameters )
    }

    /// Checks every setting. Entry points call this before touching the data.
    pub fn validate( &self ) -> Result<()> {
	check_fraction( "min_support", self.min_support )?;
	check_fraction( "min_confidence", self.min_confidence )?;
	if self.max_level == 0 || self.max_level > MAX_LEVEL_LIMIT {
	    return Err( MineError::InvalidParameter { name: "max_level", value: self.max_level as f64 } );
	}
	Ok( () )
    }

    pub fn min_support( &self ) -> f64 { self.min_support }
    pub fn min_confidence( &self ) -> f64 { self.min_confidence }
    pub fn max_level( &self ) -> usize { self.max_level }
    pub fn prune_candidates( &self ) -> bool { self.prune_candidates }
    pub fn timeout( &self ) -> Option<Duration> { self.timeout }
    pub fn cancel_token( &self ) -> Option<&CancelToken> { self.cancel.as_ref() }

    pub fn set_max_level( &mut self, max_level: usize ) {
	self.max_level = max_level;
    }

    pub fn set_prune_candidates( &mut self, prune: bool ) {
	self.prune_candidates = prune;
    }

    pub fn set_timeout( &mut self, timeout: Duration ) {
	self.timeout = Some( timeout );
    }

    pub fn set_cancel_token( &mut self, token: CancelToken ) {
	self.cancel = Some( token );
    }
}

impl CancelToken {
    pub fn new() -> CancelToken {
	CancelToken::default()
    }

    pub fn cancel( &self ) {
	self.flag.store( true, Ordering::Relaxed );
    }

    pub fn is_cancelled( &self ) -> bool {
	self.flag.load( Ordering::Relaxed )
    }
}

// NaN fails both comparisons and is rejected as well
pub(crate) fn check_fraction( name: &'static str, value: f64 ) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
	Ok( () )
    } else {
	Err( MineError::InvalidParameter { name, value } )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_threshold_bounds() {
	assert!( MiningParameters::new( 0.5, 0.5 ).is_ok() );
	assert!( MiningParameters::new( 1.0, 1.0 ).is_ok() );
	assert!( matches!( MiningParameters::new( 0.0, 0.5 ),
			   Err( MineError::InvalidParameter { name: "min_support", .. } )));
	assert!( matches!( MiningParameters::new( 0.5, 0.0 ),
			   Err( MineError::InvalidParameter { name: "min_confidence", .. } )));
	assert!( MiningParameters::new( 1.01, 0.5 ).is_err() );
	assert!( MiningParameters::new( -0.1, 0.5 ).is_err() );
	assert!( MiningParameters::new( f64::NAN, 0.5 ).is_err() );
    }

    #[test]
    fn test_level_cap_bounds() {
	let mut parameters = MiningParameters::new( 0.5, 0.5 ).unwrap();
	assert_eq!( parameters.max_level(), DEFAULT_MAX_LEVEL );
	parameters.set_max_level( 0 );
	assert!( parameters.validate().is_err() );
	parameters.set_max_level( MAX_LEVEL_LIMIT + 1 );
	assert!( parameters.validate().is_err() );
	parameters.set_max_level( MAX_LEVEL_LIMIT );
	assert!( parameters.validate().is_ok() );
    }

    #[test]
    fn test_cancel_token_is_shared() {
	let token = CancelToken::new();
	let clone = token.clone();
	assert!( !clone.is_cancelled() );
	token.cancel();
	assert!( clone.is_cancelled() );
    }
}

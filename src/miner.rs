use std::time::Instant;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::*;

use crate::*;
use crate::error::{MineError, Result};

pub mod candidates;

pub use candidates::CandidateGenerator;

pub trait Miner {
    /// Finds all itemsets whose support reaches the miner's threshold.
    fn mine<D>( &self, data: &D ) -> Result<FrequentItemsets> where
	D: Database + Sync;
}

/// An itemset together with the fraction of transactions containing it.
#[derive( Debug, Clone, PartialEq )]
pub struct FrequentItemset {
    pub itemset: Itemset,
    pub support: f64,
}

/// All frequent itemsets of one run, across every level.
#[derive( Debug, Clone, Default )]
pub struct FrequentItemsets {
    records: Vec<FrequentItemset>,
    transaction_count: Count,
    /// the search stopped at the level cap with a non-empty last level
    capped: bool,
}

/// Supports of the mined itemsets, keyed by canonical itemset.
pub struct SupportTable {
    supports: FxHashMap<Itemset, f64>,
}

/// Level-wise search: frequent k-itemsets seed the candidates of size k + 1.
pub struct AprioriMiner {
    parameters: MiningParameters,
}

impl Miner for AprioriMiner {

    fn mine<D>( &self, data: &D ) -> Result<FrequentItemsets> where
	D: Database + Sync,
    {
	self.parameters.validate()?;
	let n = data.transaction_count();
	if n == 0 {
	    return Err( MineError::EmptyInput );
	}

	let start = Instant::now();
	let mut result = FrequentItemsets::new( n );
	let mut current = self.initialize( data, &mut result );

	let generator = CandidateGenerator::new( self.parameters.prune_candidates() );
	let mut level = 2;
	while !current.is_empty() {
	    if level > self.parameters.max_level() {
		warn!( "Stopping at level cap {} with {} itemsets still frequent", self.parameters.max_level(), current.len() );
		result.capped = true;
		break;
	    }
	    self.check_budget( level, start )?;

	    let _level_span = info_span!( "level", k = level ).entered();
	    current = self.iterate( &generator, &current, level, data, &mut result )?;
	    level += 1;
	}

	info!( "Found {} frequent itemsets in {}ms", result.len(), start.elapsed().as_millis() );
	Ok( result )
    }
}

impl AprioriMiner {

    pub fn new( parameters: MiningParameters ) -> AprioriMiner {
	AprioriMiner {
	    parameters,
	}
    }

    pub fn parameters( &self ) -> &MiningParameters {
	&self.parameters
    }

    /// Counts single items in one pass and returns the frequent ones as level 1.
    fn initialize<D: Database>( &self, data: &D, result: &mut FrequentItemsets ) -> Vec<Itemset> {
	let _init_span = info_span!( "level", k = 1 ).entered();
	let n = data.transaction_count() as f64;
	let min_support = self.parameters.min_support();

	let counts = data.item_counts();
	let mut level: Vec<FrequentItemset> = counts.iter()
	    .map( |(item, count)| FrequentItemset::new( vec!( *item ), *count as f64 / n ))
	    .filter( |record| record.support >= min_support )
	    .collect();
	level.sort_unstable_by( |left, right| left.itemset.cmp( &right.itemset ));

	info!( "{} of {} items are frequent", level.len(), counts.len() );
	result.append_level( level )
    }

    /// Generates candidates of size `level`, counts them and keeps the frequent ones.
    fn iterate<D>( &self, generator: &CandidateGenerator, previous: &[Itemset], level: usize, data: &D, result: &mut FrequentItemsets ) -> Result<Vec<Itemset>> where
	D: Database + Sync,
    {
	let min_support = self.parameters.min_support();
	let candidates = generator.generate( previous, level );
	let number_candidates = candidates.len();

	let counted: Vec<FrequentItemset> = candidates.into_par_iter()
	    .map( |candidate| -> Result<FrequentItemset> {
		let support = data.support( &candidate )?;
		Ok( FrequentItemset::new( candidate, support ))
	    })
	    .collect::<Result<Vec<FrequentItemset>>>()?;
	let frequent: Vec<FrequentItemset> = counted.into_iter()
	    .filter( |record| record.support >= min_support )
	    .collect();

	info!( "{} of {} candidates are frequent", frequent.len(), number_candidates );
	Ok( result.append_level( frequent ))
    }

    /// Aborts between levels when the run was cancelled or ran out of time.
    fn check_budget( &self, level: usize, start: Instant ) -> Result<()> {
	if let Some( token ) = self.parameters.cancel_token() {
	    if token.is_cancelled() {
		return Err( MineError::Cancelled { level } );
	    }
	}
	if let Some( timeout ) = self.parameters.timeout() {
	    let elapsed = start.elapsed();
	    if elapsed >= timeout {
		return Err( MineError::DeadlineExceeded { level, elapsed_ms: elapsed.as_millis() } );
	    }
	}
	Ok( () )
    }
}

impl FrequentItemset {
    pub fn new( itemset: Itemset, support: f64 ) -> FrequentItemset {
	FrequentItemset { itemset, support }
    }

    pub fn len( &self ) -> usize {
	self.itemset.len()
    }

    pub fn is_empty( &self ) -> bool {
	self.itemset.is_empty()
    }
}

impl Loggable for FrequentItemset {
    fn describe( &self ) -> String {
	format!( "{:?} (support {:.3})", self.itemset, self.support )
    }
}

impl FrequentItemsets {

    pub fn new( transaction_count: Count ) -> FrequentItemsets {
	FrequentItemsets {
	    records: Vec::new(),
	    transaction_count,
	    capped: false,
	}
    }

    /// Records a level and returns its itemsets as seed for the next one.
    fn append_level( &mut self, level: Vec<FrequentItemset> ) -> Vec<Itemset> {
	let seeds = level.iter().map( |record| record.itemset.clone() ).collect();
	for record in &level {
	    record.log( "frequent", Level::DEBUG );
	}
	self.records.extend( level );
	seeds
    }

    /// Adds an itemset mined elsewhere, e.g. to derive rules from a precomputed collection.
    pub fn push( &mut self, record: FrequentItemset ) {
	self.records.push( record );
    }

    pub fn iter( &self ) -> std::slice::Iter<'_, FrequentItemset> {
	self.records.iter()
    }

    pub fn len( &self ) -> usize {
	self.records.len()
    }

    pub fn is_empty( &self ) -> bool {
	self.records.is_empty()
    }

    pub fn transaction_count( &self ) -> Count {
	self.transaction_count
    }

    /// True if mining stopped at the level cap rather than running out of candidates
    pub fn is_capped( &self ) -> bool {
	self.capped
    }

    /// Size of the largest frequent itemset
    pub fn max_size( &self ) -> usize {
	self.records.iter().map( |record| record.len() ).max().unwrap_or( 0 )
    }

    pub fn support_table( &self ) -> SupportTable {
	SupportTable {
	    supports: self.records.iter().map( |record| (record.itemset.clone(), record.support) ).collect(),
	}
    }

    pub fn into_records( self ) -> Vec<FrequentItemset> {
	self.records
    }
}

impl <'a> IntoIterator for &'a FrequentItemsets {
    type Item = &'a FrequentItemset;
    type IntoIter = std::slice::Iter<'a, FrequentItemset>;

    fn into_iter( self ) -> Self::IntoIter {
	self.records.iter()
    }
}

impl SupportTable {

    pub fn get( &self, itemset: &[Item] ) -> Option<f64> {
	self.supports.get( itemset ).copied()
    }

    /// Looks the itemset up, counting it against the data on a miss.
    pub fn get_or_count<D: Database>( &self, itemset: &[Item], data: &D ) -> Result<f64> {
	match self.get( itemset ) {
	    Some( support ) => Ok( support ),
	    None => {
		debug!( "support of {itemset:?} not cached" );
		data.support( itemset )
	    },
	}
    }

    pub fn len( &self ) -> usize {
	self.supports.len()
    }

    pub fn is_empty( &self ) -> bool {
	self.supports.is_empty()
    }
}

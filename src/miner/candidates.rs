use std::cmp::Ordering;

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use tracing::*;

use crate::data::{Item, Itemset};

/// Joins frequent itemsets of one level into the candidates of the next.
#[derive( Debug, Clone, Copy )]
pub struct CandidateGenerator {
    /// drop candidates having a (k-1)-subset that is not frequent
    prune: bool,
}

impl CandidateGenerator {

    pub fn new( prune: bool ) -> CandidateGenerator {
	CandidateGenerator { prune }
    }

    /// Returns the distinct unions of size `k` over all pairs of `previous`, sorted.
    /// Pre: every itemset in `previous` is canonical and has size k - 1.
    pub fn generate( &self, previous: &[Itemset], k: usize ) -> Vec<Itemset> {
	let combinations = previous.par_iter().enumerate()
	    .flat_map( | (i, left) | {
		previous[i + 1 ..].par_iter()
		    .map( move | right | (left, right) )
	    });

	// canonical form makes equal sets hash equally
	let joined: FxHashSet<Itemset> = combinations
	    .filter_map( | (left, right) | join( left, right, k ))
	    .collect();

	let mut candidates: Vec<Itemset> = if self.prune && k > 2 {
	    let frequent: FxHashSet<&[Item]> = previous.iter().map( |itemset| itemset.as_slice() ).collect();
	    joined.into_par_iter()
		.filter( |candidate| {
		    let keep = has_frequent_subsets( candidate, &frequent );
		    if !keep {
			trace!( "pruned {candidate:?}" );
		    }
		    keep
		})
		.collect()
	} else {
	    joined.into_iter().collect()
	};
	candidates.sort_unstable();
	candidates
    }
}

/// Merges two sorted itemsets. Returns the union only if it has exactly `k` items.
fn join( left: &[Item], right: &[Item], k: usize ) -> Option<Itemset> {
    let mut union = Itemset::with_capacity( k + 1 );
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
	match left[i].cmp( &right[j] ) {
	    Ordering::Less => { union.push( left[i] ); i += 1; },
	    Ordering::Greater => { union.push( right[j] ); j += 1; },
	    Ordering::Equal => { union.push( left[i] ); i += 1; j += 1; },
	}
	if union.len() > k {
	    return None;
	}
    }
    union.extend_from_slice( &left[i ..] );
    union.extend_from_slice( &right[j ..] );
    if union.len() == k { Some( union ) } else { None }
}

/// Checks that every subset with one item removed is among the frequent itemsets.
fn has_frequent_subsets( candidate: &[Item], frequent: &FxHashSet<&[Item]> ) -> bool {
    let mut subset: Itemset = Vec::with_capacity( candidate.len() - 1 );
    (0 .. candidate.len()).all( |skip| {
	subset.clear();
	subset.extend( candidate.iter().enumerate().filter( |(i, _)| *i != skip ).map( |(_, item)| *item ));
	frequent.contains( subset.as_slice() )
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_join() {
	assert_eq!( join( &[0, 1], &[0, 2], 3 ), Some( vec!( 0, 1, 2 )));
	assert_eq!( join( &[1, 3], &[0, 2], 3 ), None );
	assert_eq!( join( &[2], &[0], 2 ), Some( vec!( 0, 2 )));
	assert_eq!( join( &[0, 4], &[0, 4], 3 ), None );
    }

    #[test]
    fn test_pairs_from_singletons() {
	let previous = vec!( vec!( 0 ), vec!( 1 ), vec!( 2 ));
	let candidates = CandidateGenerator::new( true ).generate( &previous, 2 );
	assert_eq!( candidates, vec!( vec!( 0, 1 ), vec!( 0, 2 ), vec!( 1, 2 )));
    }

    #[test]
    /// Three pairs over the same triple yield the triple once.
    fn test_deduplication() {
	let previous = vec!( vec!( 0, 1 ), vec!( 0, 2 ), vec!( 1, 2 ));
	let candidates = CandidateGenerator::new( false ).generate( &previous, 3 );
	assert_eq!( candidates, vec!( vec!( 0, 1, 2 )));
    }

    #[test]
    fn test_oversized_unions_dropped() {
	let previous = vec!( vec!( 0, 1 ), vec!( 2, 3 ));
	assert!( CandidateGenerator::new( false ).generate( &previous, 3 ).is_empty() );
    }

    #[test]
    /// {1, 2} is missing, so {0, 1, 2} can only survive without pruning.
    fn test_subset_pruning() {
	let previous = vec!( vec!( 0, 1 ), vec!( 0, 2 ));
	assert_eq!( CandidateGenerator::new( false ).generate( &previous, 3 ), vec!( vec!( 0, 1, 2 )));
	assert!( CandidateGenerator::new( true ).generate( &previous, 3 ).is_empty() );
    }

    #[test]
    fn test_empty_level() {
	let previous: Vec<Itemset> = Vec::new();
	assert!( CandidateGenerator::new( true ).generate( &previous, 2 ).is_empty() );
    }
}

use std::collections::BTreeSet;

use proptest::prelude::*;
use rustc_hash::FxHashMap;

use crate::*;
use crate::miner::SupportTable;

/// Small universes keep brute force enumeration cheap.
const UNIVERSE: u8 = 6;

fn transactions() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec( prop::collection::vec( 0 .. UNIVERSE, 1 .. 5 ), 1 .. 12 )
}

fn database( transactions: &[Vec<u8>] ) -> TransactionDatabase {
    let encoded: Vec<Itemset> = transactions.iter()
	.map( |t| t.iter().map( |item| *item as Item ).collect() )
	.collect();
    let mut database = TransactionDatabase::new();
    database.add( &encoded );
    database
}

fn mine( database: &TransactionDatabase, min_support: f64, prune: bool ) -> FrequentItemsets {
    let mut parameters = MiningParameters::new( min_support, 1.0 ).unwrap();
    parameters.set_prune_candidates( prune );
    AprioriMiner::new( parameters ).mine( database ).unwrap()
}

fn rules( database: &TransactionDatabase, min_support: f64, min_confidence: f64 ) -> Vec<AssociationRule> {
    let frequent = mine( database, min_support, true );
    RuleGenerator::new( min_confidence ).unwrap().generate( &frequent, database ).unwrap()
}

fn itemsets( frequent: &FrequentItemsets ) -> BTreeSet<Itemset> {
    frequent.iter().map( |record| record.itemset.clone() ).collect()
}

fn rule_keys( rules: &[AssociationRule] ) -> BTreeSet<(Itemset, Itemset)> {
    rules.iter().map( |rule| (rule.antecedent.clone(), rule.consequent.clone()) ).collect()
}

/// Every non-empty subset of the universe that reaches the threshold, found by enumeration.
fn brute_force( database: &TransactionDatabase, min_support: f64 ) -> BTreeSet<Itemset> {
    (1u32 .. 1 << UNIVERSE)
	.map( |mask| (0 .. UNIVERSE as Item).filter( |item| mask & ( 1 << item ) != 0 ).collect::<Itemset>() )
	.filter( |itemset| database.support( itemset ).unwrap() >= min_support )
	.collect()
}

proptest! {
    /// The level-wise search finds exactly the itemsets an exhaustive search finds.
    #[test]
    fn prop_complete( data in transactions(), min_support in 0.05f64 .. 1.0 ) {
	let database = database( &data );
	let frequent = mine( &database, min_support, true );
	prop_assert_eq!( itemsets( &frequent ), brute_force( &database, min_support ));
	// no itemset is reported twice
	prop_assert_eq!( itemsets( &frequent ).len(), frequent.len() );
    }

    /// Every (k-1)-subset of a frequent k-itemset is frequent too.
    #[test]
    fn prop_downward_closure( data in transactions(), min_support in 0.05f64 .. 1.0 ) {
	let database = database( &data );
	let frequent = mine( &database, min_support, true );
	let table: SupportTable = frequent.support_table();
	for record in &frequent {
	    if record.len() < 2 {
		continue;
	    }
	    for skip in 0 .. record.len() {
		let mut subset = record.itemset.clone();
		subset.remove( skip );
		let subset_support = table.get( &subset );
		prop_assert!( subset_support.is_some(), "{:?} missing for {:?}", subset, record.itemset );
		prop_assert!( subset_support.unwrap() >= record.support );
	    }
	}
    }

    /// Stored supports reach the threshold and match an independent recount exactly.
    #[test]
    fn prop_support_bound( data in transactions(), min_support in 0.05f64 .. 1.0 ) {
	let database = database( &data );
	for record in &mine( &database, min_support, true ) {
	    prop_assert!( record.support >= min_support );
	    prop_assert!( record.support > 0.0 && record.support <= 1.0 );
	    prop_assert_eq!( record.support, database.support( &record.itemset ).unwrap() );
	}
    }

    /// Rules partition a frequent itemset and respect the confidence bounds.
    #[test]
    fn prop_rule_invariants( data in transactions(), min_support in 0.05f64 .. 1.0, min_confidence in 0.05f64 .. 1.0 ) {
	let database = database( &data );
	let frequent = mine( &database, min_support, true );
	let supports: FxHashMap<Itemset, f64> = frequent.iter().map( |r| (r.itemset.clone(), r.support) ).collect();

	for rule in RuleGenerator::new( min_confidence ).unwrap().generate( &frequent, &database ).unwrap() {
	    prop_assert!( !rule.antecedent.is_empty() && !rule.consequent.is_empty() );
	    prop_assert!( rule.antecedent.iter().all( |item| !rule.consequent.contains( item )));
	    let origin = rule.itemset();
	    prop_assert_eq!( origin.len(), rule.antecedent.len() + rule.consequent.len() );
	    prop_assert_eq!( supports.get( &origin ).copied(), Some( rule.support ));

	    prop_assert!( rule.confidence >= min_confidence );
	    prop_assert!( rule.confidence <= 1.0 );
	    prop_assert!( rule.lift.is_finite() && rule.lift >= 0.0 );
	    let expected = rule.support / database.support( &rule.antecedent ).unwrap();
	    prop_assert!( ( rule.confidence - expected ).abs() < 1e-12 );
	}
    }

    /// Two runs over the same input agree as sets.
    #[test]
    fn prop_idempotent( data in transactions(), min_support in 0.05f64 .. 1.0, min_confidence in 0.05f64 .. 1.0 ) {
	let database = database( &data );
	prop_assert_eq!( itemsets( &mine( &database, min_support, true )), itemsets( &mine( &database, min_support, true )));
	prop_assert_eq!( rule_keys( &rules( &database, min_support, min_confidence )),
			 rule_keys( &rules( &database, min_support, min_confidence )));
    }

    /// Raising either threshold never yields more results.
    #[test]
    fn prop_threshold_monotone( data in transactions(),
				support in 0.05f64 .. 1.0, support_step in 0.0f64 .. 0.5,
				confidence in 0.05f64 .. 1.0, confidence_step in 0.0f64 .. 0.5 ) {
	let database = database( &data );
	let higher_support = ( support + support_step ).min( 1.0 );
	let higher_confidence = ( confidence + confidence_step ).min( 1.0 );

	prop_assert!( mine( &database, higher_support, true ).len() <= mine( &database, support, true ).len() );
	prop_assert!( rules( &database, support, higher_confidence ).len() <= rules( &database, support, confidence ).len() );
    }

    /// Subset pruning changes the work done, never the result.
    #[test]
    fn prop_pruning_transparent( data in transactions(), min_support in 0.05f64 .. 1.0 ) {
	let database = database( &data );
	prop_assert_eq!( itemsets( &mine( &database, min_support, true )), itemsets( &mine( &database, min_support, false )));
    }

    /// Labels survive the round trip through the encoder.
    #[test]
    fn prop_labels_decoded( data in transactions(), min_confidence in 0.05f64 .. 1.0 ) {
	let labelled: Vec<Vec<String>> = data.iter()
	    .map( |t| t.iter().map( |item| format!( "item-{item}" )).collect() )
	    .collect();
	let parameters = MiningParameters::new( 0.2, min_confidence ).unwrap();
	let decoded = mine_rules( &labelled, &parameters ).unwrap();
	prop_assert_eq!( decoded.len(), rules( &database( &data ), 0.2, min_confidence ).len() );
	for rule in decoded {
	    prop_assert!( rule.antecedents.iter().chain( rule.consequents.iter() ).all( |label| label.starts_with( "item-" )));
	}
    }
}

mod serialize; // pretty printing of decoded rules

use rayon::prelude::*;
use serde::Serialize;
use tracing::*;

use crate::*;
use crate::config::{check_fraction, MAX_LEVEL_LIMIT};
use crate::error::{MineError, Result};
use crate::miner::{FrequentItemset, SupportTable};

pub use serialize::RuleFormatter;

#[derive( Debug, Clone, PartialEq )]
/// Rule over encoded items. Antecedent and consequent partition the frequent itemset it came from.
pub struct AssociationRule {
    pub antecedent: Itemset,
    pub consequent: Itemset,
    /// support of antecedent and consequent together
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
}

/// Rule with item labels restored, as handed to callers.
#[derive( Debug, Clone, PartialEq, Serialize )]
pub struct Rule {
    pub antecedents: Vec<String>,
    pub consequents: Vec<String>,
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
}

/// Presentation orders for rules, all descending.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum RuleOrder {
    Lift,
    Confidence,
    Support,
    /// keep the order rules were generated in
    Unordered,
}

/// Splits frequent itemsets into rules that reach the confidence threshold.
pub struct RuleGenerator {
    min_confidence: f64,
}

impl RuleGenerator {

    /// The confidence threshold must lie in (0, 1].
    pub fn new( min_confidence: f64 ) -> Result<RuleGenerator> {
	check_fraction( "min_confidence", min_confidence )?;
	Ok( RuleGenerator { min_confidence } )
    }

    /// Emits the qualifying rules of every frequent itemset with at least two items.
    /// Supports of parts come from the mined itemsets; `data` is only consulted on a miss.
    pub fn generate<D>( &self, frequent: &FrequentItemsets, data: &D ) -> Result<Vec<AssociationRule>> where
	D: Database + Sync,
    {
	let table = frequent.support_table();
	let records: Vec<&FrequentItemset> = frequent.iter().filter( |record| record.len() >= 2 ).collect();

	let rules: Vec<Vec<AssociationRule>> = records.par_iter()
	    .map( |record| self.split( record, &table, data ))
	    .collect::<Result<Vec<Vec<AssociationRule>>>>()?;
	let rules: Vec<AssociationRule> = rules.into_iter().flatten().collect();

	info!( "Generated {} rules from {} itemsets", rules.len(), records.len() );
	Ok( rules )
    }

    /// Tries every non-empty proper subset of the itemset as antecedent.
    /// Bit j of the mask puts item j into the antecedent.
    fn split<D: Database>( &self, record: &FrequentItemset, table: &SupportTable, data: &D ) -> Result<Vec<AssociationRule>> {
	let items = &record.itemset;
	let m = items.len();
	if m > MAX_LEVEL_LIMIT {
	    warn!( "Itemset of size {m} is too large to split, skipping" );
	    return Ok( Vec::new() );
	}

	let mut rules = Vec::new();
	for mask in 1 .. ( 1u64 << m ) - 1 {
	    let (antecedent, consequent): (Vec<(usize, &Item)>, Vec<(usize, &Item)>) = items.iter()
		.enumerate()
		.partition( |(j, _)| mask & ( 1u64 << j ) != 0 );
	    let antecedent: Itemset = antecedent.into_iter().map( |(_, item)| *item ).collect();
	    let consequent: Itemset = consequent.into_iter().map( |(_, item)| *item ).collect();

	    let antecedent_support = table.get_or_count( &antecedent, data )?;
	    let confidence = match ratio( record.support, antecedent_support ) {
		Some( confidence ) => confidence,
		None => {
		    skip_degenerate( antecedent, consequent );
		    continue;
		},
	    };
	    if confidence < self.min_confidence {
		continue;
	    }

	    let consequent_support = table.get_or_count( &consequent, data )?;
	    let lift = match ratio( confidence, consequent_support ) {
		Some( lift ) => lift,
		None => {
		    skip_degenerate( antecedent, consequent );
		    continue;
		},
	    };

	    let rule = AssociationRule { antecedent, consequent, support: record.support, confidence, lift };
	    rule.log( "accepted", Level::DEBUG );
	    rules.push( rule );
	}
	Ok( rules )
    }
}

/// Quotient of two supports, or none if it has no finite value.
fn ratio( numerator: f64, denominator: f64 ) -> Option<f64> {
    if !( denominator > 0.0 ) {
	return None;
    }
    let quotient = numerator / denominator;
    if quotient.is_finite() { Some( quotient ) } else { None }
}

fn skip_degenerate( antecedent: Itemset, consequent: Itemset ) {
    let error = MineError::NumericDegeneracy { antecedent, consequent };
    warn!( "{error}, skipping rule" );
}

impl AssociationRule {

    /// Replaces item ids with their labels.
    pub fn decode( &self, encoder: &ItemEncoder ) -> Rule {
	Rule {
	    antecedents: encoder.decode_itemset( &self.antecedent ),
	    consequents: encoder.decode_itemset( &self.consequent ),
	    support: self.support,
	    confidence: self.confidence,
	    lift: self.lift,
	}
    }

    /// The frequent itemset the rule was split from
    pub fn itemset( &self ) -> Itemset {
	canonical( self.antecedent.iter().chain( self.consequent.iter() ).copied() )
    }
}

impl Loggable for AssociationRule {
    fn describe( &self ) -> String {
	format!( "{:?} => {:?} (support {:.3}, confidence {:.3}, lift {:.3})",
		 self.antecedent, self.consequent, self.support, self.confidence, self.lift )
    }
}

/// Sorts rules for presentation, best first. Ties fall back to the item labels.
pub fn sort_rules( rules: &mut [Rule], order: RuleOrder ) {
    let key: fn( &Rule ) -> f64 = match order {
	RuleOrder::Lift => |rule: &Rule| rule.lift,
	RuleOrder::Confidence => |rule: &Rule| rule.confidence,
	RuleOrder::Support => |rule: &Rule| rule.support,
	RuleOrder::Unordered => return,
    };
    rules.sort_by( |left, right| {
	key( right ).total_cmp( &key( left ))
	    .then_with( || left.antecedents.cmp( &right.antecedents ))
	    .then_with( || left.consequents.cmp( &right.consequents ))
    });
}

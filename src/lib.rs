pub mod config;
pub mod data;
pub mod error;
pub mod io;
pub mod miner;
pub mod rules;

#[cfg(test)]
mod tests;

use tracing::*;

pub use config::{CancelToken, MiningParameters};
pub use data::{Item, Itemset, Transaction, Count, DataPair, Database, ItemEncoder, TransactionDatabase, canonical};
pub use error::MineError;
pub use miner::{AprioriMiner, FrequentItemsets, Miner};
pub use rules::{AssociationRule, Rule, RuleGenerator, RuleOrder, sort_rules};

/// Objects that can be recorded in the log
pub trait Loggable {
    /// One-line description used in log messages
    fn describe( &self ) -> String;

    fn log( &self, message: &str, level: tracing::Level ) {
	let description = self.describe();
	if level == Level::ERROR {
	    error!( "{message} {description}" );
	} else if level == Level::WARN {
	    warn!( "{message} {description}" );
	} else if level == Level::INFO {
	    info!( "{message} {description}" );
	} else if level == Level::DEBUG {
	    debug!( "{message} {description}" );
	} else {
	    trace!( "{message} {description}" );
	}
    }
}

/// Mines association rules from labelled transactions.
///
/// Every call encodes the labels afresh, so ids never leak between runs. The returned rules
/// carry labels and come in no particular order; see [`sort_rules`] for presentation.
pub fn mine_rules <T, S> ( transactions: &[T], parameters: &MiningParameters ) -> error::Result<Vec<Rule>> where
    T: AsRef<[S]>,
    S: AsRef<str>,
{
    parameters.validate()?;
    if transactions.is_empty() {
	return Err( MineError::EmptyInput );
    }

    let mut encoder = ItemEncoder::new();
    let database = TransactionDatabase::from_labels( transactions, &mut encoder );
    info!( "Mining {} transactions over {} items", database.transaction_count(), encoder.len() );

    let miner = AprioriMiner::new( parameters.clone() );
    let frequent = miner.mine( &database )?;
    let generator = RuleGenerator::new( parameters.min_confidence() )?;
    let rules = generator.generate( &frequent, &database )?;

    Ok( rules.iter().map( |rule| rule.decode( &encoder )).collect() )
}

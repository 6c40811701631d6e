use tracing::{info, debug};
use tracing_subscriber;

use rand::prelude::*;
use statrs::distribution::DiscreteUniform;

use std::time::*;

use rulemine::*;

fn main() -> Result<(), String> {
    prepare_logging();

    let number_transactions = 20000;
    let universe_size = 60;
    let data = generate_planted_data( number_transactions, universe_size, 8, 10 )?;
    let mut database = TransactionDatabase::new();
    database.add( &data );
    info!( "Generated {} transactions ({} distinct)", database.transaction_count(), database.distinct_count() );

    for min_support in [0.1, 0.05, 0.02] {
	benchmark_mining( &database, min_support, true )?;
	benchmark_mining( &database, min_support, false )?;
    }

    Result::Ok( () )
}

fn benchmark_mining( database: &TransactionDatabase, min_support: f64, prune: bool ) -> Result<(), String> {
    let mut parameters = MiningParameters::new( min_support, 0.5 ).map_err( |e| e.to_string() )?;
    parameters.set_prune_candidates( prune );

    info!( "Start benchmark: support {min_support}, pruning {prune}" );
    let start = Instant::now();
    let frequent = AprioriMiner::new( parameters.clone() ).mine( database ).map_err( |e| e.to_string() )?;
    let mining_time = Instant::now().duration_since( start );

    let start = Instant::now();
    let rules = RuleGenerator::new( parameters.min_confidence() ).map_err( |e| e.to_string() )?.generate( &frequent, database ).map_err( |e| e.to_string() )?;
    let rule_time = Instant::now().duration_since( start );

    info!( "Result: {} itemsets (largest {}) in {}ms, {} rules in {}ms",
	   frequent.len(), frequent.max_size(), mining_time.as_millis(), rules.len(), rule_time.as_millis() );
    Ok( () )
}

/// Creates transactions of random noise items, about half of which also contain one planted pattern.
fn generate_planted_data( number_transactions: usize, universe_size: usize, number_patterns: usize, max_length: usize ) -> Result<Vec<Itemset>, String> {
    let mut gen = thread_rng();
    let mut universe: Itemset = (0 .. universe_size).collect();

    let pattern_length = DiscreteUniform::new( 2, 4 ).map_err( |e| e.to_string() )?;
    let patterns: Vec<Itemset> = (0 .. number_patterns)
	.map( |_| {
	    let length = pattern_length.sample( &mut gen ) as usize;
	    generate_random_itemset( &mut universe, length )
	})
	.collect();
    debug!( "planted patterns {patterns:?}" );

    let noise_length = DiscreteUniform::new( 1, max_length as i64 ).map_err( |e| e.to_string() )?;
    let pattern_index = DiscreteUniform::new( 0, number_patterns as i64 - 1 ).map_err( |e| e.to_string() )?;
    let data = (0 .. number_transactions)
	.map( |_| {
	    let length = noise_length.sample( &mut gen ) as usize;
	    let mut transaction = generate_random_itemset( &mut universe, length );
	    if gen.gen_bool( 0.5 ) {
		let pattern = &patterns[ pattern_index.sample( &mut gen ) as usize ];
		transaction.extend( pattern.iter().copied() );
	    }
	    canonical( transaction )
	})
	.collect();
    Ok( data )
}

fn generate_random_itemset( universe: &mut Itemset, length: usize ) -> Itemset {
    let m = universe.len() as i64;
    let mut gen = thread_rng();

    let mut itemset = Itemset::new();
    for sample_count in 0 .. length.min( universe.len() ) {
	let item_dist = DiscreteUniform::new( sample_count as i64, m - 1 ).unwrap();
	let i = item_dist.sample( &mut gen ) as usize;
	itemset.push( universe[i] );
	// move i into sample count place to avoid drawing it again
	universe.swap( sample_count, i );
    }
    itemset.sort(); // canonical representation
    itemset
}

fn prepare_logging() {
    let tracer = tracing_subscriber::fmt::fmt()
        .with_max_level( tracing_subscriber::filter::LevelFilter::INFO )
        .finish();
    tracing::subscriber::set_global_default( tracer ).unwrap();
}

use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

use rulemine::*;
use rulemine::io::{self, PrettyFormatter};
use rulemine::rules::RuleFormatter;

#[derive( Debug, Parser )]
#[command( name = "miner", about = "Mines association rules from a transaction file" )]
struct Args {
    /// Transaction file
    input: String,

    /// Layout of the input file
    #[arg( long, value_enum, default_value_t = Format::Basket )]
    format: Format,

    /// Separator between items (basket) or between key and item (pairs)
    #[arg( long, default_value = "," )]
    separator: String,

    /// Treat the first line of a pairs file as data rather than a header
    #[arg( long )]
    no_header: bool,

    /// Minimum support in (0, 1]
    #[arg( long, default_value_t = 0.05 )]
    support: f64,

    /// Minimum confidence in (0, 1]
    #[arg( long, default_value_t = 0.3 )]
    confidence: f64,

    /// Largest itemset size to mine
    #[arg( long, default_value_t = config::DEFAULT_MAX_LEVEL )]
    max_level: usize,

    /// Count every joined candidate instead of pruning those with infrequent subsets
    #[arg( long )]
    no_prune: bool,

    /// Give up after this many milliseconds, checked between levels
    #[arg( long )]
    timeout_ms: Option<u64>,

    /// Presentation order of the rules
    #[arg( long, value_enum, default_value_t = SortKey::Lift )]
    sort: SortKey,

    /// Write rules as JSON to this file instead of printing them
    #[arg( long, short )]
    output: Option<String>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg( short, long, action = clap::ArgAction::Count )]
    verbose: u8,
}

#[derive( Debug, Clone, Copy, ValueEnum )]
enum Format {
    /// one transaction per line
    Basket,
    /// `transaction,item` rows grouped by transaction
    Pairs,
}

#[derive( Debug, Clone, Copy, ValueEnum )]
enum SortKey {
    Lift,
    Confidence,
    Support,
    /// keep generation order
    #[value( name = "none" )]
    Unordered,
}

impl From<SortKey> for RuleOrder {
    fn from( key: SortKey ) -> RuleOrder {
	match key {
	    SortKey::Lift => RuleOrder::Lift,
	    SortKey::Confidence => RuleOrder::Confidence,
	    SortKey::Support => RuleOrder::Support,
	    SortKey::Unordered => RuleOrder::Unordered,
	}
    }
}

fn main() -> Result<(), String> {
    let args = Args::parse();
    prepare_logging( args.verbose )?;

    let transactions = match args.format {
	Format::Basket => io::read_baskets( &args.input, &args.separator ),
	Format::Pairs => io::read_pairs( &args.input, &args.separator, !args.no_header ),
    }.map_err( |e| e.to_string() )?;
    info!( "Read {} transactions from {}", transactions.len(), args.input );

    let mut parameters = MiningParameters::new( args.support, args.confidence ).map_err( |e| e.to_string() )?;
    parameters.set_max_level( args.max_level );
    parameters.set_prune_candidates( !args.no_prune );
    if let Some( timeout ) = args.timeout_ms {
	parameters.set_timeout( Duration::from_millis( timeout ));
    }

    let mut rules = mine_rules( &transactions, &parameters ).map_err( |e| e.to_string() )?;
    sort_rules( &mut rules, args.sort.into() );
    info!( "Found {} rules", rules.len() );

    match args.output {
	Some( path ) => io::write_json( &rules, &path ).map_err( |e| e.to_string() )?,
	None => {
	    let mut formatter = RuleFormatter::new();
	    formatter.show_metrics();
	    println!( "{}", formatter.format_pretty( rules.as_slice() ));
	},
    }
    Ok( () )
}

fn prepare_logging( verbosity: u8 ) -> Result<(), String> {
    let level = match verbosity {
	0 => LevelFilter::WARN,
	1 => LevelFilter::INFO,
	2 => LevelFilter::DEBUG,
	_ => LevelFilter::TRACE,
    };
    let tracer = tracing_subscriber::fmt::fmt()
	.with_max_level( level )
	.with_writer( std::io::stderr )
	.finish();
    tracing::subscriber::set_global_default( tracer ).map_err( |e| e.to_string() )
}

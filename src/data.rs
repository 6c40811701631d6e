use std::iter::IntoIterator;
use bit_set::BitSet;
use rustc_hash::FxHashMap;

use crate::error::{MineError, Result};

pub mod encoder;

pub use encoder::ItemEncoder;

pub type Transaction = BitSet;
pub type Count = u64;
pub type Item = usize;
/// Canonical itemset: item ids sorted ascending without duplicates.
pub type Itemset = Vec<Item>;

pub trait Database {

    /// Adds every transaction produced by the iterator to the database
    fn add <'a, Con> ( &mut self, transactions: Con ) where
	Con: IntoIterator<Item = &'a Itemset>;

    /// Returns the number of transactions containing all items in the query
    fn query_support( &self, query: &[Item] ) -> Count;

    /// Total number of transactions, duplicates included
    fn transaction_count( &self ) -> Count;

    /// Occurrence count of every item that appears at least once
    fn item_counts( &self ) -> FxHashMap<Item, Count>;

    /// Fraction of transactions containing the itemset.
    /// The empty itemset has support 1.
    fn support( &self, itemset: &[Item] ) -> Result<f64> {
	let n = self.transaction_count();
	if n == 0 {
	    return Err( MineError::EmptyInput );
	}
	Ok( self.query_support( itemset ) as f64 / n as f64 )
    }
}

/// Elements of a transactional database: a distinct transaction and its multiplicity.
pub type DataPair<'a> = (&'a Transaction, Count);

/// Stores each distinct transaction once as a bit set together with its multiplicity.
#[derive( Debug, Default )]
pub struct TransactionDatabase {
    transactions: Vec<Transaction>,
    counts: Vec<Count>,
    /// maps the canonical item list of a transaction to its slot
    index: FxHashMap<Itemset, usize>,
    total: Count,
}

impl Database for TransactionDatabase {

    fn add <'a, Con> ( &mut self, transactions: Con ) where
	Con: IntoIterator<Item = &'a Itemset>
    {
	for t in transactions.into_iter() {
	    let key = canonical( t.iter().copied() );
	    self.total += 1;
	    if let Some( slot ) = self.index.get( &key ) {
		self.counts[ *slot ] += 1;
		continue;
	    }
	    let greatest_item = key.last().map_or( 0, |itm| *itm + 1 );
	    let mut transaction = BitSet::with_capacity( greatest_item );
	    for item in &key {
		transaction.insert( *item );
	    }
	    self.index.insert( key, self.transactions.len() );
	    self.transactions.push( transaction );
	    self.counts.push( 1 );
	}
    }

    fn query_support( &self, query: &[Item] ) -> Count {
	self.into_iter()
	    .filter( |(transaction, _)| query.iter().all( |item| transaction.contains( *item )))
	    .map( |(_, count)| count )
	    .sum()
    }

    fn transaction_count( &self ) -> Count {
	self.total
    }

    fn item_counts( &self ) -> FxHashMap<Item, Count> {
	let mut counts: FxHashMap<Item, Count> = FxHashMap::default();
	for (transaction, count) in self.into_iter() {
	    for item in transaction.iter() {
		*counts.entry( item ).or_insert( 0 ) += count;
	    }
	}
	counts
    }
}

impl <'a> IntoIterator for &'a TransactionDatabase {
    type Item = DataPair<'a>;
    type IntoIter = std::iter::Zip<std::slice::Iter<'a, Transaction>, std::iter::Copied<std::slice::Iter<'a, Count>>>;

    fn into_iter( self ) -> Self::IntoIter {
	self.transactions.iter().zip( self.counts.iter().copied() )
    }
}

impl TransactionDatabase {

    pub fn new() -> TransactionDatabase {
	TransactionDatabase::default()
    }

    /// Encodes labelled transactions with the given encoder and stores them.
    pub fn from_labels <T, S> ( transactions: &[T], encoder: &mut ItemEncoder ) -> TransactionDatabase where
	T: AsRef<[S]>,
	S: AsRef<str>,
    {
	let encoded: Vec<Itemset> = transactions.iter()
	    .map( |t| encoder.encode_all( t.as_ref() ))
	    .collect();
	let mut database = TransactionDatabase::new();
	database.add( &encoded );
	database
    }

    /// Creates a vector that contains all unique items in the data base
    pub fn create_universe( &self ) -> Vec<Item> {
	let mut items: Vec<Item> = self.item_counts().into_keys().collect();
	items.sort_unstable();
	items
    }

    /// Number of distinct transactions stored
    pub fn distinct_count( &self ) -> usize {
	self.transactions.len()
    }

    pub fn is_empty( &self ) -> bool {
	self.total == 0
    }
}

/// Sorts and deduplicates items into the canonical itemset form.
pub fn canonical <I: IntoIterator<Item = Item>> ( items: I ) -> Itemset {
    let mut itemset: Itemset = items.into_iter().collect();
    itemset.sort_unstable();
    itemset.dedup();
    itemset
}

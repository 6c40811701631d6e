use rustc_hash::FxHashMap;

use super::{Item, Itemset};

/// Maps item labels to dense ids in order of first appearance and back.
/// One encoder belongs to one mining run.
#[derive( Debug, Default )]
pub struct ItemEncoder {
    ids: FxHashMap<String, Item>,
    labels: Vec<String>,
}

impl ItemEncoder {
    pub fn new() -> ItemEncoder {
	ItemEncoder::default()
    }

    /// Returns the id of the label, assigning the next free id on first sight.
    pub fn encode( &mut self, label: &str ) -> Item {
	if let Some( id ) = self.ids.get( label ) {
	    return *id;
	}
	let id = self.labels.len();
	self.labels.push( label.to_owned() );
	self.ids.insert( label.to_owned(), id );
	id
    }

    /// Encodes all labels of a transaction. Ids may repeat if labels do.
    pub fn encode_all <L> ( &mut self, labels: L ) -> Vec<Item> where
	L: IntoIterator,
	L::Item: AsRef<str>,
    {
	labels.into_iter().map( |label| self.encode( label.as_ref() )).collect()
    }

    pub fn decode( &self, id: Item ) -> Option<&str> {
	self.labels.get( id ).map( |label| label.as_str() )
    }

    /// Decodes an itemset, keeping the order of its ids.
    pub fn decode_itemset( &self, itemset: &Itemset ) -> Vec<String> {
	itemset.iter()
	    .filter_map( |id| self.decode( *id ))
	    .map( |label| label.to_owned() )
	    .collect()
    }

    pub fn len( &self ) -> usize {
	self.labels.len()
    }

    pub fn is_empty( &self ) -> bool {
	self.labels.is_empty()
    }
}

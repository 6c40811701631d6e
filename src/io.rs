use std::fmt::Display;
use std::path::Path;
use std::fs::File;
use std::io::{BufReader, BufRead, BufWriter, ErrorKind, Write};

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::{MineError, Result};

/// Converts a structure into a string
pub trait PrettyFormatter<T: ?Sized> {
    fn format_pretty( &self, object: &T ) -> String;
}

pub type DataGenerator<T> = Box<dyn Iterator<Item = Result<T>>>;

/// Reads a text file line by line. The converter receives the 1-based line number and the line
/// and returns `None` for lines to skip.
pub fn read_data<T, F>( path: &str, converter: F ) -> Result<DataGenerator<T>> where
    F: Fn( usize, &str ) -> Option<Result<T>> + 'static,
    T: 'static,
{
    let path = Path::new( path );
    let file = File::open( path )?;
    let reader = BufReader::new( file );
    let generator = reader.lines()
	.enumerate()
	.filter_map( move |(index, line)| match line {
	    Ok( line ) => converter( index + 1, &line ),
	    // lines() reports non UTF-8 content as invalid data
	    Err( err ) if err.kind() == ErrorKind::InvalidData => Some( Err( MineError::Parse { line: index + 1, message: err.to_string() } )),
	    Err( err ) => Some( Err( MineError::from( err ))),
	});
    Ok( Box::new( generator ))
}

/// Parses one basket per line, items separated by splitter. Blank lines are skipped.
pub fn parse_basket( line: &str, splitter: &str ) -> Option<Vec<String>> {
    let items: Vec<String> = line.split( splitter )
	.map( |chunk| chunk.trim() )
	.filter( |chunk| !chunk.is_empty() )
	.map( |chunk| chunk.to_owned() )
	.collect();
    if items.is_empty() { None } else { Some( items ) }
}

/// Parses a `transaction key, item` row. Rows missing either field yield `None`.
pub fn parse_pair( line: &str, splitter: &str ) -> Option<(String, String)> {
    let mut fields = line.splitn( 2, splitter ).map( |field| field.trim() );
    let key = fields.next().filter( |key| !key.is_empty() )?;
    let item = fields.next().filter( |item| !item.is_empty() )?;
    Some( (key.to_owned(), item.to_owned()) )
}

/// Groups item rows by transaction key. Transactions keep the order in which keys first appear.
pub fn group_pairs<I>( pairs: I ) -> Vec<Vec<String>> where
    I: IntoIterator<Item = (String, String)>,
{
    let mut slots: FxHashMap<String, usize> = FxHashMap::default();
    let mut transactions: Vec<Vec<String>> = Vec::new();
    for (key, item) in pairs {
	let slot = *slots.entry( key ).or_insert_with( || {
	    transactions.push( Vec::new() );
	    transactions.len() - 1
	});
	transactions[ slot ].push( item );
    }
    transactions
}

/// Reads baskets, one transaction per line.
pub fn read_baskets( path: &str, splitter: &str ) -> Result<Vec<Vec<String>>> {
    let splitter = splitter.to_owned();
    read_data( path, move |_, line| parse_basket( line, &splitter ).map( Ok ))?
	.collect()
}

/// Reads `key, item` rows and groups them into transactions.
/// With `has_header` the first line is skipped. Rows missing the key or the item are dropped.
pub fn read_pairs( path: &str, splitter: &str, has_header: bool ) -> Result<Vec<Vec<String>>> {
    let splitter = splitter.to_owned();
    let pairs = read_data( path, move |number, line| {
	if has_header && number == 1 {
	    return None;
	}
	parse_pair( line, &splitter ).map( Ok )
    })?.collect::<Result<Vec<(String, String)>>>()?;
    Ok( group_pairs( pairs ))
}

/// Creates a string from an iterator over items
pub fn produce_itemset<I>( items: I, left_delimiter: &str, separator: &str, right_delimiter: &str ) -> String where
    I: Iterator,
    I::Item: Display,
{
    let mut output = String::new();
    output.push_str( left_delimiter );
    for (index, item) in items.enumerate() {
	if index > 0 {
	    output.push_str( separator );
	}
	output.push_str( item.to_string().as_str() );
    }
    output.push_str( right_delimiter );
    output
}

/// Writes a serializeable value to a file as JSON
pub fn write_json<M: Serialize + ?Sized>( value: &M, path: &str ) -> Result<()> {
    let path = Path::new( path );
    let mut writer = BufWriter::new( File::create( path )? );
    serde_json::to_writer_pretty( &mut writer, value )?;
    writer.flush()?;
    Ok( () )
}
